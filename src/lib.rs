//! anchorgen - degraded anchor synthesis for listening tests
//!
//! MUSHRA-style evaluation of source separation needs low-quality reference
//! stimuli so ratings span the full scale. This crate builds those anchors
//! from a target source and, optionally, the other sources of the mixture:
//!
//! - `distorted_target`: dropped spectrogram frames plus a lowpass
//! - `artefacts`: the target mixed with synthetic musical noise
//! - `interference`: the target mixed with the rest of the mixture
//! - `overall_quality` and `target_sound_quality`: composites of the above
//!
//! Degradations operate on half-overlap short-time spectra and every result
//! is matched to the integrated loudness of the original target. Batches are
//! passed through a clipping guard before being written to disk.
//!
//! # Example
//!
//! ```no_run
//! use anchorgen::anchors::{distorted_target, DistortedTargetParams};
//! use anchorgen::audio::{load_wav, save_wav};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! # fn main() -> anchorgen::Result<()> {
//! let target = load_wav("vocals.wav")?;
//! let mut rng = StdRng::seed_from_u64(42);
//! let anchor = distorted_target(&target, &DistortedTargetParams::default(), &mut rng)?;
//! save_wav(&anchor, "vocals_distorted_target_anchor.wav")?;
//! # Ok(())
//! # }
//! ```

pub mod anchors;
pub mod audio;
pub mod cli;
pub mod dsp;
pub mod error;
pub mod report;

pub use anchors::AnchorKind;
pub use audio::AudioBuffer;
pub use error::{AnchorError, Result};

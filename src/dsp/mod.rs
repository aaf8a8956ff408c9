//! Spectral processing, loudness, and batch safety

pub mod clip;
pub mod distortion;
pub mod loudness;
pub mod spectrogram;
pub mod stft;
pub mod window;

pub use clip::ensure_no_clipping;
pub use distortion::{bin_dropout, frame_dropout, lowpass_mask};
pub use loudness::{apply_loudness, measure_loudness};
pub use spectrogram::Spectrogram;
pub use stft::Stft;
pub use window::WindowKind;

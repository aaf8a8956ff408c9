//! Batch clipping guard
//!
//! Loudness matching can push sample values past full scale. Before a batch
//! is written to disk, the guard finds the largest peak across all buffers
//! and, only if it would clip, rescales every buffer by the same factor so
//! relative levels between anchors are preserved.

use log::warn;

use crate::audio::AudioBuffer;

/// Peak ceiling applied when a batch has to be rescaled
pub const CLIP_CEILING: f32 = 0.999;

/// Rescale a batch so no sample reaches full scale
///
/// Returns the gain that was applied: 1.0 when the batch already fits,
/// otherwise `CLIP_CEILING / peak` applied uniformly to every buffer.
pub fn ensure_no_clipping(buffers: &mut [AudioBuffer]) -> f32 {
    let peak = buffers
        .iter()
        .map(AudioBuffer::peak)
        .fold(0.0_f32, f32::max);

    if peak >= 1.0 {
        let gain = CLIP_CEILING / peak;
        warn!(
            "batch peak {:.4} would clip, attenuating all outputs by {:.4}",
            peak, gain
        );
        for buffer in buffers.iter_mut() {
            buffer.apply_gain(gain);
        }
        gain
    } else {
        1.0
    }
}

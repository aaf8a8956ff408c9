//! Integrated loudness measurement and normalization
//!
//! Loudness follows ITU-R BS.1770 integrated measurement (LUFS). Silence and
//! clips shorter than the gating window have no defined loudness and are
//! reported as [`AnchorError::SilentAudio`] rather than negative infinity.

use ebur128::{EbuR128, Mode};

use crate::audio::AudioBuffer;
use crate::error::{AnchorError, Result};

/// Reference level components are aligned to before summation
pub const COMPONENT_REFERENCE_LUFS: f64 = -23.0;

/// Measure integrated loudness in LUFS
pub fn measure_loudness(buffer: &AudioBuffer) -> Result<f64> {
    let mut meter = EbuR128::new(buffer.channels() as u32, buffer.sample_rate(), Mode::I)?;
    meter.add_frames_f32(buffer.samples())?;

    let lufs = meter.loudness_global()?;
    if lufs.is_infinite() || lufs.is_nan() {
        return Err(AnchorError::SilentAudio);
    }

    Ok(lufs)
}

/// Return a copy of the buffer scaled to the target integrated loudness
pub fn apply_loudness(buffer: &AudioBuffer, target_lufs: f64) -> Result<AudioBuffer> {
    let measured = measure_loudness(buffer)?;
    let gain = 10f64.powf((target_lufs - measured) / 20.0);

    let mut adjusted = buffer.clone();
    adjusted.apply_gain(gain as f32);
    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_measure_sine() {
        let buffer = AudioBuffer::sine_wave(440.0, 1.0, 44100);
        let lufs = measure_loudness(&buffer).unwrap();

        // full-scale 440 Hz sine lands a little above -3 LUFS
        assert!(lufs > -5.0 && lufs < 0.0, "got {} LUFS", lufs);
    }

    #[test]
    fn test_silence_has_no_loudness() {
        let buffer = AudioBuffer::silence(1.0, 1, 44100);
        assert!(matches!(
            measure_loudness(&buffer),
            Err(AnchorError::SilentAudio)
        ));
    }

    #[test]
    fn test_too_short_for_gating() {
        let buffer = AudioBuffer::sine_wave(440.0, 0.1, 44100);
        assert!(matches!(
            measure_loudness(&buffer),
            Err(AnchorError::SilentAudio)
        ));
    }

    #[test]
    fn test_apply_loudness_hits_target() {
        let buffer = AudioBuffer::sine_wave(440.0, 1.0, 44100);
        let adjusted = apply_loudness(&buffer, -20.0).unwrap();
        let measured = measure_loudness(&adjusted).unwrap();
        assert_abs_diff_eq!(measured, -20.0, epsilon = 0.1);
    }

    #[test]
    fn test_apply_loudness_idempotent() {
        let buffer = AudioBuffer::sine_wave(440.0, 1.0, 44100);
        let once = apply_loudness(&buffer, -18.0).unwrap();
        let twice = apply_loudness(&once, -18.0).unwrap();
        assert!(once.is_approx_equal(&twice, 1e-4));
    }

    #[test]
    fn test_apply_loudness_boost_and_cut() {
        let buffer = AudioBuffer::sine_wave(440.0, 1.0, 44100);
        let quiet = apply_loudness(&buffer, -30.0).unwrap();
        let loud = apply_loudness(&buffer, -10.0).unwrap();
        assert!(quiet.peak() < buffer.peak());
        assert!(loud.peak() > buffer.peak());
    }

    #[test]
    fn test_stereo_measurement() {
        let mono = AudioBuffer::sine_wave(440.0, 1.0, 44100);
        let samples: Vec<f32> = mono
            .samples()
            .iter()
            .flat_map(|&s| [s, s])
            .collect();
        let stereo = AudioBuffer::new(samples, 2, 44100).unwrap();

        let lufs = measure_loudness(&stereo).unwrap();
        assert!(lufs.is_finite());
    }
}

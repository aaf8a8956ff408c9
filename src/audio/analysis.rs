//! Level measurement utilities
//!
//! Quick RMS and peak inspection for loaded audio. Integrated loudness lives
//! in [`crate::dsp::loudness`]; these helpers are cheap single-pass sums used
//! by the analyze command and by tests.

use crate::audio::AudioBuffer;

/// Absolute sample value treated as clipping
pub const CLIP_THRESHOLD: f32 = 0.9999;

/// Convert a linear amplitude to decibels
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        return f32::NEG_INFINITY;
    }
    20.0 * linear.log10()
}

/// Convert decibels to a linear amplitude
pub fn db_to_linear(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Root mean square level of all samples
pub fn calculate_rms(buffer: &AudioBuffer) -> f32 {
    let samples = buffer.samples();
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// RMS level in dBFS
pub fn calculate_rms_db(buffer: &AudioBuffer) -> f32 {
    linear_to_db(calculate_rms(buffer))
}

/// Peak level in dBFS
pub fn calculate_peak_db(buffer: &AudioBuffer) -> f32 {
    linear_to_db(buffer.peak())
}

/// Summary measurements for an audio buffer
#[derive(Debug, Clone)]
pub struct AudioAnalysis {
    pub duration_secs: f32,
    pub sample_rate: u32,
    pub channels: u16,
    pub rms_db: f32,
    pub peak_db: f32,
    pub clipped_samples: usize,
}

impl AudioAnalysis {
    /// Measure an audio buffer
    pub fn analyze(buffer: &AudioBuffer) -> Self {
        let clipped_samples = buffer
            .samples()
            .iter()
            .filter(|s| s.abs() >= CLIP_THRESHOLD)
            .count();

        Self {
            duration_secs: buffer.duration(),
            sample_rate: buffer.sample_rate(),
            channels: buffer.channels(),
            rms_db: calculate_rms_db(buffer),
            peak_db: calculate_peak_db(buffer),
            clipped_samples,
        }
    }

    /// Human-readable multi-line summary
    pub fn summary(&self) -> String {
        format!(
            "Duration: {:.2}s | {} Hz | {} ch\nRMS: {:.1} dBFS | Peak: {:.1} dBFS | Clipped samples: {}",
            self.duration_secs,
            self.sample_rate,
            self.channels,
            self.rms_db,
            self.peak_db,
            self.clipped_samples
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_conversions() {
        assert!((linear_to_db(1.0) - 0.0).abs() < 1e-6);
        assert!((linear_to_db(0.5) + 6.02).abs() < 0.01);
        assert_eq!(linear_to_db(0.0), f32::NEG_INFINITY);
        assert!((db_to_linear(-6.02) - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_sine_rms() {
        let buffer = AudioBuffer::sine_wave(440.0, 1.0, 44100);
        let rms = calculate_rms(&buffer);
        assert!((rms - 0.707).abs() < 0.01);
    }

    #[test]
    fn test_analysis_summary() {
        let buffer = AudioBuffer::sine_wave(440.0, 1.0, 44100);
        let analysis = AudioAnalysis::analyze(&buffer);

        assert!((analysis.peak_db - 0.0).abs() < 0.01);
        assert!((analysis.rms_db + 3.01).abs() < 0.05);
        assert_eq!(analysis.channels, 1);
        assert!(analysis.summary().contains("44100 Hz"));
    }

    #[test]
    fn test_clipped_sample_count() {
        let mut buffer = AudioBuffer::sine_wave(440.0, 0.1, 44100);
        buffer.apply_gain(0.5);
        let analysis = AudioAnalysis::analyze(&buffer);
        assert_eq!(analysis.clipped_samples, 0);

        buffer.apply_gain(4.0);
        let analysis = AudioAnalysis::analyze(&buffer);
        assert!(analysis.clipped_samples > 0);
    }
}

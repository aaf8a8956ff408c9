//! Core audio buffer type
//!
//! Samples are stored interleaved (frame-major) as 32-bit floats. All
//! processing stages consume and produce this one representation, so shape
//! checks happen at the boundaries rather than inside the math.

use crate::error::{AnchorError, Result};

/// Multichannel audio with interleaved f32 samples
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a new audio buffer from interleaved samples
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(AnchorError::EmptyBuffer);
        }
        if channels == 0 {
            return Err(AnchorError::UnsupportedFormat {
                details: "channel count must be at least 1".to_string(),
            });
        }
        if samples.len() % channels as usize != 0 {
            return Err(AnchorError::UnsupportedFormat {
                details: format!(
                    "sample count {} is not divisible by channel count {}",
                    samples.len(),
                    channels
                ),
            });
        }

        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    /// Create a buffer of silence with the given duration
    pub fn silence(duration_secs: f32, channels: u16, sample_rate: u32) -> Self {
        let num_samples = (duration_secs * sample_rate as f32) as usize * channels as usize;
        Self {
            samples: vec![0.0; num_samples],
            channels,
            sample_rate,
        }
    }

    /// Generate a mono sine wave test signal
    pub fn sine_wave(frequency: f32, duration_secs: f32, sample_rate: u32) -> Self {
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        let samples: Vec<f32> = (0..num_samples)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect();

        Self {
            samples,
            channels: 1,
            sample_rate,
        }
    }

    /// Get the samples as a slice
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Get mutable access to samples
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Number of channels
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel)
    pub fn num_frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration in seconds
    pub fn duration(&self) -> f32 {
        self.num_frames() as f32 / self.sample_rate as f32
    }

    /// Extract samples for a single channel (deinterleaved copy)
    pub fn channel_samples(&self, channel: u16) -> Vec<f32> {
        self.samples
            .iter()
            .skip(channel as usize)
            .step_by(self.channels as usize)
            .copied()
            .collect()
    }

    /// Apply a linear gain factor to all samples
    pub fn apply_gain(&mut self, gain: f32) {
        for sample in &mut self.samples {
            *sample *= gain;
        }
    }

    /// Apply gain specified in decibels
    pub fn apply_gain_db(&mut self, gain_db: f32) {
        let gain = 10.0_f32.powf(gain_db / 20.0);
        self.apply_gain(gain);
    }

    /// Largest absolute sample value across all channels
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    /// Shorten the buffer to at most `num_frames` frames
    ///
    /// A request longer than the buffer leaves it unchanged.
    pub fn truncate_frames(&mut self, num_frames: usize) {
        self.samples.truncate(num_frames * self.channels as usize);
    }

    /// Check that another buffer shares this one's sample rate and layout
    pub fn validate_compatible(&self, other: &AudioBuffer) -> Result<()> {
        if self.sample_rate != other.sample_rate {
            return Err(AnchorError::SampleRateMismatch {
                expected: self.sample_rate,
                actual: other.sample_rate,
            });
        }
        if self.channels != other.channels {
            return Err(AnchorError::ChannelMismatch {
                expected: self.channels,
                actual: other.channels,
            });
        }
        Ok(())
    }

    /// Sample-wise sum of two buffers of identical shape
    pub fn mix(&self, other: &AudioBuffer) -> Result<AudioBuffer> {
        self.validate_compatible(other)?;
        if self.num_frames() != other.num_frames() {
            return Err(AnchorError::LengthMismatch {
                expected: self.num_frames(),
                actual: other.num_frames(),
            });
        }

        let samples = self
            .samples
            .iter()
            .zip(other.samples.iter())
            .map(|(a, b)| a + b)
            .collect();

        AudioBuffer::new(samples, self.channels, self.sample_rate)
    }

    /// Compare two buffers within a per-sample tolerance
    pub fn is_approx_equal(&self, other: &AudioBuffer, tolerance: f32) -> bool {
        if self.channels != other.channels
            || self.sample_rate != other.sample_rate
            || self.samples.len() != other.samples.len()
        {
            return false;
        }
        self.samples
            .iter()
            .zip(other.samples.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

//! Complex spectrogram container
//!
//! One-sided short-time spectra stored as a dense 3-D array indexed by
//! (bin, frame, channel). Bin 0 is DC and the last bin is Nyquist, so a
//! transform of `num_points` samples yields `num_points / 2 + 1` bins.

use ndarray::Array3;
use rustfft::num_complex::Complex;

/// Complex short-time spectra for a multichannel signal
#[derive(Debug, Clone)]
pub struct Spectrogram {
    data: Array3<Complex<f32>>,
    sample_rate: u32,
}

impl Spectrogram {
    pub(crate) fn new(data: Array3<Complex<f32>>, sample_rate: u32) -> Self {
        Self { data, sample_rate }
    }

    pub fn data(&self) -> &Array3<Complex<f32>> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array3<Complex<f32>> {
        &mut self.data
    }

    /// Number of frequency bins (DC through Nyquist)
    pub fn num_bins(&self) -> usize {
        self.data.dim().0
    }

    /// Number of time frames
    pub fn num_frames(&self) -> usize {
        self.data.dim().1
    }

    pub fn num_channels(&self) -> usize {
        self.data.dim().2
    }

    /// Length of the transform that produced this spectrogram
    pub fn num_points(&self) -> usize {
        (self.num_bins() - 1) * 2
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total number of time-frequency cells across all channels
    pub fn total_cells(&self) -> usize {
        self.data.len()
    }

    /// Index of the bin whose center frequency is closest to `frequency_hz`
    pub fn nearest_bin(&self, frequency_hz: f32) -> usize {
        (frequency_hz / self.sample_rate as f32 * self.num_points() as f32).round() as usize
    }
}

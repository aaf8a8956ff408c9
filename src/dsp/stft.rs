//! Short-time Fourier transform with half-overlap analysis and synthesis
//!
//! The forward pass pads one hop of leading zeros and enough trailing zeros
//! to fill whole frames, so every input sample is covered by two frames and
//! reconstruction is exact for all supported windows. The inverse pass
//! applies the window again, overlap-adds, and divides by the accumulated
//! squared-window envelope. Its output keeps the trailing pad; callers
//! truncate back to the original length.

use std::sync::Arc;

use ndarray::Array3;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::audio::AudioBuffer;
use crate::dsp::spectrogram::Spectrogram;
use crate::dsp::window::WindowKind;
use crate::error::{AnchorError, Result};

/// Squared-window mass below which a sample is left unscaled
const ENVELOPE_FLOOR: f32 = 1e-8;

/// Reusable transform plan for one window shape and length
pub struct Stft {
    num_points: usize,
    hop: usize,
    window: Vec<f32>,
    forward_plan: Arc<dyn Fft<f32>>,
    inverse_plan: Arc<dyn Fft<f32>>,
}

impl Stft {
    /// Plan transforms for the given length and window
    ///
    /// The length must be even and nonzero; the hop is half the length.
    pub fn new(num_points: usize, window: WindowKind) -> Result<Self> {
        if num_points == 0 || num_points % 2 != 0 {
            return Err(AnchorError::InvalidFftSize { num_points });
        }

        let mut planner = FftPlanner::new();
        Ok(Self {
            num_points,
            hop: num_points / 2,
            window: window.coefficients(num_points),
            forward_plan: planner.plan_fft_forward(num_points),
            inverse_plan: planner.plan_fft_inverse(num_points),
        })
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn hop_size(&self) -> usize {
        self.hop
    }

    /// Number of frames produced for a channel of `num_samples` samples
    pub fn num_output_frames(&self, num_samples: usize) -> usize {
        (num_samples + 2 * self.hop - 1) / self.hop
    }

    /// Compute the one-sided spectrogram of a buffer
    pub fn forward(&self, buffer: &AudioBuffer) -> Spectrogram {
        let num_channels = buffer.channels() as usize;
        let num_bins = self.num_points / 2 + 1;
        let num_frames = self.num_output_frames(buffer.num_frames());

        let mut data = Array3::zeros((num_bins, num_frames, num_channels));
        let mut frame = vec![Complex { re: 0.0f32, im: 0.0 }; self.num_points];

        for channel in 0..num_channels {
            let samples = buffer.channel_samples(channel as u16);
            for t in 0..num_frames {
                let start = t * self.hop;
                for k in 0..self.num_points {
                    // position within the zero-padded signal
                    let padded = start + k;
                    let value = if padded < self.hop {
                        0.0
                    } else {
                        samples.get(padded - self.hop).copied().unwrap_or(0.0)
                    };
                    frame[k] = Complex {
                        re: value * self.window[k],
                        im: 0.0,
                    };
                }
                self.forward_plan.process(&mut frame);
                for b in 0..num_bins {
                    data[[b, t, channel]] = frame[b];
                }
            }
        }

        Spectrogram::new(data, buffer.sample_rate())
    }

    /// Resynthesize a time-domain buffer from a spectrogram
    ///
    /// The result is `num_frames * hop` frames long, which includes the
    /// trailing pad added by [`Stft::forward`]. Truncate to the original
    /// length to complete a round trip.
    pub fn inverse(&self, spectrogram: &Spectrogram) -> Result<AudioBuffer> {
        let num_bins = self.num_points / 2 + 1;
        if spectrogram.num_bins() != num_bins {
            return Err(AnchorError::BinCountMismatch {
                expected: num_bins,
                actual: spectrogram.num_bins(),
            });
        }
        let num_frames = spectrogram.num_frames();
        let num_channels = spectrogram.num_channels();
        if num_frames == 0 || num_channels == 0 {
            return Err(AnchorError::EmptyBuffer);
        }

        let padded_len = (num_frames - 1) * self.hop + self.num_points;
        let scale = 1.0 / self.num_points as f32;
        let mut spectrum = vec![Complex { re: 0.0f32, im: 0.0 }; self.num_points];
        let mut channels_out: Vec<Vec<f32>> = Vec::with_capacity(num_channels);

        for channel in 0..num_channels {
            let mut accumulated = vec![0.0f32; padded_len];
            let mut envelope = vec![0.0f32; padded_len];

            for t in 0..num_frames {
                for b in 0..num_bins {
                    spectrum[b] = spectrogram.data()[[b, t, channel]];
                }
                // rebuild negative frequencies from the one-sided half
                for b in num_bins..self.num_points {
                    spectrum[b] = spectrum[self.num_points - b].conj();
                }
                self.inverse_plan.process(&mut spectrum);

                let start = t * self.hop;
                for k in 0..self.num_points {
                    let w = self.window[k];
                    accumulated[start + k] += spectrum[k].re * scale * w;
                    envelope[start + k] += w * w;
                }
            }

            for (sample, &env) in accumulated.iter_mut().zip(envelope.iter()) {
                if env > ENVELOPE_FLOOR {
                    *sample /= env;
                }
            }

            channels_out.push(accumulated[self.hop..].to_vec());
        }

        let out_frames = padded_len - self.hop;
        let mut samples = Vec::with_capacity(out_frames * num_channels);
        for i in 0..out_frames {
            for channel_samples in &channels_out {
                samples.push(channel_samples[i]);
            }
        }

        AudioBuffer::new(samples, num_channels as u16, spectrogram.sample_rate())
    }
}

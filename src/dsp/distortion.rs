//! Spectral degradation operators
//!
//! Each operator mutates a spectrogram in place. Dropout counts are the
//! population size times the factor, rounded to nearest, and the sampled
//! positions are distinct. Callers own the RNG so a fixed seed reproduces
//! the same degradation pattern.

use log::debug;
use ndarray::s;
use rand::seq::index::sample;
use rand::Rng;
use rustfft::num_complex::Complex;

use crate::dsp::spectrogram::Spectrogram;
use crate::error::{AnchorError, Result};

const ZERO: Complex<f32> = Complex { re: 0.0, im: 0.0 };

fn validate_factor(param: &str, factor: f32) -> Result<()> {
    if !(0.0..1.0).contains(&factor) {
        return Err(AnchorError::InvalidParameter {
            param: param.to_string(),
            value: factor,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

fn dropout_count(population: usize, factor: f32) -> usize {
    (population as f64 * factor as f64).round() as usize
}

/// Zero a random fraction of whole time frames across all channels
pub fn frame_dropout<R: Rng + ?Sized>(
    spectrogram: &mut Spectrogram,
    distortion_factor: f32,
    rng: &mut R,
) -> Result<()> {
    validate_factor("distortion_factor", distortion_factor)?;

    let num_frames = spectrogram.num_frames();
    let count = dropout_count(num_frames, distortion_factor);
    if count > num_frames {
        return Err(AnchorError::SampleOverflow {
            requested: count,
            available: num_frames,
        });
    }

    for frame in sample(rng, num_frames, count) {
        spectrogram.data_mut().slice_mut(s![.., frame, ..]).fill(ZERO);
    }
    debug!("frame dropout: zeroed {} of {} frames", count, num_frames);

    Ok(())
}

/// Zero a random fraction of individual time-frequency cells
///
/// Cells are drawn from the flattened (bin, frame, channel) population, so
/// the surviving energy is scattered rather than aligned to frames.
pub fn bin_dropout<R: Rng + ?Sized>(
    spectrogram: &mut Spectrogram,
    distortion_factor: f32,
    rng: &mut R,
) -> Result<()> {
    validate_factor("distortion_factor", distortion_factor)?;

    let total = spectrogram.total_cells();
    let count = dropout_count(total, distortion_factor);
    if count > total {
        return Err(AnchorError::SampleOverflow {
            requested: count,
            available: total,
        });
    }

    let num_frames = spectrogram.num_frames();
    let num_channels = spectrogram.num_channels();
    let cells_per_bin = num_frames * num_channels;

    for flat in sample(rng, total, count) {
        let bin = flat / cells_per_bin;
        let rest = flat % cells_per_bin;
        let frame = rest / num_channels;
        let channel = rest % num_channels;
        spectrogram.data_mut()[[bin, frame, channel]] = ZERO;
    }
    debug!("bin dropout: zeroed {} of {} cells", count, total);

    Ok(())
}

/// Zero every bin at or above the one nearest to `cutoff_hz`
pub fn lowpass_mask(spectrogram: &mut Spectrogram, cutoff_hz: f32) -> Result<()> {
    let nyquist = spectrogram.sample_rate() as f32 / 2.0;
    if !(0.0..=nyquist).contains(&cutoff_hz) {
        return Err(AnchorError::InvalidParameter {
            param: "lowpass_cutoff".to_string(),
            value: cutoff_hz,
            min: 0.0,
            max: nyquist,
        });
    }

    let cutoff_bin = spectrogram.nearest_bin(cutoff_hz);
    if cutoff_bin < spectrogram.num_bins() {
        spectrogram
            .data_mut()
            .slice_mut(s![cutoff_bin.., .., ..])
            .fill(ZERO);
    }
    debug!("lowpass mask: zeroed bins {} and above ({} Hz)", cutoff_bin, cutoff_hz);

    Ok(())
}

//! WAV file loading and saving
//!
//! Integer WAV input is normalized to [-1.0, 1.0] floats on load. Output is
//! 32-bit float by default; 16-bit and 24-bit integer output is available for
//! playback systems that require it.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::audio::AudioBuffer;
use crate::error::{AnchorError, Result};

/// Load a WAV file into an AudioBuffer
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let mut reader = WavReader::open(path).map_err(|e| AnchorError::AudioReadError {
        path: display.clone(),
        source: e,
    })?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| AnchorError::AudioReadError {
                path: display,
                source: e,
            })?,
        SampleFormat::Int => {
            let scale = 1.0 / (1u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| AnchorError::AudioReadError {
                    path: display,
                    source: e,
                })?
        }
    };

    AudioBuffer::new(samples, spec.channels, spec.sample_rate)
}

/// Save an AudioBuffer as a 32-bit float WAV file
pub fn save_wav<P: AsRef<Path>>(buffer: &AudioBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| write_error(path, e))?;
    for &sample in buffer.samples() {
        writer
            .write_sample(sample)
            .map_err(|e| write_error(path, e))?;
    }
    writer.finalize().map_err(|e| write_error(path, e))?;

    Ok(())
}

/// Save an AudioBuffer as a WAV file with the given bit depth
///
/// A depth of 32 writes float samples as [`save_wav`] does. Depths of 16 and
/// 24 write integers, with samples clamped to [-1.0, 1.0] before quantization.
pub fn save_wav_with_depth<P: AsRef<Path>>(
    buffer: &AudioBuffer,
    path: P,
    bits_per_sample: u16,
) -> Result<()> {
    if bits_per_sample == 32 {
        return save_wav(buffer, path);
    }
    if bits_per_sample != 16 && bits_per_sample != 24 {
        return Err(AnchorError::UnsupportedFormat {
            details: format!(
                "unsupported output bit depth {} (use 16, 24, or 32)",
                bits_per_sample
            ),
        });
    }

    let path = path.as_ref();
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample,
        sample_format: SampleFormat::Int,
    };
    let scale = ((1u32 << (bits_per_sample - 1)) - 1) as f32;

    let mut writer = WavWriter::create(path, spec).map_err(|e| write_error(path, e))?;
    for &sample in buffer.samples() {
        let quantized = (sample.clamp(-1.0, 1.0) * scale) as i32;
        writer
            .write_sample(quantized)
            .map_err(|e| write_error(path, e))?;
    }
    writer.finalize().map_err(|e| write_error(path, e))?;

    Ok(())
}

fn write_error(path: &Path, source: hound::Error) -> AnchorError {
    AnchorError::AudioWriteError {
        path: path.display().to_string(),
        source,
    }
}

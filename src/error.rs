//! Error types for anchorgen
//!
//! All fallible operations return the crate-wide [`Result`] alias. Parameter
//! and shape violations are rejected before any allocation or sampling takes
//! place, so a failed anchor never produces partial output.

use thiserror::Error;

/// Result type alias using AnchorError
pub type Result<T> = std::result::Result<T, AnchorError>;

/// All possible errors in anchorgen
#[derive(Error, Debug)]
pub enum AnchorError {
    // Audio I/O errors
    #[error("Failed to read audio file: {path}")]
    AudioReadError {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Failed to write audio file: {path}")]
    AudioWriteError {
        path: String,
        #[source]
        source: hound::Error,
    },

    #[error("Unsupported audio format: {details}")]
    UnsupportedFormat { details: String },

    // Buffer shape errors
    #[error("Audio buffer is empty")]
    EmptyBuffer,

    #[error("Sample rate mismatch: expected {expected}, got {actual}")]
    SampleRateMismatch { expected: u32, actual: u32 },

    #[error("Channel count mismatch: expected {expected}, got {actual}")]
    ChannelMismatch { expected: u16, actual: u16 },

    #[error("Frame count mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Spectrogram bin count mismatch: expected {expected}, got {actual}")]
    BinCountMismatch { expected: usize, actual: usize },

    // Parameter errors
    #[error("Invalid parameter: {param} = {value} (valid range: {min}..{max})")]
    InvalidParameter {
        param: String,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("Invalid transform length: {num_points} (must be nonzero and even)")]
    InvalidFftSize { num_points: usize },

    #[error("Unknown window type: {name}")]
    UnknownWindow { name: String },

    #[error("Dropout request exceeds population: requested {requested}, available {available}")]
    SampleOverflow { requested: usize, available: usize },

    // Composition errors
    #[error("No other sources provided to build the accompaniment")]
    NoOtherSources,

    // Loudness errors
    #[error("Audio is silent or too short to measure loudness")]
    SilentAudio,

    #[error("Loudness measurement failed: {details}")]
    Loudness { details: String },

    // Generic I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnchorError {
    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::AudioReadError { .. } => "Check that the file exists and is a valid WAV file",
            Self::UnsupportedFormat { .. } => "Convert to WAV format (16/24/32-bit, mono or multichannel)",
            Self::EmptyBuffer => "Load audio before processing",
            Self::SampleRateMismatch { .. } | Self::ChannelMismatch { .. } | Self::LengthMismatch { .. } => {
                "All sources in one run must share sample rate, channel count, and length"
            }
            Self::InvalidParameter { .. } => "Adjust the parameter to be within valid range",
            Self::InvalidFftSize { .. } => "Use an even transform length such as 1024, 2048, or 4096",
            Self::UnknownWindow { .. } => "Supported windows: hann, hamming, blackman, rectangular",
            Self::SampleOverflow { .. } => "Reduce the distortion factor",
            Self::NoOtherSources => "Pass the remaining mixture sources alongside the target",
            Self::SilentAudio => "Provide at least half a second of non-silent audio",
            _ => "Check the error details and try again",
        }
    }
}

impl From<ebur128::Error> for AnchorError {
    fn from(err: ebur128::Error) -> Self {
        Self::Loudness {
            details: format!("{:?}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnchorError::InvalidParameter {
            param: "distortion_factor".to_string(),
            value: 1.5,
            min: 0.0,
            max: 1.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameter: distortion_factor = 1.5 (valid range: 0..1)"
        );
    }

    #[test]
    fn test_recovery_hints() {
        let err = AnchorError::UnknownWindow {
            name: "kaiser".to_string(),
        };
        assert!(err.recovery_hint().contains("hann"));

        let err = AnchorError::SampleOverflow {
            requested: 60,
            available: 50,
        };
        assert!(!err.recovery_hint().is_empty());
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = AnchorError::ChannelMismatch {
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Channel count mismatch: expected 2, got 1");
    }
}

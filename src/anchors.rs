//! Anchor synthesis pipelines
//!
//! Anchors are deliberately degraded renditions of a target source, used as
//! low-quality references in MUSHRA-style listening tests for source
//! separation. Three degradation axes are covered and combined:
//!
//! - distorted target: dropped time frames plus a lowpass on the target
//! - musical noise: isolated surviving spectrogram cells, heard as
//!   watery artefacts
//! - interference: the rest of the mixture bleeding into the target
//!
//! The composite anchors sum components that are first aligned to
//! [`COMPONENT_REFERENCE_LUFS`]. Every finished anchor is loudness-matched
//! to the original target so listeners compare degradation, not level.

use std::fmt;

use rand::Rng;

use crate::audio::AudioBuffer;
use crate::dsp::distortion::{bin_dropout, frame_dropout, lowpass_mask};
use crate::dsp::loudness::{apply_loudness, measure_loudness, COMPONENT_REFERENCE_LUFS};
use crate::dsp::stft::Stft;
use crate::dsp::window::WindowKind;
use crate::error::{AnchorError, Result};

// === Default degradation parameters ===

pub const DEFAULT_NUM_POINTS: usize = 2048;
pub const DEFAULT_FRAME_DROPOUT_FACTOR: f32 = 0.2;
pub const DEFAULT_BIN_DROPOUT_FACTOR: f32 = 0.99;
pub const DEFAULT_LOWPASS_CUTOFF_HZ: f32 = 3500.0;

// === Anchor kinds ===

/// The anchor conditions a listening test can include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    DistortedTarget,
    Artefacts,
    Interference,
    OverallQuality,
    TargetSoundQuality,
}

impl AnchorKind {
    pub const ALL: [AnchorKind; 5] = [
        AnchorKind::DistortedTarget,
        AnchorKind::Artefacts,
        AnchorKind::Interference,
        AnchorKind::OverallQuality,
        AnchorKind::TargetSoundQuality,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnchorKind::DistortedTarget => "distorted_target",
            AnchorKind::Artefacts => "artefacts",
            AnchorKind::Interference => "interference",
            AnchorKind::OverallQuality => "overall_quality",
            AnchorKind::TargetSoundQuality => "target_sound_quality",
        }
    }

    /// Whether this anchor needs the other sources of the mixture
    pub fn requires_others(self) -> bool {
        matches!(self, AnchorKind::Interference | AnchorKind::OverallQuality)
    }
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// === Pipeline parameters ===

/// Parameters for the distorted target anchor
///
/// `None` disables the corresponding degradation stage.
#[derive(Debug, Clone)]
pub struct DistortedTargetParams {
    pub distortion_factor: Option<f32>,
    pub lowpass_cutoff: Option<f32>,
    pub num_points: usize,
    pub window: WindowKind,
}

impl Default for DistortedTargetParams {
    fn default() -> Self {
        Self {
            distortion_factor: Some(DEFAULT_FRAME_DROPOUT_FACTOR),
            lowpass_cutoff: Some(DEFAULT_LOWPASS_CUTOFF_HZ),
            num_points: DEFAULT_NUM_POINTS,
            window: WindowKind::default(),
        }
    }
}

/// Parameters for musical noise synthesis and the artefacts anchor
#[derive(Debug, Clone)]
pub struct MusicalNoiseParams {
    pub distortion_factor: f32,
    pub lowpass_cutoff: Option<f32>,
    pub num_points: usize,
    pub window: WindowKind,
}

impl Default for MusicalNoiseParams {
    fn default() -> Self {
        Self {
            distortion_factor: DEFAULT_BIN_DROPOUT_FACTOR,
            lowpass_cutoff: None,
            num_points: DEFAULT_NUM_POINTS,
            window: WindowKind::default(),
        }
    }
}

/// Parameters for the interference anchor
///
/// `relative_loudness` is the accompaniment level in LU relative to the
/// target; `None` leaves the accompaniment at its natural level.
#[derive(Debug, Clone)]
pub struct InterferenceParams {
    pub relative_loudness: Option<f64>,
}

impl Default for InterferenceParams {
    fn default() -> Self {
        Self {
            relative_loudness: Some(0.0),
        }
    }
}

/// Parameters for the overall quality anchor
///
/// By default the target component is only lowpassed (no frame dropout)
/// and the musical noise component keeps its full bandwidth.
#[derive(Debug, Clone)]
pub struct OverallQualityParams {
    pub distortion_factor_target: Option<f32>,
    pub distortion_factor_noise: f32,
    pub lowpass_cutoff_target: Option<f32>,
    pub lowpass_cutoff_noise: Option<f32>,
    pub relative_loudness: f64,
    pub num_points: usize,
    pub window: WindowKind,
}

impl Default for OverallQualityParams {
    fn default() -> Self {
        Self {
            distortion_factor_target: None,
            distortion_factor_noise: DEFAULT_BIN_DROPOUT_FACTOR,
            lowpass_cutoff_target: Some(DEFAULT_LOWPASS_CUTOFF_HZ),
            lowpass_cutoff_noise: None,
            relative_loudness: 0.0,
            num_points: DEFAULT_NUM_POINTS,
            window: WindowKind::default(),
        }
    }
}

/// Parameters for the target sound quality anchor
///
/// Both components are degraded and both are lowpassed by default.
#[derive(Debug, Clone)]
pub struct TargetSoundQualityParams {
    pub distortion_factor_target: Option<f32>,
    pub distortion_factor_noise: f32,
    pub lowpass_cutoff_target: Option<f32>,
    pub lowpass_cutoff_noise: Option<f32>,
    pub num_points: usize,
    pub window: WindowKind,
}

impl Default for TargetSoundQualityParams {
    fn default() -> Self {
        Self {
            distortion_factor_target: Some(DEFAULT_FRAME_DROPOUT_FACTOR),
            distortion_factor_noise: DEFAULT_BIN_DROPOUT_FACTOR,
            lowpass_cutoff_target: Some(DEFAULT_LOWPASS_CUTOFF_HZ),
            lowpass_cutoff_noise: Some(DEFAULT_LOWPASS_CUTOFF_HZ),
            num_points: DEFAULT_NUM_POINTS,
            window: WindowKind::default(),
        }
    }
}

// === Composition helpers ===

/// Sum the other sources into a single accompaniment signal
///
/// A single source is used as-is.
pub fn accompaniment(others: &[AudioBuffer]) -> Result<AudioBuffer> {
    match others {
        [] => Err(AnchorError::NoOtherSources),
        [single] => Ok(single.clone()),
        [first, rest @ ..] => {
            let mut sum = first.clone();
            for other in rest {
                sum = sum.mix(other)?;
            }
            Ok(sum)
        }
    }
}

// === Anchor pipelines ===

/// Degrade the target with frame dropout and a lowpass, level-matched back
/// to the target loudness
pub fn distorted_target<R: Rng + ?Sized>(
    target: &AudioBuffer,
    params: &DistortedTargetParams,
    rng: &mut R,
) -> Result<AudioBuffer> {
    let stft = Stft::new(params.num_points, params.window)?;
    let mut spectrogram = stft.forward(target);

    if let Some(factor) = params.distortion_factor {
        frame_dropout(&mut spectrogram, factor, rng)?;
    }
    if let Some(cutoff) = params.lowpass_cutoff {
        lowpass_mask(&mut spectrogram, cutoff)?;
    }

    let mut anchor = stft.inverse(&spectrogram)?;
    anchor.truncate_frames(target.num_frames());

    apply_loudness(&anchor, measure_loudness(target)?)
}

/// Synthesize watery musical-noise artefacts from the target
///
/// Nearly all time-frequency cells are discarded so the scattered survivors
/// ring as isolated tones. The result keeps whatever level the synthesis
/// produces; callers align it before summation.
pub fn musical_noise<R: Rng + ?Sized>(
    target: &AudioBuffer,
    params: &MusicalNoiseParams,
    rng: &mut R,
) -> Result<AudioBuffer> {
    let stft = Stft::new(params.num_points, params.window)?;
    let mut spectrogram = stft.forward(target);

    bin_dropout(&mut spectrogram, params.distortion_factor, rng)?;
    if let Some(cutoff) = params.lowpass_cutoff {
        lowpass_mask(&mut spectrogram, cutoff)?;
    }

    let mut noise = stft.inverse(&spectrogram)?;
    noise.truncate_frames(target.num_frames());
    Ok(noise)
}

/// Target plus equal-loudness musical noise, level-matched to the target
pub fn artefacts<R: Rng + ?Sized>(
    target: &AudioBuffer,
    params: &MusicalNoiseParams,
    rng: &mut R,
) -> Result<AudioBuffer> {
    let target_loudness = measure_loudness(target)?;

    let noise = musical_noise(target, params, rng)?;
    let noise = apply_loudness(&noise, target_loudness)?;

    let summed = target.mix(&noise)?;
    apply_loudness(&summed, target_loudness)
}

/// Target plus the accompaniment at a controlled relative level
pub fn interference(
    target: &AudioBuffer,
    others: &[AudioBuffer],
    params: &InterferenceParams,
) -> Result<AudioBuffer> {
    let acc = accompaniment(others)?;
    target.validate_compatible(&acc)?;

    let target_loudness = measure_loudness(target)?;
    let acc = match params.relative_loudness {
        Some(offset) => apply_loudness(&acc, target_loudness + offset)?,
        None => acc,
    };

    let summed = target.mix(&acc)?;
    apply_loudness(&summed, target_loudness)
}

/// Composite of a degraded target, musical noise, and the accompaniment
///
/// All three components are aligned to [`COMPONENT_REFERENCE_LUFS`] before
/// summation, with the accompaniment offset by `relative_loudness`.
pub fn overall_quality<R: Rng + ?Sized>(
    target: &AudioBuffer,
    others: &[AudioBuffer],
    params: &OverallQualityParams,
    rng: &mut R,
) -> Result<AudioBuffer> {
    let acc = accompaniment(others)?;
    target.validate_compatible(&acc)?;

    let distorted = distorted_target(
        target,
        &DistortedTargetParams {
            distortion_factor: params.distortion_factor_target,
            lowpass_cutoff: params.lowpass_cutoff_target,
            num_points: params.num_points,
            window: params.window,
        },
        rng,
    )?;
    let noise = musical_noise(
        target,
        &MusicalNoiseParams {
            distortion_factor: params.distortion_factor_noise,
            lowpass_cutoff: params.lowpass_cutoff_noise,
            num_points: params.num_points,
            window: params.window,
        },
        rng,
    )?;

    let distorted = apply_loudness(&distorted, COMPONENT_REFERENCE_LUFS)?;
    let noise = apply_loudness(&noise, COMPONENT_REFERENCE_LUFS)?;
    let acc = apply_loudness(&acc, COMPONENT_REFERENCE_LUFS + params.relative_loudness)?;

    let mut summed = distorted.mix(&noise)?.mix(&acc)?;
    summed.truncate_frames(target.num_frames());

    apply_loudness(&summed, measure_loudness(target)?)
}

/// Composite of a degraded target and musical noise, without interference
pub fn target_sound_quality<R: Rng + ?Sized>(
    target: &AudioBuffer,
    params: &TargetSoundQualityParams,
    rng: &mut R,
) -> Result<AudioBuffer> {
    let distorted = distorted_target(
        target,
        &DistortedTargetParams {
            distortion_factor: params.distortion_factor_target,
            lowpass_cutoff: params.lowpass_cutoff_target,
            num_points: params.num_points,
            window: params.window,
        },
        rng,
    )?;
    let noise = musical_noise(
        target,
        &MusicalNoiseParams {
            distortion_factor: params.distortion_factor_noise,
            lowpass_cutoff: params.lowpass_cutoff_noise,
            num_points: params.num_points,
            window: params.window,
        },
        rng,
    )?;

    let distorted = apply_loudness(&distorted, COMPONENT_REFERENCE_LUFS)?;
    let noise = apply_loudness(&noise, COMPONENT_REFERENCE_LUFS)?;

    let mut summed = distorted.mix(&noise)?;
    summed.truncate_frames(target.num_frames());

    apply_loudness(&summed, measure_loudness(target)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // broadband noise keeps loudness measurable even after 99% cell dropout
    fn test_target() -> AudioBuffer {
        let sample_rate = 44100;
        let mut state = 0x2545_F491_4F6C_DD1D_u64;
        let samples: Vec<f32> = (0..sample_rate)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 40) as f32 / (1u64 << 24) as f32 - 0.5
            })
            .collect();
        AudioBuffer::new(samples, 1, sample_rate).unwrap()
    }

    fn test_other() -> AudioBuffer {
        let sample_rate = 44100;
        let samples: Vec<f32> = (0..sample_rate)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                let two_pi = 2.0 * std::f32::consts::PI;
                0.3 * (two_pi * 110.0 * t).sin() + 0.2 * (two_pi * 440.0 * t).sin()
            })
            .collect();
        AudioBuffer::new(samples, 1, sample_rate).unwrap()
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(AnchorKind::DistortedTarget.to_string(), "distorted_target");
        assert_eq!(AnchorKind::OverallQuality.as_str(), "overall_quality");
        assert_eq!(AnchorKind::ALL.len(), 5);
    }

    #[test]
    fn test_kinds_requiring_others() {
        assert!(AnchorKind::Interference.requires_others());
        assert!(AnchorKind::OverallQuality.requires_others());
        assert!(!AnchorKind::DistortedTarget.requires_others());
        assert!(!AnchorKind::Artefacts.requires_others());
        assert!(!AnchorKind::TargetSoundQuality.requires_others());
    }

    #[test]
    fn test_accompaniment_single_source() {
        let other = test_other();
        let acc = accompaniment(std::slice::from_ref(&other)).unwrap();
        assert!(acc.is_approx_equal(&other, 0.0));
    }

    #[test]
    fn test_accompaniment_sums_sources() {
        let a = AudioBuffer::new(vec![0.1, 0.2], 1, 44100).unwrap();
        let b = AudioBuffer::new(vec![0.3, 0.4], 1, 44100).unwrap();
        let c = AudioBuffer::new(vec![0.5, 0.6], 1, 44100).unwrap();

        let acc = accompaniment(&[a, b, c]).unwrap();
        assert!((acc.samples()[0] - 0.9).abs() < 1e-6);
        assert!((acc.samples()[1] - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_accompaniment_empty() {
        assert!(matches!(
            accompaniment(&[]),
            Err(AnchorError::NoOtherSources)
        ));
    }

    #[test]
    fn test_distorted_target_preserves_shape_and_loudness() {
        let target = test_target();
        let mut rng = StdRng::seed_from_u64(3);

        let anchor =
            distorted_target(&target, &DistortedTargetParams::default(), &mut rng).unwrap();

        assert_eq!(anchor.num_frames(), target.num_frames());
        assert_eq!(anchor.channels(), target.channels());
        assert_eq!(anchor.sample_rate(), target.sample_rate());

        let target_lufs = measure_loudness(&target).unwrap();
        let anchor_lufs = measure_loudness(&anchor).unwrap();
        assert!((anchor_lufs - target_lufs).abs() < 0.1);
    }

    #[test]
    fn test_distorted_target_without_degradation_is_transparent() {
        let target = test_target();
        let mut rng = StdRng::seed_from_u64(3);
        let params = DistortedTargetParams {
            distortion_factor: None,
            lowpass_cutoff: None,
            ..Default::default()
        };

        let anchor = distorted_target(&target, &params, &mut rng).unwrap();
        assert!(anchor.is_approx_equal(&target, 1e-2));
    }

    #[test]
    fn test_musical_noise_is_sparse() {
        let target = test_target();
        let mut rng = StdRng::seed_from_u64(5);

        let noise = musical_noise(&target, &MusicalNoiseParams::default(), &mut rng).unwrap();

        assert_eq!(noise.num_frames(), target.num_frames());
        let noise_rms: f32 = {
            let sum: f32 = noise.samples().iter().map(|s| s * s).sum();
            (sum / noise.samples().len() as f32).sqrt()
        };
        let target_rms: f32 = {
            let sum: f32 = target.samples().iter().map(|s| s * s).sum();
            (sum / target.samples().len() as f32).sqrt()
        };
        assert!(noise_rms < target_rms * 0.5);
    }

    #[test]
    fn test_artefacts_matches_target_loudness() {
        let target = test_target();
        let mut rng = StdRng::seed_from_u64(11);

        let anchor = artefacts(&target, &MusicalNoiseParams::default(), &mut rng).unwrap();

        assert_eq!(anchor.num_frames(), target.num_frames());
        let target_lufs = measure_loudness(&target).unwrap();
        let anchor_lufs = measure_loudness(&anchor).unwrap();
        assert!((anchor_lufs - target_lufs).abs() < 0.1);
    }

    #[test]
    fn test_interference_levels() {
        let target = test_target();
        let others = vec![test_other()];

        let anchor = interference(&target, &others, &InterferenceParams::default()).unwrap();

        let target_lufs = measure_loudness(&target).unwrap();
        let anchor_lufs = measure_loudness(&anchor).unwrap();
        assert!((anchor_lufs - target_lufs).abs() < 0.1);
        assert_eq!(anchor.num_frames(), target.num_frames());
    }

    #[test]
    fn test_interference_raw_accompaniment() {
        let target = test_target();
        let mut quiet_other = test_other();
        quiet_other.apply_gain(0.01);
        let others = vec![quiet_other];

        let params = InterferenceParams {
            relative_loudness: None,
        };
        let anchor = interference(&target, &others, &params).unwrap();

        // with no level alignment the quiet accompaniment barely registers
        let target_lufs = measure_loudness(&target).unwrap();
        let anchor_lufs = measure_loudness(&anchor).unwrap();
        assert!((anchor_lufs - target_lufs).abs() < 0.1);
    }

    #[test]
    fn test_interference_rejects_mismatched_others() {
        let target = test_target();
        let wrong_rate = AudioBuffer::sine_wave(440.0, 1.0, 48000);

        assert!(matches!(
            interference(&target, &[wrong_rate], &InterferenceParams::default()),
            Err(AnchorError::SampleRateMismatch { .. })
        ));
    }

    #[test]
    fn test_overall_quality_pipeline() {
        let target = test_target();
        let others = vec![test_other()];
        let mut rng = StdRng::seed_from_u64(17);

        let anchor =
            overall_quality(&target, &others, &OverallQualityParams::default(), &mut rng).unwrap();

        assert_eq!(anchor.num_frames(), target.num_frames());
        let target_lufs = measure_loudness(&target).unwrap();
        let anchor_lufs = measure_loudness(&anchor).unwrap();
        assert!((anchor_lufs - target_lufs).abs() < 0.1);
    }

    #[test]
    fn test_target_sound_quality_pipeline() {
        let target = test_target();
        let mut rng = StdRng::seed_from_u64(19);

        let anchor =
            target_sound_quality(&target, &TargetSoundQualityParams::default(), &mut rng).unwrap();

        assert_eq!(anchor.num_frames(), target.num_frames());
        let target_lufs = measure_loudness(&target).unwrap();
        let anchor_lufs = measure_loudness(&anchor).unwrap();
        assert!((anchor_lufs - target_lufs).abs() < 0.1);
    }

    #[test]
    fn test_seeded_pipelines_reproduce() {
        let target = test_target();

        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            distorted_target(&target, &DistortedTargetParams::default(), &mut rng).unwrap()
        };

        let a = run(123);
        let b = run(123);
        let c = run(124);

        assert!(a.is_approx_equal(&b, 0.0));
        assert!(!a.is_approx_equal(&c, 1e-6));
    }

    #[test]
    fn test_invalid_factor_propagates() {
        let target = test_target();
        let mut rng = StdRng::seed_from_u64(1);
        let params = DistortedTargetParams {
            distortion_factor: Some(1.0),
            ..Default::default()
        };

        assert!(matches!(
            distorted_target(&target, &params, &mut rng),
            Err(AnchorError::InvalidParameter { .. })
        ));
    }
}

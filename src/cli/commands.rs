//! CLI command handlers
//!
//! The generate handler runs each requested anchor independently. A failed
//! or inapplicable anchor is logged and skipped so one bad condition cannot
//! sink the rest of the batch. Files are only written after the whole batch
//! has passed the clipping guard.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::anchors::{
    self, AnchorKind, DistortedTargetParams, InterferenceParams, MusicalNoiseParams,
    OverallQualityParams, TargetSoundQualityParams,
};
use crate::audio::analysis::AudioAnalysis;
use crate::audio::{load_wav, save_wav_with_depth, AudioBuffer};
use crate::dsp::clip::ensure_no_clipping;
use crate::dsp::loudness::measure_loudness;
use crate::dsp::window::WindowKind;
use crate::error::{AnchorError, Result};
use crate::report::{file_checksum, AnchorEntry, RunReport};

/// Everything the generate command needs, resolved from CLI arguments
#[derive(Debug)]
pub struct GenerateOptions {
    pub target: PathBuf,
    pub others: Vec<PathBuf>,
    pub distorted_target: bool,
    pub artefacts: bool,
    pub interference: bool,
    pub overall_quality: bool,
    pub target_sound_quality: bool,
    pub all: bool,
    pub output_dir: Option<PathBuf>,
    pub num_points: usize,
    pub window: String,
    pub relative_loudness: f64,
    pub seed: Option<u64>,
    pub bit_depth: u16,
    pub report: Option<PathBuf>,
}

impl GenerateOptions {
    /// Anchor kinds requested by the flags, in a fixed order
    pub fn selected_anchors(&self) -> Vec<AnchorKind> {
        if self.all {
            return AnchorKind::ALL.to_vec();
        }

        let mut selected = Vec::new();
        if self.distorted_target {
            selected.push(AnchorKind::DistortedTarget);
        }
        if self.artefacts {
            selected.push(AnchorKind::Artefacts);
        }
        if self.interference {
            selected.push(AnchorKind::Interference);
        }
        if self.overall_quality {
            selected.push(AnchorKind::OverallQuality);
        }
        if self.target_sound_quality {
            selected.push(AnchorKind::TargetSoundQuality);
        }
        selected
    }
}

/// Run the generate command
pub fn generate(options: &GenerateOptions) -> Result<()> {
    if options.bit_depth != 16 && options.bit_depth != 24 && options.bit_depth != 32 {
        return Err(AnchorError::UnsupportedFormat {
            details: format!(
                "unsupported output bit depth {} (use 16, 24, or 32)",
                options.bit_depth
            ),
        });
    }
    let window = WindowKind::from_str(&options.window)?;

    let selected = options.selected_anchors();
    if selected.is_empty() {
        warn!("No anchor types selected; pass --all or individual anchor flags");
        return Ok(());
    }

    let target = load_wav(&options.target)?;
    info!(
        "Loaded target {} ({} ch @ {} Hz, {:.2}s)",
        options.target.display(),
        target.channels(),
        target.sample_rate(),
        target.duration()
    );

    let mut others = Vec::with_capacity(options.others.len());
    for path in &options.others {
        let other = load_wav(path)?;
        target.validate_compatible(&other)?;
        others.push(other);
    }
    if !others.is_empty() {
        info!("Loaded {} other source(s)", others.len());
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut kinds = Vec::new();
    let mut buffers = Vec::new();
    for kind in selected {
        if kind.requires_others() && others.is_empty() {
            warn!("Cannot create {} anchor as no other sources provided", kind);
            continue;
        }

        info!("Creating {} anchor", kind);
        match synthesize(kind, &target, &others, options, window, &mut rng) {
            Ok(buffer) => {
                kinds.push(kind);
                buffers.push(buffer);
            }
            Err(err) => error!("Skipping {} anchor: {}", kind, err),
        }
    }

    if buffers.is_empty() {
        warn!("No anchors were generated");
        return Ok(());
    }

    let clip_gain = ensure_no_clipping(&mut buffers);

    let output_dir = match &options.output_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            dir.clone()
        }
        None => options
            .target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let stem = options
        .target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "target".to_string());

    let mut report = options
        .report
        .as_ref()
        .map(|_| RunReport::new(&options.target, options.seed, clip_gain));

    for (kind, buffer) in kinds.iter().zip(buffers.iter()) {
        let path = output_dir.join(anchor_filename(&stem, *kind));
        save_wav_with_depth(buffer, &path, options.bit_depth)?;
        println!("Wrote {}", path.display());

        if let Some(report) = report.as_mut() {
            report.anchors.push(AnchorEntry {
                anchor: kind.to_string(),
                path: path.display().to_string(),
                loudness_lufs: measure_loudness(buffer).ok(),
                sha256: file_checksum(&path)?,
            });
        }
    }

    if let (Some(report), Some(path)) = (report, options.report.as_ref()) {
        report.save(path)?;
        println!("Wrote report {}", path.display());
    }

    Ok(())
}

fn synthesize<R: Rng + ?Sized>(
    kind: AnchorKind,
    target: &AudioBuffer,
    others: &[AudioBuffer],
    options: &GenerateOptions,
    window: WindowKind,
    rng: &mut R,
) -> Result<AudioBuffer> {
    match kind {
        AnchorKind::DistortedTarget => anchors::distorted_target(
            target,
            &DistortedTargetParams {
                num_points: options.num_points,
                window,
                ..Default::default()
            },
            rng,
        ),
        AnchorKind::Artefacts => anchors::artefacts(
            target,
            &MusicalNoiseParams {
                num_points: options.num_points,
                window,
                ..Default::default()
            },
            rng,
        ),
        AnchorKind::Interference => anchors::interference(
            target,
            others,
            &InterferenceParams {
                relative_loudness: Some(options.relative_loudness),
            },
        ),
        AnchorKind::OverallQuality => anchors::overall_quality(
            target,
            others,
            &OverallQualityParams {
                relative_loudness: options.relative_loudness,
                num_points: options.num_points,
                window,
                ..Default::default()
            },
            rng,
        ),
        AnchorKind::TargetSoundQuality => anchors::target_sound_quality(
            target,
            &TargetSoundQualityParams {
                num_points: options.num_points,
                window,
                ..Default::default()
            },
            rng,
        ),
    }
}

fn anchor_filename(stem: &str, kind: AnchorKind) -> String {
    format!("{}_{}_anchor.wav", stem, kind)
}

/// Run the analyze command
pub fn analyze(path: &Path) -> Result<()> {
    let buffer = load_wav(path)?;
    let analysis = AudioAnalysis::analyze(&buffer);

    println!("{}", path.display());
    println!("{}", analysis.summary());
    match measure_loudness(&buffer) {
        Ok(lufs) => println!("Integrated loudness: {:.1} LUFS", lufs),
        Err(AnchorError::SilentAudio) => {
            println!("Integrated loudness: n/a (silent or too short)")
        }
        Err(err) => return Err(err),
    }

    Ok(())
}

//! CLI Module
//!
//! Command-line interface for batch anchor generation.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Anchor stimulus generator for source separation listening tests
#[derive(Parser, Debug)]
#[command(name = "anchorgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate anchor stimuli for a target source
    #[command(name = "generate")]
    Generate {
        /// Target source WAV file
        #[arg(long)]
        target: PathBuf,

        /// The other sources that make up the rest of the mixture
        #[arg(long, num_args = 1..)]
        others: Vec<PathBuf>,

        /// Create the distorted target anchor
        #[arg(long)]
        distorted_target: bool,

        /// Create the artefacts anchor
        #[arg(long)]
        artefacts: bool,

        /// Create the interference anchor (needs --others)
        #[arg(long)]
        interference: bool,

        /// Create the overall quality anchor (needs --others)
        #[arg(long)]
        overall_quality: bool,

        /// Create the target sound quality anchor
        #[arg(long)]
        target_sound_quality: bool,

        /// Create every anchor type
        #[arg(long)]
        all: bool,

        /// Directory for output files (defaults to the target's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Transform length in samples
        #[arg(long, default_value_t = crate::anchors::DEFAULT_NUM_POINTS)]
        num_points: usize,

        /// Analysis window: hann, hamming, blackman, or rectangular
        #[arg(long, default_value = "hann")]
        window: String,

        /// Accompaniment level relative to the target, in LU
        #[arg(long, default_value_t = 0.0)]
        relative_loudness: f64,

        /// Seed for reproducible degradation patterns
        #[arg(long)]
        seed: Option<u64>,

        /// Output bit depth: 16, 24, or 32 (float)
        #[arg(long, default_value_t = 32)]
        bit_depth: u16,

        /// Write a JSON manifest of the run to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Print level and loudness measurements for a WAV file
    #[command(name = "analyze")]
    Analyze {
        /// Audio file to inspect
        path: PathBuf,
    },
}

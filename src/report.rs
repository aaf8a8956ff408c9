//! Batch run manifest
//!
//! A generate run can emit a JSON manifest describing every anchor it wrote,
//! with integrated loudness and a content checksum per file. Manifests make
//! listening test sessions auditable after the stimuli have been shipped.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;

/// One generated anchor file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorEntry {
    pub anchor: String,
    pub path: String,
    /// Integrated loudness of the anchor, when measurable
    pub loudness_lufs: Option<f64>,
    pub sha256: String,
}

/// Manifest for one generate run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    pub target: String,
    pub seed: Option<u64>,
    /// Uniform gain applied by the clipping guard (1.0 when none was needed)
    pub clip_guard_gain: f32,
    pub anchors: Vec<AnchorEntry>,
}

impl RunReport {
    pub fn new(target: &Path, seed: Option<u64>, clip_guard_gain: f32) -> Self {
        Self {
            generated_at: Utc::now(),
            target: target.display().to_string(),
            seed,
            clip_guard_gain,
            anchors: Vec::new(),
        }
    }

    /// Write the manifest as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// SHA-256 checksum of a file's contents as a hex string
pub fn file_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

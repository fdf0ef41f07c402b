//! Project settings (stickerkit.yaml).
//!
//! Every field is optional in the file; missing values fall back to the
//! defaults the pipeline stages document. Command-line flags are applied
//! on top by the CLI.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};
use crate::process::PipelineConfig;
use crate::types::GridSpec;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "stickerkit.yaml";

/// Settings loaded from stickerkit.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sheet layout used when a command is given no `--grid`.
    pub grid: GridSpec,

    /// Directory split and process write stickers into.
    pub output: PathBuf,

    /// Every pipeline threshold and the optional stages.
    pub pipeline: PipelineConfig,
}

fn default_output() -> PathBuf {
    PathBuf::from("stickers")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            output: default_output(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StickerError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read settings: {}", e),
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| StickerError::Config {
            message: format!("Invalid settings: {}", e),
            help: Some(format!("Check {} syntax", DEFAULT_CONFIG_FILE)),
        })
    }

    /// Load `explicit` if given, else `stickerkit.yaml` in `dir` when it
    /// exists, else defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let implicit = dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            Self::load(&implicit)
        } else {
            Ok(Self::default())
        }
    }
}

//! Configuration schema for lamina
//!
//! Configuration is stored at `~/.config/lamina/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage locations for layers and mount points
    pub storage: StorageConfig,
}

/// Storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding layer content directories and manifests
    pub layers_dir: PathBuf,

    /// Directory holding per-layer mount points
    pub mounts_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            layers_dir: PathBuf::from("/var/lib/lamina/layers"),
            mounts_dir: PathBuf::from("/run/lamina/mounts"),
        }
    }
}

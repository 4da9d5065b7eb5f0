//! Configuration Module - User preferences from config.toml
//!
//! Supports:
//! - Log level
//! - Default scan options (depth, recursion, page size, hashing workers)
//! - Exclusion presets and custom exclusion rules

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::core::{parse_depth, ExclusionRules, Preset, DEFAULT_PAGE_SIZE};

/// FileHound Configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Scan settings
    pub scan: ScanConfig,
    /// Exclusion rules applied to every scan
    pub exclusions: ExclusionConfig,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Scan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Results revealed per page
    pub page_size: usize,
    /// Descend into sub-folders
    pub recursive: bool,
    /// Depth limit as typed by the user (empty = unlimited)
    pub max_depth: String,
    /// Duplicate scans skip OS system folders
    pub skip_system_dirs: bool,
    /// Hashing threads for duplicate scans (0 = auto)
    pub hash_workers: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            recursive: true,
            max_depth: String::new(),
            skip_system_dirs: true,
            hash_workers: 1,
        }
    }
}

/// Exclusion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionConfig {
    /// Skip `.git` folders
    pub git: bool,
    /// Skip `node_modules` folders
    pub node_modules: bool,
    /// Extra folder tokens
    pub folders: Vec<String>,
    /// File-name wildcard patterns
    pub names: Vec<String>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            git: true,
            node_modules: true,
            folders: Vec::new(),
            names: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from default path or return defaults
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(config)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "filehound", "filehound")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".filehound")
                    .join("config.toml")
            })
    }

    /// Write the commented sample config unless one exists already.
    ///
    /// Returns false if the file was already there.
    pub fn init_at(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, generate_sample_config())
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        tracing::info!("Created default config at {}", path.display());
        Ok(true)
    }

    /// Configured log level, `None` when it is not a recognised level.
    pub fn log_level(&self) -> Option<LevelFilter> {
        self.general.log_level.trim().parse().ok()
    }

    /// Depth limit, `None` when blank or invalid.
    pub fn max_depth(&self) -> Option<usize> {
        parse_depth(&self.scan.max_depth)
    }

    /// Exclusion rules built from presets, folder tokens and name patterns.
    ///
    /// Invalid name patterns are skipped with a warning.
    pub fn exclusion_rules(&self) -> ExclusionRules {
        let mut rules = ExclusionRules::new();
        rules.set_preset(Preset::Git, self.exclusions.git);
        rules.set_preset(Preset::NodeModules, self.exclusions.node_modules);

        for token in &self.exclusions.folders {
            rules.add_folder_token(token);
        }
        for pattern in &self.exclusions.names {
            if let Err(e) = rules.add_name_pattern(pattern) {
                tracing::warn!("Skipping exclusion: {}", e);
            }
        }
        rules
    }
}

/// Generate a sample config file with comments
pub fn generate_sample_config() -> String {
    r#"# FileHound Configuration
# Location: see `filehound config path`

[general]
# Log level: trace, debug, info, warn, error
log_level = "info"

[scan]
# Results shown per page before "show more"
page_size = 50

# Descend into sub-folders
recursive = true

# Maximum folder depth below each root (empty = unlimited)
max_depth = ""

# Duplicate scans skip Windows system folders (Program Files, AppData, ...)
skip_system_dirs = true

# Hashing threads for duplicate scans (0 = one per CPU, 1 = sequential)
hash_workers = 1

[exclusions]
# Skip version-control metadata folders (.git)
git = true

# Skip node_modules folders
node_modules = true

# Extra folder fragments to skip (case-insensitive substring of the path)
# Example: ["target", "build"]
folders = []

# File-name wildcards to skip
# Example: ["thumbs.db", "*.tmp"]
names = []
"#
    .to_string()
}

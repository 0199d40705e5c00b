//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    APP_NAME, FREE_PALETTE_LIMIT, MAX_COLORS_PER_PALETTE, PRO_PALETTE_LIMIT, RECENT_COLORS_LIMIT,
};
use crate::extract::{ExtractorKind, Quality};
use crate::models::Tier;
use crate::services::PaletteLimits;
use crate::storage::StorageKind;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "PALETTEKIT_CONFIG_DIR";

/// Where palettes and recent colors are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend kind
    pub kind: StorageKind,
    /// Directory for the file backend. Defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

/// Collection limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Palette ceiling on the free tier
    pub free_palette_limit: usize,
    /// Palette ceiling on the pro tier
    pub pro_palette_limit: usize,
    /// Colors per palette (at most 20)
    pub max_colors_per_palette: usize,
    /// Length of the recent colors list
    pub recent_colors_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            free_palette_limit: FREE_PALETTE_LIMIT,
            pro_palette_limit: PRO_PALETTE_LIMIT,
            max_colors_per_palette: MAX_COLORS_PER_PALETTE,
            recent_colors_limit: RECENT_COLORS_LIMIT,
        }
    }
}

impl LimitsConfig {
    /// Limits in the form the palette store expects.
    #[must_use]
    pub const fn palette_limits(&self) -> PaletteLimits {
        PaletteLimits {
            free_palettes: self.free_palette_limit,
            pro_palettes: self.pro_palette_limit,
            colors_per_palette: self.max_colors_per_palette,
        }
    }
}

/// Account settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AccountConfig {
    /// Current tier
    pub tier: Tier,
}

/// Defaults for image extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Working resolution
    pub quality: Quality,
    /// Clustering strategy
    pub strategy: ExtractorKind,
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/palettekit/config.toml`
/// - macOS: `~/Library/Application Support/palettekit/config.toml`
/// - Windows: `%APPDATA%\palettekit\config.toml`
///
/// `PALETTEKIT_CONFIG_DIR` replaces the directory on every platform.
///
/// # Validation
///
/// - every limit must be at least 1
/// - `max_colors_per_palette` must not exceed 20
/// - the pro ceiling must not be below the free ceiling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Persistence settings
    pub storage: StorageConfig,
    /// Collection limits
    pub limits: LimitsConfig,
    /// Account settings
    pub account: AccountConfig,
    /// Extraction defaults
    pub extraction: ExtractionConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory, honouring `PALETTEKIT_CONFIG_DIR`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);
        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory used by the file storage backend.
    ///
    /// An explicit `storage.data_dir` wins. With `PALETTEKIT_CONFIG_DIR` set the
    /// data lives in its `data/` subdirectory so one override isolates everything.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }
        if std::env::var_os(CONFIG_DIR_ENV).is_some_and(|v| !v.is_empty()) {
            return Ok(Self::config_dir()?.join("data"));
        }
        match dirs::data_dir() {
            Some(dir) => Ok(dir.join(APP_NAME)),
            None => Ok(Self::config_dir()?.join("data")),
        }
    }

    /// Loads configuration from the default location.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads and validates configuration from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;
        fs::rename(&temp_path, path).with_context(|| {
            format!("Failed to rename temp config file to: {}", path.display())
        })?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        for (name, value) in [
            ("free_palette_limit", limits.free_palette_limit),
            ("pro_palette_limit", limits.pro_palette_limit),
            ("max_colors_per_palette", limits.max_colors_per_palette),
            ("recent_colors_limit", limits.recent_colors_limit),
        ] {
            if value == 0 {
                bail!("limits.{name} must be at least 1");
            }
        }

        if limits.max_colors_per_palette > MAX_COLORS_PER_PALETTE {
            bail!(
                "limits.max_colors_per_palette cannot exceed {MAX_COLORS_PER_PALETTE} (got {})",
                limits.max_colors_per_palette
            );
        }

        if limits.pro_palette_limit < limits.free_palette_limit {
            bail!(
                "limits.pro_palette_limit ({}) is below limits.free_palette_limit ({})",
                limits.pro_palette_limit,
                limits.free_palette_limit
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::new();
        assert_eq!(config.storage.kind, StorageKind::File);
        assert_eq!(config.limits.free_palette_limit, 5);
        assert_eq!(config.limits.pro_palette_limit, 100);
        assert_eq!(config.limits.max_colors_per_palette, 20);
        assert_eq!(config.limits.recent_colors_limit, 20);
        assert_eq!(config.account.tier, Tier::Free);
        assert_eq!(config.extraction.quality, Quality::Medium);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_limits() {
        let mut config = Config::new();
        config.limits.free_palette_limit = 0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.limits.max_colors_per_palette = 21;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.limits.pro_palette_limit = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.account.tier = Tier::Pro;
        config.storage.kind = StorageKind::Memory;
        config.extraction.strategy = ExtractorKind::KMeans;
        config.save_to(&config_file).unwrap();

        assert!(!config_file.with_extension("toml.tmp").exists());
        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[account]\ntier = \"pro\"\n\n[limits]\nfree_palette_limit = 3\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded.account.tier, Tier::Pro);
        assert_eq!(loaded.limits.free_palette_limit, 3);
        assert_eq!(loaded.limits.pro_palette_limit, 100);
        assert_eq!(loaded.storage.kind, StorageKind::File);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[limits]\nmax_colors_per_palette = 50\n").unwrap();
        assert!(Config::load_from(&config_file).is_err());

        fs::write(&config_file, "[storage]\nkind = \"cloud\"\n").unwrap();
        assert!(Config::load_from(&config_file).is_err());
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let mut config = Config::new();
        config.storage.data_dir = Some(PathBuf::from("/tmp/palettekit-data"));
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/palettekit-data"));
    }

    #[test]
    fn test_palette_limits_mapping() {
        let limits = LimitsConfig::default().palette_limits();
        assert_eq!(limits, PaletteLimits::default());
    }
}

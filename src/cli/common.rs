//! Shared CLI plumbing: error type, exit codes, output helpers and service wiring.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::constants::STORAGE_NAMESPACE;
use crate::error::{ColorError, PaletteError};
use crate::services::{PaletteStore, RecentColorsTracker};
use crate::storage::StorageBackend;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Invalid input or a rejected operation
    ValidationError = 1,
    /// File system, storage or serialization failure
    IoError = 2,
}

impl ExitCode {
    /// Numeric code passed to the OS.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Error reported by a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code category
    pub kind: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// User input or business-rule error (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// I/O or persistence error (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        self.kind
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ColorError> for CliError {
    fn from(err: ColorError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<PaletteError> for CliError {
    fn from(err: PaletteError) -> Self {
        if err.is_user_error() {
            Self::validation(err.to_string())
        } else {
            Self::io(err.to_string())
        }
    }
}

/// Result type of CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Prints `value` as a single line of JSON.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Loads the configuration, mapping failures to a validation error.
pub fn load_config() -> CliResult<Config> {
    Config::load().map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
}

/// Services wired from the configuration for one CLI invocation.
#[derive(Debug)]
pub struct AppContext {
    /// Loaded configuration
    pub config: Config,
    storage: Arc<StorageBackend>,
}

impl AppContext {
    /// Loads the configuration and opens the configured storage backend.
    pub fn open() -> CliResult<Self> {
        let config = load_config()?;
        let data_dir = config
            .data_dir()
            .map_err(|e| CliError::io(format!("Failed to resolve data directory: {e:#}")))?;
        let storage = Arc::new(StorageBackend::new(
            config.storage.kind,
            STORAGE_NAMESPACE,
            data_dir,
        ));
        Ok(Self { config, storage })
    }

    /// Loads the palette store.
    pub async fn palettes(&self) -> CliResult<PaletteStore> {
        Ok(PaletteStore::load(
            Arc::clone(&self.storage),
            self.config.limits.palette_limits(),
            self.config.account.tier,
        )
        .await?)
    }

    /// Creates the recent colors tracker.
    pub fn recent_colors(&self) -> RecentColorsTracker {
        RecentColorsTracker::new(
            Arc::clone(&self.storage),
            self.config.limits.recent_colors_limit,
        )
    }
}

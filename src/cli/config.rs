//! Configuration management CLI commands.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::common::{load_config, print_json, CliError, CliResult};
use crate::config::Config;
use crate::extract::{ExtractorKind, Quality};
use crate::models::Tier;
use crate::storage::StorageKind;

/// Configuration management commands
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
    /// Print the config file path
    Path,
}

/// Display current configuration
#[derive(Args, Debug, Clone)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug, Clone)]
pub struct ConfigSetArgs {
    /// Account tier (free or pro)
    #[arg(long, value_name = "TIER")]
    tier: Option<Tier>,

    /// Storage backend (memory or file)
    #[arg(long, value_name = "KIND")]
    storage: Option<StorageKind>,

    /// Data directory for the file backend
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Default extraction quality
    #[arg(long, value_name = "QUALITY")]
    quality: Option<Quality>,

    /// Default extraction strategy
    #[arg(long, value_name = "STRATEGY")]
    strategy: Option<ExtractorKind>,

    /// Recent colors list length
    #[arg(long, value_name = "N")]
    recent_limit: Option<usize>,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
            ConfigCommand::Path => {
                let path = Config::config_file_path()
                    .map_err(|e| CliError::io(format!("Failed to resolve config path: {e}")))?;
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;

        if self.json {
            return print_json(&config);
        }

        let data_dir = config
            .data_dir()
            .map_or_else(|_| "<unavailable>".to_string(), |p| p.display().to_string());
        println!("Storage:");
        println!("  kind:                   {}", config.storage.kind);
        println!("  data_dir:               {data_dir}");
        println!("Limits:");
        println!("  free_palette_limit:     {}", config.limits.free_palette_limit);
        println!("  pro_palette_limit:      {}", config.limits.pro_palette_limit);
        println!("  max_colors_per_palette: {}", config.limits.max_colors_per_palette);
        println!("  recent_colors_limit:    {}", config.limits.recent_colors_limit);
        println!("Account:");
        println!("  tier:                   {}", config.account.tier);
        println!("Extraction:");
        println!("  quality:                {}", config.extraction.quality);
        println!("  strategy:               {}", config.extraction.strategy);
        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        if self.tier.is_none()
            && self.storage.is_none()
            && self.data_dir.is_none()
            && self.quality.is_none()
            && self.strategy.is_none()
            && self.recent_limit.is_none()
        {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --tier, --storage, --data-dir, --quality, --strategy or --recent-limit",
            ));
        }

        let mut config = load_config()?;
        if let Some(tier) = self.tier {
            config.account.tier = tier;
        }
        if let Some(kind) = self.storage {
            config.storage.kind = kind;
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = Some(dir.clone());
        }
        if let Some(quality) = self.quality {
            config.extraction.quality = quality;
        }
        if let Some(strategy) = self.strategy {
            config.extraction.strategy = strategy;
        }
        if let Some(limit) = self.recent_limit {
            config.limits.recent_colors_limit = limit;
        }

        config
            .validate()
            .map_err(|e| CliError::validation(format!("Invalid configuration: {e}")))?;
        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e:#}")))?;

        println!("Configuration updated.");
        Ok(())
    }
}

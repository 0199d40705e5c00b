//! Recent colors commands.

use clap::{Args, Subcommand};

use crate::cli::common::{print_json, AppContext, CliResult};

/// Manage the recent colors list
#[derive(Debug, Clone, Args)]
pub struct RecentArgs {
    /// Recent colors subcommand
    #[command(subcommand)]
    pub command: RecentCommand,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Recent colors subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum RecentCommand {
    /// Show the list, newest first
    List,
    /// Record a color
    Add {
        /// Color in hex format
        #[arg(value_name = "COLOR")]
        color: String,
    },
    /// Remove a color
    Remove {
        /// Color in hex format
        #[arg(value_name = "COLOR")]
        color: String,
    },
    /// Empty the list
    Clear,
    /// Restore the default colors
    Reset,
}

impl RecentArgs {
    /// Execute the recent command
    pub async fn execute(&self) -> CliResult<()> {
        let context = AppContext::open()?;
        let tracker = context.recent_colors();

        let colors = match &self.command {
            RecentCommand::List => tracker.list().await?,
            RecentCommand::Add { color } => tracker.add(color).await?,
            RecentCommand::Remove { color } => tracker.remove(color).await?,
            RecentCommand::Clear => {
                tracker.clear().await?;
                Vec::new()
            }
            RecentCommand::Reset => tracker.reset_to_defaults().await?,
        };

        if self.json {
            print_json(&colors)?;
        } else if colors.is_empty() {
            println!("No recent colors.");
        } else {
            for hex in &colors {
                println!("{hex}");
            }
        }
        Ok(())
    }
}

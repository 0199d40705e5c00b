//! Palette management commands.
//!
//! Provides commands to list, inspect, create, edit and delete saved palettes.

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::common::{print_json, AppContext, CliError, CliResult};
use crate::models::{Palette, Tier};
use crate::services::PaletteStore;

/// Manage saved palettes
#[derive(Debug, Clone, Args)]
pub struct PaletteArgs {
    /// Palette subcommand
    #[command(subcommand)]
    pub command: PaletteCommand,
}

/// Palette management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum PaletteCommand {
    /// List all palettes
    List(JsonFlag),
    /// Show one palette
    Show(IdArgs),
    /// Create a palette
    Create(CreateArgs),
    /// Rename a palette
    Rename(RenameArgs),
    /// Delete a palette
    Delete(IdArgs),
    /// Append a color to a palette
    AddColor(ColorArgs),
    /// Remove a color from a palette
    RemoveColor(ColorArgs),
    /// Find palettes by name
    Search(SearchArgs),
    /// Find palettes containing a color
    Find(FindArgs),
    /// Delete every palette
    Clear(ClearArgs),
}

/// Output flag shared by simple subcommands
#[derive(Debug, Clone, Args)]
pub struct JsonFlag {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments naming one palette
#[derive(Debug, Clone, Args)]
pub struct IdArgs {
    /// Palette id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Create a palette
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Palette name (1-50 characters)
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Colors in hex format
    #[arg(value_name = "COLOR", required = true, num_args = 1..)]
    pub colors: Vec<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Rename a palette
#[derive(Debug, Clone, Args)]
pub struct RenameArgs {
    /// Palette id
    #[arg(value_name = "ID")]
    pub id: String,

    /// New name
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Add or remove one color
#[derive(Debug, Clone, Args)]
pub struct ColorArgs {
    /// Palette id
    #[arg(value_name = "ID")]
    pub id: String,

    /// Color in hex format
    #[arg(value_name = "COLOR")]
    pub color: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Search palettes by name
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Case-insensitive substring; empty lists everything
    #[arg(value_name = "QUERY", default_value = "")]
    pub query: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Find palettes containing a color
#[derive(Debug, Clone, Args)]
pub struct FindArgs {
    /// Color in hex format
    #[arg(value_name = "COLOR")]
    pub color: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Delete every palette
#[derive(Debug, Clone, Args)]
pub struct ClearArgs {
    /// Confirm deletion of all palettes
    #[arg(long)]
    pub yes: bool,
}

// JSON response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListPalettesResponse {
    palettes: Vec<Palette>,
    count: usize,
    limit: usize,
    tier: Tier,
}

impl PaletteArgs {
    /// Execute the palette command
    pub async fn execute(&self) -> CliResult<()> {
        let context = AppContext::open()?;
        let store = context.palettes().await?;

        match &self.command {
            PaletteCommand::List(args) => {
                let palettes = store.list().await;
                print_list(&store, palettes, args.json)
            }
            PaletteCommand::Show(args) => {
                let palette = store
                    .get(&args.id)
                    .await
                    .ok_or_else(|| CliError::validation(format!("Palette '{}' not found", args.id)))?;
                print_palette(&palette, args.json)
            }
            PaletteCommand::Create(args) => {
                let palette = store.create(&args.name, &args.colors).await?;
                print_palette(&palette, args.json)
            }
            PaletteCommand::Rename(args) => {
                let palette = store.rename(&args.id, &args.name).await?;
                print_palette(&palette, args.json)
            }
            PaletteCommand::Delete(args) => {
                let palette = store.delete(&args.id).await?;
                if args.json {
                    print_json(&palette)
                } else {
                    println!("Deleted palette '{}'", palette.name);
                    Ok(())
                }
            }
            PaletteCommand::AddColor(args) => {
                let palette = store.add_color(&args.id, &args.color).await?;
                print_palette(&palette, args.json)
            }
            PaletteCommand::RemoveColor(args) => {
                let palette = store.remove_color(&args.id, &args.color).await?;
                print_palette(&palette, args.json)
            }
            PaletteCommand::Search(args) => {
                let palettes = store.search(&args.query).await;
                print_list(&store, palettes, args.json)
            }
            PaletteCommand::Find(args) => {
                let palettes = store.find_by_color(&args.color).await?;
                print_list(&store, palettes, args.json)
            }
            PaletteCommand::Clear(args) => {
                if !args.yes {
                    return Err(CliError::validation(
                        "Refusing to delete all palettes without --yes",
                    ));
                }
                store.clear_all().await?;
                println!("Deleted all palettes");
                Ok(())
            }
        }
    }
}

fn print_palette(palette: &Palette, json: bool) -> CliResult<()> {
    if json {
        return print_json(palette);
    }
    println!("{} ({})", palette.name, palette.id);
    for hex in &palette.colors {
        println!("  {hex}");
    }
    Ok(())
}

fn print_list(store: &PaletteStore, palettes: Vec<Palette>, json: bool) -> CliResult<()> {
    let response = ListPalettesResponse {
        count: palettes.len(),
        palettes,
        limit: store.ceiling(),
        tier: store.tier(),
    };

    if json {
        return print_json(&response);
    }
    if response.count == 0 {
        println!("No palettes found.");
        return Ok(());
    }
    println!(
        "Palettes ({}, {} tier limit {}):",
        response.count, response.tier, response.limit
    );
    println!();
    for palette in &response.palettes {
        println!(
            "  {:<20} {:<30} {}",
            palette.id,
            palette.name,
            palette.colors.join(" ")
        );
    }
    Ok(())
}

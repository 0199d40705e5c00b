//! Image color extraction command.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::common::{print_json, AppContext, CliError, CliResult};
use crate::extract::{extract_colors_async, ExtractorKind, Quality};
use crate::models::{ExtractedColorSet, Palette};

/// Extract the dominant colors of an image
#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Image file (PNG, JPEG, GIF, WebP, ...)
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Extraction quality (low, medium, high); defaults to the configured value
    #[arg(short, long, value_name = "QUALITY")]
    pub quality: Option<Quality>,

    /// Clustering strategy (bucket, kmeans); defaults to the configured value
    #[arg(short, long, value_name = "STRATEGY")]
    pub strategy: Option<ExtractorKind>,

    /// Save the distinct extracted colors as a new palette with this name
    #[arg(long, value_name = "NAME")]
    pub save_as: Option<String>,

    /// Record the dominant color in the recent colors list
    #[arg(long)]
    pub remember: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ExtractResponse {
    image: String,
    quality: Quality,
    strategy: ExtractorKind,
    colors: ExtractedColorSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    palette: Option<Palette>,
}

impl ExtractArgs {
    /// Execute the extract command
    pub async fn execute(&self) -> CliResult<()> {
        let context = AppContext::open()?;
        let quality = self.quality.unwrap_or(context.config.extraction.quality);
        let strategy = self.strategy.unwrap_or(context.config.extraction.strategy);

        let decoded = image::open(&self.image).map_err(|e| {
            CliError::io(format!("Failed to read image {}: {e}", self.image.display()))
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!(width, height, %quality, %strategy, "Decoded image");

        let colors = extract_colors_async(rgba.into_raw(), width, height, quality, strategy).await;

        let palette = match &self.save_as {
            Some(name) => {
                let store = context.palettes().await?;
                Some(store.create(name, &colors.unique_colors()).await?)
            }
            None => None,
        };
        if self.remember {
            context.recent_colors().add(&colors.dominant).await?;
        }

        let response = ExtractResponse {
            image: self.image.display().to_string(),
            quality,
            strategy,
            colors,
            palette,
        };

        if self.json {
            print_json(&response)?;
        } else {
            println!("Colors from {} ({quality}, {strategy}):", response.image);
            for (slot, hex) in response.colors.slots() {
                println!("  {slot:<13} {hex}");
            }
            if let Some(palette) = &response.palette {
                println!();
                println!("Saved palette '{}' ({})", palette.name, palette.id);
            }
        }
        Ok(())
    }
}

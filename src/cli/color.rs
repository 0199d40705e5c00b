//! Stateless color commands: convert, contrast, harmony, simulate.

use clap::Args;
use serde::Serialize;

use crate::cli::common::{print_json, CliError, CliResult};
use crate::color::{
    self, contrast_ratio, harmony_colors, readable_text_color, simulate_color_blindness,
    wcag_level, ColorBlindness, ColorFormat, ColorInfo, HarmonyKind, WcagResult,
};

/// Show a color in every supported format
#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Color in hex format (#RRGGBB or RRGGBB)
    #[arg(value_name = "COLOR")]
    pub color: String,

    /// Print only this format (hex, rgb, hsv, hsl)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ColorFormat>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Compute the WCAG contrast ratio of two colors
#[derive(Debug, Clone, Args)]
pub struct ContrastArgs {
    /// Foreground color
    #[arg(value_name = "FOREGROUND")]
    pub foreground: String,

    /// Background color
    #[arg(value_name = "BACKGROUND")]
    pub background: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Generate a color harmony
#[derive(Debug, Clone, Args)]
pub struct HarmonyArgs {
    /// Base color
    #[arg(value_name = "COLOR")]
    pub color: String,

    /// Harmony kind (complementary, triadic, analogous, split-complementary, tetradic)
    #[arg(short, long, value_name = "KIND", default_value = "complementary")]
    pub kind: HarmonyKind,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Simulate color vision deficiency
#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Color to simulate
    #[arg(value_name = "COLOR")]
    pub color: String,

    /// Deficiency (protanopia, deuteranopia, tritanopia); all when omitted
    #[arg(short, long, value_name = "KIND")]
    pub kind: Option<ColorBlindness>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// JSON response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContrastResponse {
    foreground: String,
    background: String,
    ratio: f64,
    #[serde(flatten)]
    wcag: WcagResult,
    readable_on_background: &'static str,
}

#[derive(Debug, Serialize)]
struct HarmonyResponse {
    base: String,
    kind: HarmonyKind,
    colors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SimulationItem {
    kind: ColorBlindness,
    color: String,
}

#[derive(Debug, Serialize)]
struct SimulateResponse {
    color: String,
    simulations: Vec<SimulationItem>,
}

impl ConvertArgs {
    /// Execute the convert command
    pub fn execute(&self) -> CliResult<()> {
        let info = ColorInfo::from_hex(&self.color)?;

        if let Some(format) = self.format {
            let formatted = color::format_color(&info.hex, format)?;
            if self.json {
                print_json(&serde_json::json!({ "format": format, "value": formatted }))?;
            } else {
                println!("{formatted}");
            }
            return Ok(());
        }

        if self.json {
            print_json(&info)?;
        } else {
            for (format, value) in &info.formatted {
                println!("  {:<5} {value}", format.to_string().to_uppercase());
            }
            println!("  {:<5} {:.4}", "LUM", info.luminance);
        }
        Ok(())
    }
}

impl ContrastArgs {
    /// Execute the contrast command
    pub fn execute(&self) -> CliResult<()> {
        let foreground = color::validate_hex(&self.foreground)?;
        let background = color::validate_hex(&self.background)?;
        let ratio = contrast_ratio(&foreground, &background)?;
        let response = ContrastResponse {
            wcag: wcag_level(ratio),
            readable_on_background: readable_text_color(&background)?,
            foreground,
            background,
            ratio: (ratio * 100.0).round() / 100.0,
        };

        if self.json {
            print_json(&response)?;
        } else {
            let yes_no = |ok: bool| if ok { "pass" } else { "fail" };
            println!(
                "Contrast {} on {}: {:.2}:1",
                response.foreground, response.background, response.ratio
            );
            println!("  Level:       {}", response.wcag.level);
            println!("  Normal text: {}", yes_no(response.wcag.normal_text_ok));
            println!("  Large text:  {}", yes_no(response.wcag.large_text_ok));
        }
        Ok(())
    }
}

impl HarmonyArgs {
    /// Execute the harmony command
    pub fn execute(&self) -> CliResult<()> {
        let base = color::validate_hex(&self.color)?;
        let colors = harmony_colors(&base, self.kind)?;

        if self.json {
            print_json(&HarmonyResponse {
                base,
                kind: self.kind,
                colors,
            })?;
        } else {
            println!("{} harmony of {base}:", self.kind);
            for hex in colors {
                println!("  {hex}");
            }
        }
        Ok(())
    }
}

impl SimulateArgs {
    /// Execute the simulate command
    pub fn execute(&self) -> CliResult<()> {
        let color = color::validate_hex(&self.color)?;
        let kinds: Vec<ColorBlindness> = self
            .kind
            .map_or_else(|| ColorBlindness::ALL.to_vec(), |kind| vec![kind]);

        let simulations = kinds
            .into_iter()
            .map(|kind| {
                simulate_color_blindness(&color, kind).map(|simulated| SimulationItem {
                    kind,
                    color: simulated,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(CliError::from)?;

        if self.json {
            print_json(&SimulateResponse { color, simulations })?;
        } else {
            for item in simulations {
                println!("  {:<13} {}", item.kind, item.color);
            }
        }
        Ok(())
    }
}

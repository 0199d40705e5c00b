//! palettekit - color toolkit command line
//!
//! Converts and analyzes colors, extracts palettes from images, and manages
//! saved palettes and the recent colors list.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palettekit::cli::{
    CliResult, ConfigArgs, ContrastArgs, ConvertArgs, ExitCode, ExtractArgs, HarmonyArgs,
    PaletteArgs, RecentArgs, SimulateArgs,
};
use palettekit::constants::APP_BINARY_NAME;

/// palettekit - color conversion, harmony, contrast and palette tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a color as HEX, RGB, HSV and HSL
    Convert(ConvertArgs),
    /// Compute the WCAG contrast ratio of two colors
    Contrast(ContrastArgs),
    /// Generate a color harmony
    Harmony(HarmonyArgs),
    /// Simulate color vision deficiency
    Simulate(SimulateArgs),
    /// Extract the dominant colors of an image
    Extract(ExtractArgs),
    /// Manage saved palettes
    Palette(PaletteArgs),
    /// Manage the recent colors list
    Recent(RecentArgs),
    /// Show or change configuration
    Config(ConfigArgs),
}

impl Command {
    async fn execute(&self) -> CliResult<()> {
        match self {
            Self::Convert(args) => args.execute(),
            Self::Contrast(args) => args.execute(),
            Self::Harmony(args) => args.execute(),
            Self::Simulate(args) => args.execute(),
            Self::Extract(args) => args.execute().await,
            Self::Palette(args) => args.execute().await,
            Self::Recent(args) => args.execute().await,
            Self::Config(args) => args.execute(),
        }
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so JSON on stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command.execute().await {
        Ok(()) => std::process::ExitCode::from(ExitCode::Success.code()),
        Err(err) => {
            eprintln!("Error: {err}");
            if err.exit_code() == ExitCode::ValidationError {
                eprintln!("Run '{APP_BINARY_NAME} --help' for usage.");
            }
            std::process::ExitCode::from(err.exit_code().code())
        }
    }
}

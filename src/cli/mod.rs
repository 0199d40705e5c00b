//! CLI command handlers for palettekit.
//!
//! This module provides headless, scriptable access to the color tools and the
//! palette services for automation and testing.

pub mod color;
pub mod common;
pub mod config;
pub mod extract;
pub mod palette;
pub mod recent;

// Re-export types used by main.rs and tests
pub use color::{ContrastArgs, ConvertArgs, HarmonyArgs, SimulateArgs};
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use extract::ExtractArgs;
pub use palette::PaletteArgs;
pub use recent::RecentArgs;

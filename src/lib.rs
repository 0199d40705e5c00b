//! palettekit library
//!
//! Color conversion, harmony generation, WCAG contrast scoring, color-blindness
//! simulation and dominant-color extraction, plus persisted palettes and a
//! recent colors list built on a pluggable key-value store.

// Module declarations
pub mod cli;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{ColorError, PaletteError};

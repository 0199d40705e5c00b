//! Data models for colors, palettes, and extraction results.
//!
//! Models are independent of storage and UI. Validation that only concerns a
//! single value lives here; rules that depend on the whole collection (tier
//! ceilings, duplicates across calls) live in the services.

pub mod extracted;
pub mod palette;
pub mod rgb;
pub mod tier;

// Re-export all model types
pub use extracted::ExtractedColorSet;
pub use palette::{Palette, PaletteUpdate};
pub use rgb::{Hsl, Hsv, RgbColor};
pub use tier::Tier;

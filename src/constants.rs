//! Application-wide constants.
//!
//! This module defines the application name, storage keys, and the default
//! limits used when no configuration overrides them.

/// The display name of the application.
pub const APP_NAME: &str = "palettekit";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "palettekit";

/// Storage namespace for all keys written by this crate.
pub const STORAGE_NAMESPACE: &str = "palettekit";

/// Storage key holding the palette collection.
pub const PALETTES_KEY: &str = "palettes";

/// Storage key holding the recent colors list.
pub const RECENT_COLORS_KEY: &str = "colors";

/// Maximum palette name length in characters.
pub const MAX_PALETTE_NAME_LEN: usize = 50;

/// Hard upper bound on colors per palette.
pub const MAX_COLORS_PER_PALETTE: usize = 20;

/// Default palette ceiling for the free tier.
pub const FREE_PALETTE_LIMIT: usize = 5;

/// Default palette ceiling for the pro tier.
pub const PRO_PALETTE_LIMIT: usize = 100;

/// Default bound of the recent colors list.
pub const RECENT_COLORS_LIMIT: usize = 20;

/// Recent colors shown before the user has captured anything.
pub const DEFAULT_RECENT_COLORS: [&str; 8] = [
    "#FF6B35", "#F7931E", "#FFD23F", "#06D6A0", "#118AB2", "#073B4C", "#EF476F", "#8338EC",
];

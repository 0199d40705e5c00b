//! Stateful services built on the color core.
//!
//! Both services persist through a [`KeyValueStore`](crate::storage::KeyValueStore),
//! serialize their mutations behind an async write gate, and notify
//! subscribers with a snapshot after each successful write.

pub mod listeners;
pub mod palettes;
pub mod recent_colors;

pub use listeners::{Listeners, Subscription};
pub use palettes::{PaletteLimits, PaletteStore};
pub use recent_colors::RecentColorsTracker;

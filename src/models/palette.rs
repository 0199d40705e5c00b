//! Named, ordered color palettes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color;
use crate::constants::MAX_PALETTE_NAME_LEN;
use crate::error::PaletteError;

/// A user-created palette.
///
/// # Validation
///
/// - Name is trimmed, non-empty, max 50 characters
/// - Colors are uppercase `#RRGGBB`, unique, 1 to `max_colors_per_palette` entries
/// - Color order is meaningful and preserved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    /// Opaque identifier, unique on this device
    pub id: String,
    /// Display name
    pub name: String,
    /// Ordered colors
    pub colors: Vec<String>,
    /// Creation time (epoch milliseconds)
    pub created_at: i64,
    /// Last modification time (epoch milliseconds)
    pub updated_at: i64,
}

/// Partial update applied by `PaletteStore::update`.
///
/// Fields left as `None` are kept unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteUpdate {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement color list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
}

impl PaletteUpdate {
    /// Update that only renames.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            colors: None,
        }
    }

    /// Update that only replaces the colors.
    pub fn colors(colors: Vec<String>) -> Self {
        Self {
            name: None,
            colors: Some(colors),
        }
    }

    /// Returns true if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.colors.is_none()
    }
}

impl Palette {
    /// Builds a new palette with a fresh id, validating name and colors.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a bad name or empty color list and
    /// `InvalidColor` for any malformed color.
    pub fn new(
        name: &str,
        colors: &[String],
        max_colors: usize,
        now_ms: i64,
    ) -> Result<Self, PaletteError> {
        Ok(Self {
            id: generate_id(now_ms),
            name: validate_name(name)?,
            colors: normalize_colors(colors, max_colors)?,
            created_at: now_ms,
            updated_at: now_ms,
        })
    }

    /// Returns true if the palette holds `hex` (case-insensitive).
    #[must_use]
    pub fn contains_color(&self, hex: &str) -> bool {
        let needle = color::normalize_hex(hex);
        self.colors.iter().any(|c| c.eq_ignore_ascii_case(&needle))
    }

    /// Returns true if the name contains `query` (case-insensitive).
    #[must_use]
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Validates a palette name and returns it trimmed.
///
/// # Errors
///
/// Returns `Validation` if the trimmed name is empty or longer than 50 characters.
pub fn validate_name(name: &str) -> Result<String, PaletteError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(PaletteError::Validation(
            "Palette name cannot be empty".to_string(),
        ));
    }

    let length = trimmed.chars().count();
    if length > MAX_PALETTE_NAME_LEN {
        return Err(PaletteError::Validation(format!(
            "Palette name exceeds maximum length of {MAX_PALETTE_NAME_LEN} characters (got {length})"
        )));
    }

    Ok(trimmed.to_string())
}

/// Normalizes and validates a color list.
///
/// Every entry is normalized to `#RRGGBB`; repeated colors keep their first
/// position; the result is truncated to `max_colors`.
///
/// # Errors
///
/// Returns `Validation` for an empty list and `InvalidColor` for any malformed entry.
pub fn normalize_colors(colors: &[String], max_colors: usize) -> Result<Vec<String>, PaletteError> {
    if colors.is_empty() {
        return Err(PaletteError::Validation(
            "A palette needs at least one color".to_string(),
        ));
    }

    let mut normalized: Vec<String> = Vec::with_capacity(colors.len().min(max_colors));
    for raw in colors {
        let hex = color::validate_hex(raw)?;
        if !normalized.contains(&hex) {
            normalized.push(hex);
        }
    }

    normalized.truncate(max_colors);
    Ok(normalized)
}

/// Generates a palette id from the current time plus random bits.
fn generate_id(now_ms: i64) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}", to_base36(now_ms.unsigned_abs()), &random[..8])
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

//! Semantic color set produced by image extraction.

use serde::{Deserialize, Serialize};

/// Seven named colors extracted from one image.
///
/// Every slot always holds a valid `#RRGGBB` string. Slots with no matching
/// cluster fall back to a related slot and ultimately to `dominant`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedColorSet {
    /// Most frequent color
    pub dominant: String,
    /// Saturated, mid-lightness accent
    pub vibrant: String,
    /// Saturated dark accent
    pub dark_vibrant: String,
    /// Saturated light accent
    pub light_vibrant: String,
    /// Desaturated mid-lightness color
    pub muted: String,
    /// Desaturated dark color
    pub dark_muted: String,
    /// Desaturated light color
    pub light_muted: String,
}

impl ExtractedColorSet {
    /// The fixed set returned when an image has no usable pixels.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            dominant: "#6366F1".to_string(),
            vibrant: "#8B5CF6".to_string(),
            dark_vibrant: "#4C1D95".to_string(),
            light_vibrant: "#C4B5FD".to_string(),
            muted: "#64748B".to_string(),
            dark_muted: "#334155".to_string(),
            light_muted: "#CBD5E1".to_string(),
        }
    }

    /// Slot names paired with their colors, in display order.
    #[must_use]
    pub fn slots(&self) -> [(&'static str, &str); 7] {
        [
            ("dominant", &self.dominant),
            ("vibrant", &self.vibrant),
            ("darkVibrant", &self.dark_vibrant),
            ("lightVibrant", &self.light_vibrant),
            ("muted", &self.muted),
            ("darkMuted", &self.dark_muted),
            ("lightMuted", &self.light_muted),
        ]
    }

    /// Distinct colors in slot order.
    #[must_use]
    pub fn unique_colors(&self) -> Vec<String> {
        let mut colors: Vec<String> = Vec::with_capacity(7);
        for (_, hex) in self.slots() {
            if !colors.iter().any(|c| c == hex) {
                colors.push(hex.to_string());
            }
        }
        colors
    }
}

impl Default for ExtractedColorSet {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::is_valid_hex;

    #[test]
    fn test_defaults_are_valid_and_distinct() {
        let set = ExtractedColorSet::defaults();
        for (name, hex) in set.slots() {
            assert!(is_valid_hex(hex), "{name} = {hex}");
        }
        assert_eq!(set.unique_colors().len(), 7);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(ExtractedColorSet::defaults()).unwrap();
        assert_eq!(json["darkVibrant"], "#4C1D95");
        assert_eq!(json["lightMuted"], "#CBD5E1");
    }
}

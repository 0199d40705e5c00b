//! Color harmony generation.
//!
//! Each harmony rotates the base hue by a fixed list of offsets in HSV space
//! while holding saturation and value constant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{hex_to_hsv, hsv_to_hex, validate_hex};
use crate::error::ColorError;

/// Harmony rule used to derive related colors from a base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmonyKind {
    /// Base plus the opposite hue
    Complementary,
    /// Three hues 120 degrees apart
    Triadic,
    /// Neighbouring hues within 30 degrees either side
    Analogous,
    /// Base plus the two neighbours of its complement
    SplitComplementary,
    /// Four hues 90 degrees apart
    Tetradic,
}

impl HarmonyKind {
    /// All harmony kinds.
    pub const ALL: [Self; 5] = [
        Self::Complementary,
        Self::Triadic,
        Self::Analogous,
        Self::SplitComplementary,
        Self::Tetradic,
    ];

    /// Hue offsets in degrees, in output order. The `0.0` entry is the base.
    #[must_use]
    pub const fn offsets(&self) -> &'static [f64] {
        match self {
            Self::Complementary => &[0.0, 180.0],
            Self::Triadic => &[0.0, 120.0, 240.0],
            Self::Analogous => &[-30.0, -15.0, 0.0, 15.0, 30.0],
            Self::SplitComplementary => &[0.0, 150.0, 210.0],
            Self::Tetradic => &[0.0, 90.0, 180.0, 270.0],
        }
    }

    /// Number of colors produced, base included.
    #[must_use]
    pub const fn color_count(&self) -> usize {
        self.offsets().len()
    }
}

impl fmt::Display for HarmonyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complementary => write!(f, "complementary"),
            Self::Triadic => write!(f, "triadic"),
            Self::Analogous => write!(f, "analogous"),
            Self::SplitComplementary => write!(f, "split-complementary"),
            Self::Tetradic => write!(f, "tetradic"),
        }
    }
}

impl FromStr for HarmonyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.to_string() == key)
            .ok_or_else(|| {
                format!(
                    "Unknown harmony '{s}'. Expected one of: complementary, triadic, analogous, split-complementary, tetradic"
                )
            })
    }
}

/// Generates the harmony of `kind` for `base`.
///
/// The base color appears verbatim (normalized to `#RRGGBB`) at its `0°`
/// position; other entries are regenerated from the rotated hue.
///
/// # Examples
///
/// ```
/// use palettekit::color::{harmony_colors, HarmonyKind};
///
/// let colors = harmony_colors("#FF0000", HarmonyKind::Triadic).unwrap();
/// assert_eq!(colors, vec!["#FF0000", "#00FF00", "#0000FF"]);
/// ```
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if `base` is malformed.
#[allow(clippy::float_cmp)] // offsets are literal constants
pub fn harmony_colors(base: &str, kind: HarmonyKind) -> Result<Vec<String>, ColorError> {
    let base = validate_hex(base)?;
    let hsv = hex_to_hsv(&base)?;

    Ok(kind
        .offsets()
        .iter()
        .map(|&offset| {
            if offset == 0.0 {
                base.clone()
            } else {
                hsv_to_hex(hsv.rotate(offset))
            }
        })
        .collect())
}

/// `[base, +180°]`
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if `base` is malformed.
pub fn complementary(base: &str) -> Result<Vec<String>, ColorError> {
    harmony_colors(base, HarmonyKind::Complementary)
}

/// `[base, +120°, +240°]`
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if `base` is malformed.
pub fn triadic(base: &str) -> Result<Vec<String>, ColorError> {
    harmony_colors(base, HarmonyKind::Triadic)
}

/// `[-30°, -15°, base, +15°, +30°]`
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if `base` is malformed.
pub fn analogous(base: &str) -> Result<Vec<String>, ColorError> {
    harmony_colors(base, HarmonyKind::Analogous)
}

/// `[base, +150°, +210°]`
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if `base` is malformed.
pub fn split_complementary(base: &str) -> Result<Vec<String>, ColorError> {
    harmony_colors(base, HarmonyKind::SplitComplementary)
}

/// `[base, +90°, +180°, +270°]`
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if `base` is malformed.
pub fn tetradic(base: &str) -> Result<Vec<String>, ColorError> {
    harmony_colors(base, HarmonyKind::Tetradic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hex_to_rgb;

    fn assert_close(actual: &str, expected: &str) {
        let a = hex_to_rgb(actual).unwrap();
        let e = hex_to_rgb(expected).unwrap();
        let diff = |x: u8, y: u8| (i16::from(x) - i16::from(y)).abs();
        assert!(
            diff(a.r, e.r) <= 1 && diff(a.g, e.g) <= 1 && diff(a.b, e.b) <= 1,
            "{actual} is not within one step of {expected}"
        );
    }

    #[test]
    fn test_cardinality_and_base_present() {
        let expected = [
            (HarmonyKind::Complementary, 2),
            (HarmonyKind::Triadic, 3),
            (HarmonyKind::Analogous, 5),
            (HarmonyKind::SplitComplementary, 3),
            (HarmonyKind::Tetradic, 4),
        ];
        for base in ["#FF6B35", "#808080", "#000000", "#06D6A0"] {
            for (kind, count) in expected {
                let colors = harmony_colors(base, kind).unwrap();
                assert_eq!(colors.len(), count, "{kind} for {base}");
                assert!(colors.iter().any(|c| c == base), "{kind} lacks {base}");
            }
        }
    }

    #[test]
    fn test_reference_complementary() {
        let colors = complementary("#FF6B35").unwrap();
        assert_eq!(colors[0], "#FF6B35");
        assert_close(&colors[1], "#35C8FF");
    }

    #[test]
    fn test_base_is_normalized() {
        let colors = complementary("ff6b35").unwrap();
        assert_eq!(colors[0], "#FF6B35");
    }

    #[test]
    fn test_analogous_wraps_negative_hues() {
        // Red sits at 0°, so -30° must wrap to 330°
        let colors = analogous("#FF0000").unwrap();
        assert_eq!(colors[2], "#FF0000");
        assert_eq!(colors[0], "#FF0080");
        assert_eq!(colors[4], "#FF8000");
    }

    #[test]
    fn test_tetradic_primary() {
        let colors = tetradic("#FF0000").unwrap();
        assert_eq!(colors, vec!["#FF0000", "#80FF00", "#00FFFF", "#8000FF"]);
    }

    #[test]
    fn test_split_complementary_and_triadic_wrappers() {
        assert_eq!(split_complementary("#FF0000").unwrap().len(), 3);
        assert_eq!(triadic("#FF0000").unwrap(), vec!["#FF0000", "#00FF00", "#0000FF"]);
    }

    #[test]
    fn test_achromatic_base_stays_gray() {
        let colors = tetradic("#808080").unwrap();
        assert!(colors.iter().all(|c| c == "#808080"));
    }

    #[test]
    fn test_invalid_base() {
        assert!(harmony_colors("#GG0000", HarmonyKind::Triadic).is_err());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(
            "split_complementary".parse::<HarmonyKind>().unwrap(),
            HarmonyKind::SplitComplementary
        );
        assert_eq!("Tetradic".parse::<HarmonyKind>().unwrap(), HarmonyKind::Tetradic);
        assert!("square".parse::<HarmonyKind>().is_err());
        for kind in HarmonyKind::ALL {
            assert_eq!(kind.to_string().parse::<HarmonyKind>().unwrap(), kind);
        }
    }
}

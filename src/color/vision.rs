//! Color-blindness simulation.
//!
//! Uses the common single-matrix approximations applied directly to sRGB
//! channel values. Good enough for previewing palettes; not colorimetrically
//! exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{hex_to_rgb, validate_hex};
use crate::error::ColorError;
use crate::models::RgbColor;

/// Type of color vision deficiency to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorBlindness {
    /// Red-blind
    Protanopia,
    /// Green-blind
    Deuteranopia,
    /// Blue-blind
    Tritanopia,
}

impl ColorBlindness {
    /// All simulated deficiencies.
    pub const ALL: [Self; 3] = [Self::Protanopia, Self::Deuteranopia, Self::Tritanopia];

    /// Row-major transform applied to `[r, g, b]`.
    #[must_use]
    pub const fn matrix(&self) -> [[f64; 3]; 3] {
        match self {
            Self::Protanopia => [
                [0.567, 0.433, 0.0],
                [0.558, 0.442, 0.0],
                [0.0, 0.242, 0.758],
            ],
            Self::Deuteranopia => [
                [0.625, 0.375, 0.0],
                [0.7, 0.3, 0.0],
                [0.0, 0.3, 0.7],
            ],
            Self::Tritanopia => [
                [0.95, 0.05, 0.0],
                [0.0, 0.433, 0.567],
                [0.0, 0.475, 0.525],
            ],
        }
    }

    /// Applies the transform to one color.
    #[must_use]
    pub fn apply(&self, rgb: RgbColor) -> RgbColor {
        let input = [f64::from(rgb.r), f64::from(rgb.g), f64::from(rgb.b)];
        let m = self.matrix();
        let row = |i: usize| m[i][0] * input[0] + m[i][1] * input[1] + m[i][2] * input[2];
        RgbColor::from_f64(row(0), row(1), row(2))
    }
}

impl fmt::Display for ColorBlindness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protanopia => write!(f, "protanopia"),
            Self::Deuteranopia => write!(f, "deuteranopia"),
            Self::Tritanopia => write!(f, "tritanopia"),
        }
    }
}

impl FromStr for ColorBlindness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "protanopia" | "protan" => Ok(Self::Protanopia),
            "deuteranopia" | "deutan" => Ok(Self::Deuteranopia),
            "tritanopia" | "tritan" => Ok(Self::Tritanopia),
            other => Err(format!(
                "Unknown color blindness type '{other}'. Expected protanopia, deuteranopia or tritanopia"
            )),
        }
    }
}

/// Simulates how `hex` appears under the given deficiency.
///
/// # Examples
///
/// ```
/// use palettekit::color::{simulate_color_blindness, ColorBlindness};
///
/// // Grays are unchanged because every matrix row sums to one
/// let gray = simulate_color_blindness("#808080", ColorBlindness::Deuteranopia).unwrap();
/// assert_eq!(gray, "#808080");
/// ```
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` for malformed input.
pub fn simulate_color_blindness(hex: &str, kind: ColorBlindness) -> Result<String, ColorError> {
    let rgb = hex_to_rgb(&validate_hex(hex)?)?;
    Ok(kind.apply(rgb).to_hex())
}

//! Color math: hex parsing and normalization, colorspace conversion,
//! display formatting, contrast scoring, harmonies and color-blindness
//! simulation.
//!
//! Everything here is pure and deterministic. Functions taking raw strings
//! run them through [`validate_hex`] first, so malformed input comes back as
//! [`ColorError::InvalidColor`] instead of a panic.

// Allow intentional type casts when formatting rounded components
#![allow(clippy::cast_possible_truncation)]

pub mod contrast;
pub mod harmony;
pub mod vision;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ColorError;
use crate::models::{Hsl, Hsv, RgbColor};

pub use contrast::{contrast_ratio, readable_text_color, wcag_level, WcagLevel, WcagResult};
pub use harmony::{harmony_colors, HarmonyKind};
pub use vision::{simulate_color_blindness, ColorBlindness};

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex pattern is valid"))
}

/// Returns true iff `s` is `#` followed by exactly 6 hex digits.
///
/// # Examples
///
/// ```
/// use palettekit::color::is_valid_hex;
///
/// assert!(is_valid_hex("#ff6b35"));
/// assert!(!is_valid_hex("ff6b35"));
/// assert!(!is_valid_hex("#FFF"));
/// ```
#[must_use]
pub fn is_valid_hex(s: &str) -> bool {
    hex_pattern().is_match(s)
}

/// Trims whitespace, prepends `#` if missing and uppercases.
///
/// Does not validate; pair with [`is_valid_hex`] or use [`validate_hex`].
#[must_use]
pub fn normalize_hex(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.starts_with('#') {
        trimmed.to_uppercase()
    } else {
        format!("#{}", trimmed.to_uppercase())
    }
}

/// Normalizes `s` and checks it, returning the canonical `#RRGGBB` form.
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if the normalized string is not a valid hex color.
pub fn validate_hex(s: &str) -> Result<String, ColorError> {
    let normalized = normalize_hex(s);
    if is_valid_hex(&normalized) {
        Ok(normalized)
    } else {
        Err(ColorError::invalid(s, "expected a hex color like #RRGGBB"))
    }
}

/// Parses a 6-digit hex color, with or without a leading `#`.
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` for the wrong length or non-hex characters.
pub fn hex_to_rgb(hex: &str) -> Result<RgbColor, ColorError> {
    RgbColor::from_hex(hex)
}

/// Formats three channels as `#RRGGBB`.
#[must_use]
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    RgbColor::new(r, g, b).to_hex()
}

/// Formats float channels (0-255 scale) as `#RRGGBB`, rounding and clamping each.
#[must_use]
pub fn rgb_f64_to_hex(r: f64, g: f64, b: f64) -> String {
    RgbColor::from_f64(r, g, b).to_hex()
}

/// Converts RGB to HSV (hue in degrees, saturation/value in percent).
#[must_use]
pub fn rgb_to_hsv(rgb: RgbColor) -> Hsv {
    rgb.to_hsv()
}

/// Converts HSV to RGB.
#[must_use]
pub fn hsv_to_rgb(hsv: Hsv) -> RgbColor {
    RgbColor::from_hsv(hsv)
}

/// Converts RGB to HSL (saturation/lightness as fractions).
#[must_use]
pub fn rgb_to_hsl(rgb: RgbColor) -> Hsl {
    rgb.to_hsl()
}

/// Converts HSL to RGB.
#[must_use]
pub fn hsl_to_rgb(hsl: Hsl) -> RgbColor {
    RgbColor::from_hsl(hsl)
}

/// Parses a hex color straight into HSV.
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` for malformed input.
pub fn hex_to_hsv(hex: &str) -> Result<Hsv, ColorError> {
    Ok(hex_to_rgb(hex)?.to_hsv())
}

/// Formats an HSV color as `#RRGGBB`.
#[must_use]
pub fn hsv_to_hex(hsv: Hsv) -> String {
    RgbColor::from_hsv(hsv).to_hex()
}

/// Text representation used for display and copying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    /// `#RRGGBB`
    #[default]
    Hex,
    /// `rgb(r, g, b)`
    Rgb,
    /// `hsv(h, s%, v%)`
    Hsv,
    /// `hsl(h, s%, l%)`
    Hsl,
}

impl ColorFormat {
    /// All formats in display order.
    pub const ALL: [Self; 4] = [Self::Hex, Self::Rgb, Self::Hsv, Self::Hsl];
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Rgb => write!(f, "rgb"),
            Self::Hsv => write!(f, "hsv"),
            Self::Hsl => write!(f, "hsl"),
        }
    }
}

impl FromStr for ColorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "rgb" => Ok(Self::Rgb),
            "hsv" | "hsb" => Ok(Self::Hsv),
            "hsl" => Ok(Self::Hsl),
            other => Err(format!(
                "Unknown color format '{other}'. Expected hex, rgb, hsv or hsl"
            )),
        }
    }
}

/// Formats a color for display in the requested representation.
///
/// # Examples
///
/// ```
/// use palettekit::color::{format_color, ColorFormat};
///
/// assert_eq!(format_color("#ff6b35", ColorFormat::Hex).unwrap(), "#FF6B35");
/// assert_eq!(format_color("#FF6B35", ColorFormat::Rgb).unwrap(), "rgb(255, 107, 53)");
/// assert_eq!(format_color("#FF6B35", ColorFormat::Hsv).unwrap(), "hsv(16, 79%, 100%)");
/// assert_eq!(format_color("#FF6B35", ColorFormat::Hsl).unwrap(), "hsl(16, 100%, 60%)");
/// ```
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` for malformed input.
pub fn format_color(hex: &str, format: ColorFormat) -> Result<String, ColorError> {
    let rgb = hex_to_rgb(&validate_hex(hex)?)?;
    Ok(format_rgb(rgb, format))
}

fn format_rgb(rgb: RgbColor, format: ColorFormat) -> String {
    match format {
        ColorFormat::Hex => rgb.to_hex(),
        ColorFormat::Rgb => format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b),
        ColorFormat::Hsv => {
            let hsv = rgb.to_hsv();
            format!(
                "hsv({}, {}%, {}%)",
                round_hue(hsv.h),
                hsv.s.round() as i64,
                hsv.v.round() as i64
            )
        }
        ColorFormat::Hsl => {
            let hsl = rgb.to_hsl();
            format!(
                "hsl({}, {}%, {}%)",
                round_hue(hsl.h),
                (hsl.s * 100.0).round() as i64,
                (hsl.l * 100.0).round() as i64
            )
        }
    }
}

/// Rounds a hue for display, keeping 359.6 from showing as 360.
fn round_hue(h: f64) -> i64 {
    (h.round() as i64).rem_euclid(360)
}

/// Every representation of a single color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorInfo {
    /// Canonical hex
    pub hex: String,
    /// RGB channels
    pub rgb: RgbColor,
    /// HSV components
    pub hsv: Hsv,
    /// HSL components
    pub hsl: Hsl,
    /// WCAG relative luminance
    pub luminance: f64,
    /// Formatted strings keyed by format
    pub formatted: Vec<(ColorFormat, String)>,
}

impl ColorInfo {
    /// Collects all representations of `hex`.
    ///
    /// # Errors
    ///
    /// Returns `ColorError::InvalidColor` for malformed input.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let canonical = validate_hex(hex)?;
        let rgb = hex_to_rgb(&canonical)?;
        Ok(Self {
            hex: canonical,
            rgb,
            hsv: rgb.to_hsv(),
            hsl: rgb.to_hsl(),
            luminance: rgb.relative_luminance(),
            formatted: ColorFormat::ALL
                .iter()
                .map(|format| (*format, format_rgb(rgb, *format)))
                .collect(),
        })
    }
}

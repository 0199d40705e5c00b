//! WCAG 2.x contrast ratio and conformance levels.

use serde::Serialize;
use std::fmt;

use super::{hex_to_rgb, validate_hex};
use crate::error::ColorError;

/// Contrast needed for large text and UI components.
pub const LARGE_TEXT_MIN: f64 = 3.0;
/// Contrast needed for normal body text.
pub const NORMAL_TEXT_MIN: f64 = 4.5;
/// Enhanced contrast level.
pub const ENHANCED_MIN: f64 = 7.0;

/// WCAG conformance level of a contrast ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum WcagLevel {
    /// Below 3:1
    #[serde(rename = "Fail")]
    Fail,
    /// At least 3:1
    #[serde(rename = "A")]
    A,
    /// At least 4.5:1
    #[serde(rename = "AA")]
    Aa,
    /// At least 7:1
    #[serde(rename = "AAA")]
    Aaa,
}

impl WcagLevel {
    /// Label as shown to users.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fail => "Fail",
            Self::A => "A",
            Self::Aa => "AA",
            Self::Aaa => "AAA",
        }
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classification of a contrast ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WcagResult {
    /// Highest level reached
    pub level: WcagLevel,
    /// Ratio is at least 3:1
    pub large_text_ok: bool,
    /// Ratio is at least 4.5:1
    pub normal_text_ok: bool,
}

/// Computes the WCAG contrast ratio between two hex colors.
///
/// The result is in `[1, 21]` and symmetric in its arguments.
///
/// # Examples
///
/// ```
/// use palettekit::color::contrast_ratio;
///
/// let ratio = contrast_ratio("#000000", "#FFFFFF").unwrap();
/// assert!((ratio - 21.0).abs() < 1e-9);
/// ```
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if either color is malformed.
pub fn contrast_ratio(a: &str, b: &str) -> Result<f64, ColorError> {
    let la = hex_to_rgb(&validate_hex(a)?)?.relative_luminance();
    let lb = hex_to_rgb(&validate_hex(b)?)?.relative_luminance();

    let lighter = la.max(lb);
    let darker = la.min(lb);

    Ok((lighter + 0.05) / (darker + 0.05))
}

/// Classifies a contrast ratio against the WCAG thresholds.
#[must_use]
pub fn wcag_level(ratio: f64) -> WcagResult {
    let level = if ratio >= ENHANCED_MIN {
        WcagLevel::Aaa
    } else if ratio >= NORMAL_TEXT_MIN {
        WcagLevel::Aa
    } else if ratio >= LARGE_TEXT_MIN {
        WcagLevel::A
    } else {
        WcagLevel::Fail
    };

    WcagResult {
        level,
        large_text_ok: ratio >= LARGE_TEXT_MIN,
        normal_text_ok: ratio >= NORMAL_TEXT_MIN,
    }
}

/// Picks black or white text, whichever contrasts more with `background`.
///
/// # Errors
///
/// Returns `ColorError::InvalidColor` if `background` is malformed.
pub fn readable_text_color(background: &str) -> Result<&'static str, ColorError> {
    let on_black = contrast_ratio(background, "#000000")?;
    let on_white = contrast_ratio(background, "#FFFFFF")?;
    Ok(if on_black >= on_white { "#000000" } else { "#FFFFFF" })
}

//! RGB color handling with hex parsing, HSV/HSL conversion and serialization.

// Allow small types passed by reference for API consistency
#![allow(clippy::trivially_copy_pass_by_ref)]
// Allow intentional type casts for color math
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Allow float comparisons in HSV conversion (standard algorithms)
#![allow(clippy::float_cmp)]

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ColorError;

/// RGB color value with hex string representation.
///
/// Represents a color using red, green, and blue channels (0-255 each).
/// Supports parsing from hex strings (#RRGGBB) and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RgbColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

/// Hue-Saturation-Value color.
///
/// Hue is in degrees `[0, 360)`, saturation and value are percentages `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    /// Hue in degrees
    pub h: f64,
    /// Saturation percentage
    pub s: f64,
    /// Value percentage
    pub v: f64,
}

/// Hue-Saturation-Lightness color.
///
/// Hue is in degrees `[0, 360)`, saturation and lightness are fractions `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees
    pub h: f64,
    /// Saturation fraction
    pub s: f64,
    /// Lightness fraction
    pub l: f64,
}

impl Hsv {
    /// Creates a new HSV value without range checks.
    #[must_use]
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self { h, s, v }
    }

    /// Returns a copy with the hue rotated by `degrees`, wrapped into `[0, 360)`.
    #[must_use]
    pub fn rotate(&self, degrees: f64) -> Self {
        Self {
            h: wrap_hue(self.h + degrees),
            ..*self
        }
    }
}

impl Hsl {
    /// Creates a new HSL value without range checks.
    #[must_use]
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }
}

/// Wraps a hue angle into `[0, 360)`.
#[must_use]
pub fn wrap_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Rounds and clamps a 0-255 float channel into a byte.
fn channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

impl RgbColor {
    /// Creates a new `RgbColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from float channels on the 0-255 scale, rounding and clamping each.
    #[must_use]
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        Self::new(channel(r), channel(g), channel(b))
    }

    /// Parses an `RgbColor` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#rrggbb", "rrggbb".
    /// Surrounding whitespace is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use palettekit::models::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#FF0000").unwrap();
    /// assert_eq!(color, RgbColor::new(255, 0, 0));
    ///
    /// let color = RgbColor::from_hex("00ff00").unwrap();
    /// assert_eq!(color, RgbColor::new(0, 255, 0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ColorError::InvalidColor` if the string is not 6 hex digits.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

        if digits.len() != 6 {
            return Err(ColorError::invalid(hex, "expected 6 hex digits (#RRGGBB)"));
        }

        // from_str_radix alone would accept a leading '+'
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::invalid(hex, "contains non-hex characters"));
        }

        let parse = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| ColorError::invalid(hex, format!("invalid {name} channel: {e}")))
        };

        Ok(Self::new(parse(0..2, "red")?, parse(2..4, "green")?, parse(4..6, "blue")?))
    }

    /// Converts the color to a hex string in the format "#RRGGBB" (uppercase).
    ///
    /// # Examples
    ///
    /// ```
    /// use palettekit::models::RgbColor;
    ///
    /// assert_eq!(RgbColor::new(0, 128, 255).to_hex(), "#0080FF");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Returns the channels normalized to `[0, 1]`.
    #[must_use]
    pub fn normalized(&self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    /// Converts the RGB color to HSV.
    ///
    /// Hue is 0 for achromatic colors; saturation is 0 for black and grays.
    ///
    /// # Examples
    ///
    /// ```
    /// use palettekit::models::RgbColor;
    ///
    /// let hsv = RgbColor::new(0, 255, 0).to_hsv();
    /// assert!((hsv.h - 120.0).abs() < 0.01);
    /// assert!((hsv.s - 100.0).abs() < 0.01);
    /// assert!((hsv.v - 100.0).abs() < 0.01);
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)] // Standard RGB/HSV color model uses single-char names
    pub fn to_hsv(&self) -> Hsv {
        let (r, g, b) = self.normalized();

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max == 0.0 { 0.0 } else { delta / max };

        let h = if delta == 0.0 {
            0.0 // Grayscale, hue is undefined
        } else if max == r {
            60.0 * ((g - b) / delta)
        } else if max == g {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };

        Hsv::new(wrap_hue(h), s * 100.0, max * 100.0)
    }

    /// Creates an `RgbColor` from HSV using the sector decomposition.
    ///
    /// Hue wraps modulo 360; saturation and value are clamped to `[0, 100]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use palettekit::models::{Hsv, RgbColor};
    ///
    /// assert_eq!(RgbColor::from_hsv(Hsv::new(240.0, 100.0, 100.0)), RgbColor::new(0, 0, 255));
    /// assert_eq!(RgbColor::from_hsv(Hsv::new(480.0, 100.0, 100.0)), RgbColor::new(0, 255, 0));
    /// ```
    #[must_use]
    #[allow(clippy::many_single_char_names)] // Standard RGB/HSV color model uses single-char names
    pub fn from_hsv(hsv: Hsv) -> Self {
        let h = wrap_hue(hsv.h);
        let s = hsv.s.clamp(0.0, 100.0) / 100.0;
        let v = hsv.v.clamp(0.0, 100.0) / 100.0;

        let sector = h / 60.0;
        let i = sector.floor();
        let f = sector - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match (i as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Self::from_f64(r * 255.0, g * 255.0, b * 255.0)
    }

    /// Converts the RGB color to HSL.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn to_hsl(&self) -> Hsl {
        let (r, g, b) = self.normalized();

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl::new(0.0, 0.0, l);
        }

        let delta = max - min;
        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };

        let h = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Hsl::new(wrap_hue(h * 60.0), s, l)
    }

    /// Creates an `RgbColor` from HSL. Saturation and lightness are clamped to `[0, 1]`.
    #[must_use]
    #[allow(clippy::many_single_char_names)]
    pub fn from_hsl(hsl: Hsl) -> Self {
        let h = wrap_hue(hsl.h) / 360.0;
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::from_f64(l * 255.0, l * 255.0, l * 255.0);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::from_f64(
            hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0,
            hue_to_channel(p, q, h) * 255.0,
            hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0,
        )
    }

    /// WCAG relative luminance in `[0, 1]`.
    #[must_use]
    pub fn relative_luminance(&self) -> f64 {
        let (r, g, b) = self.normalized();
        0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
    }
}

/// sRGB transfer function as used by WCAG 2.x.
fn linearize(c: f64) -> f64 {
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for RgbColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: RgbColor, b: RgbColor) {
        let diff = |x: u8, y: u8| (i16::from(x) - i16::from(y)).abs();
        assert!(
            diff(a.r, b.r) <= 1 && diff(a.g, b.g) <= 1 && diff(a.b, b.b) <= 1,
            "{a} and {b} differ by more than one step per channel"
        );
    }

    #[test]
    fn test_from_hex_valid() {
        assert_eq!(RgbColor::from_hex("#FF0000").unwrap(), RgbColor::new(255, 0, 0));
        assert_eq!(RgbColor::from_hex("00FF00").unwrap(), RgbColor::new(0, 255, 0));
        assert_eq!(RgbColor::from_hex("#0000ff").unwrap(), RgbColor::new(0, 0, 255));
        assert_eq!(RgbColor::from_hex("  #FFFFFF  ").unwrap(), RgbColor::new(255, 255, 255));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(RgbColor::from_hex("#FFF").is_err());
        assert!(RgbColor::from_hex("#FFFFFFF").is_err());
        assert!(RgbColor::from_hex("GGGGGG").is_err());
        assert!(RgbColor::from_hex("").is_err());
        assert!(RgbColor::from_hex("#").is_err());
        assert!(RgbColor::from_hex("#+1FFFF").is_err());
        // Multi-byte input with a byte length of 6 must not panic on slicing
        assert!(RgbColor::from_hex("ééé").is_err());
    }

    #[test]
    fn test_hex_roundtrip_exact() {
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(51) {
                for b in [0u8, 1, 127, 128, 254, 255] {
                    let color = RgbColor::new(r, g, b);
                    assert_eq!(RgbColor::from_hex(&color.to_hex()).unwrap(), color);
                }
            }
        }
    }

    #[test]
    fn test_from_f64_rounds_and_clamps() {
        assert_eq!(RgbColor::from_f64(-4.0, 127.5, 300.0), RgbColor::new(0, 128, 255));
    }

    #[test]
    fn test_rgb_to_hsv_primary_colors() {
        let hsv = RgbColor::new(255, 0, 0).to_hsv();
        assert!(hsv.h.abs() < 0.01);
        assert!((hsv.s - 100.0).abs() < 0.01);
        assert!((hsv.v - 100.0).abs() < 0.01);

        let hsv = RgbColor::new(0, 0, 255).to_hsv();
        assert!((hsv.h - 240.0).abs() < 0.01);
    }

    #[test]
    fn test_rgb_to_hsv_negative_hue_wraps() {
        // Red max with blue > green gives a negative raw hue
        let hsv = RgbColor::new(255, 0, 128).to_hsv();
        assert!(hsv.h > 300.0 && hsv.h < 360.0, "hue was {}", hsv.h);
    }

    #[test]
    fn test_rgb_to_hsv_grayscale() {
        let black = RgbColor::new(0, 0, 0).to_hsv();
        assert_eq!((black.h, black.s, black.v), (0.0, 0.0, 0.0));

        let gray = RgbColor::new(128, 128, 128).to_hsv();
        assert_eq!(gray.h, 0.0);
        assert_eq!(gray.s, 0.0);
        assert!((gray.v - 50.2).abs() < 0.01);
    }

    #[test]
    fn test_reference_orange() {
        let hsv = RgbColor::from_hex("#FF6B35").unwrap().to_hsv();
        assert!((hsv.h - 16.04).abs() < 0.1);
        assert!((hsv.s - 79.2).abs() < 0.1);
        assert!((hsv.v - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_hsv_to_rgb_sectors() {
        assert_eq!(RgbColor::from_hsv(Hsv::new(0.0, 100.0, 100.0)), RgbColor::new(255, 0, 0));
        assert_eq!(RgbColor::from_hsv(Hsv::new(60.0, 100.0, 100.0)), RgbColor::new(255, 255, 0));
        assert_eq!(RgbColor::from_hsv(Hsv::new(120.0, 100.0, 100.0)), RgbColor::new(0, 255, 0));
        assert_eq!(RgbColor::from_hsv(Hsv::new(180.0, 100.0, 100.0)), RgbColor::new(0, 255, 255));
        assert_eq!(RgbColor::from_hsv(Hsv::new(240.0, 100.0, 100.0)), RgbColor::new(0, 0, 255));
        assert_eq!(RgbColor::from_hsv(Hsv::new(300.0, 100.0, 100.0)), RgbColor::new(255, 0, 255));
        assert_eq!(RgbColor::from_hsv(Hsv::new(360.0, 100.0, 100.0)), RgbColor::new(255, 0, 0));
        assert_eq!(RgbColor::from_hsv(Hsv::new(-120.0, 100.0, 100.0)), RgbColor::new(0, 0, 255));
    }

    #[test]
    fn test_hsv_to_rgb_grayscale() {
        assert_eq!(RgbColor::from_hsv(Hsv::new(0.0, 0.0, 0.0)), RgbColor::new(0, 0, 0));
        assert_eq!(RgbColor::from_hsv(Hsv::new(0.0, 0.0, 100.0)), RgbColor::new(255, 255, 255));
        assert_eq!(RgbColor::from_hsv(Hsv::new(180.0, 0.0, 50.0)), RgbColor::new(128, 128, 128));
    }

    #[test]
    fn test_hsv_clamping() {
        assert_eq!(RgbColor::from_hsv(Hsv::new(0.0, 150.0, 150.0)), RgbColor::new(255, 0, 0));
        assert_eq!(RgbColor::from_hsv(Hsv::new(0.0, -5.0, -5.0)), RgbColor::new(0, 0, 0));
    }

    #[test]
    fn test_hsv_roundtrip() {
        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(15) {
                for b in (0..=255).step_by(15) {
                    let color = RgbColor::new(r, g, b);
                    assert_close(RgbColor::from_hsv(color.to_hsv()), color);
                }
            }
        }
    }

    #[test]
    fn test_hsv_grid_roundtrip() {
        for h in (0..360).step_by(7) {
            for s in (5..=100).step_by(5) {
                for v in (20..=100).step_by(5) {
                    let hsv = Hsv::new(f64::from(h), f64::from(s), f64::from(v));
                    let back = RgbColor::from_hsv(hsv).to_hsv();
                    // Hue sensitivity grows as saturation and value shrink, so
                    // only check it where the rgb grid is fine enough
                    if s >= 70 && v >= 70 {
                        let dh = (back.h - hsv.h).abs();
                        assert!(dh.min(360.0 - dh) <= 1.0, "hue {hsv:?} -> {back:?}");
                    }
                    if v >= 50 {
                        assert!((back.s - hsv.s).abs() <= 1.0, "sat {hsv:?} -> {back:?}");
                    }
                    assert!((back.v - hsv.v).abs() <= 1.0, "val {hsv:?} -> {back:?}");
                }
            }
        }
    }

    #[test]
    fn test_hsl_roundtrip() {
        for color in [
            RgbColor::new(255, 107, 53),
            RgbColor::new(6, 214, 160),
            RgbColor::new(17, 138, 178),
            RgbColor::new(200, 200, 200),
            RgbColor::new(0, 0, 0),
            RgbColor::new(255, 255, 255),
        ] {
            assert_close(RgbColor::from_hsl(color.to_hsl()), color);
        }
    }

    #[test]
    fn test_to_hsl_values() {
        let hsl = RgbColor::new(255, 0, 0).to_hsl();
        assert!(hsl.h.abs() < 0.01);
        assert!((hsl.s - 1.0).abs() < 0.001);
        assert!((hsl.l - 0.5).abs() < 0.001);

        let gray = RgbColor::new(51, 51, 51).to_hsl();
        assert_eq!(gray.s, 0.0);
        assert!((gray.l - 0.2).abs() < 0.001);
    }

    #[test]
    fn test_relative_luminance_bounds() {
        assert!(RgbColor::new(0, 0, 0).relative_luminance().abs() < 1e-9);
        assert!((RgbColor::new(255, 255, 255).relative_luminance() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_hue() {
        assert_eq!(wrap_hue(370.0), 10.0);
        assert_eq!(wrap_hue(-30.0), 330.0);
        assert_eq!(wrap_hue(360.0), 0.0);
        assert!(wrap_hue(-1e-20) < 360.0);
    }

    #[test]
    fn test_from_str() {
        let color: RgbColor = "#112233".parse().unwrap();
        assert_eq!(color, RgbColor::new(0x11, 0x22, 0x33));
    }
}

//! Assigns ranked clusters to the seven semantic color slots.
//!
//! Thresholds are heuristics on HSL saturation and lightness, tuned by eye on
//! photographs rather than derived from a color-science standard.

use super::Cluster;
use crate::models::ExtractedColorSet;

/// Minimum saturation of the main vibrant color.
pub const VIBRANT_MIN_SATURATION: f64 = 0.4;
/// Minimum saturation of the dark and light vibrant colors.
pub const VIBRANT_VARIANT_MIN_SATURATION: f64 = 0.3;
/// Maximum saturation of the main muted color.
pub const MUTED_MAX_SATURATION: f64 = 0.4;
/// Maximum saturation of the dark and light muted colors.
pub const MUTED_VARIANT_MAX_SATURATION: f64 = 0.35;
/// Lightness band `(min, max)` of the mid-tone slots.
pub const MID_LIGHTNESS: (f64, f64) = (0.25, 0.75);
/// Maximum lightness of the dark vibrant color.
pub const DARK_VIBRANT_MAX_LIGHTNESS: f64 = 0.45;
/// Minimum lightness of the light vibrant color.
pub const LIGHT_VIBRANT_MIN_LIGHTNESS: f64 = 0.55;
/// Maximum lightness of the dark muted color.
pub const DARK_MUTED_MAX_LIGHTNESS: f64 = 0.35;
/// Minimum lightness of the light muted color.
pub const LIGHT_MUTED_MIN_LIGHTNESS: f64 = 0.65;

fn mid_tone(c: &Cluster) -> bool {
    c.hsl.l > MID_LIGHTNESS.0 && c.hsl.l < MID_LIGHTNESS.1
}

/// Saturation weighted by the square root of frequency.
#[allow(clippy::cast_precision_loss)]
fn vibrancy(c: &Cluster) -> f64 {
    c.hsl.s * (c.count as f64).sqrt()
}

/// Picks the first cluster matching `predicate` whose color is not taken yet,
/// or else the first match at all, or else `fallback`. Records the pick.
fn assign<P>(order: &[&Cluster], assigned: &mut Vec<String>, fallback: &str, predicate: P) -> String
where
    P: Fn(&Cluster) -> bool,
{
    let mut first_match: Option<String> = None;
    let mut chosen = None;
    for cluster in order.iter().copied().filter(|c| predicate(*c)) {
        let hex = cluster.color.to_hex();
        if !assigned.contains(&hex) {
            chosen = Some(hex);
            break;
        }
        first_match.get_or_insert(hex);
    }

    let hex = chosen
        .or(first_match)
        .unwrap_or_else(|| fallback.to_string());
    assigned.push(hex.clone());
    hex
}

/// Classifies clusters already ranked by frequency (most frequent first).
///
/// Returns the default set for an empty slice.
#[must_use]
pub fn classify(ranked: &[Cluster]) -> ExtractedColorSet {
    let Some(first) = ranked.first() else {
        return ExtractedColorSet::defaults();
    };

    let by_frequency: Vec<&Cluster> = ranked.iter().collect();
    let mut by_vibrancy = by_frequency.clone();
    by_vibrancy.sort_by(|a, b| vibrancy(b).total_cmp(&vibrancy(a)));

    let dominant = first.color.to_hex();
    let mut assigned = vec![dominant.clone()];

    let vibrant = assign(&by_vibrancy, &mut assigned, &dominant, |c| {
        c.hsl.s > VIBRANT_MIN_SATURATION && mid_tone(c)
    });
    let dark_vibrant = assign(&by_vibrancy, &mut assigned, &vibrant, |c| {
        c.hsl.s > VIBRANT_VARIANT_MIN_SATURATION && c.hsl.l < DARK_VIBRANT_MAX_LIGHTNESS
    });
    let light_vibrant = assign(&by_vibrancy, &mut assigned, &vibrant, |c| {
        c.hsl.s > VIBRANT_VARIANT_MIN_SATURATION && c.hsl.l > LIGHT_VIBRANT_MIN_LIGHTNESS
    });
    let muted = assign(&by_frequency, &mut assigned, &dominant, |c| {
        c.hsl.s < MUTED_MAX_SATURATION && mid_tone(c)
    });
    let dark_muted = assign(&by_frequency, &mut assigned, &muted, |c| {
        c.hsl.s < MUTED_VARIANT_MAX_SATURATION && c.hsl.l < DARK_MUTED_MAX_LIGHTNESS
    });
    let light_muted = assign(&by_frequency, &mut assigned, &muted, |c| {
        c.hsl.s < MUTED_VARIANT_MAX_SATURATION && c.hsl.l > LIGHT_MUTED_MIN_LIGHTNESS
    });

    ExtractedColorSet {
        dominant,
        vibrant,
        dark_vibrant,
        light_vibrant,
        muted,
        dark_muted,
        light_muted,
    }
}

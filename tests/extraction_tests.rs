//! Integration tests for color extraction across both strategies.

use palettekit::color::is_valid_hex;
use palettekit::extract::{
    extract_colors_async, extract_colors_from_image, ExtractorKind, PixelBuffer, Quality,
};
use palettekit::models::ExtractedColorSet;

mod fixtures;
use fixtures::*;

const STRATEGIES: [ExtractorKind; 2] = [ExtractorKind::Bucket, ExtractorKind::KMeans];
const QUALITIES: [Quality; 3] = [Quality::Low, Quality::Medium, Quality::High];

/// Two horizontal bands: 3/4 slate gray on top, 1/4 saturated red below.
fn banded(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        let rgba = if y < height * 3 / 4 {
            [0x7A, 0x7F, 0x85, 255]
        } else {
            [0xE6, 0x39, 0x46, 255]
        };
        for _ in 0..width {
            data.extend_from_slice(&rgba);
        }
    }
    data
}

#[test]
fn test_transparent_buffer_falls_back_for_every_option() {
    let data = solid_rgba([120, 40, 200, 0], 32 * 32);
    for kind in STRATEGIES {
        for quality in QUALITIES {
            let colors = kind.build().extract(&PixelBuffer::new(&data, 32, 32), quality);
            assert_eq!(colors, ExtractedColorSet::defaults(), "{kind} {quality}");
        }
    }
}

#[test]
fn test_oversized_declaration_never_panics() {
    let data = [200u8, 40, 40, 255];
    for (width, height) in [(u32::MAX, u32::MAX), (40_000, 40_000), (u32::MAX, 1), (1, u32::MAX)] {
        let image = PixelBuffer::new(&data, width, height);
        for kind in STRATEGIES {
            for quality in QUALITIES {
                let colors = kind.build().extract(&image, quality);
                assert_eq!(colors.dominant, "#C82828", "{kind} {quality} {width}x{height}");
            }
        }
        assert_eq!(extract_colors_from_image(&image, Quality::High).dominant, "#C82828");
    }
}

#[test]
fn test_every_slot_is_valid_hex() {
    let data = banded(64, 64);
    for kind in STRATEGIES {
        for quality in QUALITIES {
            let colors = kind.build().extract(&PixelBuffer::new(&data, 64, 64), quality);
            for (slot, hex) in colors.slots() {
                assert!(is_valid_hex(hex), "{kind} {quality} {slot} = {hex}");
            }
        }
    }
}

#[test]
fn test_strategies_agree_on_banded_image() {
    // 40x40 stays below every working size, so no resampling blends the bands
    let data = banded(40, 40);
    for kind in STRATEGIES {
        let colors = kind.build().extract(&PixelBuffer::new(&data, 40, 40), Quality::Medium);
        assert_eq!(colors.dominant, "#7A7F85", "{kind}");
        assert_eq!(colors.vibrant, "#E63946", "{kind}");
    }
}

#[test]
fn test_portable_entry_point_matches_bucket_strategy() {
    let data = banded(20, 20);
    let image = PixelBuffer::new(&data, 20, 20);
    assert_eq!(
        extract_colors_from_image(&image, Quality::High),
        ExtractorKind::Bucket.build().extract(&image, Quality::High)
    );
}

#[tokio::test]
async fn test_async_extraction_from_png() {
    let temp_dir = temp_config_dir();
    let path = write_png(temp_dir.path(), "bands.png", 30, 30, banded(30, 30));

    let decoded = image::open(&path).unwrap().to_rgba8();
    let (width, height) = decoded.dimensions();
    let colors = extract_colors_async(
        decoded.into_raw(),
        width,
        height,
        Quality::Low,
        ExtractorKind::KMeans,
    )
    .await;
    assert_eq!(colors.dominant, "#7A7F85");
}

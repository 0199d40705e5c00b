//! K-means extraction in CIE Lab, backed by `image` and `kmeans_colors`.

use std::collections::HashMap;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use kmeans_colors::get_kmeans;
use palette::{IntoColor, Lab, Srgb};
use tracing::debug;

use super::{
    is_informative, working_size, Cluster, PixelBuffer, PixelExtractor, Quality,
    MAX_SAMPLED_PIXELS,
};
use crate::models::RgbColor;

/// Clusters pixels with k-means in Lab space.
///
/// Images with no more distinct colors than clusters skip k-means and use the
/// exact colors.
#[derive(Debug, Clone, Copy)]
pub struct KMeansExtractor {
    /// Cluster count override; `None` uses the quality default
    pub clusters: Option<usize>,
    /// Iteration cap per run
    pub max_iterations: usize,
    /// Convergence threshold on centroid movement
    pub convergence: f32,
    /// RNG seed, fixed so results are reproducible
    pub seed: u64,
}

impl Default for KMeansExtractor {
    fn default() -> Self {
        Self {
            clusters: None,
            max_iterations: 20,
            convergence: 1e-4,
            seed: 0,
        }
    }
}

impl KMeansExtractor {
    /// Copies the complete rows into an owned image and shrinks it to the
    /// working size.
    ///
    /// A buffer too short for even one row contributes its loose pixels as a
    /// single row. Nothing beyond the bytes actually present is allocated.
    fn working_image(image: &PixelBuffer<'_>, quality: Quality) -> Option<RgbaImage> {
        let rows = image.complete_rows();
        let (width, height) = if rows > 0 {
            (image.width, rows)
        } else {
            (u32::try_from(image.pixel_count()).ok()?, 1)
        };
        // width * height pixels are present in data, so this cannot overflow
        let len = width as usize * height as usize * 4;
        let raw = image.data.get(..len)?.to_vec();

        let full = RgbaImage::from_raw(width, height, raw)?;
        let (w, h) = working_size(width, height, quality);
        if (w, h) == (width, height) {
            Some(full)
        } else {
            Some(imageops::resize(&full, w, h, FilterType::Triangle))
        }
    }
}

impl PixelExtractor for KMeansExtractor {
    fn name(&self) -> &'static str {
        "kmeans"
    }

    fn clusters(&self, image: &PixelBuffer<'_>, quality: Quality) -> Vec<Cluster> {
        if image.pixel_count() == 0 {
            return Vec::new();
        }
        let Some(working) = Self::working_image(image, quality) else {
            return Vec::new();
        };

        let total = working.width() as usize * working.height() as usize;
        let step = total.div_ceil(MAX_SAMPLED_PIXELS).max(1);

        let mut distinct: HashMap<[u8; 3], usize> = HashMap::new();
        let mut samples: Vec<[u8; 3]> = Vec::new();
        for pixel in working.pixels().step_by(step) {
            if !is_informative(pixel.0) {
                continue;
            }
            let rgb = [pixel.0[0], pixel.0[1], pixel.0[2]];
            *distinct.entry(rgb).or_default() += 1;
            samples.push(rgb);
        }

        let k = self.clusters.unwrap_or_else(|| quality.cluster_count()).max(1);
        if distinct.len() <= k {
            // Too few colors for k-means++ seeding to be meaningful
            let mut exact: Vec<([u8; 3], usize)> = distinct.into_iter().collect();
            exact.sort_unstable();
            #[allow(clippy::cast_possible_truncation)]
            return exact
                .into_iter()
                .enumerate()
                .map(|(i, ([r, g, b], count))| Cluster::new(RgbColor::new(r, g, b), count, i as u32))
                .collect();
        }

        let lab_pixels: Vec<Lab> = samples
            .iter()
            .map(|&[r, g, b]| Srgb::<u8>::new(r, g, b).into_linear().into_color())
            .collect();
        let result = get_kmeans(
            k,
            self.max_iterations,
            self.convergence,
            false,
            &lab_pixels,
            self.seed,
        );
        debug!(k, samples = lab_pixels.len(), score = result.score, "k-means finished");

        let mut counts = vec![0usize; result.centroids.len()];
        for &index in &result.indices {
            if let Some(count) = counts.get_mut(usize::from(index)) {
                *count += 1;
            }
        }

        // Centroids that round to the same sRGB color are merged
        let mut merged: HashMap<RgbColor, (usize, u32)> = HashMap::new();
        for (i, (lab, count)) in result.centroids.iter().zip(counts).enumerate() {
            if count == 0 {
                continue;
            }
            let rgb_f32: Srgb<f32> = Srgb::from_linear((*lab).into_color());
            let rgb = rgb_f32.into_format::<u8>();
            let color = RgbColor::new(rgb.red, rgb.green, rgb.blue);
            #[allow(clippy::cast_possible_truncation)]
            let entry = merged.entry(color).or_insert((0, i as u32));
            entry.0 += count;
        }

        merged
            .into_iter()
            .map(|(color, (count, key))| Cluster::new(color, count, key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::is_valid_hex;
    use crate::models::ExtractedColorSet;

    fn gradient(width: u32, height: u32) -> Vec<u8> {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(40 + x * 8) as u8, (60 + y * 8) as u8, 120, 255]);
            }
        }
        data
    }

    #[test]
    fn test_transparent_gives_defaults() {
        let data = vec![0u8; 16 * 16 * 4];
        let colors = KMeansExtractor::default().extract(&PixelBuffer::new(&data, 16, 16), Quality::Medium);
        assert_eq!(colors, ExtractedColorSet::defaults());
    }

    #[test]
    fn test_solid_color_is_exact() {
        let data: Vec<u8> = [0x33, 0x66, 0xCC, 255].repeat(12 * 12);
        let colors = KMeansExtractor::default().extract(&PixelBuffer::new(&data, 12, 12), Quality::High);
        assert_eq!(colors.dominant, "#3366CC");
        assert_eq!(colors.vibrant, "#3366CC");
    }

    #[test]
    fn test_few_colors_keep_counts() {
        let mut data: Vec<u8> = [0x7A, 0x7F, 0x85, 255].repeat(70);
        data.extend([0xE6, 0x39, 0x46, 255].repeat(30));
        let extractor = KMeansExtractor::default();
        let clusters = extractor.clusters(&PixelBuffer::new(&data, 10, 10), Quality::Low);
        assert_eq!(clusters.len(), 2);

        let colors = extractor.extract(&PixelBuffer::new(&data, 10, 10), Quality::Low);
        assert_eq!(colors.dominant, "#7A7F85");
        assert_eq!(colors.vibrant, "#E63946");
    }

    #[test]
    fn test_gradient_runs_kmeans() {
        let data = gradient(20, 20);
        let extractor = KMeansExtractor {
            clusters: Some(5),
            ..KMeansExtractor::default()
        };
        let clusters = extractor.clusters(&PixelBuffer::new(&data, 20, 20), Quality::Medium);
        assert!(!clusters.is_empty());
        assert!(clusters.len() <= 5);
        let members: usize = clusters.iter().map(|c| c.count).sum();
        assert_eq!(members, 400);

        let colors = extractor.extract(&PixelBuffer::new(&data, 20, 20), Quality::Medium);
        for (name, hex) in colors.slots() {
            assert!(is_valid_hex(hex), "{name} = {hex}");
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let data = gradient(20, 20);
        let extractor = KMeansExtractor::default();
        let first = extractor.extract(&PixelBuffer::new(&data, 20, 20), Quality::Medium);
        let second = extractor.extract(&PixelBuffer::new(&data, 20, 20), Quality::Medium);
        assert_eq!(first, second);
    }

    #[test]
    fn test_oversized_declaration_uses_available_pixels() {
        let data = [200u8, 40, 40, 255];
        let extractor = KMeansExtractor::default();
        for (width, height) in [(u32::MAX, u32::MAX), (40_000, 40_000)] {
            let image = PixelBuffer::new(&data, width, height);
            let working = KMeansExtractor::working_image(&image, Quality::High).unwrap();
            assert_eq!(working.dimensions(), (1, 1));

            let colors = extractor.extract(&image, Quality::High);
            assert_eq!(colors.dominant, "#C82828", "{width}x{height}");
        }
    }

    #[test]
    fn test_short_buffer_keeps_complete_rows() {
        // Declared 10x10 with 3 full rows and a partial fourth
        let data: Vec<u8> = [0x33, 0x66, 0xCC, 255].repeat(35);
        let image = KMeansExtractor::working_image(&PixelBuffer::new(&data, 10, 10), Quality::High).unwrap();
        assert_eq!(image.dimensions(), (10, 3));
    }

    #[test]
    fn test_large_image_is_resized() {
        let data = gradient(20, 20);
        // Low quality caps the longest side at 50, so 20x20 stays as is
        let image = KMeansExtractor::working_image(&PixelBuffer::new(&data, 20, 20), Quality::Low).unwrap();
        assert_eq!(image.dimensions(), (20, 20));

        let big: Vec<u8> = [0x06, 0xD6, 0xA0, 255].repeat(300 * 150);
        let image = KMeansExtractor::working_image(&PixelBuffer::new(&big, 300, 150), Quality::Low).unwrap();
        assert_eq!(image.dimensions(), (50, 25));
    }
}

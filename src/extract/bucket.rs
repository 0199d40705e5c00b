//! Quantization-bucket extraction with no image-processing dependencies.

use std::collections::HashMap;

use super::{
    is_informative, working_size, Cluster, PixelBuffer, PixelExtractor, Quality,
    MAX_SAMPLED_PIXELS,
};
use crate::models::RgbColor;

/// Running channel sums for one bucket.
#[derive(Debug, Default, Clone, Copy)]
struct BucketSum {
    r: u64,
    g: u64,
    b: u64,
    count: usize,
}

impl BucketSum {
    fn add(&mut self, rgba: [u8; 4]) {
        self.r += u64::from(rgba[0]);
        self.g += u64::from(rgba[1]);
        self.b += u64::from(rgba[2]);
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean(&self) -> RgbColor {
        let n = self.count.max(1) as f64;
        RgbColor::from_f64(self.r as f64 / n, self.g as f64 / n, self.b as f64 / n)
    }
}

/// Packs the quantized channels into a single sortable key.
fn bucket_key(rgba: [u8; 4], width: u8) -> u32 {
    let q = |c: u8| u32::from(c / width);
    (q(rgba[0]) << 16) | (q(rgba[1]) << 8) | q(rgba[2])
}

/// Groups pixels into fixed-width RGB cubes and averages each cube.
///
/// The image is first reduced by nearest-neighbour sampling so the cost is
/// bounded by the quality setting, not the input size.
#[derive(Debug, Default, Clone, Copy)]
pub struct BucketExtractor;

impl PixelExtractor for BucketExtractor {
    fn name(&self) -> &'static str {
        "bucket"
    }

    fn clusters(&self, image: &PixelBuffer<'_>, quality: Quality) -> Vec<Cluster> {
        if image.pixel_count() == 0 {
            return Vec::new();
        }

        // Rows past the end of a short buffer hold nothing to sample
        let rows = image.occupied_rows();
        let (work_w, work_h) = working_size(image.width, rows, quality);
        let total = work_w as usize * work_h as usize;
        let step = total.div_ceil(MAX_SAMPLED_PIXELS).max(1);
        let width = quality.bucket_width();

        let mut buckets: HashMap<u32, BucketSum> = HashMap::new();
        for index in (0..total).step_by(step) {
            // Nearest-neighbour mapping back into the source image
            let tx = (index % work_w as usize) as u64;
            let ty = (index / work_w as usize) as u64;
            let sx = tx * u64::from(image.width) / u64::from(work_w);
            let sy = ty * u64::from(rows) / u64::from(work_h);

            #[allow(clippy::cast_possible_truncation)]
            let Some(rgba) = image.pixel(sx as u32, sy as u32) else {
                continue;
            };
            if !is_informative(rgba) {
                continue;
            }
            buckets.entry(bucket_key(rgba, width)).or_default().add(rgba);
        }

        buckets
            .into_iter()
            .map(|(key, sum)| Cluster::new(sum.mean(), sum.count, key))
            .collect()
    }
}

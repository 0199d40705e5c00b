//! Dominant-color extraction from raw RGBA pixel buffers.
//!
//! Extraction runs in two stages:
//!
//! 1. A [`PixelExtractor`] strategy turns the buffer into weighted color
//!    clusters. [`BucketExtractor`] is the portable implementation
//!    (nearest-neighbour downscale plus per-channel quantization);
//!    [`KMeansExtractor`] resizes with the `image` crate and clusters in CIE
//!    Lab with `kmeans_colors`.
//! 2. The shared classifier in [`classify`] assigns clusters to the seven
//!    semantic slots of an [`ExtractedColorSet`].
//!
//! Extraction never fails. An image without usable pixels yields
//! [`ExtractedColorSet::defaults`] and a `warn` log entry.

pub mod bucket;
pub mod classify;
pub mod kmeans;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::models::{ExtractedColorSet, Hsl, RgbColor};

pub use bucket::BucketExtractor;
pub use classify::classify;
pub use kmeans::KMeansExtractor;

/// Pixels with lower alpha are treated as transparent.
pub const MIN_ALPHA: u8 = 125;
/// Pixels with a darker channel average are treated as background.
pub const MIN_BRIGHTNESS: u32 = 20;
/// Pixels with a brighter channel average are treated as background.
pub const MAX_BRIGHTNESS: u32 = 235;
/// Working buffers above this many pixels are subsampled.
pub const MAX_SAMPLED_PIXELS: usize = 40_000;

/// Borrowed RGBA8 image, row-major.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    /// Raw RGBA bytes
    pub data: &'a [u8],
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// Wraps a raw RGBA buffer. The length is not checked here.
    #[must_use]
    pub const fn new(data: &'a [u8], width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Number of complete pixels actually present, capped at `width * height`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn pixel_count(&self) -> usize {
        let declared = u64::from(self.width) * u64::from(self.height);
        let present = (self.data.len() / 4) as u64;
        // Bounded by data.len(), so it fits in usize
        declared.min(present) as usize
    }

    /// Rows holding every one of their `width` pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn complete_rows(&self) -> u32 {
        if self.width == 0 {
            return 0;
        }
        let rows = (self.data.len() / 4) / self.width as usize;
        rows.min(self.height as usize) as u32
    }

    /// Rows holding at least one complete pixel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn occupied_rows(&self) -> u32 {
        if self.width == 0 {
            return 0;
        }
        // pixel_count <= width * height, so the quotient is at most height
        self.pixel_count().div_ceil(self.width as usize) as u32
    }

    /// RGBA of the pixel at `(x, y)`, or `None` outside the declared bounds
    /// or past the end of a short buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?
            .checked_mul(4)?;
        self.data
            .get(index..index.checked_add(4)?)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Extraction quality, trading speed for detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// 50 px working size, coarse buckets
    Low,
    /// 100 px working size
    #[default]
    Medium,
    /// 200 px working size, fine buckets
    High,
}

impl Quality {
    /// Longest side of the working image.
    #[must_use]
    pub const fn max_dimension(&self) -> u32 {
        match self {
            Self::Low => 50,
            Self::Medium => 100,
            Self::High => 200,
        }
    }

    /// Width of one quantization bucket per channel.
    #[must_use]
    pub const fn bucket_width(&self) -> u8 {
        match self {
            Self::Low => 32,
            Self::Medium => 24,
            Self::High => 16,
        }
    }

    /// Number of k-means clusters.
    #[must_use]
    pub const fn cluster_count(&self) -> usize {
        match self {
            Self::Low => 6,
            Self::Medium => 8,
            Self::High => 12,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "Unknown quality '{other}'. Expected low, medium or high"
            )),
        }
    }
}

/// One group of similar pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    /// Mean color of the member pixels
    pub color: RgbColor,
    /// Number of member pixels
    pub count: usize,
    /// HSL of `color`
    pub hsl: Hsl,
    /// Stable tie-breaker (bucket key or centroid index)
    pub key: u32,
}

impl Cluster {
    /// Creates a cluster, computing HSL from the color.
    #[must_use]
    pub fn new(color: RgbColor, count: usize, key: u32) -> Self {
        Self {
            color,
            count,
            hsl: color.to_hsl(),
            key,
        }
    }
}

/// Sorts clusters by member count, largest first.
pub fn rank_by_frequency(clusters: &mut [Cluster]) {
    clusters.sort_by(|a, b| b.count.cmp(&a.count).then(a.key.cmp(&b.key)));
}

/// Returns true if the pixel carries color information worth clustering.
#[must_use]
pub fn is_informative(rgba: [u8; 4]) -> bool {
    if rgba[3] < MIN_ALPHA {
        return false;
    }
    let brightness = (u32::from(rgba[0]) + u32::from(rgba[1]) + u32::from(rgba[2])) / 3;
    (MIN_BRIGHTNESS..=MAX_BRIGHTNESS).contains(&brightness)
}

/// Working size for an image: longest side capped at the quality maximum.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn working_size(width: u32, height: u32, quality: Quality) -> (u32, u32) {
    let max_dim = quality.max_dimension();
    let longest = width.max(height);
    if longest <= max_dim || longest == 0 {
        return (width, height);
    }

    let scale = f64::from(max_dim) / f64::from(longest);
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Strategy turning a pixel buffer into weighted color clusters.
pub trait PixelExtractor: Send + Sync {
    /// Short identifier for logs and CLI output.
    fn name(&self) -> &'static str;

    /// Clusters the informative pixels of `image`, in any order.
    fn clusters(&self, image: &PixelBuffer<'_>, quality: Quality) -> Vec<Cluster>;

    /// Runs the full pipeline, falling back to the default set.
    fn extract(&self, image: &PixelBuffer<'_>, quality: Quality) -> ExtractedColorSet {
        let mut clusters = self.clusters(image, quality);
        if clusters.is_empty() {
            warn!(
                strategy = self.name(),
                width = image.width,
                height = image.height,
                "No usable pixels found, returning default colors"
            );
            return ExtractedColorSet::defaults();
        }

        rank_by_frequency(&mut clusters);
        debug!(
            strategy = self.name(),
            clusters = clusters.len(),
            dominant = %clusters[0].color,
            "Classifying extracted clusters"
        );
        classify(&clusters)
    }
}

/// Selects the extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// Portable quantization buckets
    #[default]
    Bucket,
    /// `image` resize plus k-means in Lab
    KMeans,
}

impl ExtractorKind {
    /// Instantiates the selected strategy.
    #[must_use]
    pub fn build(&self) -> Box<dyn PixelExtractor> {
        match self {
            Self::Bucket => Box::new(BucketExtractor),
            Self::KMeans => Box::new(KMeansExtractor::default()),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bucket => write!(f, "bucket"),
            Self::KMeans => write!(f, "kmeans"),
        }
    }
}

impl FromStr for ExtractorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bucket" => Ok(Self::Bucket),
            "kmeans" | "k-means" => Ok(Self::KMeans),
            other => Err(format!(
                "Unknown extraction strategy '{other}'. Expected bucket or kmeans"
            )),
        }
    }
}

/// Extracts the semantic color set with the portable strategy.
///
/// # Examples
///
/// ```
/// use palettekit::extract::{extract_colors_from_image, PixelBuffer, Quality};
/// use palettekit::models::ExtractedColorSet;
///
/// let transparent = vec![0u8; 4 * 4 * 4];
/// let colors = extract_colors_from_image(&PixelBuffer::new(&transparent, 4, 4), Quality::Low);
/// assert_eq!(colors, ExtractedColorSet::defaults());
/// ```
#[must_use]
pub fn extract_colors_from_image(image: &PixelBuffer<'_>, quality: Quality) -> ExtractedColorSet {
    BucketExtractor.extract(image, quality)
}

/// Runs extraction on the blocking thread pool so async callers stay responsive.
pub async fn extract_colors_async(
    data: Vec<u8>,
    width: u32,
    height: u32,
    quality: Quality,
    kind: ExtractorKind,
) -> ExtractedColorSet {
    let result = tokio::task::spawn_blocking(move || {
        kind.build()
            .extract(&PixelBuffer::new(&data, width, height), quality)
    })
    .await;

    match result {
        Ok(colors) => colors,
        Err(err) => {
            warn!("Extraction worker failed: {err}");
            ExtractedColorSet::defaults()
        }
    }
}

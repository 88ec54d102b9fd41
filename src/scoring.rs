//! Color profile scoring.
//!
//! The image is sampled on a regular grid whose stride is `2^efficiency`.
//! Each sample's RGB color is compared to the closest profile color, and the
//! mean distance is normalized against the RGB-cube diagonal:
//!
//! `score = 1 - mean_distance / MAX_DISTANCE`
//!
//! Alpha is ignored when scoring.

use image::{Pixel, RgbaImage};
use tracing::debug;

use crate::color::{ColorProfile, MAX_DISTANCE};
use crate::error::{Error, Result};

/// Sample coordinates `(row, col)` visited when scoring an image.
///
/// The row advances by `stride`; once it leaves the image it wraps back to
/// the first row and the column advances by `stride`. Iteration ends when
/// the column leaves the image.
#[derive(Debug, Clone)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    stride: u32,
    row: u32,
    col: u32,
}

impl SampleGrid {
    /// Create the sample grid for a `width x height` image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEfficiency`] if `2^efficiency` does not fit in a `u32`.
    pub fn new(width: u32, height: u32, efficiency: u32) -> Result<Self> {
        Ok(Self::with_stride(width, height, stride_for(efficiency)?))
    }

    /// Create the sample grid with an explicit stride. A zero stride is treated as 1.
    #[must_use]
    pub fn with_stride(width: u32, height: u32, stride: u32) -> Self {
        Self {
            width,
            height,
            stride: stride.max(1),
            row: 0,
            col: 0,
        }
    }

    /// Distance between neighbouring samples along each axis.
    #[must_use]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Total number of samples a fresh grid yields.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        u64::from(self.height.div_ceil(self.stride)) * u64::from(self.width.div_ceil(self.stride))
    }
}

impl Iterator for SampleGrid {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.col >= self.width || self.height == 0 {
            return None;
        }

        let sample = (self.row, self.col);
        self.row = self.row.saturating_add(self.stride);
        if self.row >= self.height {
            self.row = 0;
            self.col = self.col.saturating_add(self.stride);
        }
        Some(sample)
    }
}

/// Sampling stride for an efficiency level: `2^efficiency`.
///
/// # Errors
///
/// Returns [`Error::InvalidEfficiency`] if the stride overflows a `u32`.
pub fn stride_for(efficiency: u32) -> Result<u32> {
    1u32.checked_shl(efficiency)
        .ok_or(Error::InvalidEfficiency(efficiency))
}

/// Outcome of scoring an image against a color profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScore {
    /// Normalized closeness to the profile, `1.0` being a perfect match.
    pub score: f64,
    /// Mean distance from the sampled colors to the profile.
    pub mean_distance: f64,
    /// Number of pixels sampled.
    pub samples: u64,
}

/// Rate how closely the colors of `image` match `profile`.
///
/// `efficiency` controls sampling density: `0` samples every pixel, and each
/// increment halves the density along both axes. An image with no pixels
/// scores `1.0`.
///
/// # Errors
///
/// Returns [`Error::InvalidEfficiency`] if `2^efficiency` does not fit in a `u32`.
pub fn rate_color_profile(
    image: &RgbaImage,
    profile: &ColorProfile,
    efficiency: u32,
) -> Result<ColorScore> {
    let stride = stride_for(efficiency)?;
    debug!(efficiency, stride, "sampling stride");
    Ok(rate_with_stride(image, profile, stride))
}

/// Rate `image` against `profile`, sampling every `stride`-th pixel on each axis.
#[must_use]
pub fn rate_with_stride(image: &RgbaImage, profile: &ColorProfile, stride: u32) -> ColorScore {
    let grid = SampleGrid::with_stride(image.width(), image.height(), stride);

    let mut mean_distance = 0.0_f64;
    let mut samples = 0u64;
    for (row, col) in grid {
        let distance = profile.distance(image.get_pixel(col, row).to_rgb());
        samples += 1;
        // Running mean
        #[allow(clippy::cast_precision_loss)]
        {
            mean_distance += (distance - mean_distance) / samples as f64;
        }
    }

    let score = 1.0 - mean_distance / MAX_DISTANCE;
    debug!(
        stride,
        samples,
        mean_distance,
        score,
        "rated color profile"
    );

    ColorScore {
        score,
        mean_distance,
        samples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn white_profile() -> ColorProfile {
        ColorProfile::new(vec![Rgb([255, 255, 255])]).unwrap()
    }

    #[test]
    fn stride_doubles_per_efficiency_level() {
        assert_eq!(stride_for(0).unwrap(), 1);
        assert_eq!(stride_for(1).unwrap(), 2);
        assert_eq!(stride_for(3).unwrap(), 8);
        assert_eq!(stride_for(31).unwrap(), 1 << 31);
    }

    #[test]
    fn oversized_efficiency_is_rejected() {
        assert!(matches!(stride_for(32), Err(Error::InvalidEfficiency(32))));
        let img = RgbaImage::new(4, 4);
        assert!(matches!(
            rate_color_profile(&img, &white_profile(), 40),
            Err(Error::InvalidEfficiency(40))
        ));
    }

    #[test]
    fn dense_grid_visits_rows_then_advances_column() {
        let coords: Vec<_> = SampleGrid::new(2, 3, 0).unwrap().collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn sample_count_quarters_per_efficiency_level() {
        let counts: Vec<u64> = (0..4)
            .map(|e| SampleGrid::new(512, 512, e).unwrap().count() as u64)
            .collect();
        assert_eq!(counts, vec![262_144, 65_536, 16_384, 4_096]);

        for e in 0..4 {
            let grid = SampleGrid::new(512, 512, e).unwrap();
            assert_eq!(grid.sample_count(), counts[e as usize]);
        }
    }

    #[test]
    fn sparser_grid_preserves_traversal_order() {
        let dense: Vec<_> = SampleGrid::new(16, 16, 0).unwrap().collect();
        let sparse: Vec<_> = SampleGrid::new(16, 16, 1).unwrap().collect();

        let filtered: Vec<_> = dense
            .into_iter()
            .filter(|&(r, c)| r % 2 == 0 && c % 2 == 0)
            .collect();
        assert_eq!(filtered, sparse);
    }

    #[test]
    fn explicit_stride_matches_efficiency() {
        let from_efficiency: Vec<_> = SampleGrid::new(9, 7, 2).unwrap().collect();
        let from_stride: Vec<_> = SampleGrid::with_stride(9, 7, 4).collect();
        assert_eq!(from_efficiency, from_stride);
        assert_eq!(SampleGrid::with_stride(3, 3, 0).count(), 9);

        let img = RgbaImage::from_pixel(16, 16, WHITE);
        let by_stride = rate_with_stride(&img, &white_profile(), 4);
        let by_efficiency = rate_color_profile(&img, &white_profile(), 2).unwrap();
        assert_eq!(by_stride, by_efficiency);
        assert_eq!(by_stride.samples, 16);
    }

    #[test]
    fn wraps_on_actual_side_length() {
        let coords: Vec<_> = SampleGrid::new(5, 5, 1).unwrap().collect();
        assert_eq!(coords.len(), 9);
        assert!(coords.iter().all(|&(r, c)| r < 5 && c < 5));
        assert_eq!(SampleGrid::new(5, 5, 1).unwrap().sample_count(), 9);
    }

    #[test]
    fn rectangular_images_stay_in_bounds() {
        let img = RgbaImage::from_pixel(6, 3, WHITE);
        let result = rate_color_profile(&img, &white_profile(), 1).unwrap();
        assert_eq!(result.samples, 6);
        assert!((result.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_image_scores_one() {
        let img = RgbaImage::new(0, 0);
        let result = rate_color_profile(&img, &white_profile(), 0).unwrap();
        assert_eq!(result.samples, 0);
        assert!((result.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn matching_image_scores_one() {
        let img = RgbaImage::from_pixel(64, 64, WHITE);
        let result = rate_color_profile(&img, &white_profile(), 0).unwrap();
        assert!((result.score - 1.0).abs() < 1e-9, "got {}", result.score);
        assert!(result.mean_distance.abs() < 1e-9);
    }

    #[test]
    fn opposite_image_scores_zero() {
        let profile = ColorProfile::new(vec![Rgb([255, 0, 0])]).unwrap();
        let img = RgbaImage::from_pixel(64, 64, Rgba([0, 255, 255, 255]));
        let result = rate_color_profile(&img, &profile, 0).unwrap();
        assert!(result.score.abs() < 1e-9, "got {}", result.score);
    }

    #[test]
    fn alpha_is_ignored() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 0]));
        let result = rate_color_profile(&img, &white_profile(), 0).unwrap();
        assert!((result.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn half_matching_image_scores_half() {
        let img = RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                WHITE
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        let result = rate_color_profile(&img, &white_profile(), 0).unwrap();
        assert!((result.score - 0.5).abs() < 1e-9, "got {}", result.score);
    }

    #[test]
    fn sparse_score_matches_dense_on_uniform_image() {
        let img = RgbaImage::from_pixel(128, 128, Rgba([200, 100, 50, 255]));
        let profile = ColorProfile::happy();
        let dense = rate_color_profile(&img, &profile, 0).unwrap();
        let mut previous = dense;
        for efficiency in 1..5 {
            let sparse = rate_color_profile(&img, &profile, efficiency).unwrap();
            assert!(
                (sparse.score - dense.score).abs() < 1e-9,
                "efficiency {efficiency}: {} vs {}",
                sparse.score,
                dense.score
            );
            assert_eq!(sparse.samples * 4, previous.samples);
            previous = sparse;
        }
    }
}

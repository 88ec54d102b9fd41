//! Badge validation pipeline.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbaImage};
use tracing::{debug, info};

use crate::color::ColorProfile;
use crate::error::{Error, Result};
use crate::mask;
use crate::scoring::{self, ColorScore};

/// Default badge side length in pixels.
pub const DEFAULT_BADGE_SIZE: u32 = 512;

/// Default minimum color score.
pub const DEFAULT_MIN_SCORE: f64 = 0.6;

/// Default sampling efficiency (every 2nd pixel along each axis).
pub const DEFAULT_EFFICIENCY: u32 = 1;

/// Default badge location used by the command-line tool.
pub const DEFAULT_BADGE_PATH: &str = "res/img/badge.png";

/// The individual checks run by [`BadgeValidator`], in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Square image of the configured size with an alpha channel.
    Dimensions,
    /// Everything outside the inscribed circle is transparent.
    Circle,
    /// Colors are close enough to the reference palette.
    Color,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Check::Dimensions => "dimensions",
            Check::Circle => "circle",
            Check::Color => "color",
        })
    }
}

/// Options controlling badge validation.
#[derive(Debug, Clone)]
pub struct BadgeConfig {
    /// Required width and height in pixels.
    pub size: u32,
    /// Minimum color score for the badge to pass.
    pub min_score: f64,
    /// Reference palette the badge colors are compared to.
    pub profile: ColorProfile,
    /// Sampling efficiency; the stride is `2^efficiency`.
    pub efficiency: u32,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_BADGE_SIZE,
            min_score: DEFAULT_MIN_SCORE,
            profile: ColorProfile::happy(),
            efficiency: DEFAULT_EFFICIENCY,
        }
    }
}

/// Result of validating a single badge.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether every check passed.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
    /// The check that failed, if any.
    pub failed_check: Option<Check>,
    /// Color score, when the color check was reached.
    pub score: Option<f64>,
}

impl ValidationResult {
    fn pass(score: f64) -> Self {
        Self {
            success: true,
            message: format!("Badge is valid (color score {score:.3})"),
            failed_check: None,
            score: Some(score),
        }
    }

    fn fail(check: Check, message: String) -> Self {
        Self {
            success: false,
            message,
            failed_check: Some(check),
            score: None,
        }
    }
}

/// Outcome of validating one file during a batch run.
#[derive(Debug)]
pub struct FileReport {
    /// Path of the validated file.
    pub path: PathBuf,
    /// The validation result, or the error that prevented validation.
    pub outcome: Result<ValidationResult>,
}

impl FileReport {
    /// Whether the file was read and passed every check.
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(&self.outcome, Ok(result) if result.success)
    }
}

/// Validates badges against a fixed [`BadgeConfig`].
///
/// Create once with [`BadgeValidator::new()`] and reuse for multiple images.
/// Validation never mutates the validator, so it can be shared across threads.
#[derive(Debug, Clone)]
pub struct BadgeValidator {
    config: BadgeConfig,
    stride: u32,
}

impl Default for BadgeValidator {
    fn default() -> Self {
        Self {
            config: BadgeConfig::default(),
            stride: 1 << DEFAULT_EFFICIENCY,
        }
    }
}

impl BadgeValidator {
    /// Create a validator after checking the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBadgeSize`] for a zero size,
    /// [`Error::InvalidThreshold`] for a minimum score outside `0.0..=1.0` and
    /// [`Error::InvalidEfficiency`] if the sampling stride overflows.
    pub fn new(config: BadgeConfig) -> Result<Self> {
        if config.size == 0 {
            return Err(Error::InvalidBadgeSize(config.size));
        }
        if !(0.0..=1.0).contains(&config.min_score) {
            return Err(Error::InvalidThreshold(config.min_score));
        }
        let stride = scoring::stride_for(config.efficiency)?;

        Ok(Self { config, stride })
    }

    /// The configuration this validator checks against.
    #[must_use]
    pub fn config(&self) -> &BadgeConfig {
        &self.config
    }

    /// Validate a decoded image.
    ///
    /// The image must carry four channels including alpha; 16-bit and float
    /// RGBA images are converted to 8 bits per channel before the remaining
    /// checks run.
    #[must_use]
    pub fn validate(&self, image: &DynamicImage) -> ValidationResult {
        let color = image.color();
        if color.channel_count() != 4 || !color.has_alpha() {
            return self.size_failure(image.width(), image.height(), color.channel_count());
        }

        let rgba: Cow<'_, RgbaImage> = match image.as_rgba8() {
            Some(rgba) => Cow::Borrowed(rgba),
            None => Cow::Owned(image.to_rgba8()),
        };
        self.validate_rgba(&rgba)
    }

    /// Validate an 8-bit RGBA image.
    ///
    /// Runs the dimension, circle and color checks in order, stopping at the
    /// first failure.
    #[must_use]
    pub fn validate_rgba(&self, image: &RgbaImage) -> ValidationResult {
        let size = self.config.size;
        let (width, height) = image.dimensions();
        if width != size || height != size {
            return self.size_failure(width, height, 4);
        }

        if let Some((x, y)) = mask::first_opaque_outside_circle(image) {
            debug!(x, y, "opaque pixel outside badge circle");
            return ValidationResult::fail(
                Check::Circle,
                format!(
                    "There are non-transparent pixels outside of the badge circle (first at x={x}, y={y})"
                ),
            );
        }

        let ColorScore { score, .. } = self.color_score(image);

        if score < self.config.min_score {
            let mut result = ValidationResult::fail(
                Check::Color,
                format!(
                    "Color profile not \"happy\" enough (score {score:.3}, minimum {:.3})",
                    self.config.min_score
                ),
            );
            result.score = Some(score);
            return result;
        }

        ValidationResult::pass(score)
    }

    /// Score `image` against the configured palette and efficiency.
    #[must_use]
    pub fn color_score(&self, image: &RgbaImage) -> ColorScore {
        scoring::rate_with_stride(image, &self.config.profile, self.stride)
    }

    fn size_failure(&self, width: u32, height: u32, channels: u8) -> ValidationResult {
        let size = self.config.size;
        ValidationResult::fail(
            Check::Dimensions,
            format!(
                "Image must be {size}x{size} with an alpha channel (RGBA), \
                 got {width}x{height} with {channels} channel(s)"
            ),
        )
    }

    /// Load and validate a badge file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded. A badge that
    /// decodes but fails validation is reported through the returned
    /// [`ValidationResult`].
    pub fn validate_file(&self, path: &Path) -> Result<ValidationResult> {
        let image = image::open(path)?;
        let result = self.validate(&image);

        if result.success {
            info!(path = %path.display(), score = ?result.score, "badge passed");
        } else {
            info!(
                path = %path.display(),
                check = ?result.failed_check,
                "badge failed: {}",
                result.message
            );
        }
        Ok(result)
    }

    /// Validate every supported image in a directory.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    /// Files are reported in path order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be read.
    pub fn validate_directory(&self, dir: &Path) -> Result<Vec<FileReport>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_ok_and(|ft| ft.is_file()))
            .map(|e| e.path())
            .filter(|p| is_supported_image(p))
            .collect();
        paths.sort();

        Ok(self.validate_files(&paths))
    }

    /// Validate a list of files, one [`FileReport`] per path in the same order.
    ///
    /// Paths are not filtered by extension; whatever `image` can decode is checked.
    #[must_use]
    pub fn validate_files(&self, paths: &[PathBuf]) -> Vec<FileReport> {
        let report = |path: &PathBuf| FileReport {
            path: path.clone(),
            outcome: self.validate_file(path),
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            paths.par_iter().map(report).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            paths.iter().map(report).collect()
        }
    }
}

/// Check if a file has an image extension that can carry an alpha channel.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "png" | "webp" | "tif" | "tiff" | "bmp" | "gif" | "tga" | "ico" | "qoi"
        ),
        None => false,
    }
}

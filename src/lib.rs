//! Validate circular badge images.
//!
//! A badge passes when it is a square RGBA image of the configured size
//! (512x512 by default), every pixel outside the inscribed circle is fully
//! transparent, and its colors are close enough to a "happy" reference
//! palette.
//!
//! # Quick Start
//!
//! ```no_run
//! use badge_check::BadgeValidator;
//!
//! let validator = BadgeValidator::default();
//! let img = image::open("badge.png").unwrap();
//! let result = validator.validate(&img);
//! println!("{}", result.message);
//! ```
//!
//! # Configuration
//!
//! The size, minimum color score, reference palette and sampling efficiency
//! are set through [`BadgeConfig`]. Higher efficiency samples fewer pixels
//! when scoring colors.
//!
//! ```no_run
//! use badge_check::{BadgeConfig, BadgeValidator, ColorProfile};
//!
//! let profile: ColorProfile = "#6d071a;#ffffff;40,150,180".parse().unwrap();
//! let validator = BadgeValidator::new(BadgeConfig {
//!     min_score: 0.7,
//!     profile,
//!     ..BadgeConfig::default()
//! })
//! .expect("invalid configuration");
//! let result = validator.validate_file("badge.png".as_ref()).unwrap();
//! assert!(result.success, "{}", result.message);
//! ```

#![deny(missing_docs)]

pub mod color;
pub mod error;
pub mod mask;
pub mod scoring;
mod validator;

pub use color::{ColorProfile, HAPPY_PALETTE, MAX_DISTANCE};
pub use error::{Error, Result};
pub use scoring::ColorScore;
pub use validator::{
    is_supported_image, BadgeConfig, BadgeValidator, Check, FileReport, ValidationResult,
    DEFAULT_BADGE_PATH, DEFAULT_BADGE_SIZE, DEFAULT_EFFICIENCY, DEFAULT_MIN_SCORE,
};

//! Error types for the badge-check crate.
//!
//! A badge that fails validation is not an error: it is reported through
//! [`ValidationResult`](crate::ValidationResult). These variants cover
//! misconfiguration and unreadable input.

/// Errors that can occur while configuring the validator or reading badges.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The sampling efficiency yields a stride that does not fit in `u32`.
    #[error("invalid sampling efficiency {0}: stride 2^{0} overflows (must be < 32)")]
    InvalidEfficiency(u32),

    /// A color profile must contain at least one color.
    #[error("color profile is empty")]
    EmptyProfile,

    /// A color profile entry has the wrong number of components or values out of range.
    #[error("malformed color profile entry `{entry}`: {reason}")]
    MalformedColor {
        /// The offending entry as written.
        entry: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The configured badge side length is unusable.
    #[error("invalid badge size {0}: must be greater than zero")]
    InvalidBadgeSize(u32),

    /// The minimum color score is outside `0.0..=1.0`.
    #[error("invalid minimum color score {0}: must be between 0.0 and 1.0")]
    InvalidThreshold(f64),

    /// An I/O error occurred while reading files or directories.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image could not be decoded.
    #[error("image decoding error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

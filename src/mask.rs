//! Circular transparency mask.
//!
//! A badge is a disc: every pixel farther from the image center than the
//! badge radius must be fully transparent. The radius is `(size + 2) / 2`,
//! one pixel beyond the half-size, so anti-aliased edges are not flagged.

use image::RgbaImage;

/// Center and squared radius of the circle inscribed in a `width x height` image.
///
/// Returns `(center_x, center_y, radius_squared)`. For non-square images the
/// radius follows the shorter side.
#[must_use]
pub fn circle_geometry(width: u32, height: u32) -> (f64, f64, f64) {
    let size = f64::from(width.min(height));
    let center_x = (f64::from(width) - 1.0) / 2.0;
    let center_y = (f64::from(height) - 1.0) / 2.0;
    let radius = f64::midpoint(size, 2.0);
    (center_x, center_y, radius * radius)
}

/// Position `(x, y)` of the first pixel outside the circle with non-zero alpha.
///
/// Pixels are scanned in row-major order. Returns `None` when everything
/// outside the circle is fully transparent.
#[must_use]
pub fn first_opaque_outside_circle(image: &RgbaImage) -> Option<(u32, u32)> {
    let (center_x, center_y, radius_sq) = circle_geometry(image.width(), image.height());

    image
        .enumerate_pixels()
        .find(|&(x, y, px)| {
            let dx = f64::from(x) - center_x;
            let dy = f64::from(y) - center_y;
            dx * dx + dy * dy > radius_sq && px[3] != 0
        })
        .map(|(x, y, _)| (x, y))
}

/// Check that only pixels inside the centered circle may be non-transparent.
#[must_use]
pub fn is_transparent_outside_circle(image: &RgbaImage) -> bool {
    first_opaque_outside_circle(image).is_none()
}

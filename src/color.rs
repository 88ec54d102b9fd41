//! Color distance math and reference palettes.
//!
//! Distances are Euclidean in RGB space, so the largest possible distance is
//! the diagonal of the RGB cube, [`MAX_DISTANCE`].

use std::fmt;
use std::str::FromStr;

use image::Rgb;

use crate::error::{Error, Result};

/// Diagonal of the RGB cube: `sqrt(3 * 255^2)`.
pub const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

/// The historical "happy" badge palette.
///
/// Bordeaux red, sunny yellow, sky blue, white, grass green and orange.
pub const HAPPY_PALETTE: [Rgb<u8>; 6] = [
    Rgb([109, 7, 26]),    // bordeaux
    Rgb([255, 221, 51]),  // sunny yellow
    Rgb([135, 206, 235]), // sky blue
    Rgb([255, 255, 255]), // white
    Rgb([86, 176, 60]),   // grass green
    Rgb([255, 140, 0]),   // orange
];

/// Euclidean distance between two RGB colors.
#[must_use]
pub fn color_distance(a: Rgb<u8>, b: Rgb<u8>) -> f64 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&ca, &cb)| {
            let d = f64::from(ca) - f64::from(cb);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Smallest distance from `color` to any entry of `palette`, never above `cap`.
///
/// Pass `f64::INFINITY` for an uncapped distance. An empty palette returns
/// `cap` unchanged.
#[must_use]
pub fn profile_distance(color: Rgb<u8>, palette: &[Rgb<u8>], cap: f64) -> f64 {
    palette
        .iter()
        .map(|&entry| color_distance(color, entry))
        .fold(cap, f64::min)
}

/// A non-empty set of acceptable colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorProfile {
    colors: Vec<Rgb<u8>>,
}

impl ColorProfile {
    /// Build a profile from RGB colors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyProfile`] if `colors` is empty.
    pub fn new(colors: Vec<Rgb<u8>>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::EmptyProfile);
        }
        Ok(Self { colors })
    }

    /// The [`HAPPY_PALETTE`] as a profile.
    #[must_use]
    pub fn happy() -> Self {
        Self {
            colors: HAPPY_PALETTE.to_vec(),
        }
    }

    /// Build a profile from raw integer components, one slice per color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedColor`] if an entry does not have exactly
    /// three components in `0..=255`, or [`Error::EmptyProfile`] if there
    /// are no entries.
    pub fn from_components<I, C>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[i64]>,
    {
        let colors = entries
            .into_iter()
            .map(|components| {
                let components = components.as_ref();
                rgb_from_components(&format!("{components:?}"), components)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(colors)
    }

    /// Distance from `color` to the closest color in the profile.
    #[must_use]
    pub fn distance(&self, color: Rgb<u8>) -> f64 {
        profile_distance(color, &self.colors, f64::INFINITY)
    }

    /// The colors in the profile, in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    /// Number of colors in the profile (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorProfile {
    fn default() -> Self {
        Self::happy()
    }
}

impl fmt::Display for ColorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, Rgb([r, g, b])) in self.colors.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "#{r:02x}{g:02x}{b:02x}")?;
        }
        Ok(())
    }
}

/// Parses entries separated by `;` or whitespace, each either `r,g,b` or `#rrggbb`.
impl FromStr for ColorProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let colors = s
            .split(|c: char| c == ';' || c.is_whitespace())
            .filter(|entry| !entry.is_empty())
            .map(parse_color)
            .collect::<Result<Vec<_>>>()?;
        Self::new(colors)
    }
}

fn parse_color(entry: &str) -> Result<Rgb<u8>> {
    if let Some(hex) = entry.strip_prefix('#') {
        return parse_hex(entry, hex);
    }

    let components = entry
        .split(',')
        .map(|part| {
            part.trim().parse::<i64>().map_err(|e| Error::MalformedColor {
                entry: entry.to_string(),
                reason: format!("`{}` is not an integer ({e})", part.trim()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    rgb_from_components(entry, &components)
}

fn parse_hex(entry: &str, hex: &str) -> Result<Rgb<u8>> {
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::MalformedColor {
            entry: entry.to_string(),
            reason: "expected 6 hex digits after `#`".to_string(),
        });
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| Error::MalformedColor {
            entry: entry.to_string(),
            reason: e.to_string(),
        })
    };
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

fn rgb_from_components(entry: &str, components: &[i64]) -> Result<Rgb<u8>> {
    if components.len() != 3 {
        return Err(Error::MalformedColor {
            entry: entry.to_string(),
            reason: format!("expected 3 components, found {}", components.len()),
        });
    }

    let mut rgb = [0u8; 3];
    for (slot, &value) in rgb.iter_mut().zip(components) {
        *slot = u8::try_from(value).map_err(|_| Error::MalformedColor {
            entry: entry.to_string(),
            reason: format!("component {value} is outside 0..=255"),
        })?;
    }
    Ok(Rgb(rgb))
}

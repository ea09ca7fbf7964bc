//! Confetti colors.
//!
//! Colors are plain 8-bit RGB triples. Opacity is never stored on a color:
//! the renderer derives it per frame from particle age and passes it
//! alongside the color when blending.
//!
//! # Example
//!
//! ```ignore
//! use confetti::Color;
//!
//! let gold = Color::from_hex("#ffd700")?;
//! let short = Color::from_hex("f0f")?;       // shorthand, '#' optional
//! let exact = Color::rgb(255, 94, 126);
//! ```

use crate::error::ColorError;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
}

impl Color {
    /// Create a color from raw channel values.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string.
    ///
    /// Accepts `#rrggbb`, `rrggbb`, `#rgb`, and `rgb`. Shorthand digits are
    /// doubled (`#f0a` → `#ff00aa`).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(ColorError::BadLength(hex.to_string())),
        };

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&expanded[range], 16)
                .map_err(|_| ColorError::BadDigit(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// The stock confetti palette used when a burst sets no colors.
    pub fn default_palette() -> Vec<Color> {
        vec![
            Color::rgb(0x26, 0xcc, 0xff), // Sky blue
            Color::rgb(0xa2, 0x5a, 0xfd), // Violet
            Color::rgb(0xff, 0x5e, 0x7e), // Coral pink
            Color::rgb(0x88, 0xff, 0x5a), // Lime
            Color::rgb(0xfc, 0xff, 0x42), // Lemon
            Color::rgb(0xff, 0xa6, 0x2d), // Orange
            Color::rgb(0xff, 0x36, 0xff), // Magenta
        ]
    }
}

//! Display styling for elements.

use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
///
/// Deserializes from either the RGBA struct form this crate writes or a
/// `"#rrggbb"`-style hex string as host load payloads carry them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColorRepr")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Rgba {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        a: u8,
    },
}

fn opaque() -> u8 {
    255
}

impl From<ColorRepr> for Color {
    fn from(repr: ColorRepr) -> Self {
        match repr {
            ColorRepr::Hex(hex) => Color::from_hex(&hex),
            ColorRepr::Rgba { r, g, b, a } => Color::new(r, g, b, a),
        }
    }
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse a `#rgb`, `#rrggbb`, or `#rrggbbaa` hex string.
    ///
    /// Load payloads from the host application carry web colors; anything
    /// unparseable falls back to black rather than failing the load.
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.trim().trim_start_matches('#');
        // Byte-index slicing below requires single-byte chars
        if !hex.is_ascii() {
            return Self::black();
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        match hex.len() {
            3 => Self::rgb(
                channel(&hex[0..1]) * 17,
                channel(&hex[1..2]) * 17,
                channel(&hex[2..3]) * 17,
            ),
            6 => Self::rgb(
                channel(&hex[0..2]),
                channel(&hex[2..4]),
                channel(&hex[4..6]),
            ),
            8 => Self::new(
                channel(&hex[0..2]),
                channel(&hex[2..4]),
                channel(&hex[4..6]),
                channel(&hex[6..8]),
            ),
            _ => Self::black(),
        }
    }

    /// Format as a `#rrggbb` hex string (alpha dropped).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Free-form display attributes of an element.
///
/// Nothing here is semantically load-bearing; the renderer consumes it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke/outline color.
    pub stroke: Color,
    /// Caption drawn on the element (e.g. "Table 3").
    #[serde(default)]
    pub label: String,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            fill: Color::white(),
            stroke: Color::black(),
            label: String::new(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

const fn opaque() -> u8 {
    255
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Marker and tangent-handle color
    pub const HIGHLIGHT: Self = Self::RED;

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Weighted sum of three colors; weights are expected to sum to 1
    pub fn blend3(colors: &[Color; 3], weights: [f64; 3]) -> Self {
        let channel = |pick: fn(&Color) -> u8| -> u8 {
            let sum: f64 = colors
                .iter()
                .zip(weights)
                .map(|(c, w)| f64::from(pick(c)) * w)
                .sum();
            sum.round().clamp(0.0, 255.0) as u8
        };
        Self::rgb(channel(|c| c.r), channel(|c| c.g), channel(|c| c.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::rgb(r, g, b)
    }
}

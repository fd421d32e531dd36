//! Core value types shared by every stage of the conversion.

use serde::{Deserialize, Serialize};

/// An RGB color with channels in the host's `0.0..=1.0` range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    #[serde(default)]
    pub r: f64,
    #[serde(default)]
    pub g: f64,
    #[serde(default)]
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
        }
    }

    /// Create from hex string (e.g., "#FF5733", "ff5733" or "#f53").
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        match hex.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    channels[i] = v * 16 + v;
                }
                Some(Self::from_rgb8(channels[0], channels[1], channels[2]))
            }
            6 | 8 => {
                let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
                let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
                let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
                Some(Self::from_rgb8(r, g, b))
            }
            _ => None,
        }
    }

    /// Convert to 8-bit channels, rounding to the nearest integer.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (channel_to_u8(self.r), channel_to_u8(self.g), channel_to_u8(self.b))
    }

    /// Lowercase `#rrggbb` representation.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// WCAG relative luminance.
    pub fn relative_luminance(&self) -> f64 {
        let (r, g, b) = self.to_rgb8();
        let linear = |c: u8| {
            let c = f64::from(c) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
    }

    /// WCAG contrast ratio against another color (1.0 to 21.0).
    pub fn contrast_ratio(&self, other: &Rgb) -> f64 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (light, dark) = if a > b { (a, b) } else { (b, a) };
        (light + 0.05) / (dark + 0.05)
    }

    /// Contrast ratio against pure white.
    pub fn contrast_white(&self) -> f64 {
        self.contrast_ratio(&Rgb::WHITE)
    }

    /// Contrast ratio against pure black.
    pub fn contrast_black(&self) -> f64 {
        self.contrast_ratio(&Rgb::BLACK)
    }

    /// Squared euclidean distance in 8-bit RGB space.
    pub fn distance_sq(&self, other: &Rgb) -> u32 {
        let (r1, g1, b1) = self.to_rgb8();
        let (r2, g2, b2) = other.to_rgb8();
        let d = |a: u8, b: u8| {
            let v = i32::from(a) - i32::from(b);
            (v * v) as u32
        };
        d(r1, r2) + d(g1, g2) + d(b1, b2)
    }

    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
}

fn channel_to_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// An RGBA color as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    #[serde(default)]
    pub r: f64,
    #[serde(default)]
    pub g: f64,
    #[serde(default)]
    pub b: f64,
    #[serde(default = "default_alpha")]
    pub a: f64,
}

fn default_alpha() -> f64 {
    1.0
}

impl Rgba {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        Self::new(c.r, c.g, c.b, 1.0)
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in host coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether every component is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let c = Rgb::from_hex("#3B82F6").unwrap();
        assert_eq!(c.to_hex(), "#3b82f6");
        assert_eq!(Rgb::from_hex("fff").unwrap(), Rgb::WHITE);
        assert!(Rgb::from_hex("#12").is_none());
    }

    #[test]
    fn test_contrast_extremes() {
        assert!((Rgb::BLACK.contrast_white() - 21.0).abs() < 1e-9);
        assert!((Rgb::WHITE.contrast_white() - 1.0).abs() < 1e-9);
        assert!((Rgb::WHITE.contrast_black() - 21.0).abs() < 1e-9);
    }

    proptest::proptest! {
        #[test]
        fn prop_rgb8_hex_round_trip(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let hex = Rgb::from_rgb8(r, g, b).to_hex();
            let parsed = Rgb::from_hex(&hex).unwrap();
            proptest::prop_assert_eq!(parsed.to_rgb8(), (r, g, b));
        }
    }

    #[test]
    fn test_out_of_range_channels_clamp() {
        let c = Rgb::new(1.5, -0.2, f64::NAN);
        assert_eq!(c.to_hex(), "#ff0000");
    }
}

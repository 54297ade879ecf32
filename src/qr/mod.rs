//! QR code rendering
//!
//! This module provides the value types controlling how a QR code is drawn
//! (module scale, colors, border) and the encoder that turns text into a
//! raster image.

mod encoder;

pub use encoder::QrProducer;

use crate::error::{Error, Result};
use image::Rgba;
use std::fmt;
use std::str::FromStr;

/// Allowed border range, in modules.
pub const BORDER_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

/// Pixel scale of a single QR module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxScale {
    /// 10 pixels per module
    Small,
    /// 15 pixels per module
    Medium,
    /// 20 pixels per module
    Large,
}

impl BoxScale {
    /// Side length of one module in pixels.
    pub fn module_size(self) -> u32 {
        match self {
            BoxScale::Small => 10,
            BoxScale::Medium => 15,
            BoxScale::Large => 20,
        }
    }
}

impl FromStr for BoxScale {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(Error::Config(format!(
                "Unknown size '{other}'. Use small, medium, or large"
            ))),
        }
    }
}

impl fmt::Display for BoxScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxScale::Small => write!(f, "small"),
            BoxScale::Medium => write!(f, "medium"),
            BoxScale::Large => write!(f, "large"),
        }
    }
}

/// An RGB color specification, parsed from `#RRGGBB`, `#RGB`, or a named color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(u8, u8, u8);

impl Color {
    /// Opaque black
    pub const BLACK: Color = Color(0, 0, 0);
    /// Opaque white
    pub const WHITE: Color = Color(255, 255, 255);

    /// Build a color from raw RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b)
    }

    /// Convert to an opaque `image` pixel.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.0, self.1, self.2, 255])
    }

    fn from_named(name: &str) -> Option<Self> {
        let color = match name {
            "black" => Color(0, 0, 0),
            "white" => Color(255, 255, 255),
            "red" => Color(255, 0, 0),
            "green" => Color(0, 128, 0),
            "blue" => Color(0, 0, 255),
            "yellow" => Color(255, 255, 0),
            "cyan" => Color(0, 255, 255),
            "magenta" => Color(255, 0, 255),
            "orange" => Color(255, 165, 0),
            "purple" => Color(128, 0, 128),
            "gray" | "grey" => Color(128, 128, 128),
            _ => return None,
        };
        Some(color)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some(Color(r, g, b))
            }
            3 => {
                let expand = |c: u8| c * 16 + c;
                let r = u8::from_str_radix(&digits[0..1], 16).ok()?;
                let g = u8::from_str_radix(&digits[1..2], 16).ok()?;
                let b = u8::from_str_radix(&digits[2..3], 16).ok()?;
                Some(Color(expand(r), expand(g), expand(b)))
            }
            _ => None,
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        Color::from_hex(value)
            .or_else(|| Color::from_named(&value.to_ascii_lowercase()))
            .ok_or_else(|| {
                Error::Config(format!(
                    "Unknown color '{value}'. Use #RRGGBB or a named color such as black or white"
                ))
            })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Rendering parameters for a single generate/download call
///
/// Pure value type: supplied fresh on every call, never stored in the
/// history. `border` is held within [`BORDER_RANGE`] by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParameters {
    /// Pixel scale of each QR module
    pub scale: BoxScale,
    /// Color of the dark modules
    pub fill: Color,
    /// Color of the light modules and the border
    pub back: Color,
    border: u32,
}

impl RenderParameters {
    /// Create parameters with the border clamped to the allowed range.
    pub fn new(scale: BoxScale, fill: Color, back: Color, border: u32) -> Self {
        Self {
            scale,
            fill,
            back,
            border: border.clamp(*BORDER_RANGE.start(), *BORDER_RANGE.end()),
        }
    }

    /// Border thickness in modules.
    pub fn border(&self) -> u32 {
        self.border
    }

    /// Set the border thickness, clamped to the allowed range.
    pub fn set_border(&mut self, border: u32) {
        self.border = border.clamp(*BORDER_RANGE.start(), *BORDER_RANGE.end());
    }
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self::new(BoxScale::Medium, Color::BLACK, Color::WHITE, 4)
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGB brush color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrushColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BrushColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self, BrushError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(BrushError::InvalidHex(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| BrushError::InvalidHex(hex.to_string()))
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Brush state read by the frame processor every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: BrushColor,
    /// Stroke width in canvas pixels
    pub width: f32,
}

/// Fixed set of colors offered by the color picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette;

impl Palette {
    pub const COLORS: [BrushColor; 6] = [
        BrushColor::new(0xff, 0x3e, 0x3e),
        BrushColor::new(0x3e, 0xa6, 0xff),
        BrushColor::new(0x2e, 0xd5, 0x73),
        BrushColor::new(0xff, 0xd4, 0x3b),
        BrushColor::new(0xa2, 0x9b, 0xfe),
        BrushColor::new(0xff, 0xff, 0xff),
    ];

    pub fn default_color() -> BrushColor {
        Self::COLORS[0]
    }

    pub fn contains(color: BrushColor) -> bool {
        Self::COLORS.contains(&color)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrushError {
    #[error("'{0}' is not a #rrggbb color")]
    InvalidHex(String),
    #[error("color {0} is not in the palette")]
    NotInPalette(String),
}

/// User-adjustable brush settings, as they appear in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushSettings {
    /// Hex color, one of the palette entries
    pub color: String,
    /// Width in whole pixels
    pub width: u32,
}

impl BrushSettings {
    pub const MIN_WIDTH: u32 = 1;
    pub const MAX_WIDTH: u32 = 50;
    pub const DEFAULT_WIDTH: u32 = 8;

    pub fn sanitize_width(value: u32) -> u32 {
        value.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH)
    }

    /// Picks a new color, rejecting anything outside the palette
    pub fn select_color(&mut self, hex: &str) -> Result<BrushColor, BrushError> {
        let color = BrushColor::from_hex(hex)?;
        if !Palette::contains(color) {
            return Err(BrushError::NotInPalette(color.to_hex()));
        }
        self.color = color.to_hex();
        Ok(color)
    }

    pub fn set_width(&mut self, width: u32) -> u32 {
        self.width = Self::sanitize_width(width);
        self.width
    }

    /// Resolves the settings into a drawable brush
    pub fn brush(&self) -> Result<Brush, BrushError> {
        let color = BrushColor::from_hex(&self.color)?;
        if !Palette::contains(color) {
            return Err(BrushError::NotInPalette(color.to_hex()));
        }
        Ok(Brush {
            color,
            width: Self::sanitize_width(self.width) as f32,
        })
    }
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Palette::default_color().to_hex(),
            width: Self::DEFAULT_WIDTH,
        }
    }
}

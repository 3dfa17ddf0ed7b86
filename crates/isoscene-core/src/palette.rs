use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// An RGBA color. Serialized as a `#RRGGBB` (or `#RRGGBBAA`) hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(128, 128, 128)
    }
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn from_hex(hex: &str) -> Result<Self, SceneError> {
        let invalid = || SceneError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 0xFF {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Background palette for the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    #[default]
    Forest,
    Desert,
    Caves,
    Hell,
    Ice,
    Swamp,
}

impl Biome {
    pub const ALL: [Biome; 6] = [
        Biome::Forest,
        Biome::Desert,
        Biome::Caves,
        Biome::Hell,
        Biome::Ice,
        Biome::Swamp,
    ];

    /// Inner and outer stops of the radial background gradient.
    pub fn gradient(&self) -> (Color, Color) {
        match self {
            Biome::Forest => (Color::rgb(0x2D, 0x50, 0x16), Color::rgb(0x1A, 0x2E, 0x0A)),
            Biome::Desert => (Color::rgb(0x8B, 0x45, 0x13), Color::rgb(0x65, 0x43, 0x21)),
            Biome::Caves => (Color::rgb(0x2F, 0x2F, 0x2F), Color::rgb(0x1A, 0x1A, 0x1A)),
            Biome::Hell => (Color::rgb(0x8B, 0x00, 0x00), Color::rgb(0x4B, 0x00, 0x00)),
            Biome::Ice => (Color::rgb(0xA5, 0xC8, 0xE1), Color::rgb(0x5B, 0x7A, 0x99)),
            Biome::Swamp => (Color::rgb(0x3F, 0x4F, 0x2A), Color::rgb(0x1F, 0x2A, 0x14)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Biome::Forest => "Forest",
            Biome::Desert => "Desert",
            Biome::Caves => "Caves",
            Biome::Hell => "Hell",
            Biome::Ice => "Ice",
            Biome::Swamp => "Swamp",
        }
    }
}

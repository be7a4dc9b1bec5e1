use serde::{Deserialize, Serialize};

use crate::foundation::error::{PressError, PressResult};

/// Opaque tint color used by the luminosity tint filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TintColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Default for TintColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl TintColor {
    /// `#ffffff`, the tint applied when a filter names none.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the alpha byte is ignored). The `#` is optional.
    pub fn parse_hex(s: &str) -> PressResult<Self> {
        parse_hex(s).map_err(PressError::serde)
    }

    /// Perceptual luminosity (ITU-R 601-2 weights, integer math).
    pub fn luminosity(self) -> u8 {
        let l = (u32::from(self.r) * 299 + u32::from(self.g) * 587 + u32::from(self.b) * 114) / 1000;
        l as u8
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for TintColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TintColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_hex(s: &str) -> Result<TintColor, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color \"{s}\""));
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    match s.len() {
        3 => {
            let r = hex_byte(&s[0..1])?;
            let g = hex_byte(&s[1..2])?;
            let b = hex_byte(&s[2..3])?;
            Ok(TintColor {
                r: r * 17,
                g: g * 17,
                b: b * 17,
            })
        }
        6 | 8 => Ok(TintColor {
            r: hex_byte(&s[0..2])?,
            g: hex_byte(&s[2..4])?,
            b: hex_byte(&s[4..6])?,
        }),
        _ => Err("tint must be #rgb, #rrggbb or #rrggbbaa (case-insensitive)".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;

//! Marker colors and their persisted integer form.
//!
//! Colors are stored as a single integer. Opaque colors are written as plain
//! `0xRRGGBB`; translucent ones keep their alpha in the top byte (`0xAARRGGBB`).
//! When reading, a zero top byte means opaque, so every color with a
//! non-zero alpha round-trips exactly and a fully transparent color comes
//! back opaque.
//!
//! Older stores wrote colors as an object carrying a signed packed ARGB
//! `value` field, and settings files may use an `[r, g, b]` / `[r, g, b, a]`
//! array. Both are accepted on load and normalised on the next save.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Decode a packed integer. A zero alpha byte is read as opaque.
    pub const fn from_packed(value: u32) -> Self {
        let a = (value >> 24) as u8;
        Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
            a: if a == 0 { 255 } else { a },
        }
    }

    /// Encode for storage: `0xRRGGBB` when opaque, `0xAARRGGBB` otherwise.
    /// Alpha 0 packs like an opaque color and decodes as one.
    pub const fn to_packed(self) -> u32 {
        let rgb = ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32;
        if self.a == 255 {
            rgb
        } else {
            ((self.a as u32) << 24) | rgb
        }
    }

    pub const fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.to_packed())
    }
}

/// Every shape a color has been written in.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Packed(i64),
    Components(Vec<u8>),
    Legacy { value: i64 },
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            // Negative values are signed ARGB ints; keep the low 32 bits.
            ColorRepr::Packed(value) | ColorRepr::Legacy { value } => {
                Ok(Color::from_packed(value as u32))
            }
            ColorRepr::Components(parts) => match parts.as_slice() {
                [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Color::rgba(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::invalid_length(
                    parts.len(),
                    &"3 or 4 color components",
                )),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_color_packs_as_plain_rgb() {
        let orange = Color::rgb(255, 108, 0);
        assert_eq!(orange.to_packed(), 0xFF6C00);
        assert_eq!(serde_json::to_string(&orange).unwrap(), "16739328");
    }

    #[test]
    fn reads_signed_argb_and_legacy_object() {
        // 0xFFFF6C00 as a signed 32-bit int
        let signed: Color = serde_json::from_str("-37888").unwrap();
        assert_eq!(signed, Color::rgb(255, 108, 0));

        let legacy: Color = serde_json::from_str(r#"{"value":-37888,"falpha":0.0}"#).unwrap();
        assert_eq!(legacy, Color::rgb(255, 108, 0));
    }

    #[test]
    fn translucent_color_keeps_alpha() {
        let ghost = Color::rgba(10, 20, 30, 128);
        let json = serde_json::to_string(&ghost).unwrap();
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ghost);
    }

    #[test]
    fn transparent_color_reads_back_opaque() {
        let clear = Color::rgba(10, 20, 30, 0);
        let back = Color::from_packed(clear.to_packed());
        assert_eq!(back, Color::rgb(10, 20, 30));

        let faint = Color::rgba(10, 20, 30, 1);
        assert_eq!(Color::from_packed(faint.to_packed()), faint);
    }

    #[test]
    fn reads_component_arrays() {
        let rgb: Color = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(rgb, Color::rgb(1, 2, 3));
        let rgba: Color = serde_json::from_str("[1, 2, 3, 4]").unwrap();
        assert_eq!(rgba.a, 4);
        assert!(serde_json::from_str::<Color>("[1, 2]").is_err());
    }

    #[test]
    fn display_uses_hex() {
        assert_eq!(Color::rgb(255, 108, 0).to_string(), "#ff6c00");
    }
}

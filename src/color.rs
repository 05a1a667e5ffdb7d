use core::fmt;

use serde::{Deserialize, Serialize};

/// RGBA color value. Picker-sourced colors are always opaque; alpha
/// only varies for decoded background-image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fallback canvas fill when no background color is configured.
    pub const BACKGROUND: Self = Self::opaque(0xff, 0xff, 0xff);
    /// Fallback quote ink.
    pub const QUOTE_INK: Self = Self::opaque(0x0b, 0x0c, 0x0f);
    /// Fallback author ink.
    pub const AUTHOR_INK: Self = Self::opaque(0x66, 0x6a, 0x74);

    /// Fully opaque color from channel values.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse a `#rgb` or `#rrggbb` hex string as handed over by color
    /// picker controls.
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let digits = value
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingHash)?;
        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, ch) in channels.iter_mut().zip(digits.chars()) {
                    let nibble = hex_digit(ch)?;
                    *slot = nibble << 4 | nibble;
                }
                Ok(Self::opaque(channels[0], channels[1], channels[2]))
            }
            6 => {
                let mut channels = [0u8; 3];
                let mut chars = digits.chars();
                for slot in channels.iter_mut() {
                    let hi = chars.next().map(hex_digit).transpose()?.unwrap_or(0);
                    let lo = chars.next().map(hex_digit).transpose()?.unwrap_or(0);
                    *slot = hi << 4 | lo;
                }
                Ok(Self::opaque(channels[0], channels[1], channels[2]))
            }
            other => Err(ColorParseError::BadLength(other)),
        }
    }

    /// Lowercase `#rrggbb` form (alpha is not emitted).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn hex_digit(ch: char) -> Result<u8, ColorParseError> {
    ch.to_digit(16)
        .map(|digit| digit as u8)
        .ok_or(ColorParseError::BadDigit(ch))
}

/// Error from hex color parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorParseError {
    /// Value did not start with `#`.
    MissingHash,
    /// Digit count was neither 3 nor 6.
    BadLength(usize),
    /// Character outside `[0-9a-fA-F]`.
    BadDigit(char),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHash => write!(f, "hex color must start with '#'"),
            Self::BadLength(len) => {
                write!(f, "hex color must have 3 or 6 digits (got {})", len)
            }
            Self::BadDigit(ch) => write!(f, "invalid hex digit '{}'", ch),
        }
    }
}

impl std::error::Error for ColorParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_form() {
        assert_eq!(Rgba::from_hex("#0b0c0f").unwrap(), Rgba::QUOTE_INK);
        assert_eq!(Rgba::from_hex("#ffffff").unwrap(), Rgba::BACKGROUND);
        assert_eq!(Rgba::from_hex("#666A74").unwrap(), Rgba::AUTHOR_INK);
    }

    #[test]
    fn parses_short_form_by_doubling() {
        assert_eq!(Rgba::from_hex("#fff").unwrap(), Rgba::opaque(0xff, 0xff, 0xff));
        assert_eq!(Rgba::from_hex("#1a9").unwrap(), Rgba::opaque(0x11, 0xaa, 0x99));
    }

    #[test]
    fn rejects_malformed_values() {
        assert_eq!(Rgba::from_hex("ffffff"), Err(ColorParseError::MissingHash));
        assert_eq!(Rgba::from_hex("#ffff"), Err(ColorParseError::BadLength(4)));
        assert_eq!(Rgba::from_hex("#gggggg"), Err(ColorParseError::BadDigit('g')));
    }

    #[test]
    fn hex_round_trip() {
        let color = Rgba::opaque(0x12, 0xcd, 0x05);
        assert_eq!(Rgba::from_hex(&color.to_hex()).unwrap(), color);
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {input:?}: expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorParseError {
    input: String,
}

/// RGBA color written as a CSS-style hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub [u8; 4]);

impl HexColor {
    pub const BLACK: HexColor = HexColor([0, 0, 0, 255]);
    pub const WHITE: HexColor = HexColor([255, 255, 255, 255]);

    pub fn rgba(self) -> [u8; 4] {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        let digits = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).map_err(|_| err());
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        match digits.len() {
            3 => Ok(HexColor([
                nibble(0)? * 17,
                nibble(1)? * 17,
                nibble(2)? * 17,
                255,
            ])),
            6 => Ok(HexColor([byte(0)?, byte(2)?, byte(4)?, 255])),
            8 => Ok(HexColor([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_long_and_alpha_forms() {
        assert_eq!("#000".parse::<HexColor>().unwrap(), HexColor::BLACK);
        assert_eq!("#ffffff".parse::<HexColor>().unwrap(), HexColor::WHITE);
        assert_eq!(
            "#11223380".parse::<HexColor>().unwrap(),
            HexColor([0x11, 0x22, 0x33, 0x80])
        );
    }

    #[test]
    fn rejects_malformed() {
        assert!("000000".parse::<HexColor>().is_err());
        assert!("#12345".parse::<HexColor>().is_err());
        assert!("#gggggg".parse::<HexColor>().is_err());
        assert!("#ééé".parse::<HexColor>().is_err());
    }

    #[test]
    fn display_omits_opaque_alpha() {
        assert_eq!(HexColor::BLACK.to_string(), "#000000");
        assert_eq!(HexColor([1, 2, 3, 4]).to_string(), "#01020304");
    }
}

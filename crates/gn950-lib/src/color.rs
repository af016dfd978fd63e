//! Color parsing for the ambient lighting color slots.
//!
//! The monitor only stores 8 levels per channel, and rejects colors that do
//! not pair a fully lit channel with a fully dark one (pure white excepted).
//! Every color that reaches the protocol layer goes through [`Color::parse`].

use std::fmt;
use std::str::FromStr;

/// One of the three color components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Red => write!(f, "red"),
            Channel::Green => write!(f, "green"),
            Channel::Blue => write!(f, "blue"),
        }
    }
}

const CHANNELS: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

/// Value of a lowercase hex digit.
fn hex_digit(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='f' => Some(c as u8 - b'a' + 10),
        _ => None,
    }
}

/// Reasons a color string is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Not exactly 6 characters (carries the actual character count).
    WrongLength(usize),
    /// A character outside `0-9a-f`.
    InvalidCharacter(char),
    /// A channel whose value is not one of [`Color::LEVELS`].
    UnsupportedLevel { channel: Channel, text: String },
    /// No `ff` channel paired with a `00` channel, and not pure white.
    MissingFullAndOff,
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::WrongLength(n) => {
                write!(f, "expected 6 hex digits (rrggbb), got {n} characters")
            }
            ColorError::InvalidCharacter(c) => {
                write!(f, "'{c}' is not a lowercase hex digit")
            }
            ColorError::UnsupportedLevel { channel, text } => write!(
                f,
                "{channel} channel '{text}' is not one of 00 20 40 80 a0 c0 e0 ff"
            ),
            ColorError::MissingFullAndOff => write!(
                f,
                "one channel must be ff and one must be 00 (ffffff is the only exception)"
            ),
        }
    }
}

impl std::error::Error for ColorError {}

/// A color the monitor can store in one of its static color slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// Channel levels accepted by the firmware, ascending.
    pub const LEVELS: [u8; 8] = [0x00, 0x20, 0x40, 0x80, 0xA0, 0xC0, 0xE0, 0xFF];

    /// Parse a lowercase `rrggbb` string.
    ///
    /// No `#` prefix, no surrounding whitespace, no upper case.
    pub fn parse(text: &str) -> Result<Self, ColorError> {
        let count = text.chars().count();
        if count != 6 {
            return Err(ColorError::WrongLength(count));
        }
        let mut nibbles = [0u8; 6];
        for (nibble, c) in nibbles.iter_mut().zip(text.chars()) {
            *nibble = hex_digit(c).ok_or(ColorError::InvalidCharacter(c))?;
        }

        // All characters are ASCII from here on, so byte slicing is safe.
        let mut channels = [0u8; 3];
        for (i, channel) in CHANNELS.iter().enumerate() {
            let pair = &text[i * 2..i * 2 + 2];
            let value = (nibbles[i * 2] << 4) | nibbles[i * 2 + 1];
            if !Self::LEVELS.contains(&value) {
                return Err(ColorError::UnsupportedLevel {
                    channel: *channel,
                    text: pair.to_string(),
                });
            }
            channels[i] = value;
        }

        Self::from_levels(channels).ok_or(ColorError::MissingFullAndOff)
    }

    /// Whether `text` would parse. Same rules as [`Color::parse`].
    pub fn is_valid(text: &str) -> bool {
        Self::parse(text).is_ok()
    }

    /// Every color the monitor accepts, in ascending `rrggbb` order.
    pub fn palette() -> impl Iterator<Item = Color> {
        Self::LEVELS.into_iter().flat_map(|r| {
            Self::LEVELS.into_iter().flat_map(move |g| {
                Self::LEVELS
                    .into_iter()
                    .filter_map(move |b| Self::from_levels([r, g, b]))
            })
        })
    }

    /// Channel values as `[r, g, b]`.
    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Apply the channel relationship rule to already level-checked values.
    fn from_levels([r, g, b]: [u8; 3]) -> Option<Self> {
        let levels = [r, g, b];
        let white = levels == [0xFF; 3];
        let has_full = levels.contains(&0xFF);
        let has_off = levels.contains(&0x00);
        (white || (has_full && has_off)).then_some(Color { r, g, b })
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── accepted ──

    #[test]
    fn parse_primary_red() {
        let c = Color::parse("ff0000").unwrap();
        assert_eq!(c.channels(), [0xFF, 0x00, 0x00]);
    }

    #[test]
    fn parse_full_off_and_intermediate() {
        let c = Color::parse("ff00a0").unwrap();
        assert_eq!(c.channels(), [0xFF, 0x00, 0xA0]);
    }

    #[test]
    fn parse_white_exception() {
        let c = Color::parse("ffffff").unwrap();
        assert_eq!(c.channels(), [0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn parse_full_and_off_in_any_position() {
        assert!(Color::parse("00ff20").is_ok());
        assert!(Color::parse("4000ff").is_ok());
        assert!(Color::parse("e0ff00").is_ok());
    }

    #[test]
    fn from_str_matches_parse() {
        let a: Color = "00ffe0".parse().unwrap();
        assert_eq!(a, Color::parse("00ffe0").unwrap());
    }

    // ── rejected ──

    #[test]
    fn reject_levels_without_full_off_pair() {
        assert_eq!(
            Color::parse("a0e080").unwrap_err(),
            ColorError::MissingFullAndOff
        );
    }

    #[test]
    fn reject_black() {
        // has 00 but no ff
        assert_eq!(
            Color::parse("000000").unwrap_err(),
            ColorError::MissingFullAndOff
        );
    }

    #[test]
    fn reject_full_without_off() {
        assert_eq!(
            Color::parse("ffff80").unwrap_err(),
            ColorError::MissingFullAndOff
        );
    }

    #[test]
    fn reject_valid_hex_off_the_level_grid() {
        let err = Color::parse("ff1000").unwrap_err();
        assert_eq!(
            err,
            ColorError::UnsupportedLevel {
                channel: Channel::Green,
                text: "10".into()
            }
        );
        assert!(matches!(
            Color::parse("abff00").unwrap_err(),
            ColorError::UnsupportedLevel {
                channel: Channel::Red,
                ..
            }
        ));
    }

    #[test]
    fn reject_uppercase() {
        assert_eq!(
            Color::parse("FF0000").unwrap_err(),
            ColorError::InvalidCharacter('F')
        );
        assert!(Color::parse("ff00A0").is_err());
    }

    #[test]
    fn reject_hash_prefix_and_whitespace() {
        assert_eq!(
            Color::parse("#ff0000").unwrap_err(),
            ColorError::WrongLength(7)
        );
        assert!(Color::parse(" ff000").is_err());
    }

    #[test]
    fn reject_wrong_lengths() {
        assert_eq!(Color::parse("").unwrap_err(), ColorError::WrongLength(0));
        assert_eq!(Color::parse("fff").unwrap_err(), ColorError::WrongLength(3));
        assert_eq!(
            Color::parse("ff00000").unwrap_err(),
            ColorError::WrongLength(7)
        );
    }

    #[test]
    fn reject_non_hex_and_non_ascii() {
        assert_eq!(
            Color::parse("gg0000").unwrap_err(),
            ColorError::InvalidCharacter('g')
        );
        assert_eq!(
            Color::parse("ff00é0").unwrap_err(),
            ColorError::InvalidCharacter('é')
        );
    }

    #[test]
    fn invalid_character_names_the_first_offender() {
        assert_eq!(
            Color::parse("ff00a#").unwrap_err(),
            ColorError::InvalidCharacter('#')
        );
        assert_eq!(
            Color::parse("ffx0z0").unwrap_err(),
            ColorError::InvalidCharacter('x')
        );
    }

    // ── rule over the whole level grid ──

    #[test]
    fn acceptance_matches_rule_for_every_level_triple() {
        let hex = |v: u8| format!("{v:02x}");
        for r in Color::LEVELS {
            for g in Color::LEVELS {
                for b in Color::LEVELS {
                    let text = format!("{}{}{}", hex(r), hex(g), hex(b));
                    let chans = [hex(r), hex(g), hex(b)];
                    let expected = text == "ffffff"
                        || (chans.iter().any(|c| c == "ff") && chans.iter().any(|c| c == "00"));
                    assert_eq!(Color::is_valid(&text), expected, "mismatch for {text}");
                }
            }
        }
    }

    #[test]
    fn is_valid_agrees_with_parse() {
        for text in ["ff0000", "a0e080", "ffffff", "FFFFFF", "ff10", "00ff40"] {
            assert_eq!(Color::is_valid(text), Color::parse(text).is_ok(), "{text}");
        }
    }

    // ── palette ──

    #[test]
    fn palette_has_expected_size() {
        // 42 full/off pairings plus white.
        assert_eq!(Color::palette().count(), 43);
    }

    #[test]
    fn palette_is_sorted_and_every_entry_parses() {
        let texts: Vec<String> = Color::palette().map(|c| c.to_string()).collect();
        let mut sorted = texts.clone();
        sorted.sort();
        assert_eq!(texts, sorted);
        for t in &texts {
            assert!(Color::is_valid(t), "{t} should parse");
        }
        assert_eq!(texts.first().map(String::as_str), Some("0000ff"));
        assert_eq!(texts.last().map(String::as_str), Some("ffffff"));
    }

    // ── display ──

    #[test]
    fn display_is_lowercase_rrggbb() {
        assert_eq!(Color::parse("c000ff").unwrap().to_string(), "c000ff");
    }

    #[test]
    fn error_display_names_channel() {
        let err = Color::parse("00ff11").unwrap_err();
        assert_eq!(
            err.to_string(),
            "blue channel '11' is not one of 00 20 40 80 a0 c0 e0 ff"
        );
    }
}

//! Logical monitor commands, before protocol encoding.
//!
//! Out-of-range slot and brightness values are rejected when the newtypes
//! are built, so every [`MonitorCommand`] maps to exactly one frame.

use std::fmt;

use crate::color::Color;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    SlotOutOfRange(u8),
    BrightnessOutOfRange(u8),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::SlotOutOfRange(n) => write!(
                f,
                "color slot {n} is out of range ({}-{})",
                Slot::MIN,
                Slot::MAX
            ),
            CommandError::BrightnessOutOfRange(n) => write!(
                f,
                "brightness {n} is out of range ({}-{})",
                Brightness::MIN,
                Brightness::MAX
            ),
        }
    }
}

impl std::error::Error for CommandError {}

/// One of the four static color slots stored on the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(u8);

impl Slot {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(n: u8) -> Result<Self, CommandError> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Slot(n))
        } else {
            Err(CommandError::SlotOutOfRange(n))
        }
    }

    /// All slots, ascending.
    pub fn all() -> impl Iterator<Item = Slot> {
        (Self::MIN..=Self::MAX).map(Slot)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Slot {
    type Error = CommandError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Slot::new(n)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backlight brightness level, 1 (dimmest) to 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 12;

    pub fn new(level: u8) -> Result<Self, CommandError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Brightness(level))
        } else {
            Err(CommandError::BrightnessOutOfRange(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Brightness {
    type Error = CommandError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Brightness::new(level)
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-level operation on the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorCommand {
    PowerOn,
    PowerOff,
    /// Switch the ambient lighting to the color stored in a slot.
    SelectStaticColor(Slot),
    SelectPeaceful,
    SelectDynamic,
    SetBrightness(Brightness),
    /// Overwrite the color stored in a slot.
    SetColor { slot: Slot, color: Color },
}

impl fmt::Display for MonitorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorCommand::PowerOn => write!(f, "power on"),
            MonitorCommand::PowerOff => write!(f, "power off"),
            MonitorCommand::SelectStaticColor(slot) => write!(f, "static color {slot}"),
            MonitorCommand::SelectPeaceful => write!(f, "peaceful mode"),
            MonitorCommand::SelectDynamic => write!(f, "dynamic mode"),
            MonitorCommand::SetBrightness(level) => write!(f, "brightness {level}"),
            MonitorCommand::SetColor { slot, color } => {
                write!(f, "set color {slot} to {color}")
            }
        }
    }
}

//! Unified error type for the gn950-lib crate.
//!
//! [`Gn950Error`] wraps module-specific errors (`DeviceError`, `ColorError`,
//! `CommandError`) and the config / dispatch failure kinds.
//! `From` impls allow `?` to propagate across module boundaries.

use std::fmt;

use crate::color::ColorError;
use crate::command::CommandError;
use crate::device::DeviceError;

/// Unified error type for gn950-lib operations.
#[derive(Debug)]
pub enum Gn950Error {
    /// Transport or device handle error (enumerate, open, write).
    Device(DeviceError),
    /// Color text rejected by the color codec.
    Color(ColorError),
    /// Out-of-range slot or brightness value.
    Command(CommandError),
    /// Standard I/O error.
    Io(std::io::Error),
    /// Configuration validation error.
    Config(String),
    /// One or more selected devices rejected a dispatched frame.
    Dispatch { failed: usize, attempted: usize },
}

impl fmt::Display for Gn950Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gn950Error::Device(e) => write!(f, "{e}"),
            Gn950Error::Color(e) => write!(f, "Color error: {e}"),
            Gn950Error::Command(e) => write!(f, "{e}"),
            Gn950Error::Io(e) => write!(f, "I/O error: {e}"),
            Gn950Error::Config(e) => write!(f, "Config error: {e}"),
            Gn950Error::Dispatch { failed, attempted } => write!(
                f,
                "{failed} of {attempted} monitor{} did not accept the command",
                if *attempted == 1 { "" } else { "s" }
            ),
        }
    }
}

impl std::error::Error for Gn950Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Gn950Error::Device(e) => Some(e),
            Gn950Error::Color(e) => Some(e),
            Gn950Error::Command(e) => Some(e),
            Gn950Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DeviceError> for Gn950Error {
    fn from(e: DeviceError) -> Self {
        Gn950Error::Device(e)
    }
}

impl From<ColorError> for Gn950Error {
    fn from(e: ColorError) -> Self {
        Gn950Error::Color(e)
    }
}

impl From<CommandError> for Gn950Error {
    fn from(e: CommandError) -> Self {
        Gn950Error::Command(e)
    }
}

impl From<std::io::Error> for Gn950Error {
    fn from(e: std::io::Error) -> Self {
        Gn950Error::Io(e)
    }
}

/// Crate-level Result alias using [`Gn950Error`].
pub type Result<T> = std::result::Result<T, Gn950Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_device_error() {
        let e: Gn950Error = DeviceError::NoSuchDevice(2).into();
        assert!(matches!(e, Gn950Error::Device(DeviceError::NoSuchDevice(2))));
    }

    #[test]
    fn from_color_error() {
        let e: Gn950Error = ColorError::WrongLength(3).into();
        assert!(matches!(e, Gn950Error::Color(ColorError::WrongLength(3))));
    }

    #[test]
    fn from_command_error() {
        let e: Gn950Error = CommandError::BrightnessOutOfRange(13).into();
        assert!(matches!(
            e,
            Gn950Error::Command(CommandError::BrightnessOutOfRange(13))
        ));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: Gn950Error = io_err.into();
        assert!(matches!(e, Gn950Error::Io(_)));
    }

    #[test]
    fn display_device_error() {
        let e = Gn950Error::Device(DeviceError::OpenFailed(
            "hid open /dev/hidraw2: busy".into(),
        ));
        assert_eq!(
            e.to_string(),
            "Failed to open device: hid open /dev/hidraw2: busy"
        );
    }

    #[test]
    fn display_config_error() {
        let e = Gn950Error::Config("invalid input".into());
        assert_eq!(e.to_string(), "Config error: invalid input");
    }

    #[test]
    fn display_dispatch_error() {
        let e = Gn950Error::Dispatch {
            failed: 1,
            attempted: 3,
        };
        assert_eq!(e.to_string(), "1 of 3 monitors did not accept the command");

        let single = Gn950Error::Dispatch {
            failed: 1,
            attempted: 1,
        };
        assert_eq!(
            single.to_string(),
            "1 of 1 monitor did not accept the command"
        );
    }

    #[test]
    fn source_chains_device_error() {
        let e = Gn950Error::Device(DeviceError::WriteFailed("broken pipe".into()));
        let source = std::error::Error::source(&e).unwrap();
        assert!(source.to_string().contains("broken pipe"));
    }

    #[test]
    fn source_none_for_plain_variants() {
        let e = Gn950Error::Config("test".into());
        assert!(std::error::Error::source(&e).is_none());
        let e = Gn950Error::Dispatch {
            failed: 2,
            attempted: 2,
        };
        assert!(std::error::Error::source(&e).is_none());
    }

    #[test]
    fn question_mark_propagation_device_to_crate_error() {
        fn inner() -> crate::device::Result<()> {
            Err(DeviceError::NoSuchDevice(4))
        }
        fn outer() -> Result<()> {
            inner()?;
            Ok(())
        }
        let err = outer().unwrap_err();
        assert!(matches!(
            err,
            Gn950Error::Device(DeviceError::NoSuchDevice(4))
        ));
    }
}

//! gn950: power, brightness and ambient lighting control for LG 27GN950 monitors.

pub mod color;
pub mod command;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod registry;

pub use error::Gn950Error;

//! CLI subcommands: discovery, power, brightness and lighting control.

mod color;
mod config_cmd;
mod devices;
mod send;

use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use gn950_lib::color::Color;
pub(super) use gn950_lib::command::{Brightness, MonitorCommand, Slot};
pub(super) use gn950_lib::config::{Config, MonitorSelection};
pub(super) use gn950_lib::device::{HidTransport, Transport};
pub(super) use gn950_lib::dispatch::Dispatcher;
pub(super) use gn950_lib::error::Result;
pub(super) use gn950_lib::registry::{DeviceRegistry, SkippedDevice};

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {}", format_kv(key, value, w.saturating_sub(2)));
}

/// Pretty-print `value` as JSON on stdout.
pub(super) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{text}");
    Ok(())
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct DevicesOutput {
    pub count: usize,
    pub devices: Vec<DeviceJson>,
    pub skipped: Vec<SkippedDevice>,
}

#[derive(Serialize)]
pub(super) struct DeviceJson {
    /// One-based, as accepted by `--monitors`.
    pub monitor: usize,
    pub path: String,
    pub serial: Option<String>,
    pub selected: bool,
}

#[derive(Serialize)]
pub(super) struct DispatchOutput {
    pub command: String,
    pub frame: String,
    pub monitors: Vec<MonitorResultJson>,
}

#[derive(Serialize)]
pub(super) struct MonitorResultJson {
    pub monitor: usize,
    pub path: String,
    pub ok: bool,
    pub error: Option<String>,
}

#[derive(Serialize)]
pub(super) struct ColorCheckOutput {
    pub color: String,
    pub valid: bool,
    pub reason: Option<String>,
}

#[derive(Serialize)]
pub(super) struct PaletteOutput {
    pub levels: Vec<String>,
    pub count: usize,
    pub colors: Vec<String>,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub problems: Vec<String>,
}

/// Flags that apply to every subcommand.
#[derive(Debug, Default)]
pub struct Globals {
    pub json: bool,
    /// Alternate config file.
    pub config: Option<PathBuf>,
    /// Overrides the config file's `monitors` setting.
    pub monitors: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List attached LG 27GN950 monitors
    Devices,

    /// Turn the monitors on
    On,

    /// Turn the monitors off
    Off,

    /// Set the display brightness
    Brightness {
        /// Brightness level (1-12)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=12))]
        level: u8,
    },

    /// Switch the lighting to one of the stored static colors
    Color {
        /// Color slot (1-4)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        slot: u8,
    },

    /// Switch the lighting to peaceful mode
    Peaceful,

    /// Switch the lighting to dynamic mode
    Dynamic,

    /// Store a color in one of the static color slots
    SetColor {
        /// Color slot (1-4)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=4))]
        slot: u8,
        /// Color as lowercase rrggbb, e.g. ff0000
        color: String,
    },

    /// Check whether the monitor accepts a color (no hardware required)
    CheckColor {
        /// Color as lowercase rrggbb
        color: String,
    },

    /// List every color the monitor accepts (no hardware required)
    Palette,

    /// Show current configuration and file path
    Config,
}

/// Load config from `custom_path` if given, otherwise from the default location.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    let (config, warnings) = match custom_path {
        Some(path) => Config::load_from(path),
        None => Config::load_with_warnings(),
    };
    for w in &warnings {
        log::warn!("{w}");
    }
    config
}

/// Resolve which monitors receive commands: `--monitors` wins over the config file.
///
/// An invalid `monitors` setting in the config file is an error, the same as
/// an invalid `--monitors` value.
pub(super) fn resolve_selection(globals: &Globals) -> Result<MonitorSelection> {
    match &globals.monitors {
        Some(text) => text.parse(),
        None => load_config(globals.config.as_deref()).monitor_selection(),
    }
}

/// Discover monitors on `transport` and apply `selection`.
///
/// Requested monitors that are not attached are skipped with a warning.
pub(super) fn open_session<T: Transport>(
    transport: T,
    selection: &MonitorSelection,
) -> Dispatcher<T> {
    let mut registry = DeviceRegistry::new(transport);
    registry.discover();
    for index in selection.apply(&mut registry) {
        log::warn!("[selection] monitor {} is not attached, ignoring", index + 1);
    }
    Dispatcher::new(registry)
}

fn hid_session(globals: &Globals) -> Result<Dispatcher<HidTransport>> {
    let selection = resolve_selection(globals)?;
    Ok(open_session(HidTransport::new()?, &selection))
}

fn send_to_monitors(cmd: MonitorCommand, globals: &Globals) -> Result<()> {
    let dispatcher = hid_session(globals)?;
    send::cmd_send(&dispatcher, &cmd, globals.json)
}

pub fn run(cmd: Command, globals: &Globals) -> Result<()> {
    match cmd {
        Command::Devices => {
            let dispatcher = hid_session(globals)?;
            devices::cmd_devices(dispatcher.registry(), globals.json)
        }
        Command::On => send_to_monitors(MonitorCommand::PowerOn, globals),
        Command::Off => send_to_monitors(MonitorCommand::PowerOff, globals),
        Command::Brightness { level } => {
            send_to_monitors(MonitorCommand::SetBrightness(Brightness::new(level)?), globals)
        }
        Command::Color { slot } => {
            send_to_monitors(MonitorCommand::SelectStaticColor(Slot::new(slot)?), globals)
        }
        Command::Peaceful => send_to_monitors(MonitorCommand::SelectPeaceful, globals),
        Command::Dynamic => send_to_monitors(MonitorCommand::SelectDynamic, globals),
        Command::SetColor { slot, color } => {
            // Reject bad input before any device is opened.
            let cmd = MonitorCommand::SetColor {
                slot: Slot::new(slot)?,
                color: Color::parse(&color)?,
            };
            send_to_monitors(cmd, globals)
        }
        Command::CheckColor { color } => color::cmd_check_color(&color, globals.json),
        Command::Palette => color::cmd_palette(globals.json),
        Command::Config => config_cmd::cmd_config(globals.json, globals.config.as_deref()),
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn kv_width_top_only() {
        let w = kv_width(&["Short:", "Config file:"], &[]);
        // "Config file:" = 12 + PADDING = 14
        assert_eq!(w, 14);
    }

    #[test]
    fn kv_width_indent_drives_width() {
        let w = kv_width(&["A:"], &["monitors (parsed):"]);
        // 18 + PADDING + 2 = 22
        assert_eq!(w, 22);
    }

    #[test]
    fn kv_width_empty_both() {
        assert_eq!(kv_width(&[], &[]), 0);
    }

    #[test]
    fn values_align_across_levels() {
        let w = kv_width(&["Top:"], &["Indent:"]);
        let top = format_kv("Top:", "V", w);
        let indent = format!("  {}", format_kv("Indent:", "V", w - 2));
        assert_eq!(top.find('V'), indent.find('V'));
    }

    #[test]
    fn format_kv_pads_short_keys() {
        assert_eq!(format_kv("Key:", "value", 10), "Key:      value");
    }

    #[test]
    fn format_kv_long_key_gets_no_padding() {
        assert_eq!(format_kv("ExactWidth:", "val", 10), "ExactWidth:val");
    }
}

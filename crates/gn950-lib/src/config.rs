//! Application configuration: TOML-based, platform-aware paths.
//!
//! The file is optional and only ever read; nothing here writes it back.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::device::Transport;
use crate::registry::DeviceRegistry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Monitors that receive commands. Default: "all".
    /// Values: "all", "1", "2", "1,3", etc. (1-based display indices).
    #[serde(default = "default_monitors")]
    pub monitors: String,
}

fn default_monitors() -> String {
    "all".into()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            monitors: default_monitors(),
        }
    }
}

/// Parsed monitor selection.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorSelection {
    /// Every monitor that opened.
    All,
    /// Specific monitors (0-indexed internally, parsed from 1-based user input).
    Specific(Vec<usize>),
}

impl fmt::Display for MonitorSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorSelection::All => write!(f, "all"),
            MonitorSelection::Specific(indices) => {
                let names: Vec<String> = indices.iter().map(|i| format!("{}", i + 1)).collect();
                write!(f, "{}", names.join(", "))
            }
        }
    }
}

impl FromStr for MonitorSelection {
    type Err = crate::Gn950Error;

    /// Strict parse: `"all"` or a comma-separated list of 1-based indices.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(MonitorSelection::All);
        }
        let mut indices = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            match part.parse::<usize>() {
                Ok(n) if n >= 1 => {
                    if !indices.contains(&(n - 1)) {
                        indices.push(n - 1);
                    }
                }
                _ => {
                    return Err(crate::Gn950Error::Config(format!(
                        "\"{part}\" is not a monitor number (use \"all\" or e.g. \"1,3\")"
                    )));
                }
            }
        }
        indices.sort();
        Ok(MonitorSelection::Specific(indices))
    }
}

impl MonitorSelection {
    /// Replace the registry's selection with this one.
    ///
    /// Returns the (0-based) indices that do not name an open monitor;
    /// those are left out.
    pub fn apply<T: Transport>(&self, registry: &mut DeviceRegistry<T>) -> Vec<usize> {
        let current: Vec<usize> = registry.selection().collect();
        for index in current {
            registry.deselect(index);
        }
        match self {
            MonitorSelection::All => {
                registry.select_all();
                Vec::new()
            }
            MonitorSelection::Specific(indices) => indices
                .iter()
                .copied()
                .filter(|&i| registry.select(i).is_err())
                .collect(),
        }
    }
}

/// Validation errors that [`Config::validate`] can return.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The `monitors` field does not parse.
    InvalidMonitors(String),
    /// The `monitors` field names monitors that are not attached.
    MonitorOutOfRange { monitor: usize, count: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidMonitors(e) => write!(f, "Invalid monitors: {e}"),
            ValidationError::MonitorOutOfRange { monitor, count } => write!(
                f,
                "Monitor {monitor} is out of range ({count} monitor{} attached)",
                if *count == 1 { "" } else { "s" }
            ),
        }
    }
}

impl Config {
    /// Platform-specific config directory.
    pub fn dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gn950"))
    }

    /// Full path to config file.
    pub fn path() -> Option<PathBuf> {
        Self::dir().map(|d| d.join("config.toml"))
    }

    /// Load config from an arbitrary path, returning the config and any parse warnings.
    ///
    /// Returns `(defaults, [])` if the file doesn't exist.
    /// Returns `(defaults, [warning])` if the file exists but can't be parsed.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => (config, vec![]),
                Err(e) => {
                    let warning = format!(
                        "config parse error ({}), using defaults: {e}",
                        path.display()
                    );
                    (Self::default(), vec![warning])
                }
            },
            Err(_) => (Self::default(), vec![]),
        }
    }

    /// Load config from the default path, returning the config and any parse warnings.
    pub fn load_with_warnings() -> (Self, Vec<String>) {
        let Some(path) = Self::path() else {
            return (Self::default(), vec![]);
        };
        Self::load_from(&path)
    }

    /// Parse the `monitors` field.
    ///
    /// An unparseable value is an error; there is no fallback to `All`.
    pub fn monitor_selection(&self) -> crate::error::Result<MonitorSelection> {
        self.monitors.parse()
    }

    /// Validate the entire config, collecting all errors.
    ///
    /// `monitor_count`: if `Some`, checks `monitors` against the attached monitors.
    pub fn validate(
        &self,
        monitor_count: Option<usize>,
    ) -> std::result::Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        match self.monitors.parse::<MonitorSelection>() {
            Err(e) => errors.push(ValidationError::InvalidMonitors(e.to_string())),
            Ok(MonitorSelection::Specific(indices)) => {
                if let Some(count) = monitor_count {
                    errors.extend(indices.into_iter().filter(|&i| i >= count).map(|i| {
                        ValidationError::MonitorOutOfRange {
                            monitor: i + 1,
                            count,
                        }
                    }));
                }
            }
            Ok(MonitorSelection::All) => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

//! `config` subcommand: show current configuration and file path.

use std::path::Path;

use gn950_lib::protocol;

use super::{Config, ConfigOutput, Result, kv, kv_indent, kv_width, print_json};

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(custom_path);
    let config_path = custom_path.map(|p| p.to_path_buf()).or_else(Config::path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());
    let problems: Vec<String> = match config.validate(None) {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    };

    if json {
        return print_json(&ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            problems,
        });
    }

    let w = kv_width(&["Config file:", "Protocol:"], &["monitors:"]);

    match &config_path {
        Some(p) if config_exists => {
            kv("Config file:", format_args!("{} (loaded)", p.display()), w)
        }
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    kv(
        "Protocol:",
        format_args!(
            "revision {} ({:04x}:{:04x})",
            protocol::PROTOCOL_REVISION,
            protocol::LG_VENDOR_ID,
            protocol::GN950_PRODUCT_ID
        ),
        w,
    );
    println!();

    println!("Settings:");
    let monitors_display = match config.monitor_selection() {
        Ok(selection) => format!("{} -> {selection}", config.monitors),
        Err(_) => format!("{} (invalid, device commands will fail)", config.monitors),
    };
    kv_indent("monitors:", monitors_display, w);

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }
    Ok(())
}

//! `devices` subcommand: list attached monitors.

use super::{DeviceJson, DeviceRegistry, DevicesOutput, Result, Transport, print_json};

pub(super) fn cmd_devices<T: Transport>(registry: &DeviceRegistry<T>, json: bool) -> Result<()> {
    let devices: Vec<DeviceJson> = registry
        .devices()
        .iter()
        .filter(|d| d.is_open())
        .map(|d| DeviceJson {
            monitor: d.display_index(),
            path: d.path().to_string(),
            serial: d.serial().map(str::to_string),
            selected: registry.is_selected(d.index()),
        })
        .collect();

    if json {
        return print_json(&DevicesOutput {
            count: devices.len(),
            devices,
            skipped: registry.skipped().to_vec(),
        });
    }

    if devices.is_empty() {
        println!("No monitors found.");
    } else {
        println!(
            "Found {} monitor{}:",
            devices.len(),
            if devices.len() == 1 { "" } else { "s" }
        );
        println!();
        for dev in &devices {
            let marker = if dev.selected { "*" } else { " " };
            println!("  {marker}[{}] {}", dev.monitor, dev.path);
            if let Some(ref serial) = dev.serial {
                println!("       Serial: {serial}");
            }
        }
        println!();
        println!("  * receives commands");
    }

    if !registry.skipped().is_empty() {
        println!();
        println!("Could not open:");
        for skipped in registry.skipped() {
            println!("  {}: {}", skipped.path, skipped.reason);
        }
    }

    Ok(())
}

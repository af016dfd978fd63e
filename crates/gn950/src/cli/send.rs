//! Device commands (`on`, `off`, `brightness`, `color`, `peaceful`,
//! `dynamic`, `set-color`): fan one command out to the selected monitors.

use gn950_lib::protocol;

use super::{
    DispatchOutput, Dispatcher, MonitorCommand, MonitorResultJson, Result, Transport, print_json,
};

pub(super) fn cmd_send<T: Transport>(
    dispatcher: &Dispatcher<T>,
    cmd: &MonitorCommand,
    json: bool,
) -> Result<()> {
    let registry = dispatcher.registry();
    if registry.open_count() == 0 && !json {
        println!("No monitors found.");
        return Ok(());
    }

    let report = dispatcher.dispatch(cmd);

    let results: Vec<MonitorResultJson> = report
        .attempted
        .iter()
        .filter_map(|&index| registry.devices().get(index))
        .map(|device| {
            let failure = report.failures.iter().find(|f| f.index == device.index());
            MonitorResultJson {
                monitor: device.display_index(),
                path: device.path().to_string(),
                ok: failure.is_none(),
                error: failure.map(|f| f.error.to_string()),
            }
        })
        .collect();

    if json {
        print_json(&DispatchOutput {
            command: cmd.to_string(),
            frame: protocol::resolve(cmd).to_string(),
            monitors: results,
        })?;
    } else if results.is_empty() {
        println!("No monitors selected.");
    } else {
        println!("{cmd}:");
        for r in &results {
            match &r.error {
                None => println!("  [{}] ok", r.monitor),
                Some(e) => println!("  [{}] failed: {e}", r.monitor),
            }
        }
    }

    report.into_result()
}

//! Command fan-out: one logical command to every selected monitor.

use crate::command::MonitorCommand;
use crate::device::{DeviceError, Transport};
use crate::protocol;
use crate::registry::DeviceRegistry;

/// A selected device that did not accept the frame.
#[derive(Debug)]
pub struct WriteFailure {
    pub index: usize,
    pub path: String,
    pub error: DeviceError,
}

/// Outcome of one [`Dispatcher::dispatch`] call.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Indices written to, in order.
    pub attempted: Vec<usize>,
    pub failures: Vec<WriteFailure>,
}

impl DispatchReport {
    /// True when every attempted write succeeded (also when nothing was attempted).
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Indices that accepted the frame.
    pub fn succeeded(&self) -> Vec<usize> {
        self.attempted
            .iter()
            .copied()
            .filter(|i| !self.failures.iter().any(|f| f.index == *i))
            .collect()
    }

    /// Convert into a crate error when any write failed.
    pub fn into_result(self) -> crate::error::Result<()> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(crate::Gn950Error::Dispatch {
                failed: self.failures.len(),
                attempted: self.attempted.len(),
            })
        }
    }
}

/// Owns the device registry and sends commands to its selection.
pub struct Dispatcher<T: Transport> {
    registry: DeviceRegistry<T>,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(registry: DeviceRegistry<T>) -> Self {
        Dispatcher { registry }
    }

    pub fn registry(&self) -> &DeviceRegistry<T> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut DeviceRegistry<T> {
        &mut self.registry
    }

    /// Encode `cmd` once and write it to every selected device, ascending.
    ///
    /// A failing device is recorded and the remaining ones are still written.
    /// An empty selection writes nothing.
    pub fn dispatch(&self, cmd: &MonitorCommand) -> DispatchReport {
        let payload = protocol::resolve(cmd);
        let mut report = DispatchReport::default();

        let targets = self.registry.selected_devices();
        if targets.is_empty() {
            log::info!("[dispatch] {cmd}: no monitors selected");
            return report;
        }
        log::debug!("[dispatch] {cmd} -> {payload}");

        for device in targets {
            report.attempted.push(device.index());
            match self.registry.write(device.index(), &payload) {
                Ok(()) => log::debug!("[dispatch] monitor {} ok", device.display_index()),
                Err(error) => {
                    log::warn!(
                        "[dispatch] monitor {} ({}): {error}",
                        device.display_index(),
                        device.path()
                    );
                    report.failures.push(WriteFailure {
                        index: device.index(),
                        path: device.path().to_string(),
                        error,
                    });
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Brightness;
    use crate::device::mock::MockTransport;

    fn dispatcher_with(count: usize) -> (Dispatcher<MockTransport>, MockTransport) {
        let bus = MockTransport::with_monitors(count);
        let mut reg = DeviceRegistry::new(bus.clone());
        reg.discover();
        reg.select_all();
        (Dispatcher::new(reg), bus)
    }

    #[test]
    fn writes_same_payload_to_each_selected_device() {
        let (d, bus) = dispatcher_with(2);
        let report = d.dispatch(&MonitorCommand::PowerOff);
        assert!(report.is_clean());
        assert_eq!(report.attempted, vec![0, 1]);

        let expected = protocol::resolve(&MonitorCommand::PowerOff);
        let writes = bus.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].0, MockTransport::path(0));
        assert_eq!(writes[1].0, MockTransport::path(1));
        for (_, bytes) in &writes {
            assert_eq!(bytes.as_slice(), expected.as_bytes());
        }
    }

    #[test]
    fn only_selected_devices_receive() {
        let (mut d, bus) = dispatcher_with(3);
        d.registry_mut().deselect(0);
        d.registry_mut().deselect(2);
        let report = d.dispatch(&MonitorCommand::SelectDynamic);
        assert_eq!(report.attempted, vec![1]);
        let writes = bus.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, MockTransport::path(1));
    }

    #[test]
    fn failure_does_not_stop_fan_out() {
        let (d, bus) = dispatcher_with(3);
        bus.fail_write(&MockTransport::path(1));

        let report = d.dispatch(&MonitorCommand::PowerOn);
        assert_eq!(report.attempted, vec![0, 1, 2]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert!(matches!(
            report.failures[0].error,
            DeviceError::WriteFailed(_)
        ));
        assert_eq!(report.succeeded(), vec![0, 2]);
        assert_eq!(bus.writes().len(), 3);
    }

    #[test]
    fn failure_does_not_change_selection() {
        let (d, bus) = dispatcher_with(2);
        bus.fail_write(&MockTransport::path(0));
        d.dispatch(&MonitorCommand::PowerOn);
        assert_eq!(d.registry().selection().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn empty_selection_is_noop() {
        let (mut d, bus) = dispatcher_with(2);
        d.registry_mut().deselect(0);
        d.registry_mut().deselect(1);
        let report = d.dispatch(&MonitorCommand::PowerOn);
        assert!(report.attempted.is_empty());
        assert!(report.is_clean());
        assert!(bus.writes().is_empty());
    }

    #[test]
    fn dispatch_twice_writes_identical_frames() {
        let (d, bus) = dispatcher_with(1);
        for cmd in [
            MonitorCommand::PowerOn,
            MonitorCommand::SetBrightness(Brightness::new(7).unwrap()),
        ] {
            bus.clear_writes();
            d.dispatch(&cmd);
            d.dispatch(&cmd);
            let writes = bus.writes();
            assert_eq!(writes.len(), 2, "{cmd}");
            assert_eq!(writes[0], writes[1], "{cmd}");
            assert_eq!(writes[0].1.as_slice(), protocol::resolve(&cmd).as_bytes());
        }
    }

    #[test]
    fn into_result_reports_counts() {
        let (d, bus) = dispatcher_with(3);
        bus.fail_write(&MockTransport::path(0));
        bus.short_write(&MockTransport::path(2));
        let err = d.dispatch(&MonitorCommand::PowerOn).into_result().unwrap_err();
        assert!(matches!(
            err,
            crate::Gn950Error::Dispatch {
                failed: 2,
                attempted: 3
            }
        ));
        assert!(DispatchReport::default().into_result().is_ok());
    }
}

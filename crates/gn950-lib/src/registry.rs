//! Device registry: discovery, handle ownership and the active selection.
//!
//! The registry is the only owner of open device handles. Indices are
//! zero-based, assigned in discovery order, and never shift: removing a
//! device leaves a closed slot behind.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::device::{DeviceError, Result, Transport};
use crate::protocol::Payload;

/// One discovered monitor.
#[derive(Debug)]
pub struct Device<H> {
    index: usize,
    path: String,
    serial: Option<String>,
    /// `None` once closed.
    handle: Option<H>,
}

impl<H> Device<H> {
    /// Zero-based registry index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// One-based index for display.
    pub fn display_index(&self) -> usize {
        self.index + 1
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }
}

/// A candidate that was enumerated but could not be opened.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedDevice {
    pub path: String,
    pub reason: String,
}

pub struct DeviceRegistry<T: Transport> {
    transport: T,
    devices: Vec<Device<T::Handle>>,
    skipped: Vec<SkippedDevice>,
    selection: BTreeSet<usize>,
}

impl<T: Transport> DeviceRegistry<T> {
    pub fn new(transport: T) -> Self {
        DeviceRegistry {
            transport,
            devices: Vec::new(),
            skipped: Vec::new(),
            selection: BTreeSet::new(),
        }
    }

    /// Enumerate and open every attached monitor.
    ///
    /// Closes anything opened by a previous call and clears the selection,
    /// since old indices no longer mean anything. Candidates that fail to
    /// open are left out and listed in [`DeviceRegistry::skipped`]. Finding
    /// nothing is not an error.
    pub fn discover(&mut self) -> &[Device<T::Handle>] {
        self.close_all();
        self.devices.clear();
        self.skipped.clear();

        for candidate in self.transport.enumerate_candidates() {
            match self.transport.open(&candidate.path) {
                Ok(handle) => {
                    log::debug!("[device] opened {}", candidate.path);
                    self.devices.push(Device {
                        index: self.devices.len(),
                        path: candidate.path,
                        serial: candidate.serial,
                        handle: Some(handle),
                    });
                }
                Err(e) => {
                    log::warn!("[device] skipping {}: {e}", candidate.path);
                    self.skipped.push(SkippedDevice {
                        path: candidate.path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "[device] {} monitor(s) opened, {} skipped",
            self.devices.len(),
            self.skipped.len()
        );
        &self.devices
    }

    /// Every device found by the last discovery, in index order (closed ones included).
    pub fn devices(&self) -> &[Device<T::Handle>] {
        &self.devices
    }

    pub fn skipped(&self) -> &[SkippedDevice] {
        &self.skipped
    }

    pub fn open_count(&self) -> usize {
        self.devices.iter().filter(|d| d.is_open()).count()
    }

    /// Add an open device to the selection. Already selected is a no-op.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if !self.devices.get(index).is_some_and(Device::is_open) {
            return Err(DeviceError::NoSuchDevice(index));
        }
        self.selection.insert(index);
        Ok(())
    }

    /// Remove a device from the selection. Not selected is a no-op.
    pub fn deselect(&mut self, index: usize) {
        self.selection.remove(&index);
    }

    /// Select every open device.
    pub fn select_all(&mut self) {
        self.selection
            .extend(self.devices.iter().filter(|d| d.is_open()).map(|d| d.index));
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    /// Selected indices, ascending.
    pub fn selection(&self) -> impl Iterator<Item = usize> + '_ {
        self.selection.iter().copied()
    }

    /// Selected devices, ascending by index.
    pub fn selected_devices(&self) -> Vec<&Device<T::Handle>> {
        self.selection
            .iter()
            .filter_map(|&i| self.devices.get(i))
            .collect()
    }

    /// Close one device and drop it from the selection.
    pub fn remove(&mut self, index: usize) -> Result<()> {
        let handle = self
            .devices
            .get_mut(index)
            .and_then(|d| d.handle.take())
            .ok_or(DeviceError::NoSuchDevice(index))?;
        self.transport.close(handle);
        self.selection.remove(&index);
        log::debug!("[device] removed monitor {}", index + 1);
        Ok(())
    }

    /// Write a frame to one open device.
    pub fn write(&self, index: usize, payload: &Payload) -> Result<()> {
        let handle = self
            .devices
            .get(index)
            .and_then(|d| d.handle.as_ref())
            .ok_or(DeviceError::NoSuchDevice(index))?;
        self.transport.write(handle, payload)
    }

    /// Close every open handle. Safe to call repeatedly.
    pub fn close_all(&mut self) {
        for device in &mut self.devices {
            if let Some(handle) = device.handle.take() {
                self.transport.close(handle);
                log::debug!("[device] closed {}", device.path);
            }
        }
        self.selection.clear();
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Drop for DeviceRegistry<T> {
    fn drop(&mut self) {
        self.close_all();
    }
}

//! Device communication: transport trait and hidapi backend.

use std::ffi::{CStr, CString};
use std::fmt;

use serde::Serialize;

use crate::protocol::{self, FRAME_SIZE, Payload};

// ── Error type ──

/// Device communication errors.
///
/// String payloads follow the convention **"context: details"** where *context*
/// identifies the operation (e.g. `"hid open"`) and *details* is the inner error.
#[derive(Debug)]
pub enum DeviceError {
    /// The HID library itself could not be initialised.
    TransportUnavailable(String),
    OpenFailed(String),
    WriteFailed(String),
    /// The device accepted fewer bytes than a full frame.
    ShortWrite {
        written: usize,
        expected: usize,
    },
    /// No open device has this (zero-based) index.
    NoSuchDevice(usize),
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::TransportUnavailable(e) => write!(f, "HID transport unavailable: {e}"),
            DeviceError::OpenFailed(e) => write!(f, "Failed to open device: {e}"),
            DeviceError::WriteFailed(e) => write!(f, "Write failed: {e}"),
            DeviceError::ShortWrite { written, expected } => {
                write!(f, "Short write: {written} of {expected} bytes")
            }
            DeviceError::NoSuchDevice(index) => {
                write!(f, "No open monitor with index {}", index + 1)
            }
        }
    }
}

impl std::error::Error for DeviceError {}

pub type Result<T> = std::result::Result<T, DeviceError>;

// ── Discovery ──

/// A device interface reported by the transport (not yet opened).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    /// Platform device path, e.g. `/dev/hidraw3`.
    pub path: String,
    pub vendor_id: u16,
    pub product_id: u16,
    /// USB serial number, if available.
    pub serial: Option<String>,
}

// ── Trait ──

/// Raw HID transport. Implementations only move bytes; framing lives in
/// [`crate::protocol`] and handle ownership in [`crate::registry`].
pub trait Transport {
    type Handle;

    /// List attached interfaces matching the monitor's identifiers.
    /// Enumeration problems are logged and yield an empty list.
    fn enumerate_candidates(&mut self) -> Vec<Candidate>;

    fn open(&self, path: &str) -> Result<Self::Handle>;

    /// Write one complete frame.
    fn write(&self, handle: &Self::Handle, payload: &Payload) -> Result<()>;

    /// Release a handle. Never fails.
    fn close(&self, handle: Self::Handle);
}

// ── hidapi implementation ──

/// Platform path as a `String` that [`HidTransport::open`] can turn back
/// into the same C string. `None` for paths that are not UTF-8.
fn candidate_path(raw: &CStr) -> Option<String> {
    raw.to_str().ok().map(str::to_string)
}

/// Transport backed by the system HID library.
pub struct HidTransport {
    api: hidapi::HidApi,
}

impl HidTransport {
    pub fn new() -> Result<Self> {
        let api = hidapi::HidApi::new()
            .map_err(|e| DeviceError::TransportUnavailable(format!("hidapi init: {e}")))?;
        Ok(HidTransport { api })
    }
}

impl Transport for HidTransport {
    type Handle = hidapi::HidDevice;

    fn enumerate_candidates(&mut self) -> Vec<Candidate> {
        if let Err(e) = self.api.refresh_devices() {
            log::warn!("[device] HID enumeration failed: {e}");
            return Vec::new();
        }

        self.api
            .device_list()
            .filter(|info| {
                protocol::is_supported(info.vendor_id(), info.product_id(), info.usage_page())
            })
            .filter_map(|info| {
                let Some(path) = candidate_path(info.path()) else {
                    log::warn!(
                        "[device] skipping {}: path is not valid UTF-8",
                        info.path().to_string_lossy()
                    );
                    return None;
                };
                Some(Candidate {
                    path,
                    vendor_id: info.vendor_id(),
                    product_id: info.product_id(),
                    serial: info.serial_number().map(|s| s.to_string()),
                })
            })
            .collect()
    }

    fn open(&self, path: &str) -> Result<Self::Handle> {
        let c_path = CString::new(path)
            .map_err(|e| DeviceError::OpenFailed(format!("invalid path {path:?}: {e}")))?;
        self.api
            .open_path(&c_path)
            .map_err(|e| DeviceError::OpenFailed(format!("hid open {path}: {e}")))
    }

    fn write(&self, handle: &Self::Handle, payload: &Payload) -> Result<()> {
        let written = handle
            .write(payload.as_bytes())
            .map_err(|e| DeviceError::WriteFailed(format!("hid write: {e}")))?;
        if written < FRAME_SIZE {
            return Err(DeviceError::ShortWrite {
                written,
                expected: FRAME_SIZE,
            });
        }
        Ok(())
    }

    fn close(&self, handle: Self::Handle) {
        // hidapi closes the device when the handle is dropped.
        drop(handle);
    }
}

// ── Mock transport for testing ──

/// In-memory transport for unit and integration tests.
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    /// Handle returned by [`MockTransport::open`].
    #[derive(Debug)]
    pub struct MockHandle {
        pub path: String,
    }

    #[derive(Default)]
    struct MockState {
        candidates: Vec<Candidate>,
        fail_open: HashSet<String>,
        fail_write: HashSet<String>,
        short_write: HashSet<String>,
        opened: Vec<String>,
        writes: Vec<(String, Vec<u8>)>,
        closed: Vec<String>,
    }

    /// Fake HID bus. Clones share state, so a test can keep one clone for
    /// inspection while the registry owns the other.
    #[derive(Clone, Default)]
    pub struct MockTransport {
        state: Rc<RefCell<MockState>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// A bus with `count` monitors at `mock://gn950/0`, `mock://gn950/1`, ...
        pub fn with_monitors(count: usize) -> Self {
            let t = Self::new();
            for i in 0..count {
                t.add_monitor(&Self::path(i));
            }
            t
        }

        /// Path used by [`MockTransport::with_monitors`] for monitor `i`.
        pub fn path(i: usize) -> String {
            format!("mock://gn950/{i}")
        }

        pub fn add_monitor(&self, path: &str) {
            self.state.borrow_mut().candidates.push(Candidate {
                path: path.into(),
                vendor_id: protocol::LG_VENDOR_ID,
                product_id: protocol::GN950_PRODUCT_ID,
                serial: Some(format!("SN-{path}")),
            });
        }

        /// Make `open(path)` fail.
        pub fn fail_open(&self, path: &str) {
            self.state.borrow_mut().fail_open.insert(path.into());
        }

        /// Make every `write` to `path` fail.
        pub fn fail_write(&self, path: &str) {
            self.state.borrow_mut().fail_write.insert(path.into());
        }

        /// Make every `write` to `path` report a truncated write.
        pub fn short_write(&self, path: &str) {
            self.state.borrow_mut().short_write.insert(path.into());
        }

        /// Paths successfully opened, in order.
        pub fn opened(&self) -> Vec<String> {
            self.state.borrow().opened.clone()
        }

        /// Every write attempt (including failed ones): (path, bytes).
        pub fn writes(&self) -> Vec<(String, Vec<u8>)> {
            self.state.borrow().writes.clone()
        }

        /// Paths closed, in order.
        pub fn closed(&self) -> Vec<String> {
            self.state.borrow().closed.clone()
        }

        pub fn clear_writes(&self) {
            self.state.borrow_mut().writes.clear();
        }
    }

    impl Transport for MockTransport {
        type Handle = MockHandle;

        fn enumerate_candidates(&mut self) -> Vec<Candidate> {
            self.state.borrow().candidates.clone()
        }

        fn open(&self, path: &str) -> Result<MockHandle> {
            let mut state = self.state.borrow_mut();
            if state.fail_open.contains(path) {
                return Err(DeviceError::OpenFailed(format!(
                    "mock open {path}: permission denied"
                )));
            }
            state.opened.push(path.into());
            Ok(MockHandle { path: path.into() })
        }

        fn write(&self, handle: &MockHandle, payload: &Payload) -> Result<()> {
            let mut state = self.state.borrow_mut();
            state
                .writes
                .push((handle.path.clone(), payload.as_bytes().to_vec()));
            if state.fail_write.contains(&handle.path) {
                return Err(DeviceError::WriteFailed(format!(
                    "mock write {}: device disconnected",
                    handle.path
                )));
            }
            if state.short_write.contains(&handle.path) {
                return Err(DeviceError::ShortWrite {
                    written: 8,
                    expected: FRAME_SIZE,
                });
            }
            Ok(())
        }

        fn close(&self, handle: MockHandle) {
            self.state.borrow_mut().closed.push(handle.path);
        }
    }
}

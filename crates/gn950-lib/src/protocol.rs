//! Protocol constants and frame encoding for the LG 27GN950 lighting controller.
//!
//! Every command is a single 65-byte HID output report, written fire-and-forget.
//! The firmware never answers on this interface.
//!
//! ## Frame layout
//!
//! ```text
//! [0]        report ID (0x00)
//! [1..3]     magic "SC" (0x53 0x43)
//! [3]        class (0xC8 control, 0xC9 color memory)
//! [4]        opcode
//! [5]        data length n
//! [6..6+n]   data
//! [6+n]      XOR of bytes 1..6+n
//! [7+n..9+n] trailer "ED" (0x45 0x44)
//! ```
//!
//! The rest of the report is zero. The constants below are one versioned set
//! (see [`PROTOCOL_REVISION`]) and are meant to be replaced together.

use std::fmt;

use crate::command::{Brightness, MonitorCommand, Slot};

/// Revision of the frame table below.
pub const PROTOCOL_REVISION: u8 = 1;

// ── USB / HID identifiers ──

/// LG Electronics vendor ID.
pub const LG_VENDOR_ID: u16 = 0x043E;

/// 27GN950 product ID.
pub const GN950_PRODUCT_ID: u16 = 0x9A8A;

/// Vendor-defined usage page of the lighting control interface.
/// The monitor also exposes other HID interfaces that must not receive frames.
pub const LIGHTING_USAGE_PAGE: u16 = 0xFF01;

/// Whether an enumerated HID interface is the 27GN950 lighting controller.
pub fn is_supported(vendor_id: u16, product_id: u16, usage_page: u16) -> bool {
    vendor_id == LG_VENDOR_ID
        && product_id == GN950_PRODUCT_ID
        && usage_page == LIGHTING_USAGE_PAGE
}

// ── Framing ──

/// Total report size including the leading report ID byte.
pub const FRAME_SIZE: usize = 65;

/// HID report ID (the interface does not use numbered reports).
pub const REPORT_ID: u8 = 0x00;

/// Frame start marker.
pub const MAGIC: [u8; 2] = [0x53, 0x43];

/// Frame end marker, directly after the checksum.
pub const TRAILER: [u8; 2] = [0x45, 0x44];

/// Offset of the data length byte; data starts right after it.
const LEN_OFFSET: usize = 5;

/// Bytes before the data section.
const HEADER_LEN: usize = LEN_OFFSET + 1;

/// Longest data section that still leaves room for checksum and trailer.
pub const MAX_DATA_LEN: usize = FRAME_SIZE - HEADER_LEN - 3;

// ── Command classes ──

/// Immediate control writes (power, brightness, lighting mode).
pub const CLASS_CONTROL: u8 = 0xC8;

/// Writes to the persistent color slot memory.
pub const CLASS_COLOR_MEMORY: u8 = 0xC9;

// ── Opcodes ──

/// Power. Data: `[0x01]` on, `[0x00]` off.
pub const OP_POWER: u8 = 0x01;

/// Backlight brightness. Data: `[level]`, 1..=12.
pub const OP_BRIGHTNESS: u8 = 0x02;

/// Lighting mode. Data: `[mode]`, see `MODE_*`.
pub const OP_LIGHTING_MODE: u8 = 0x03;

/// Store a color in a slot. Data: `[slot, r, g, b]`.
pub const OP_SET_COLOR: u8 = 0x04;

pub const POWER_OFF: u8 = 0x00;
pub const POWER_ON: u8 = 0x01;

/// Lighting mode value for static color slot 1. Slots 2-4 follow on.
pub const MODE_STATIC_BASE: u8 = 0x01;

pub const MODE_PEACEFUL: u8 = 0x05;

pub const MODE_DYNAMIC: u8 = 0x06;

/// One encoded command frame, ready to be written to a device.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Payload([u8; FRAME_SIZE]);

impl Payload {
    /// Build a frame from its class, opcode and data section.
    ///
    /// `data` must not exceed [`MAX_DATA_LEN`]; every caller in this module
    /// passes at most 4 bytes.
    const fn build(class: u8, opcode: u8, data: &[u8]) -> Self {
        let mut frame = [0u8; FRAME_SIZE];
        frame[0] = REPORT_ID;
        frame[1] = MAGIC[0];
        frame[2] = MAGIC[1];
        frame[3] = class;
        frame[4] = opcode;
        frame[LEN_OFFSET] = data.len() as u8;

        let mut i = 0;
        while i < data.len() {
            frame[HEADER_LEN + i] = data[i];
            i += 1;
        }

        let end = HEADER_LEN + data.len();
        let mut checksum = 0u8;
        let mut j = 1;
        while j < end {
            checksum ^= frame[j];
            j += 1;
        }
        frame[end] = checksum;
        frame[end + 1] = TRAILER[0];
        frame[end + 2] = TRAILER[1];
        Payload(frame)
    }

    const fn control(opcode: u8, value: u8) -> Self {
        Self::build(CLASS_CONTROL, opcode, &[value])
    }

    /// The complete report, report ID first.
    pub fn as_bytes(&self) -> &[u8; FRAME_SIZE] {
        &self.0
    }

    pub fn class(&self) -> u8 {
        self.0[3]
    }

    pub fn opcode(&self) -> u8 {
        self.0[4]
    }

    /// The data section.
    pub fn data(&self) -> &[u8] {
        let len = self.0[LEN_OFFSET] as usize;
        &self.0[HEADER_LEN..HEADER_LEN + len]
    }

    /// Frame bytes from the magic through the trailer (no report ID, no padding).
    fn meaningful(&self) -> &[u8] {
        let len = self.0[LEN_OFFSET] as usize;
        &self.0[1..HEADER_LEN + len + 3]
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.meaningful().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload({self})")
    }
}

// ── Static frame table ──

static POWER_ON_FRAME: Payload = Payload::control(OP_POWER, POWER_ON);
static POWER_OFF_FRAME: Payload = Payload::control(OP_POWER, POWER_OFF);
static PEACEFUL_FRAME: Payload = Payload::control(OP_LIGHTING_MODE, MODE_PEACEFUL);
static DYNAMIC_FRAME: Payload = Payload::control(OP_LIGHTING_MODE, MODE_DYNAMIC);

static BRIGHTNESS_FRAMES: [Payload; Brightness::MAX as usize] = brightness_table();
static STATIC_COLOR_FRAMES: [Payload; Slot::MAX as usize] = static_color_table();

const fn brightness_table() -> [Payload; Brightness::MAX as usize] {
    let mut table = [Payload([0; FRAME_SIZE]); Brightness::MAX as usize];
    let mut i = 0;
    while i < table.len() {
        table[i] = Payload::control(OP_BRIGHTNESS, Brightness::MIN + i as u8);
        i += 1;
    }
    table
}

const fn static_color_table() -> [Payload; Slot::MAX as usize] {
    let mut table = [Payload([0; FRAME_SIZE]); Slot::MAX as usize];
    let mut i = 0;
    while i < table.len() {
        table[i] = Payload::control(OP_LIGHTING_MODE, MODE_STATIC_BASE + i as u8);
        i += 1;
    }
    table
}

/// Encode a logical command into its frame.
pub fn resolve(cmd: &MonitorCommand) -> Payload {
    match *cmd {
        MonitorCommand::PowerOn => POWER_ON_FRAME,
        MonitorCommand::PowerOff => POWER_OFF_FRAME,
        MonitorCommand::SelectStaticColor(slot) => {
            STATIC_COLOR_FRAMES[(slot.get() - Slot::MIN) as usize]
        }
        MonitorCommand::SelectPeaceful => PEACEFUL_FRAME,
        MonitorCommand::SelectDynamic => DYNAMIC_FRAME,
        MonitorCommand::SetBrightness(level) => {
            BRIGHTNESS_FRAMES[(level.get() - Brightness::MIN) as usize]
        }
        MonitorCommand::SetColor { slot, color } => {
            let [r, g, b] = color.channels();
            Payload::build(CLASS_COLOR_MEMORY, OP_SET_COLOR, &[slot.get(), r, g, b])
        }
    }
}

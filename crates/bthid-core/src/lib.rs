//! # bthid-core
//!
//! Shared library for bthid containing the HID report encoder, the
//! relative-movement step quantizer, the evdev-to-HID key translation table,
//! and the broker wire framing.
//!
//! This crate is used by both the broker daemon and the capture adapters.
//! It has zero dependencies on OS APIs, Bluetooth stacks, or sockets.
//!
//! # Architecture overview
//!
//! bthid emulates a Bluetooth HID keyboard/mouse peripheral.  Capture adapter
//! processes read local input events and encode them into byte-exact HID
//! input reports; a broker daemon forwards those reports, unmodified, to the
//! paired host over the L2CAP control/interrupt channel pair.
//!
//! This crate (`bthid-core`) is the shared foundation.  It defines:
//!
//! - **`report`** – Byte-accurate keyboard and mouse report construction.
//!   The report layout is the wire contract with the paired host; the host's
//!   HID driver parses these bytes directly.
//!
//! - **`quantize`** – The step quantizer: decomposes an arbitrary signed
//!   pixel displacement into a sequence of single-byte, wraparound-safe
//!   relative-motion deltas.
//!
//! - **`keymap`** – Translation from Linux evdev key codes to USB HID Usage
//!   IDs (page 0x07) and modifier-bit indices.
//!
//! - **`protocol`** – The framing used between capture adapters and the
//!   broker daemon (`send_keys` / `send_mouse` frames).

pub mod keymap;
pub mod protocol;
pub mod quantize;
pub mod report;

// Re-export the most-used types at the crate root so callers can write
// `bthid_core::KeyboardReportState` instead of the full path.
pub use protocol::{decode_frame, encode_frame, ProtocolError, ReportFrame};
pub use quantize::{axis_step, plan_move, scale_displacement, step_divider, AxisStep};
pub use report::keyboard::KeyboardReportState;
pub use report::mouse::{MouseButton, MouseReportState, RelAxis};
pub use report::{KeyboardReport, MouseReport, KEYBOARD_REPORT_LEN, MOUSE_REPORT_LEN};

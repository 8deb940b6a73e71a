//! HID input report construction.
//!
//! Both report layouts are fixed-size byte sequences beginning with a
//! report-type marker and a usage byte.  The exact layout is the wire
//! contract with the paired host and must not change:
//!
//! ```text
//! keyboard: [0xA1, 0x01, modifier_bits, 0x00, key0, key1, key2, key3, key4, key5]
//! mouse:    [0xA1, 0x02, button, rel_x, rel_y, wheel]
//! ```

pub mod keyboard;
pub mod mouse;

/// Report-type marker byte: DATA input report.
pub const REPORT_TYPE_INPUT: u8 = 0xA1;

/// Usage byte identifying a keyboard report.
pub const USAGE_KEYBOARD: u8 = 0x01;

/// Usage byte identifying a mouse report.
pub const USAGE_MOUSE: u8 = 0x02;

/// Total size of an encoded keyboard report in bytes.
pub const KEYBOARD_REPORT_LEN: usize = 10;

/// Total size of an encoded mouse report in bytes.
pub const MOUSE_REPORT_LEN: usize = 6;

/// An encoded keyboard input report, ready for the interrupt channel.
pub type KeyboardReport = [u8; KEYBOARD_REPORT_LEN];

/// An encoded mouse input report, ready for the interrupt channel.
pub type MouseReport = [u8; MOUSE_REPORT_LEN];

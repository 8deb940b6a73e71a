//! Keyboard report state and encoding.
//!
//! A boot-protocol keyboard report carries one modifier bitmask byte and an
//! array of exactly six key-code slots.  Six slots is a hard limit of the
//! report format: when a seventh key goes down, the oldest pressed key
//! silently stops being reported.  That is standard HID keyboard rollover
//! behaviour and is reproduced here faithfully.

use crate::report::{KeyboardReport, REPORT_TYPE_INPUT, USAGE_KEYBOARD};

/// Number of key-code slots in a keyboard report.
pub const KEY_SLOTS: usize = 6;

/// Mutable keyboard report state, owned by a single capture loop.
///
/// The key array is kept most-recently-pressed first and always holds exactly
/// [`KEY_SLOTS`] entries; unused slots are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardReportState {
    modifier_bits: u8,
    pressed_keys: Vec<u8>,
}

impl KeyboardReportState {
    /// Creates an empty report state (no modifiers, no keys down).
    pub fn new() -> Self {
        Self {
            modifier_bits: 0,
            pressed_keys: vec![0; KEY_SLOTS],
        }
    }

    /// Updates one modifier bit.
    ///
    /// Which modifier keys are active is stored in an 8-bit number, one bit
    /// per modifier.  Modifier index `m` (0–7) maps to bit `7 - m`, so index
    /// 7 (Left Ctrl) is the least significant bit.
    pub fn set_modifier(&mut self, index: u8, pressed: bool) {
        if index > 7 {
            return;
        }
        let bit_mask = 1u8 << (7 - index);
        if pressed {
            self.modifier_bits |= bit_mask;
        } else {
            self.modifier_bits &= !bit_mask;
        }
    }

    /// Records a key press.
    ///
    /// The key code is inserted at the front of the array unless it is
    /// already present.  If more than six keys are now down, the oldest is
    /// truncated from the tail and will no longer be reported.
    pub fn key_down(&mut self, usage: u8) {
        if !self.pressed_keys.contains(&usage) {
            self.pressed_keys.insert(0, usage);
        }
        self.normalize();
    }

    /// Records a key release, removing only that key code and preserving the
    /// order of the rest.
    pub fn key_up(&mut self, usage: u8) {
        if let Some(pos) = self.pressed_keys.iter().position(|&k| k == usage) {
            self.pressed_keys.remove(pos);
        }
        self.normalize();
    }

    /// Pads with zeros or truncates from the tail so the array holds exactly
    /// [`KEY_SLOTS`] entries.
    fn normalize(&mut self) {
        self.pressed_keys.truncate(KEY_SLOTS);
        while self.pressed_keys.len() < KEY_SLOTS {
            self.pressed_keys.push(0);
        }
    }

    /// Returns the current modifier bitmask byte.
    pub fn modifier_bits(&self) -> u8 {
        self.modifier_bits
    }

    /// Encodes the current state into a report byte array.
    pub fn encode(&self) -> KeyboardReport {
        let mut report = [0u8; crate::report::KEYBOARD_REPORT_LEN];
        report[0] = REPORT_TYPE_INPUT;
        report[1] = USAGE_KEYBOARD;
        report[2] = self.modifier_bits;
        report[3] = 0x00; // reserved
        report[4..].copy_from_slice(&self.pressed_keys);
        report
    }
}

impl Default for KeyboardReportState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

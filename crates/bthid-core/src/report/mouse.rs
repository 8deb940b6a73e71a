//! Mouse report state and encoding.
//!
//! Relative-motion bytes are two's-complement: a leftward or upward movement
//! of `d` pixels is written as `256 - d`.  The quantizer in [`crate::quantize`]
//! guarantees every delta it emits fits a single signed byte, so this module
//! stores motion bytes verbatim and never re-clamps them.
//!
//! The button byte holds the number of the most recently pressed button
//! (1 = left, 2 = right, 3 = middle) or 0, overwritten whole on every button
//! transition.  It is not a bitmask union of held buttons; simultaneous
//! multi-button state is last-write-wins, reproduced faithfully from the
//! reference behaviour.

use crate::report::{MouseReport, MOUSE_REPORT_LEN, REPORT_TYPE_INPUT, USAGE_MOUSE};

/// A mouse button, numbered the way the button byte encodes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left = 1,
    Right = 2,
    Middle = 3,
}

/// A relative-motion axis within the mouse report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelAxis {
    X,
    Y,
    Wheel,
}

impl RelAxis {
    fn byte_index(self) -> usize {
        match self {
            RelAxis::X => 3,
            RelAxis::Y => 4,
            RelAxis::Wheel => 5,
        }
    }
}

/// Mutable mouse report state, owned by a single capture loop.
///
/// The button byte is held across reports; motion and wheel bytes are
/// one-shot and cleared every time a report is taken, so a stale delta is
/// never re-sent.  When several motion events for the same axis arrive
/// between takes, the last write wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseReportState {
    state: [u8; MOUSE_REPORT_LEN],
}

impl MouseReportState {
    /// Creates an empty report state (no buttons, no motion).
    pub fn new() -> Self {
        let mut state = [0u8; MOUSE_REPORT_LEN];
        state[0] = REPORT_TYPE_INPUT;
        state[1] = USAGE_MOUSE;
        Self { state }
    }

    /// Records a button press or release.  The byte is overwritten whole:
    /// a press stores the button number, a release of any button clears it.
    pub fn button_event(&mut self, button: MouseButton, pressed: bool) {
        self.state[2] = if pressed { button as u8 } else { 0 };
    }

    /// Flips the button byte between this button's number and 0, returning
    /// whether the button is now down.
    ///
    /// Used by click simulation, where a single trigger alternates between
    /// press and release.
    pub fn toggle_button(&mut self, button: MouseButton) -> bool {
        if self.state[2] == button as u8 {
            self.state[2] = 0;
            false
        } else {
            self.state[2] = button as u8;
            true
        }
    }

    /// Returns the current button byte.
    pub fn button_byte(&self) -> u8 {
        self.state[2]
    }

    /// Stores a motion byte for one axis.  The value must already be in
    /// single-byte two's-complement form.
    pub fn motion(&mut self, axis: RelAxis, delta: u8) {
        self.state[axis.byte_index()] = delta;
    }

    /// Encodes the current state without consuming the motion bytes.
    pub fn encode(&self) -> MouseReport {
        self.state
    }

    /// Encodes the current state and clears all motion bytes, so the next
    /// report carries movement only if new events arrived.
    pub fn take_report(&mut self) -> MouseReport {
        let report = self.state;
        self.state[3] = 0;
        self.state[4] = 0;
        self.state[5] = 0;
        report
    }
}

impl Default for MouseReportState {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_encodes_empty_report() {
        let state = MouseReportState::new();
        assert_eq!(state.encode(), [0xA1, 0x02, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_button_byte_is_the_button_number() {
        let mut state = MouseReportState::new();
        state.button_event(MouseButton::Left, true);
        assert_eq!(state.button_byte(), 1);
        state.button_event(MouseButton::Right, true);
        assert_eq!(state.button_byte(), 2);
        state.button_event(MouseButton::Middle, true);
        assert_eq!(state.button_byte(), 3);
    }

    #[test]
    fn test_button_state_is_last_write_wins() {
        // Pressing a second button replaces the first; it is not a union.
        let mut state = MouseReportState::new();
        state.button_event(MouseButton::Left, true);
        state.button_event(MouseButton::Middle, true);
        assert_eq!(state.button_byte(), 3);

        // Releasing any button clears the byte whole.
        state.button_event(MouseButton::Left, false);
        assert_eq!(state.button_byte(), 0);
    }

    #[test]
    fn test_toggle_button_alternates() {
        let mut state = MouseReportState::new();
        assert!(state.toggle_button(MouseButton::Left));
        assert_eq!(state.button_byte(), 1);
        assert!(!state.toggle_button(MouseButton::Left));
        assert_eq!(state.button_byte(), 0);
    }

    #[test]
    fn test_toggle_different_button_switches_directly() {
        let mut state = MouseReportState::new();
        state.toggle_button(MouseButton::Left);
        assert!(state.toggle_button(MouseButton::Right));
        assert_eq!(state.button_byte(), 2);
    }

    #[test]
    fn test_motion_last_write_wins_per_axis() {
        let mut state = MouseReportState::new();
        state.motion(RelAxis::X, 5);
        state.motion(RelAxis::X, 9);
        state.motion(RelAxis::Y, 0xFB); // -5
        assert_eq!(state.encode(), [0xA1, 0x02, 0x00, 9, 0xFB, 0x00]);
    }

    #[test]
    fn test_take_report_clears_motion_but_keeps_button() {
        // Arrange
        let mut state = MouseReportState::new();
        state.button_event(MouseButton::Right, true);
        state.motion(RelAxis::X, 12);
        state.motion(RelAxis::Y, 0xF0);
        state.motion(RelAxis::Wheel, 1);

        // Act
        let first = state.take_report();
        let second = state.take_report();

        // Assert – motion is one-shot, the held button persists
        assert_eq!(first, [0xA1, 0x02, 0x02, 12, 0xF0, 1]);
        assert_eq!(second, [0xA1, 0x02, 0x02, 0, 0, 0]);
    }
}

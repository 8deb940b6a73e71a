//! Keyboard capture pipeline: evdev transitions in, keyboard reports out.

use bthid_core::{keymap, KeyboardReportState};
use tracing::{debug, info};

use crate::broker::ReportSink;
use crate::capture::{CaptureError, InputEvent, InputSource};

/// Owns the report state for one keyboard device.
#[derive(Debug, Default)]
pub struct KeyboardPipeline {
    state: KeyboardReportState,
}

impl KeyboardPipeline {
    pub fn new() -> Self {
        Self {
            state: KeyboardReportState::new(),
        }
    }

    /// Applies one key transition and sends the resulting report.
    ///
    /// Keys with no HID usage are skipped without a send; the host never
    /// sees a report that didn't change.
    pub fn handle_key(&mut self, code: u16, pressed: bool, sink: &mut impl ReportSink) {
        if let Some(index) = keymap::modifier_index(code) {
            self.state.set_modifier(index, pressed);
        } else {
            let usage = keymap::hid_usage(code);
            if usage == 0 {
                debug!(code, "key has no HID usage, skipped");
                return;
            }
            if pressed {
                self.state.key_down(usage);
            } else {
                self.state.key_up(usage);
            }
        }
        sink.send_keys(&self.state.encode());
    }

    /// Drains a source until it disconnects, forwarding every key report.
    ///
    /// Returns the terminating error so the caller can re-enter discovery.
    pub fn run(
        &mut self,
        source: &mut impl InputSource,
        sink: &mut impl ReportSink,
    ) -> CaptureError {
        info!("keyboard capture loop started");
        loop {
            match source.next_event() {
                Ok(InputEvent::Key { code, pressed }) => self.handle_key(code, pressed, sink),
                // Pointer events on a combo device belong to the mouse adapter.
                Ok(_) => {}
                Err(e) => return e,
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

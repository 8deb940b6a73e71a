//! Mouse capture pipeline: evdev button/motion events in, mouse reports out.
//!
//! Each event produces exactly one report, taken from the state so motion
//! bytes are sent once and never re-sent. Motion values are folded into the
//! single signed byte the report carries (`value & 0xFF`); live devices
//! produce small per-event deltas, so no quantizing loop is needed here —
//! that path is for synthetic long moves (see [`crate::emulator`]).

use bthid_core::report::mouse::RelAxis;
use bthid_core::{keymap, MouseReportState};
use tracing::{debug, info};

use crate::broker::ReportSink;
use crate::capture::{CaptureError, InputEvent, InputSource};

/// Owns the report state for one pointing device.
#[derive(Debug, Default)]
pub struct MousePipeline {
    state: MouseReportState,
}

impl MousePipeline {
    pub fn new() -> Self {
        Self {
            state: MouseReportState::new(),
        }
    }

    /// Applies one button transition and sends the resulting report.
    pub fn handle_button(&mut self, code: u16, pressed: bool, sink: &mut impl ReportSink) {
        let Some(button) = keymap::mouse_button(code) else {
            debug!(code, "unsupported button, skipped");
            return;
        };
        self.state.button_event(button, pressed);
        sink.send_mouse(&self.state.take_report());
    }

    /// Applies one relative-motion event and sends the resulting report.
    pub fn handle_rel(&mut self, axis: u16, value: i32, sink: &mut impl ReportSink) {
        let axis = match axis {
            keymap::REL_X => RelAxis::X,
            keymap::REL_Y => RelAxis::Y,
            keymap::REL_WHEEL => RelAxis::Wheel,
            other => {
                debug!(axis = other, "unsupported axis, skipped");
                return;
            }
        };
        self.state.motion(axis, (value & 0xFF) as u8);
        sink.send_mouse(&self.state.take_report());
    }

    /// Drains a source until it disconnects, forwarding every mouse report.
    ///
    /// Returns the terminating error so the caller can re-enter discovery.
    pub fn run(
        &mut self,
        source: &mut impl InputSource,
        sink: &mut impl ReportSink,
    ) -> CaptureError {
        info!("mouse capture loop started");
        loop {
            match source.next_event() {
                Ok(InputEvent::Button { code, pressed }) => {
                    self.handle_button(code, pressed, sink)
                }
                Ok(InputEvent::Rel { axis, value }) => self.handle_rel(axis, value, sink),
                // Key events on a combo device belong to the keyboard adapter.
                Ok(InputEvent::Key { .. }) => {}
                Err(e) => return e,
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

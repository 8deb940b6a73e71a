//! Synthetic movement and click emulation.
//!
//! Where the live capture path forwards small per-event deltas, this path
//! takes one long displacement request, scales it by the configured
//! coefficient, and walks it down through the quantizer, emitting one report
//! per step with an optional pacing delay in between.

use std::thread::sleep;
use std::time::Duration;

use bthid_core::quantize::{plan_move, scale_displacement};
use bthid_core::report::mouse::{MouseButton, RelAxis};
use bthid_core::MouseReportState;
use tracing::{info, warn};

use crate::broker::ReportSink;
use crate::config::MoveProfile;

/// Drives synthetic mouse activity against a report sink.
pub struct MoveEmulator {
    state: MouseReportState,
    profile: MoveProfile,
    pace: Option<Duration>,
}

impl MoveEmulator {
    /// `pace` is an optional delay inserted between movement reports, for
    /// hosts that drop bursts.
    pub fn new(profile: MoveProfile, pace: Option<Duration>) -> Self {
        Self {
            state: MouseReportState::new(),
            profile,
            pace,
        }
    }

    /// The configured step ceiling expressed as a speed scale over the full
    /// single-byte range, so `move_step: 128` reproduces unscaled stepping.
    fn speed(&self) -> f64 {
        f64::from(self.profile.move_step) / 128.0
    }

    /// Moves the cursor by `(dx, dy)` pixels, decomposed into paced
    /// single-byte reports. Held buttons ride along unchanged, so a
    /// drag-in-progress survives a synthetic move.
    pub fn simulate_move(&mut self, dx: i32, dy: i32, sink: &mut impl ReportSink) {
        let rel_x = scale_displacement(dx, self.profile.move_coefficient);
        let rel_y = scale_displacement(dy, self.profile.move_coefficient);
        info!(dx, dy, rel_x, rel_y, "initiating movement emulation");

        for (step_x, step_y) in plan_move(rel_x, rel_y, self.speed()) {
            self.state.motion(RelAxis::X, step_x);
            self.state.motion(RelAxis::Y, step_y);
            sink.send_mouse(&self.state.take_report());
            if let Some(pace) = self.pace {
                sleep(pace);
            }
        }
    }

    /// Toggles a button by its report number (1 = left, 2 = right,
    /// 3 = middle): first call presses, second releases.
    pub fn simulate_click(&mut self, button_id: u8, sink: &mut impl ReportSink) {
        let button = match button_id {
            1 => MouseButton::Left,
            2 => MouseButton::Right,
            3 => MouseButton::Middle,
            other => {
                warn!(button = other, "unknown button id, ignored");
                return;
            }
        };
        let pressed = self.state.toggle_button(button);
        info!(?button, pressed, "click emulation");
        sink.send_mouse(&self.state.take_report());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::RecordingSink;

    fn profile(move_step: u16, move_coefficient: f64) -> MoveProfile {
        MoveProfile {
            move_step,
            move_coefficient,
        }
    }

    fn signed(byte: u8) -> i32 {
        i32::from(byte as i8)
    }

    #[test]
    fn test_long_move_decomposes_and_sums_exactly() {
        let mut emulator = MoveEmulator::new(profile(128, 1.0), None);
        let mut sink = RecordingSink::default();

        emulator.simulate_move(300, -50, &mut sink);

        let sum_x: i32 = sink.mouse.iter().map(|r| signed(r[3])).sum();
        let sum_y: i32 = sink.mouse.iter().map(|r| signed(r[4])).sum();
        assert_eq!(sum_x, 300);
        assert_eq!(sum_y, -50);
        // Every report is a well-formed mouse report.
        for report in &sink.mouse {
            assert_eq!(&report[..2], &[0xA1, 0x02]);
        }
    }

    #[test]
    fn test_coefficient_scales_the_displacement() {
        let mut emulator = MoveEmulator::new(profile(128, 0.5), None);
        let mut sink = RecordingSink::default();

        emulator.simulate_move(100, 0, &mut sink);

        let sum_x: i32 = sink.mouse.iter().map(|r| signed(r[3])).sum();
        assert_eq!(sum_x, 50);
    }

    #[test]
    fn test_move_step_caps_individual_deltas() {
        let mut emulator = MoveEmulator::new(profile(32, 1.0), None);
        let mut sink = RecordingSink::default();

        emulator.simulate_move(200, 0, &mut sink);

        let sum_x: i32 = sink.mouse.iter().map(|r| signed(r[3])).sum();
        assert_eq!(sum_x, 200);
        for report in &sink.mouse {
            assert!(signed(report[3]) <= 32);
        }
    }

    #[test]
    fn test_zero_move_sends_nothing() {
        let mut emulator = MoveEmulator::new(profile(128, 1.0), None);
        let mut sink = RecordingSink::default();

        emulator.simulate_move(0, 0, &mut sink);

        assert!(sink.mouse.is_empty());
    }

    #[test]
    fn test_click_toggles_press_then_release() {
        let mut emulator = MoveEmulator::new(profile(128, 1.0), None);
        let mut sink = RecordingSink::default();

        emulator.simulate_click(1, &mut sink);
        emulator.simulate_click(1, &mut sink);

        assert_eq!(sink.mouse[0][2], 0x01);
        assert_eq!(sink.mouse[1][2], 0x00);
    }

    #[test]
    fn test_held_button_rides_along_with_movement() {
        let mut emulator = MoveEmulator::new(profile(128, 1.0), None);
        let mut sink = RecordingSink::default();

        emulator.simulate_click(1, &mut sink);
        emulator.simulate_move(10, 0, &mut sink);

        // Drag: the left button stays down in every movement report.
        for report in &sink.mouse[1..] {
            assert_eq!(report[2], 0x01);
        }
    }

    #[test]
    fn test_unknown_button_id_is_ignored() {
        let mut emulator = MoveEmulator::new(profile(128, 1.0), None);
        let mut sink = RecordingSink::default();

        emulator.simulate_click(9, &mut sink);

        assert!(sink.mouse.is_empty());
    }
}

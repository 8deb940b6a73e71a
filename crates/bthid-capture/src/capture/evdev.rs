//! evdev-backed input source (Linux).
//!
//! Device selection is by case-insensitive substring match on the device
//! name, so `--dev mouse` picks up "Logitech USB Optical Mouse". Discovery
//! retries on a fixed delay: keyboards forever (the adapter may start before
//! the device is plugged in), pointing devices up to a capped attempt count.

use std::thread::sleep;
use std::time::Duration;

use evdev::{Device, InputEventKind};
use tracing::{debug, info, warn};

use crate::capture::{
    CaptureError, InputEvent, InputSource, DISCOVERY_RETRY_SECS, MOUSE_DISCOVERY_ATTEMPTS,
};

/// Input source reading one evdev device.
pub struct EvdevSource {
    device: Device,
    /// Events already fetched but not yet handed out.
    pending: Vec<InputEvent>,
}

impl EvdevSource {
    /// Finds a keyboard-like device by name substring, retrying every
    /// [`DISCOVERY_RETRY_SECS`] seconds indefinitely.
    pub fn discover_keyboard(pattern: &str) -> Result<Self, CaptureError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            if let Some(device) = find_by_name(pattern) {
                return Ok(Self::from_device(device));
            }
            debug!(pattern, attempt, "keyboard not found, retrying");
            sleep(Duration::from_secs(DISCOVERY_RETRY_SECS));
        }
    }

    /// Finds a pointing device by name substring, giving up after
    /// [`MOUSE_DISCOVERY_ATTEMPTS`] tries.
    pub fn discover_mouse(pattern: &str) -> Result<Self, CaptureError> {
        for attempt in 1..=MOUSE_DISCOVERY_ATTEMPTS {
            if let Some(device) = find_by_name(pattern) {
                return Ok(Self::from_device(device));
            }
            debug!(pattern, attempt, "mouse not found, retrying");
            sleep(Duration::from_secs(DISCOVERY_RETRY_SECS));
        }
        Err(CaptureError::DeviceNotFound {
            pattern: pattern.to_string(),
            attempts: MOUSE_DISCOVERY_ATTEMPTS,
        })
    }

    fn from_device(device: Device) -> Self {
        info!(name = device.name().unwrap_or("<unnamed>"), "input device opened");
        Self {
            device,
            pending: Vec::new(),
        }
    }
}

fn find_by_name(pattern: &str) -> Option<Device> {
    let needle = pattern.to_lowercase();
    evdev::enumerate().map(|(_, device)| device).find(|device| {
        device
            .name()
            .map(|name| name.to_lowercase().contains(&needle))
            .unwrap_or(false)
    })
}

impl InputSource for EvdevSource {
    fn next_event(&mut self) -> Result<InputEvent, CaptureError> {
        loop {
            if let Some(event) = self.pending.pop() {
                return Ok(event);
            }

            let events = self.device.fetch_events().map_err(|e| {
                warn!(error = %e, "event fetch failed");
                CaptureError::Disconnected
            })?;

            // Reverse so pop() hands events out in arrival order.
            let mut batch: Vec<InputEvent> = events
                .filter_map(|raw| match raw.kind() {
                    InputEventKind::Key(key) if key.code() >= 0x110 && key.code() < 0x120 => {
                        // Button range; value 2 (autorepeat) never occurs here.
                        Some(InputEvent::Button {
                            code: key.code(),
                            pressed: raw.value() == 1,
                        })
                    }
                    InputEventKind::Key(key) => match raw.value() {
                        // Autorepeat transitions carry no report change.
                        2 => None,
                        value => Some(InputEvent::Key {
                            code: key.code(),
                            pressed: value == 1,
                        }),
                    },
                    InputEventKind::RelAxis(axis) => Some(InputEvent::Rel {
                        axis: axis.0,
                        value: raw.value(),
                    }),
                    _ => None,
                })
                .collect();
            batch.reverse();
            self.pending = batch;
        }
    }
}

//! Local input event sources.
//!
//! A source yields discrete transition and motion events from one input
//! device. Reads are blocking; each adapter process drives exactly one source
//! from its main loop, so there is no shared state to protect.

use thiserror::Error;

pub mod mock;

#[cfg(target_os = "linux")]
pub mod evdev;

/// Delay between device discovery attempts.
pub const DISCOVERY_RETRY_SECS: u64 = 3;

/// Maximum discovery attempts for a pointing device before giving up.
pub const MOUSE_DISCOVERY_ATTEMPTS: u32 = 100;

/// One input event, already reduced to what the report pipeline needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down (`pressed == true`) or up. `code` is the evdev key
    /// code; translation to HID usages happens in the pipeline.
    Key { code: u16, pressed: bool },
    /// A mouse button transition.
    Button { code: u16, pressed: bool },
    /// Relative motion on one axis, in device units.
    Rel { axis: u16, value: i32 },
}

/// Error type for capture operations.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No device matching the name pattern was found within the retry budget.
    #[error("no input device matching \"{pattern}\" after {attempts} attempt(s)")]
    DeviceNotFound { pattern: String, attempts: u32 },

    /// The device vanished mid-stream (unplugged, revoked). Recoverable by
    /// rediscovery.
    #[error("input device disconnected")]
    Disconnected,

    /// Other I/O failure on the event stream.
    #[error("event stream error: {0}")]
    Io(#[from] std::io::Error),
}

/// A blocking stream of input events from one device.
pub trait InputSource: Send {
    /// Blocks until the next event is available.
    ///
    /// # Errors
    ///
    /// [`CaptureError::Disconnected`] when the device goes away; the caller
    /// re-enters discovery. Individual malformed events are skipped inside
    /// the source, never surfaced.
    fn next_event(&mut self) -> Result<InputEvent, CaptureError>;
}

//! # bthid-capture
//!
//! Input capture adapters for bthid. Each binary reads one local input
//! device (or simulates one), encodes HID reports, and hands them to the
//! broker daemon over its Unix socket.
//!
//! ```text
//! bthid-keyboard          bthid-mouse
//!  └─ capture::evdev       └─ capture::evdev | emulator
//!  └─ keyboard pipeline    └─ mouse pipeline
//!  └─ broker client ───────┴─ broker client ──► bthid-broker
//! ```

pub mod broker;
pub mod capture;
pub mod config;
pub mod emulator;
pub mod keyboard;
pub mod logging;
pub mod mouse;

pub use broker::{BrokerClient, ReportSink};
pub use capture::{CaptureError, InputEvent, InputSource};
pub use config::{Config, ConfigError, MoveProfile};

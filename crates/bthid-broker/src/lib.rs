//! # bthid-broker
//!
//! The report-forwarding daemon. Capture adapters hand finished HID reports
//! to this process over a Unix domain socket; the broker owns the peripheral
//! link to the paired host and writes every report to the interrupt channel
//! unmodified.
//!
//! Transport selection is a build-time concern: with the `bluez` feature the
//! link speaks BlueZ L2CAP; without it a discarding in-memory link stands in
//! so the daemon still runs on hosts with no Bluetooth stack.

pub mod link;
pub mod service;

pub use link::{LinkError, LinkState, PeripheralLink};

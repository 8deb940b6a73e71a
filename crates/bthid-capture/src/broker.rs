//! Client side of the broker's forwarding surface.
//!
//! `send_keys` and `send_mouse` are fire-and-forget: a failed send is logged
//! and the report is gone. The capture loop must never stall or die because
//! the broker is restarting, so the client drops its connection on error and
//! quietly redials on the next send.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use bthid_core::protocol::{encode_frame, ReportFrame};
use bthid_core::{KeyboardReport, MouseReport};
use tracing::{debug, warn};

/// Destination for finished reports.
pub trait ReportSink {
    fn send_keys(&mut self, report: &KeyboardReport);
    fn send_mouse(&mut self, report: &MouseReport);
}

/// Unix-socket connection to the broker daemon.
pub struct BrokerClient {
    path: PathBuf,
    stream: Option<UnixStream>,
}

impl BrokerClient {
    /// Creates a client for the given socket path. The connection itself is
    /// established lazily on the first send, so adapters can start before
    /// the broker does.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stream: None,
        }
    }

    fn send(&mut self, frame: &ReportFrame) {
        if self.stream.is_none() {
            match UnixStream::connect(&self.path) {
                Ok(stream) => {
                    debug!(path = %self.path.display(), "connected to broker");
                    self.stream = Some(stream);
                }
                Err(e) => {
                    warn!(error = %e, "broker unreachable, report dropped");
                    return;
                }
            }
        }

        let bytes = encode_frame(frame);
        if let Some(stream) = self.stream.as_mut() {
            if let Err(e) = stream.write_all(&bytes) {
                warn!(error = %e, "broker send failed, report dropped");
                self.stream = None;
            }
        }
    }
}

impl ReportSink for BrokerClient {
    fn send_keys(&mut self, report: &KeyboardReport) {
        self.send(&ReportFrame::Keys(*report));
    }

    fn send_mouse(&mut self, report: &MouseReport) {
        self.send(&ReportFrame::Mouse(*report));
    }
}

/// Sink that records every report, for pipeline tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub keys: Vec<KeyboardReport>,
    pub mouse: Vec<MouseReport>,
}

impl ReportSink for RecordingSink {
    fn send_keys(&mut self, report: &KeyboardReport) {
        self.keys.push(*report);
    }

    fn send_mouse(&mut self, report: &MouseReport) {
        self.mouse.push(*report);
    }
}

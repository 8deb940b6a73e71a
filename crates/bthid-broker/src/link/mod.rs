//! Peripheral link: ownership of the channel pair to the paired host.
//!
//! A link is only usable for transmission while [`LinkState::Connected`];
//! a transmit attempted in any other state fails fast with
//! [`LinkError::NotConnected`] and the caller decides what to do with the
//! report (the broker drops it and keeps serving).

use async_trait::async_trait;
use thiserror::Error;

pub mod mock;

#[cfg(all(target_os = "linux", feature = "bluez"))]
pub mod l2cap;

/// L2CAP port for the HID control channel.
pub const PSM_CONTROL: u16 = 17;

/// L2CAP port for the HID interrupt (data) channel.
pub const PSM_INTERRUPT: u16 = 19;

/// How long to wait between outbound connection attempts.
pub const RECONNECT_INTERVAL_SECS: u64 = 1;

/// Link lifecycle states.
///
/// Normal inbound flow is `Unbound → Listening → Connected`, returning to
/// `Listening` when the host drops the session. Outbound-reconnect mode goes
/// `Unbound → Connecting → Connected` instead, polling a known host address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// No sockets exist yet.
    #[default]
    Unbound,
    /// Channel listeners are bound; waiting for the host to connect inbound.
    Listening,
    /// Actively dialing a known host address (outbound-reconnect mode).
    Connecting,
    /// Both control and interrupt channels are open; reports may flow.
    Connected,
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LinkState::Unbound => "unbound",
            LinkState::Listening => "listening",
            LinkState::Connecting => "connecting",
            LinkState::Connected => "connected",
        };
        f.write_str(name)
    }
}

/// Error type for peripheral link operations.
#[derive(Debug, Error)]
pub enum LinkError {
    /// A transmit was attempted while the link is not connected.
    #[error("link not connected (state: {state})")]
    NotConnected { state: LinkState },

    /// The peer address could not be parsed.
    #[error("invalid peer address: {0}")]
    InvalidAddress(String),

    /// Socket-level failure on the control or interrupt channel.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failure reported by the Bluetooth stack.
    #[error("bluetooth stack error: {0}")]
    Stack(String),
}

/// A transport capable of delivering finished HID reports to the paired host.
///
/// Implementations own the session sockets and track their own [`LinkState`];
/// session establishment (accept or outbound reconnect) runs outside this
/// trait, in each implementation's own serve loop.
#[async_trait]
pub trait PeripheralLink: Send {
    /// Writes one report to the interrupt channel.
    ///
    /// # Errors
    ///
    /// Fails fast with [`LinkError::NotConnected`] when no session is open,
    /// or [`LinkError::Io`] when the write itself fails. Either way the
    /// report is lost; retrying is the caller's decision.
    async fn transmit(&mut self, report: &[u8]) -> Result<(), LinkError>;

    /// Current lifecycle state.
    fn state(&self) -> LinkState;
}

//! Test and fallback links: one records, one discards.

use async_trait::async_trait;

use crate::link::{LinkError, LinkState, PeripheralLink};

/// In-memory link that records every transmitted report, for tests.
#[derive(Debug, Default)]
pub struct RecordingLink {
    state: LinkState,
    sent: Vec<Vec<u8>>,
    fail_next: bool,
}

impl RecordingLink {
    /// Creates a link already in the `Connected` state.
    pub fn connected() -> Self {
        Self {
            state: LinkState::Connected,
            sent: Vec::new(),
            fail_next: false,
        }
    }

    /// Creates a link stuck in `Listening`; every transmit fails fast.
    pub fn listening() -> Self {
        Self {
            state: LinkState::Listening,
            sent: Vec::new(),
            fail_next: false,
        }
    }

    /// Makes the next transmit return an I/O error, simulating the host
    /// dropping the session mid-write.
    pub fn fail_next_transmit(&mut self) {
        self.fail_next = true;
    }

    /// Reports recorded so far, in transmission order.
    pub fn sent(&self) -> &[Vec<u8>] {
        &self.sent
    }
}

/// Link that accepts and discards every report.
///
/// Stands in for the real transport when the daemon is built without the
/// `bluez` feature, keeping the forwarding pipeline runnable on hosts with
/// no Bluetooth stack.
#[derive(Debug, Default)]
pub struct NullLink;

#[async_trait]
impl PeripheralLink for NullLink {
    async fn transmit(&mut self, _report: &[u8]) -> Result<(), LinkError> {
        Ok(())
    }

    fn state(&self) -> LinkState {
        LinkState::Connected
    }
}

#[async_trait]
impl PeripheralLink for RecordingLink {
    async fn transmit(&mut self, report: &[u8]) -> Result<(), LinkError> {
        if self.state != LinkState::Connected {
            return Err(LinkError::NotConnected { state: self.state });
        }
        if self.fail_next {
            self.fail_next = false;
            self.state = LinkState::Listening;
            return Err(LinkError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "peer closed interrupt channel",
            )));
        }
        self.sent.push(report.to_vec());
        Ok(())
    }

    fn state(&self) -> LinkState {
        self.state
    }
}

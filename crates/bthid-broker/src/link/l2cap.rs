//! BlueZ L2CAP transport for the peripheral link.
//!
//! HID over Bluetooth classic uses two seqpacket channels on well-known
//! PSMs: control on 17 and interrupt on 19. The host's HID driver opens both
//! inbound after profile negotiation; in outbound-reconnect mode we dial a
//! previously paired host ourselves instead of waiting.

use bluer::l2cap::{SeqPacket, SeqPacketListener, SocketAddr};
use bluer::{Address, AddressType};
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use async_trait::async_trait;

use crate::link::{
    LinkError, LinkState, PeripheralLink, PSM_CONTROL, PSM_INTERRUPT, RECONNECT_INTERVAL_SECS,
};

/// Resolves the local default adapter's Bluetooth address via bluetoothd.
pub async fn local_adapter_address() -> Result<Address, LinkError> {
    let session = bluer::Session::new()
        .await
        .map_err(|e| LinkError::Stack(e.to_string()))?;
    let adapter = session
        .default_adapter()
        .await
        .map_err(|e| LinkError::Stack(e.to_string()))?;
    adapter
        .address()
        .await
        .map_err(|e| LinkError::Stack(e.to_string()))
}

/// Parses a `AA:BB:CC:DD:EE:FF` peer address string.
pub fn parse_address(s: &str) -> Result<Address, LinkError> {
    s.parse::<Address>()
        .map_err(|_| LinkError::InvalidAddress(s.to_string()))
}

fn channel_addr(address: Address, psm: u16) -> SocketAddr {
    SocketAddr::new(address, AddressType::BrEdr, psm)
}

/// Bound listeners for the control and interrupt PSMs.
///
/// Bound once at startup and reused across sessions, so the accept state
/// survives host disconnects without rebinding.
pub struct ChannelListeners {
    control: SeqPacketListener,
    interrupt: SeqPacketListener,
}

impl ChannelListeners {
    /// Binds both PSMs on the local adapter address.
    pub async fn bind(local: Address) -> Result<Self, LinkError> {
        let control = SeqPacketListener::bind(channel_addr(local, PSM_CONTROL)).await?;
        let interrupt = SeqPacketListener::bind(channel_addr(local, PSM_INTERRUPT)).await?;
        info!(%local, "bound L2CAP channels (control {PSM_CONTROL}, interrupt {PSM_INTERRUPT})");
        Ok(Self { control, interrupt })
    }

    /// Waits for an inbound session: control channel first, then interrupt,
    /// matching the order the host's HID driver opens them.
    pub async fn accept_pair(&self) -> Result<(SeqPacket, SeqPacket, Address), LinkError> {
        let (control, control_peer) = self.control.accept().await?;
        debug!(peer = %control_peer.addr, "control channel accepted");
        let (interrupt, interrupt_peer) = self.interrupt.accept().await?;
        debug!(peer = %interrupt_peer.addr, "interrupt channel accepted");
        Ok((control, interrupt, interrupt_peer.addr))
    }
}

/// Dials a known host, retrying on a fixed interval until both channels are
/// open. Never gives up on its own; cancellation is process shutdown.
pub async fn dial_until_connected(peer: Address) -> (SeqPacket, SeqPacket) {
    info!(%peer, "reconnect mode: dialing host");
    loop {
        match dial(peer).await {
            Ok(pair) => return pair,
            Err(e) => {
                debug!(%peer, error = %e, "dial failed, retrying");
                sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }
}

async fn dial(peer: Address) -> Result<(SeqPacket, SeqPacket), LinkError> {
    let control = SeqPacket::connect(channel_addr(peer, PSM_CONTROL)).await?;
    let interrupt = SeqPacket::connect(channel_addr(peer, PSM_INTERRUPT)).await?;
    Ok((control, interrupt))
}

/// Peripheral link over a BlueZ L2CAP session.
pub struct L2capLink {
    control: Option<SeqPacket>,
    interrupt: Option<SeqPacket>,
    state: LinkState,
}

impl L2capLink {
    pub fn new() -> Self {
        Self {
            control: None,
            interrupt: None,
            state: LinkState::Unbound,
        }
    }

    /// Marks the link as waiting for an inbound or outbound session, so
    /// transmits attempted in the meantime fail fast with the right state.
    pub fn begin_waiting(&mut self, state: LinkState) {
        self.state = state;
    }

    /// Installs an established session. Transmits become possible from here
    /// until the next write failure.
    pub fn install_session(&mut self, control: SeqPacket, interrupt: SeqPacket, peer: Address) {
        self.control = Some(control);
        self.interrupt = Some(interrupt);
        self.state = LinkState::Connected;
        info!(%peer, "host session established");
    }

    /// Tears down the session sockets and re-enters the accept state.
    pub fn drop_session(&mut self) {
        self.control = None;
        self.interrupt = None;
        self.state = LinkState::Listening;
        warn!("host session dropped");
    }
}

impl Default for L2capLink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeripheralLink for L2capLink {
    async fn transmit(&mut self, report: &[u8]) -> Result<(), LinkError> {
        let interrupt = self.interrupt.as_ref().ok_or(LinkError::NotConnected {
            state: self.state,
        })?;
        match interrupt.send(report).await {
            Ok(_) => Ok(()),
            Err(e) => {
                // A failed write is how we learn the host went away.
                self.drop_session();
                Err(LinkError::Io(e))
            }
        }
    }

    fn state(&self) -> LinkState {
        self.state
    }
}

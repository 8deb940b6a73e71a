//! Adapter-facing forwarding service.
//!
//! Capture adapters connect over a Unix domain socket and stream report
//! frames. Every decoded frame is forwarded to the peripheral link byte for
//! byte. Forwarding is fire-and-forget: a transmit failure is logged, the
//! report is dropped, and the adapter connection stays up — the adapter is
//! never told, matching the best-effort contract of the send calls.

use std::sync::Arc;

use bthid_core::protocol::{decode_frame, ProtocolError};
use tokio::io::AsyncReadExt;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::link::PeripheralLink;

/// Serves adapter connections forever.
///
/// Each accepted connection gets its own task; all of them share the one
/// peripheral link behind a mutex, which is also the serialization point
/// keeping interleaved reports whole on the interrupt channel.
pub async fn serve<L>(listener: UnixListener, link: Arc<Mutex<L>>) -> std::io::Result<()>
where
    L: PeripheralLink + 'static,
{
    loop {
        let (stream, _) = listener.accept().await?;
        info!("capture adapter connected");
        let link = Arc::clone(&link);
        tokio::spawn(async move {
            handle_adapter(stream, link).await;
            info!("capture adapter disconnected");
        });
    }
}

/// Reads frames from one adapter until it disconnects or sends garbage.
async fn handle_adapter<L>(mut stream: UnixStream, link: Arc<Mutex<L>>)
where
    L: PeripheralLink,
{
    let mut buf: Vec<u8> = Vec::with_capacity(256);
    let mut chunk = [0u8; 256];

    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(e) => {
                warn!(error = %e, "adapter read failed");
                return;
            }
        }

        loop {
            match decode_frame(&buf) {
                Ok((frame, consumed)) => {
                    buf.drain(..consumed);
                    forward(&link, frame.report_bytes()).await;
                }
                Err(ProtocolError::InsufficientData { .. }) => break,
                Err(e) => {
                    // Framing is lost; the only safe move is to drop the
                    // connection and let the adapter reconnect.
                    warn!(error = %e, "malformed frame, closing adapter connection");
                    return;
                }
            }
        }
    }
}

/// Forwards one report to the link, swallowing failures.
async fn forward<L>(link: &Arc<Mutex<L>>, report: &[u8])
where
    L: PeripheralLink,
{
    let mut link = link.lock().await;
    match link.transmit(report).await {
        Ok(()) => debug!(len = report.len(), "report forwarded"),
        Err(e) => warn!(error = %e, "transmit failed, report dropped"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::mock::RecordingLink;
    use bthid_core::protocol::{encode_frame, ReportFrame};
    use tokio::io::AsyncWriteExt;

    async fn socket_pair() -> (UnixStream, UnixStream) {
        UnixStream::pair().expect("socketpair")
    }

    #[tokio::test]
    async fn test_frames_are_forwarded_to_the_link() {
        let (mut adapter, broker_side) = socket_pair().await;
        let link = Arc::new(Mutex::new(RecordingLink::connected()));

        let server = tokio::spawn(handle_adapter(broker_side, Arc::clone(&link)));

        let keys = [0xA1, 0x01, 0x02, 0x00, 0x04, 0, 0, 0, 0, 0];
        let mouse = [0xA1, 0x02, 0x01, 5, 0, 0];
        adapter
            .write_all(&encode_frame(&ReportFrame::Keys(keys)))
            .await
            .unwrap();
        adapter
            .write_all(&encode_frame(&ReportFrame::Mouse(mouse)))
            .await
            .unwrap();
        drop(adapter);
        server.await.unwrap();

        let link = link.lock().await;
        assert_eq!(link.sent(), &[keys.to_vec(), mouse.to_vec()]);
    }

    #[tokio::test]
    async fn test_split_frame_across_reads_is_reassembled() {
        let (mut adapter, broker_side) = socket_pair().await;
        let link = Arc::new(Mutex::new(RecordingLink::connected()));

        let server = tokio::spawn(handle_adapter(broker_side, Arc::clone(&link)));

        let mouse = [0xA1, 0x02, 0x00, 127, 224, 0];
        let bytes = encode_frame(&ReportFrame::Mouse(mouse));
        adapter.write_all(&bytes[..4]).await.unwrap();
        adapter.flush().await.unwrap();
        tokio::task::yield_now().await;
        adapter.write_all(&bytes[4..]).await.unwrap();
        drop(adapter);
        server.await.unwrap();

        let link = link.lock().await;
        assert_eq!(link.sent(), &[mouse.to_vec()]);
    }

    #[tokio::test]
    async fn test_transmit_failure_drops_report_but_keeps_connection() {
        let (mut adapter, broker_side) = socket_pair().await;
        let mut failing = RecordingLink::connected();
        failing.fail_next_transmit();
        let link = Arc::new(Mutex::new(failing));

        let server = tokio::spawn(handle_adapter(broker_side, Arc::clone(&link)));

        let mouse = [0xA1, 0x02, 0x00, 1, 0, 0];
        // First report hits the injected failure and is dropped silently.
        adapter
            .write_all(&encode_frame(&ReportFrame::Mouse(mouse)))
            .await
            .unwrap();
        adapter
            .write_all(&encode_frame(&ReportFrame::Mouse(mouse)))
            .await
            .unwrap();
        drop(adapter);
        server.await.unwrap();

        // Both reports were attempted and dropped: the first on the injected
        // write failure, the second because the link had left Connected.
        let link = link.lock().await;
        assert!(link.sent().is_empty());
        assert_eq!(link.state(), crate::link::LinkState::Listening);
    }

    #[tokio::test]
    async fn test_malformed_frame_closes_the_connection() {
        let (mut adapter, broker_side) = socket_pair().await;
        let link = Arc::new(Mutex::new(RecordingLink::connected()));

        let server = tokio::spawn(handle_adapter(broker_side, Arc::clone(&link)));

        adapter.write_all(&[0x7F, 0x01, 10]).await.unwrap();
        // The server should hang up on its own without us closing first.
        server.await.unwrap();

        let link = link.lock().await;
        assert!(link.sent().is_empty());
    }
}

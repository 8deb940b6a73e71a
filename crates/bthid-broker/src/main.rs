//! bthid broker daemon entry point.
//!
//! Wires the adapter-facing Unix socket to the peripheral link and runs until
//! Ctrl-C.
//!
//! ```text
//! main()
//!  └─ tracing init (console + optional log file)
//!  └─ UnixListener bind
//!  └─ link session task   -- accept loop or outbound reconnect (bluez)
//!  └─ service::serve      -- frame decode + forward
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::UnixListener;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bthid_broker::service;

#[derive(Debug, Parser)]
#[command(name = "bthid-broker", about = "HID report forwarding daemon")]
struct Args {
    /// Unix socket path capture adapters connect to.
    #[arg(long, default_value = "/tmp/bthid-broker.sock")]
    socket: PathBuf,

    /// Host Bluetooth address to dial instead of waiting for an inbound
    /// connection (outbound-reconnect mode).
    #[arg(long)]
    reconnect: Option<String>,

    /// Append logs to this file in addition to stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let appender = tracing_appender::rolling::never(
                path.parent().unwrap_or_else(|| std::path::Path::new(".")),
                path.file_name().unwrap_or_else(|| std::ffi::OsStr::new("bthid-broker.log")),
            );
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _log_guard = init_tracing(args.log_file.as_ref());

    info!("bthid broker starting");

    // A stale socket file from a previous run would make bind fail.
    if args.socket.exists() {
        std::fs::remove_file(&args.socket)?;
    }
    let listener = UnixListener::bind(&args.socket)?;
    info!(socket = %args.socket.display(), "listening for capture adapters");

    run(listener, args.reconnect).await
}

#[cfg(all(target_os = "linux", feature = "bluez"))]
async fn run(listener: UnixListener, reconnect: Option<String>) -> anyhow::Result<()> {
    use bthid_broker::link::l2cap::{
        dial_until_connected, local_adapter_address, parse_address, ChannelListeners, L2capLink,
    };
    use bthid_broker::{LinkState, PeripheralLink};

    let link = Arc::new(Mutex::new(L2capLink::new()));

    // Session keeper: establishes a host session and re-establishes it after
    // a transmit failure tears it down. Session setup happens outside the
    // link mutex so concurrent transmits fail fast instead of queueing.
    let session_link = Arc::clone(&link);
    tokio::spawn(async move {
        let result: Result<(), bthid_broker::LinkError> = async {
            let peer = reconnect.as_deref().map(parse_address).transpose()?;
            let listeners = match peer {
                Some(_) => None,
                None => {
                    let local = local_adapter_address().await?;
                    Some(ChannelListeners::bind(local).await?)
                }
            };

            loop {
                let waiting = session_link.lock().await.state() != LinkState::Connected;
                if waiting {
                    let (control, interrupt, host) = match (peer, &listeners) {
                        (Some(addr), _) => {
                            session_link.lock().await.begin_waiting(LinkState::Connecting);
                            let (c, i) = dial_until_connected(addr).await;
                            (c, i, addr)
                        }
                        (None, Some(listeners)) => {
                            session_link.lock().await.begin_waiting(LinkState::Listening);
                            info!("waiting for host connection");
                            listeners.accept_pair().await?
                        }
                        (None, None) => unreachable!(),
                    };
                    session_link
                        .lock()
                        .await
                        .install_session(control, interrupt, host);
                }
                tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            }
        }
        .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "link session task failed");
        }
    });

    serve_until_shutdown(listener, link).await
}

#[cfg(not(all(target_os = "linux", feature = "bluez")))]
async fn run(listener: UnixListener, _reconnect: Option<String>) -> anyhow::Result<()> {
    use bthid_broker::link::mock::NullLink;

    tracing::warn!("built without bluez support; reports will be accepted and discarded");
    let link = Arc::new(Mutex::new(NullLink));
    serve_until_shutdown(listener, link).await
}

async fn serve_until_shutdown<L>(
    listener: UnixListener,
    link: Arc<Mutex<L>>,
) -> anyhow::Result<()>
where
    L: bthid_broker::PeripheralLink + 'static,
{
    tokio::select! {
        result = service::serve(listener, link) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
        }
    }
    Ok(())
}

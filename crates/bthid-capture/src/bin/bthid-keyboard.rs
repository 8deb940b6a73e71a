//! Keyboard capture adapter entry point.
//!
//! Opens the configured keyboard device and forwards a report for every key
//! transition until the process is terminated. Device loss is recoverable:
//! the adapter re-enters discovery and keeps the report state it had, so
//! held modifiers survive a cable wiggle.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use bthid_capture::config::Config;
use bthid_capture::logging;

#[derive(Debug, Parser)]
#[command(name = "bthid-keyboard", about = "Keyboard capture adapter")]
struct Args {
    /// Substring of the input device name to capture.
    #[arg(long, default_value = "keyboard")]
    dev: String,

    /// Broker Unix socket path.
    #[arg(long, default_value = "/tmp/bthid-broker.sock")]
    socket: PathBuf,

    /// Directory holding general.yaml and devices.yaml.
    #[arg(long, default_value = "/etc/bthid")]
    config_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config_dir)
        .with_context(|| format!("loading configuration from {}", args.config_dir.display()))?;
    let _log_guard = logging::init(config.general.logger.as_ref().map(|l| l.path.as_str()));

    info!(dev = %args.dev, "bthid keyboard adapter starting");
    run(&args)
}

#[cfg(target_os = "linux")]
fn run(args: &Args) -> anyhow::Result<()> {
    use bthid_capture::capture::evdev::EvdevSource;
    use bthid_capture::keyboard::KeyboardPipeline;
    use bthid_capture::BrokerClient;

    let mut sink = BrokerClient::new(&args.socket);
    let mut pipeline = KeyboardPipeline::new();

    loop {
        // Keyboards are retried forever; discover_keyboard only returns
        // once a device is found.
        let mut source = EvdevSource::discover_keyboard(&args.dev)?;
        let err = pipeline.run(&mut source, &mut sink);
        warn!(error = %err, "capture ended, rediscovering device");
    }
}

#[cfg(not(target_os = "linux"))]
fn run(_args: &Args) -> anyhow::Result<()> {
    anyhow::bail!("live keyboard capture requires Linux evdev")
}

//! Mouse adapter entry point: live capture or movement simulation.
//!
//! Live mode mirrors the keyboard adapter for a pointing device. Simulate
//! mode performs one scripted action — a relative move and/or a button
//! click — through the same encoder and broker path a real device would use,
//! then exits.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use bthid_capture::config::Config;
use bthid_capture::emulator::MoveEmulator;
use bthid_capture::logging;
use bthid_capture::BrokerClient;

#[derive(Debug, Parser)]
#[command(name = "bthid-mouse", about = "Mouse capture adapter and movement simulator")]
struct Args {
    /// Substring of the input device name to capture (live mode).
    #[arg(long, default_value = "mouse")]
    dev: String,

    /// Run one simulated action instead of capturing a device.
    #[arg(long)]
    simulate: bool,

    /// Horizontal displacement in pixels (simulate mode).
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    x: i32,

    /// Vertical displacement in pixels (simulate mode).
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    y: i32,

    /// Pacing delay between movement reports, in seconds (simulate mode).
    #[arg(short = 't', long, default_value_t = 0.05)]
    time: f64,

    /// Button to click: 1 = left, 2 = right, 3 = middle (simulate mode).
    #[arg(short = 'b', long)]
    button: Option<u8>,

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

    if args.simulate {
        simulate(&args, &config)
    } else {
        capture(&args)
    }
}

fn simulate(args: &Args, config: &Config) -> anyhow::Result<()> {
    info!(x = args.x, y = args.y, button = ?args.button, "bthid mouse simulator starting");

    let pace = (args.time > 0.0).then(|| Duration::from_secs_f64(args.time));
    let mut sink = BrokerClient::new(&args.socket);
    let mut emulator = MoveEmulator::new(config.profile, pace);

    if args.x != 0 || args.y != 0 {
        emulator.simulate_move(args.x, args.y, &mut sink);
    }
    if let Some(button) = args.button {
        // A one-shot invocation performs the full click: press, then
        // release after the pacing delay.
        emulator.simulate_click(button, &mut sink);
        if let Some(pace) = pace {
            std::thread::sleep(pace);
        }
        emulator.simulate_click(button, &mut sink);
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn capture(args: &Args) -> anyhow::Result<()> {
    use bthid_capture::capture::evdev::EvdevSource;
    use bthid_capture::mouse::MousePipeline;
    use tracing::warn;

    info!(dev = %args.dev, "bthid mouse adapter starting");

    let mut sink = BrokerClient::new(&args.socket);
    let mut pipeline = MousePipeline::new();

    loop {
        // Mouse discovery is capped; running out of attempts is fatal.
        let mut source = EvdevSource::discover_mouse(&args.dev)
            .context("pointing device discovery failed")?;
        let err = pipeline.run(&mut source, &mut sink);
        warn!(error = %err, "capture ended, rediscovering device");
    }
}

#[cfg(not(target_os = "linux"))]
fn capture(_args: &Args) -> anyhow::Result<()> {
    anyhow::bail!("live mouse capture requires Linux evdev; use --simulate")
}

//! Stdio host for the scan bridge
//!
//! Reads method calls as JSON lines on stdin and writes host events as JSON
//! lines on stdout, driving a simulated capability provider. Lines of the form
//! `{"frame": [{"kind": "qr", "payload": "..."}]}` are fed to the provider as
//! decoded frames. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qrview_bridge::provider::{PermissionMode, SimulatedOptions, SimulatedProvider};
use qrview_bridge::{BridgeConfig, Detection, LogNotifier, MethodCall, Reply, ViewRegistry};

#[derive(Deserialize)]
#[serde(untagged)]
enum HostLine {
    Frame { frame: Vec<Detection> },
    Call(MethodCall),
}

#[derive(Parser)]
#[command(name = "qrview-bridge", about = "QR scan bridge over stdio")]
struct Args {
    /// Bridge configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Simulate the user refusing camera access
    #[arg(long)]
    deny_permission: bool,
    #[arg(long)]
    single_camera: bool,
    #[arg(long)]
    no_torch: bool,
}

impl Args {
    fn simulated_options(&self) -> SimulatedOptions {
        let mut options = SimulatedOptions::default();
        if self.deny_permission {
            options.permission = PermissionMode::Deny;
        }
        if self.single_camera {
            options.cameras = 1;
        }
        options.torch = !self.no_torch;
        options
    }
}

fn init_tracing(config: &BridgeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = BridgeConfig::load_or_default(args.config.as_deref())
        .context("Failed to load bridge configuration")?;
    init_tracing(&config);

    let provider = SimulatedProvider::new(args.simulated_options());
    let controller = provider.controller();

    let registry = ViewRegistry::new(config, Arc::new(LogNotifier));
    let spawned = registry.create_view(provider);
    let handle = spawned.handle;
    let mut events = spawned.events;
    info!(channel = handle.channel_name(), "Listening for method calls on stdin");

    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event.to_json() {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("Failed to encode event: {}", e),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<HostLine>(line) {
            Ok(HostLine::Frame { frame }) => {
                if !controller.emit_frame(frame) {
                    warn!("Capture not running, frame discarded");
                }
            }
            Ok(HostLine::Call(call)) => match handle.call(call).await? {
                Reply::Empty => {}
                reply => println!("{}", serde_json::to_string(&reply)?),
            },
            Err(e) => warn!("Ignoring malformed line: {}", e),
        }
    }

    registry.dispose(handle.view_id())?;
    drop(handle);
    spawned.task.await.context("Bridge task failed")?;
    printer.await.context("Event printer failed")?;
    Ok(())
}

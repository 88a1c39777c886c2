//! revtray — floating review tray for terminal coding sessions.
//!
//! Connects to the host process over its Unix socket and drives the "float"
//! overlay window: state machine, hover simulation, and queue model all run
//! here; the host only paints and forwards input.

use clap::Parser;
use revtray::app::Overlay;
use revtray::client::IpcHost;
use revtray::ipc;
use revtray::placement::PlacementStore;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "revtray", about = "Floating review tray overlay")]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Host socket path (defaults to revtray.sock in the temp directory)
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Host window label to control
    #[arg(long, default_value = "float")]
    label: String,

    /// Placement file override (defaults to the platform data directory)
    #[arg(long)]
    placement: Option<PathBuf>,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_env("REVTRAY_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let socket = cli.socket.unwrap_or_else(ipc::socket_path);
    let store = match cli.placement {
        Some(path) => Some(PlacementStore::at(path)),
        None => PlacementStore::open_default(),
    };

    // Everything runs on one thread; handlers are short and the host does
    // the heavy lifting.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    runtime.block_on(async move {
        let (host, events) = match IpcHost::connect(&socket).await {
            Ok(pair) => pair,
            Err(e) => {
                error!("failed to connect to host at {}: {e}", socket.display());
                std::process::exit(1);
            }
        };

        let mut overlay = Overlay::new(host, cli.label, store);
        overlay.startup().await;
        overlay.run(events).await;
    });
}

mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use crossbeam_channel::bounded;

use backend_bridge::{commands::BackendCommand, runtime::RepositorySource};
use controller::events::UiEvent;
use ui::{TopologyViewerApp, WINDOW_TITLE};

const SERVER_URL_ENV: &str = "NETMAP_SERVER_URL";
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser, Debug)]
#[command(about = "Browse collected network topology snapshots")]
struct Args {
    /// Snapshot server to read from.
    #[arg(long, conflicts_with = "snapshot_dir")]
    server_url: Option<String>,
    /// Read `devices_*.json` files straight from a collector output directory.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

fn resolve_source(args: Args, env_server_url: Option<String>) -> RepositorySource {
    if let Some(dir) = args.snapshot_dir {
        return RepositorySource::Directory(dir);
    }
    let url = args
        .server_url
        .or(env_server_url.filter(|url| !url.trim().is_empty()))
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    RepositorySource::Http(url)
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();
    let source = resolve_source(args, std::env::var(SERVER_URL_ENV).ok());
    tracing::info!(source = %source.describe(), "starting topology viewer");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(source, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(TopologyViewerApp::new(cmd_tx, ui_rx)))),
    )
}

mod report;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use client_core::{
    DirectorySnapshotRepository, HttpSnapshotRepository, SnapshotRepository, StateController,
};
use server_api::ApiContext;
use shared::error::ApiException;
use topology::{build_view, LoadOutcome};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    server_url: String,
    /// Read a collector output directory instead of a server.
    #[arg(long)]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List snapshots oldest first; `*` marks the one the viewer opens.
    List,
    /// Print the rendered view of a snapshot (the newest one by default).
    Render {
        name: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Per-device throughput from the bandwidth samples.
    Bandwidth,
}

enum Source {
    Http(Arc<HttpSnapshotRepository>),
    Directory(Arc<DirectorySnapshotRepository>),
}

impl Source {
    fn open(cli: &Cli) -> Result<Self> {
        Ok(match &cli.dir {
            Some(dir) => Source::Directory(Arc::new(DirectorySnapshotRepository::new(dir.clone()))),
            None => Source::Http(Arc::new(HttpSnapshotRepository::new(&cli.server_url)?)),
        })
    }

    fn repository(&self) -> Arc<dyn SnapshotRepository> {
        match self {
            Source::Http(repo) => repo.clone(),
            Source::Directory(repo) => repo.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let source = Source::open(&cli)?;

    match cli.command {
        Command::List => {
            let summaries = source.repository().list().await?;
            if summaries.is_empty() {
                println!("{}", client_core::controller::NO_SNAPSHOTS_MESSAGE);
            } else {
                print!("{}", report::snapshot_list(&summaries));
            }
        }
        Command::Render { name, json } => {
            let view = match name {
                Some(name) => {
                    let raw = source.repository().get(&name).await?;
                    build_view(LoadOutcome::Loaded(&raw))
                }
                None => {
                    let mut controller = StateController::new(source.repository());
                    let state = controller.refresh().await;
                    if let Some(notice) = state.list_notice() {
                        anyhow::bail!(notice);
                    }
                    state.view().clone()
                }
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", report::view(&view));
            }
        }
        Command::Bandwidth => {
            let response = match &source {
                Source::Http(repo) => repo.fetch_bandwidth().await?,
                Source::Directory(repo) => {
                    let ctx = ApiContext {
                        store: repo.store().clone(),
                    };
                    server_api::bandwidth(&ctx, Utc::now())
                        .await
                        .map_err(ApiException::from)
                        .context("failed to read bandwidth samples")?
                }
            };
            print!("{}", report::bandwidth(&response));
        }
    }

    Ok(())
}

mod app;
mod dataset;
mod engine;
mod graph;
mod history;
mod interaction;
mod physics;
mod util;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::physics::LayoutConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON-lines file of entity and relation records.
    input: PathBuf,

    /// Rest length of link springs.
    #[arg(long)]
    link_distance: Option<f32>,

    /// Repulsion strength between nodes.
    #[arg(long)]
    charge: Option<f32>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("graph_lens={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = LayoutConfig::default().with_overrides(args.link_distance, args.charge);
    tracing::info!(input = %args.input.display(), ?config, "starting graph-lens");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "graph-lens",
        options,
        Box::new(move |cc| Ok(Box::new(app::GraphLensApp::new(cc, args.input, config)))),
    )
    .map_err(|error| anyhow!("failed to run the viewer: {error}"))
}

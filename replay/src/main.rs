//! spawn-marker-replay - Feed recorded host events through the marker service.
//!
//! Each line of the input is a JSON [`ReplayStep`]. The service runs over a
//! file-backed config store, and after every step the tool prints what the
//! overlay would draw.
//!
//! Usage: spawn-marker-replay --input session.jsonl [--store store.json] [--all] [--keep]

mod replay;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};
use spawn_marker_core::FileConfigStore;
use spawn_marker_core::storage::default_store_path;
use spawn_marker_types::MarkerSettings;
use tracing_subscriber::filter::EnvFilter;

use replay::Replay;

#[derive(Parser)]
#[command(version, about = "Replay host events through the spawn marker store")]
struct Cli {
    /// JSON-lines file of replay steps
    #[arg(short, long)]
    input: PathBuf,

    /// Config store file (defaults to the configured or platform path)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Print every marker in the snapshot, not just the drawable ones
    #[arg(long)]
    all: bool,

    /// Keep stored markers when the replay ends instead of clearing them
    #[arg(long)]
    keep: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub settings: MarkerSettings,
}

/// Initialize logging, writing to SPAWN_MARKER_LOG_PATH if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("SPAWN_MARKER_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    // Fallback to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), String> {
    init_logging();

    let cli = Cli::parse();
    let config: AppConfig = confy::load("spawn-marker", None).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    let store_path = cli
        .store
        .or(config.store_path)
        .or_else(default_store_path)
        .ok_or("error: no store path given and no config directory available")?;
    let store = FileConfigStore::load_from_disk(&store_path).map_err(|e| e.to_string())?;
    tracing::info!(path = %store_path.display(), "Opened config store");

    let input = File::open(&cli.input)
        .map_err(|e| format!("error: cannot open {}: {e}", cli.input.display()))?;

    let mut replay = Replay::new(store, config.settings);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    replay
        .run(BufReader::new(input), &mut out, cli.all)
        .map_err(|e| e.to_string())?;

    let mut store = replay.finish(cli.keep).map_err(|e| e.to_string())?;
    store.save_to_disk().map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())?;

    Ok(())
}

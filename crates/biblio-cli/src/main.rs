//! biblio - interactive library catalog manager
//!
//! This is the main entry point for the biblio binary.
//! It wires together all the components:
//! - Configuration loading
//! - Store initialization and snapshot restore
//! - The library engine behind a single mutex
//! - The interactive menu
//! - The on-demand background sweepers

use anyhow::{Context, Result};
use biblio_config::{Settings, load_config};
use biblio_core::Library;
use biblio_model::LibrarySnapshot;
use biblio_store::{SqliteStore, Store};
use biblio_util::default_config_path;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod menu;
mod sweeper;

/// biblio - library catalog manager with loan tracking and fines
#[derive(Parser, Debug)]
#[command(name = "biblio")]
#[command(about = "Library catalog manager with loan tracking and fines", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/biblio/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set BIBLIO_DATA_DIR env var)
    #[arg(short, long, env = "BIBLIO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Main service state
struct Service {
    library: Arc<Mutex<Library>>,
    store: Arc<dyn Store>,
    settings: Settings,
}

impl Service {
    fn new(args: &Args) -> Result<Self> {
        // Load configuration
        let settings = load_config(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        // Determine data directory
        let data_dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| settings.service.data_dir.clone());

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        // Initialize store
        let db_path = data_dir.join("biblio.db");
        let store: Arc<dyn Store> = Arc::new(
            SqliteStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        info!(db_path = %db_path.display(), "Store initialized");

        // Restore prior state; a load failure degrades to an empty library
        let snapshot = match store.load_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Failed to load saved state, starting empty");
                LibrarySnapshot::empty(biblio_util::now())
            }
        };

        let library = Library::from_snapshot(settings.loans, snapshot);

        Ok(Self {
            library: Arc::new(Mutex::new(library)),
            store,
            settings,
        })
    }

    async fn run(self) -> Result<()> {
        menu::run(self.library, self.store, self.settings.sweeps).await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "biblio starting");

    let service = Service::new(&args)?;
    service.run().await
}

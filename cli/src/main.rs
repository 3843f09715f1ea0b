//! Tablebook CLI Server
//!
//! Headless table booking server suitable for deployment as a systemd
//! service, Docker container, or standalone process.
//!
//! ```sh
//! # Run with default config (~/.config/tablebook/config.toml)
//! tablebook-service
//!
//! # Custom config path and port
//! tablebook-service --config /etc/tablebook/config.toml --api-port 8081
//!
//! # Validate config without starting
//! tablebook-service --check
//!
//! # Mark a seated reservation as completed
//! tablebook-service complete 3f2b6c1e-4a7d-4f4e-9a51-0c1d2e3f4a5b
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use uuid::Uuid;

use tablebook::application::ReservationLifecycle;
use tablebook::config::AppConfig;
use tablebook::domain::RepositoryProvider;
use tablebook::server::{init_tracing, ServerHandle, ServerOptions};
use tablebook::shared::clock::{Clock, SystemClock};
use tablebook::{init_database, run_migrations, SeaOrmRepositoryProvider};

/// Tablebook: restaurant table reservations over a REST API.
#[derive(Parser, Debug)]
#[command(
    name = "tablebook-service",
    version,
    about = "Restaurant table booking server",
    long_about = "Tablebook REST API server for booking restaurant tables \
                  at fixed lunch and dinner slots.\n\n\
                  Default config: ~/.config/tablebook/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "TABLEBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Override the database URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip seeding the floor plan into an empty catalog.
    #[arg(long)]
    no_seed: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mark a reservation whose slot has started as completed.
    Complete {
        /// Reservation ID
        reservation_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(tablebook::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", config_path.display(), e);
            eprintln!("Using default configuration.");
            AppConfig::default()
        }
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref url) = cli.database_url {
        config.database.url = url.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.api_address());
        println!("   Database    : {}", config.database.url);
        println!("   Floor plan  : {} tables", config.floor_plan.len());
        println!("   Log level   : {}", config.logging.level);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    if let Some(Command::Complete { reservation_id }) = cli.command {
        return complete(&config, !cli.no_migrate, reservation_id).await;
    }

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        seed_floor_plan: !cli.no_seed,
    })
    .await?;

    // Install OS signal handlers (SIGTERM, SIGINT)
    handle.install_signal_handler();

    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}

async fn complete(
    config: &AppConfig,
    migrate: bool,
    reservation_id: Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = init_database(&config.database_config()).await?;
    if migrate {
        run_migrations(&db).await?;
    }

    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let lifecycle = ReservationLifecycle::new(repos);

    let result = lifecycle.complete(reservation_id, SystemClock.now()).await;
    db.close().await?;

    match result {
        Ok(reservation) => {
            info!(
                reservation_id = %reservation.id,
                date = %reservation.date,
                time = %reservation.time,
                "Reservation completed"
            );
            println!("Reservation {} is now {}", reservation.id, reservation.status);
            Ok(())
        }
        Err(e) => {
            error!(reservation_id = %reservation_id, "Could not complete reservation: {}", e);
            Err(e.into())
        }
    }
}

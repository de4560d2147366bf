//! Headless API server entrypoint.

use sharepaste_server::{
    config::{env_flag_enabled, Config},
    db::Database,
    serve_router, spawn_expiry_sweeper, sweep_once, AppState, DEFAULT_PORT,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    sweep: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--sweep" => flags.sweep = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sharepaste=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    tracing::debug!("Loaded configuration: {:?}", config);
    let database = Database::new(&config.db_path)?;

    if cli_flags.sweep {
        let database = Arc::new(database);
        let flipped = sweep_once(database.clone()).await?;
        let live = database.pastes.count_live()?;
        println!("Expired {} paste(s); {} live paste(s) remain", flipped, live);
        return Ok(());
    }

    let state = AppState::new(config.clone(), database)?;

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_addr = sharepaste_server::resolve_bind_address(&config, allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("SharePaste running at http://{}", actual_addr);

    let sweeper = spawn_expiry_sweeper(state.db.clone(), config.sweep_interval_secs);
    let serve_result = serve_router(listener, state, allow_public, shutdown_signal()).await;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    serve_result?;
    tracing::info!("Server stopped");

    Ok(())
}

fn print_help() {
    println!("SharePaste Server\n");
    println!("Usage: sharepaste [OPTIONS]\n");
    println!("Options:");
    println!("  --sweep           Soft-delete expired pastes once and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           Database directory (default: ~/.cache/sharepaste/db)");
    println!(
        "  PORT              Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  MAX_PASTE_SIZE    Maximum paste size in bytes (default: 1MB)");
    println!("  SWEEP_INTERVAL_SECS  Seconds between expiry sweeps, 0 disables (default: 3600)");
    println!("  HASH_MEMORY_KIB   Argon2 memory cost in KiB (default: 19456)");
    println!("  HASH_ITERATIONS   Argon2 iterations (default: 2)");
    println!("  HASH_PARALLELISM  Argon2 lanes (default: 1)");
    println!("  ORIGIN_SECRET     Key for requester hashing (default: random per process)");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

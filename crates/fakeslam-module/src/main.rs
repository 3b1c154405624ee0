#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use server::config::{CliArgs, ModuleConfig};
use server::telemetry::init_telemetry;
use tokio::signal;
use tokio_util::sync::CancellationToken;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ModuleConfig::try_from(args)?;

    init_telemetry(&config)?;
    log_startup_info(&config);

    let ctx = CancellationToken::new();
    tokio::spawn(shutdown_signal(ctx.clone()));

    if let Err(e) = fakeslam::run_global(config.module_args(), ctx).await {
        tracing::error!("Module failed: {e}");
        return Err(e.into());
    }

    tracing::info!("Module shut down successfully");
    Ok(())
}

fn log_startup_info(config: &ModuleConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting module with full config: {:#?}", config);
    } else {
        tracing::info!(
            "Starting module for host at {}",
            config.socket_path.display()
        );
    }
}

/// Cancels `ctx` on Ctrl+C or SIGTERM.
async fn shutdown_signal(ctx: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Shutdown signal received, terminating gracefully...");
    ctx.cancel();
}

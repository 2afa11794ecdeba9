//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::pipeline::ProxyServer;

/// Execute the `run` command
pub async fn run_proxy(args: &RunArgs) -> Result<()> {
    let config = config_loader::ConfigLoader::resolve(
        args.config.config.as_deref(),
        &args.config.overrides(),
    )
    .context("Failed to resolve configuration")?;

    info!(
        mode = %config.serialization,
        buffer_size = config.buffer_size.get(),
        listen_addr = %config.listen_addr,
        transmitter = ?config.transmitter,
        mirror = config.mirror_destination().unwrap_or("disabled"),
        "Configuration resolved"
    );

    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        println!("{}", config_loader::ConfigLoader::to_toml(&config)?);
        return Ok(());
    }

    let server = ProxyServer::bind(config).await?;
    info!(addr = %server.local_addr()?, "Proxy bound");

    let stats = server
        .run(shutdown_signal())
        .await
        .context("Proxy execution failed")?;

    info!(
        relayed = stats.relayed,
        failed = stats.failed,
        drained = stats.drained,
        uptime_secs = stats.uptime.as_secs_f64(),
        "metric-proxy finished"
    );
    stats.print_summary();
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM
///
/// If a handler cannot be installed, that source is treated as never firing.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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

    warn!("Received shutdown signal, stopping proxy...");
}

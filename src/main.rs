// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::Parser;
use futures::FutureExt;
use kube::Client;
use memcached_operator::{
    config::{LogFormat, OperatorConfig},
    constants::TOKIO_WORKER_THREADS,
    context::Context,
    controller, metrics_server,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let config = OperatorConfig::parse();

    // Build Tokio runtime with custom thread names
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("memcached-operator")
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

/// Initialize logging
///
/// Respects RUST_LOG if set, otherwise defaults to INFO level.
/// Output format comes from `--log-format` / RUST_LOG_FORMAT.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(config: OperatorConfig) -> Result<()> {
    init_tracing(config.log_format);

    info!("Starting Memcached operator");
    debug!(?config, "Loaded configuration");

    debug!("Initializing Kubernetes client");
    let client = Client::try_default().await?;
    debug!("Kubernetes client initialized successfully");

    let metrics_address = config.metrics_bind_address;
    let ctx = Arc::new(Context::new(client, config));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping controller");
        let _ = shutdown_tx.send(());
    });

    // The controller returns once shutdown completes; the metrics server never should
    tokio::select! {
        result = controller::run(ctx, shutdown_rx.map(|_| ())) => {
            result?;
            info!("Memcached operator stopped");
            Ok(())
        }
        result = metrics_server::serve(metrics_address, std::future::pending()) => {
            error!("CRITICAL: metrics server exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("metrics server exited unexpectedly without error")
        }
    }
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

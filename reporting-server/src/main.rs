// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph Reporting server entry point

use clap::Parser;
use graph_reporting::{default_plan, RefreshScheduler, ReportingConfig};
use graph_reporting_server::{router, AppState};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "graph-reporting")]
#[command(about = "Cached resource statistics over a SPARQL knowledge graph", version)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the configuration
    #[arg(long)]
    bind: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<log::Level>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Serve from the cache without running the refresh scheduler
    #[arg(long)]
    no_scheduler: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = args.log_level {
        level.to_level_filter()
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    let mut config = ReportingConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    log::info!("Starting {} {}", graph_reporting::CRATE_NAME, graph_reporting::VERSION);
    log::debug!("{:?}", config);

    let state = AppState::from_config(&config)?;
    let cancel = CancellationToken::new();

    let scheduler = if config.scheduler.enabled && !args.no_scheduler {
        let scheduler = RefreshScheduler::new(
            state.statistics.clone(),
            default_plan(&config.vocabulary()),
            config.scheduler.clone(),
        );
        let token = cancel.clone();
        Some(tokio::spawn(async move { scheduler.run(token).await }))
    } else {
        log::info!("Refresh scheduler disabled");
        None
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    let shutdown = cancel.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for shutdown signal: {}", e);
            }
            log::info!("Shutdown requested");
            shutdown.cancel();
        })
        .await?;

    cancel.cancel();
    if let Some(handle) = scheduler {
        handle.await?;
    }
    Ok(())
}

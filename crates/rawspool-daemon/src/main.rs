// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rawspool — watched-directory RAW print processor.
//
// Entry point. Initialises logging, validates configuration, bootstraps the
// directories, and runs the notification loop until Ctrl-C.

mod pipeline;
mod watcher;

use std::sync::Arc;

use tracing::{error, info};

use rawspool_core::config::Config;
use rawspool_core::error::Result;
use rawspool_print::RawTcpSink;

use pipeline::Pipeline;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Rawspool starting");

    if let Err(e) = run().await {
        error!(error = %e, "fatal startup error");
        std::process::exit(1);
    }

    info!("Rawspool stopped");
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;
    // Fatal if the watched directory is missing; creates the archive
    // directory when absent.
    config.validate()?;

    info!(
        watch = %config.watch_dir.display(),
        archive = %config.archive_dir.display(),
        printer = %config.printer_addr,
        "watching for .raw files"
    );

    let sink = RawTcpSink::new(&config.printer_addr);
    let (mut events, watcher_handle) = watcher::spawn(&config.watch_dir)?;
    let pipeline = Arc::new(Pipeline::new(config, sink));

    loop {
        tokio::select! {
            maybe_path = events.recv() => match maybe_path {
                Some(path) => {
                    // Each notification gets its own run; the pipeline's
                    // mutex serialises them. A spawned task also isolates
                    // any panic to the run that caused it — the daemon
                    // keeps watching.
                    let pipeline = Arc::clone(&pipeline);
                    tokio::spawn(async move {
                        pipeline.process(&path).await;
                    });
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                break;
            }
        }
    }

    // Stop intake first, then let an in-flight run finish — never interrupt
    // a job mid-print or mid-move.
    drop(watcher_handle);
    drop(events);
    pipeline.drain().await;

    Ok(())
}

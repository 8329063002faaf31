// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Directory-change notification source.
//
// Bridges the `notify` watcher's callback thread into a tokio mpsc channel.
// Only create events for `*.raw` files (case-insensitive) are forwarded.
// One delivery per physical file creation is assumed; duplicate or missed
// OS events are a known limitation of the underlying notification APIs and
// are not compensated for here.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use rawspool_core::error::{RawspoolError, Result};
use rawspool_core::types::is_raw_file;

/// Channel depth for pending notifications. Deliveries beyond this block
/// the notify thread briefly rather than dropping events.
const EVENT_CHANNEL_DEPTH: usize = 64;

/// Start watching a directory (non-recursively) for new `*.raw` files.
///
/// Returns the event receiver and the watcher handle. The handle must be
/// kept alive for delivery to continue; dropping it disables delivery —
/// which is exactly how the daemon stops intake at shutdown.
pub fn spawn(watch_dir: &Path) -> Result<(mpsc::Receiver<PathBuf>, RecommendedWatcher)> {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_DEPTH);

    let mut watcher =
        notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_)) {
                    return;
                }
                for path in event.paths {
                    if !is_raw_file(&path) {
                        debug!(file = %path.display(), "ignoring non-raw file");
                        continue;
                    }
                    // Receiver gone means the daemon is shutting down;
                    // nothing useful to do with the event.
                    let _ = tx.blocking_send(path);
                }
            }
            Err(e) => warn!(error = %e, "watch error"),
        })
        .map_err(|e| RawspoolError::Watch(e.to_string()))?;

    watcher
        .watch(watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| RawspoolError::Watch(e.to_string()))?;

    Ok((rx, watcher))
}

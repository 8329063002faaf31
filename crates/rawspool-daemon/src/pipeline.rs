// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The per-file processing pipeline: lock → settle → read → rewrite →
// print → archive.
//
// One run per create notification. A single process-wide mutex serialises
// the whole read/print/archive sequence — the printer is a serial device,
// so there is nothing to win by overlapping runs, and a lot to lose
// (interleaved jobs on the paper). Contending runs block on the lock;
// no file is ever dropped because another was being processed.
//
// Failure policy: every error is terminal to its own run only. A read or
// print failure leaves the source file in the watched directory for the
// operator; an archive failure after a successful print is a warning, not
// a rollback — the job already printed, and re-archiving must never cause
// a double print.

use std::path::Path;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use rawspool_core::config::Config;
use rawspool_core::error::RawspoolError;
use rawspool_core::types::{FailureStage, JobOutcome, RawJob};
use rawspool_document::force_double_size;
use rawspool_print::PrintSink;

/// The single-flight job pipeline.
pub struct Pipeline<S> {
    config: Config,
    sink: S,
    /// Process-wide single-flight lock. Held for the full run; released on
    /// every exit path including unwinds (RAII guard).
    lock: Mutex<()>,
}

impl<S: PrintSink + Send + Sync> Pipeline<S> {
    pub fn new(config: Config, sink: S) -> Self {
        Self {
            config,
            sink,
            lock: Mutex::new(()),
        }
    }

    /// Run one file through the pipeline. Never propagates an error to the
    /// caller — the outcome says how far the run got, the log says why.
    pub async fn process(&self, path: &Path) -> JobOutcome {
        let _guard = self.lock.lock().await;

        // Give the producer a beat to finish writing before we read.
        tokio::time::sleep(self.config.settle).await;

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(
                    file = %path.display(),
                    error = %e,
                    "could not read new file — leaving it in place"
                );
                return JobOutcome::Failed(FailureStage::Read);
            }
        };

        let job = RawJob::new(path, bytes);
        info!(job_id = %job.id, file = %job.file_name, size = job.size, "processing new file");

        // The rewrite is applied to the in-memory copy only; the file on
        // disk (and therefore the archive) keeps the original bytes.
        let payload = force_double_size(&job.bytes);

        if let Err(e) = self.sink.submit(&job.file_name, &payload).await {
            match &e {
                RawspoolError::Print { os_code: Some(code), .. } => {
                    error!(
                        job_id = %job.id,
                        file = %job.file_name,
                        error = %e,
                        os_code = code,
                        "print failed — file left in watched directory"
                    );
                }
                _ => {
                    error!(
                        job_id = %job.id,
                        file = %job.file_name,
                        error = %e,
                        "print failed — file left in watched directory"
                    );
                }
            }
            return JobOutcome::Failed(FailureStage::Print);
        }

        info!(job_id = %job.id, file = %job.file_name, "successfully printed");

        let destination = self.config.archive_dir.join(&job.file_name);
        match tokio::fs::rename(&job.path, &destination).await {
            Ok(()) => {
                info!(job_id = %job.id, file = %job.file_name, "moved file to archive");
                JobOutcome::Completed { archived: true }
            }
            Err(e) => {
                // Printed but stuck in the watched directory. Warning, not
                // error: the print already happened and must not be redone.
                warn!(
                    job_id = %job.id,
                    file = %job.file_name,
                    error = %e,
                    "printed but could not archive file"
                );
                JobOutcome::Completed { archived: false }
            }
        }
    }

    /// Wait for any in-flight run to finish (shutdown path).
    pub async fn drain(&self) {
        let _guard = self.lock.lock().await;
    }
}

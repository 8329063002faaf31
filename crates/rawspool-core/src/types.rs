// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Rawspool print processor.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable snapshot of one raw printer command stream, taken once the
/// source file was fully readable from disk.
///
/// `bytes` holds the content as deposited by the producer; the double-size
/// transform is applied to a separate in-memory copy and never written back.
#[derive(Debug, Clone)]
pub struct RawJob {
    pub id: JobId,
    /// File name only (no directory component), preserved across archiving.
    pub file_name: String,
    /// Full path in the watched directory.
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub size: u64,
    pub detected_at: DateTime<Utc>,
}

impl RawJob {
    /// Build a job from a path and the bytes read from it.
    ///
    /// The file name falls back to the full path display when the path has
    /// no final component (never the case for watcher-delivered paths).
    pub fn new(path: &Path, bytes: Vec<u8>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size = bytes.len() as u64;
        Self {
            id: JobId::new(),
            file_name,
            path: path.to_path_buf(),
            bytes,
            size,
            detected_at: Utc::now(),
        }
    }
}

/// The stage at which a pipeline run gave up.
///
/// There is no transform stage here: the command rewrite is a total function
/// and cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureStage {
    /// The file could not be read (missing, still locked by the producer,
    /// permission denied). The file is left untouched.
    Read,
    /// The print transport rejected or failed the submission. The file is
    /// left in the watched directory so the operator can re-trigger it.
    Print,
}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobOutcome {
    /// The job was printed. `archived = false` means the post-print move
    /// failed; the source file stays in the watched directory but the print
    /// success is never rolled back (a later retry must not double-print).
    Completed { archived: bool },
    /// The run aborted before the print completed.
    Failed(FailureStage),
}

impl JobOutcome {
    /// Whether the printer received the job.
    pub fn printed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Case-insensitive `*.raw` extension check, shared by the watcher filter
/// and the tests that exercise it.
pub fn is_raw_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("raw"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_job_captures_name_and_size() {
        let job = RawJob::new(Path::new("/spool/in/ticket1.raw"), vec![1, 2, 3]);
        assert_eq!(job.file_name, "ticket1.raw");
        assert_eq!(job.size, 3);
    }

    #[test]
    fn outcome_printed() {
        assert!(JobOutcome::Completed { archived: true }.printed());
        assert!(JobOutcome::Completed { archived: false }.printed());
        assert!(!JobOutcome::Failed(FailureStage::Print).printed());
    }

    #[test]
    fn raw_extension_is_case_insensitive() {
        assert!(is_raw_file(Path::new("/in/a.raw")));
        assert!(is_raw_file(Path::new("/in/a.RAW")));
        assert!(is_raw_file(Path::new("/in/a.RaW")));
        assert!(!is_raw_file(Path::new("/in/a.txt")));
        assert!(!is_raw_file(Path::new("/in/raw")));
        assert!(!is_raw_file(Path::new("/in/a.raw.bak")));
    }
}

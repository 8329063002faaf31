// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Rawspool.

use thiserror::Error;

/// Top-level error type for all Rawspool operations.
#[derive(Debug, Error)]
pub enum RawspoolError {
    // -- Startup / host errors --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("directory watch failed: {0}")]
    Watch(String),

    // -- Per-run errors --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Print submission failure. Carries the underlying OS error code when
    /// the transport surfaced one, so an operator can diagnose the spooler
    /// side from the log line alone.
    #[error("print submission failed: {detail}")]
    Print {
        detail: String,
        os_code: Option<i32>,
    },

    #[error("archive move failed: {0}")]
    Archive(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RawspoolError {
    /// Wrap an I/O failure from the print transport, preserving the raw OS
    /// error code for the log.
    pub fn print_io(stage: &str, err: &std::io::Error) -> Self {
        Self::Print {
            detail: format!("{stage}: {err}"),
            os_code: err.raw_os_error(),
        }
    }

    /// A print failure with no OS error behind it (e.g. a timeout we imposed
    /// ourselves).
    pub fn print_other(detail: impl Into<String>) -> Self {
        Self::Print {
            detail: detail.into(),
            os_code: None,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RawspoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_io_carries_os_code() {
        let io = std::io::Error::from_raw_os_error(111); // ECONNREFUSED
        let err = RawspoolError::print_io("connect", &io);
        match err {
            RawspoolError::Print { os_code, detail } => {
                assert_eq!(os_code, Some(111));
                assert!(detail.starts_with("connect:"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn print_other_has_no_os_code() {
        let err = RawspoolError::print_other("write timed out after 60s");
        match err {
            RawspoolError::Print { os_code, .. } => assert!(os_code.is_none()),
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}

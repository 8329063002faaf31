// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Daemon configuration.
//
// One watched directory, one archive directory, one printer per running
// instance. Values come from the environment; there is deliberately no
// config-file format.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RawspoolError, Result};

/// Environment variable names, in one place for the docs and the tests.
pub const ENV_WATCH_DIR: &str = "RAWSPOOL_WATCH_DIR";
pub const ENV_ARCHIVE_DIR: &str = "RAWSPOOL_ARCHIVE_DIR";
pub const ENV_PRINTER: &str = "RAWSPOOL_PRINTER";
pub const ENV_SETTLE_MS: &str = "RAWSPOOL_SETTLE_MS";

/// Default settle interval before reading a freshly created file.
///
/// A write-completion heuristic: gives the producer a beat to finish writing
/// before we read. Kept at the original deployment's value so latency
/// characteristics stay comparable.
const DEFAULT_SETTLE_MS: u64 = 500;

/// Runtime settings for the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory scanned for incoming `*.raw` files.
    pub watch_dir: PathBuf,
    /// Directory that printed files are moved into, same file name.
    pub archive_dir: PathBuf,
    /// Printer identity: `host` or `host:port` (port 9100 assumed when
    /// absent).
    pub printer_addr: String,
    /// Delay between the create notification and the read.
    #[serde(with = "settle_millis")]
    pub settle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("/var/spool/rawspool/incoming"),
            archive_dir: PathBuf::from("/var/spool/rawspool/processed"),
            printer_addr: "localhost:9100".into(),
            settle: Duration::from_millis(DEFAULT_SETTLE_MS),
        }
    }
}

impl Config {
    /// Build a config from the environment, falling back to defaults for
    /// anything unset. A malformed `RAWSPOOL_SETTLE_MS` is a startup error,
    /// not a silent fallback.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var(ENV_WATCH_DIR) {
            config.watch_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var(ENV_ARCHIVE_DIR) {
            config.archive_dir = PathBuf::from(dir);
        }
        if let Ok(printer) = std::env::var(ENV_PRINTER) {
            config.printer_addr = printer;
        }
        if let Ok(ms) = std::env::var(ENV_SETTLE_MS) {
            let ms: u64 = ms.parse().map_err(|_| {
                RawspoolError::Config(format!("{ENV_SETTLE_MS} must be an integer, got '{ms}'"))
            })?;
            config.settle = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Host-side directory bootstrapping.
    ///
    /// The watched directory must already exist (fatal if not — we will not
    /// invent the producer's drop point). The archive directory is created
    /// if absent.
    pub fn validate(&self) -> Result<()> {
        if !self.watch_dir.is_dir() {
            return Err(RawspoolError::Config(format!(
                "watched directory not found at '{}'",
                self.watch_dir.display()
            )));
        }

        if !self.archive_dir.is_dir() {
            std::fs::create_dir_all(&self.archive_dir)?;
        }

        if self.printer_addr.trim().is_empty() {
            return Err(RawspoolError::Config("printer address is empty".into()));
        }

        Ok(())
    }
}

/// Serde helper: serialize `settle` as integer milliseconds.
mod settle_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

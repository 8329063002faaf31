// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The print submission capability.

use std::future::Future;

use rawspool_core::error::Result;

/// Something that can take N bytes and deliver them to a printer as one
/// RAW job.
///
/// The sink borrows the buffer for the duration of a single call and must
/// not retain or mutate it afterwards. A submission either fully succeeds
/// or fails as a whole; there is no partial-success reporting and no
/// internal retry — retry policy belongs to the caller.
pub trait PrintSink {
    /// Submit one complete job. `job_name` is diagnostic only (it names the
    /// job in log output, nothing is sent to the printer beyond `bytes`).
    fn submit(&self, job_name: &str, bytes: &[u8]) -> impl Future<Output = Result<()>> + Send;
}

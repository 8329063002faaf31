// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rawspool-print — Print submission for Rawspool.
//
// Defines the `PrintSink` capability the pipeline depends on, and the raw
// TCP (JetDirect, port 9100) transport that implements it.

pub mod raw_client;
pub mod sink;

pub use raw_client::RawTcpSink;
pub use sink::PrintSink;

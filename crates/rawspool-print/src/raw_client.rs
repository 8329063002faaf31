// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw TCP print transport (JetDirect, port 9100).
//
// The simplest possible print protocol: open a TCP socket and dump bytes.
// No settings, no job tracking, no feedback — the printer must interpret
// the payload natively, which is exactly right for ESC/POS command streams.
// Both the connect and the write phase run under a timeout so a dead or
// misconfigured printer fails the submission fast instead of wedging the
// pipeline forever.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

use rawspool_core::error::{RawspoolError, Result};

use crate::sink::PrintSink;

/// Default raw TCP port (HP JetDirect).
pub const RAW_PORT: u16 = 9100;

/// Default timeout applied to the connect and to the whole write phase.
const RAW_TIMEOUT_SECS: u64 = 60;

/// Append the default port when the configured printer identity has none.
pub fn parse_printer_addr(identity: &str) -> String {
    if identity.contains(':') {
        identity.to_string()
    } else {
        format!("{identity}:{RAW_PORT}")
    }
}

/// Print sink that submits jobs over raw TCP.
///
/// Stateless per call: each `submit` opens a fresh connection, writes the
/// whole buffer, flushes, and shuts the stream down. Any stage failing
/// fails the submission as a whole.
#[derive(Debug, Clone)]
pub struct RawTcpSink {
    addr: String,
    timeout: Duration,
}

impl RawTcpSink {
    /// Build a sink for a printer identity (`host` or `host:port`).
    pub fn new(identity: &str) -> Self {
        Self {
            addr: parse_printer_addr(identity),
            timeout: Duration::from_secs(RAW_TIMEOUT_SECS),
        }
    }

    /// Override the default timeout (used by tests and impatient deployments).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The resolved `host:port` this sink submits to.
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl PrintSink for RawTcpSink {
    async fn submit(&self, job_name: &str, bytes: &[u8]) -> Result<()> {
        info!(
            addr = %self.addr,
            job = job_name,
            total = bytes.len(),
            "connecting via raw TCP"
        );

        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| {
                RawspoolError::print_other(format!(
                    "connection to {} timed out after {:?}",
                    self.addr, self.timeout
                ))
            })?
            .map_err(|e| RawspoolError::print_io("connect", &e))?;

        tokio::time::timeout(self.timeout, write_job(&mut stream, bytes))
            .await
            .map_err(|_| {
                RawspoolError::print_other(format!(
                    "write to {} timed out after {:?}",
                    self.addr, self.timeout
                ))
            })??;

        info!(job = job_name, total = bytes.len(), "raw print job sent successfully");
        Ok(())
    }
}

/// Write the full buffer, flush, and close the stream.
async fn write_job(stream: &mut TcpStream, bytes: &[u8]) -> Result<()> {
    // 8KB chunks so progress shows up in trace output on large jobs.
    let chunk_size = 8192;
    let mut sent = 0usize;

    for chunk in bytes.chunks(chunk_size) {
        stream
            .write_all(chunk)
            .await
            .map_err(|e| RawspoolError::print_io(&format!("send at byte {sent}"), &e))?;
        sent += chunk.len();
        debug!(sent, total = bytes.len(), "raw TCP progress");
    }

    stream
        .flush()
        .await
        .map_err(|e| RawspoolError::print_io("flush", &e))?;
    stream
        .shutdown()
        .await
        .map_err(|e| RawspoolError::print_io("shutdown", &e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn default_port_is_appended() {
        assert_eq!(parse_printer_addr("kitchen-printer"), "kitchen-printer:9100");
        assert_eq!(parse_printer_addr("10.0.0.5:9101"), "10.0.0.5:9101");
    }

    #[tokio::test]
    async fn fake_printer_receives_full_payload() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let accept = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut received = Vec::new();
            socket.read_to_end(&mut received).await.expect("read");
            received
        });

        let payload: Vec<u8> = (0..20_000u32).map(|i| (i % 251) as u8).collect();
        let sink = RawTcpSink::new(&addr.to_string());
        sink.submit("ticket1.raw", &payload).await.expect("submit");

        let received = accept.await.expect("join");
        assert_eq!(received, payload);
    }

    #[tokio::test]
    async fn refused_connection_is_a_print_error() {
        // Bind then drop so the port is very likely unoccupied.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let sink =
            RawTcpSink::new(&addr.to_string()).with_timeout(Duration::from_secs(5));
        let err = sink.submit("ticket1.raw", b"data").await.unwrap_err();
        match err {
            RawspoolError::Print { detail, .. } => assert!(detail.contains("connect")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sink_does_not_retain_the_buffer() {
        // Compile-time property really, but pin down the call shape: the
        // sink takes `&[u8]` and the caller keeps ownership.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut sunk = Vec::new();
            let _ = socket.read_to_end(&mut sunk).await;
        });

        let payload = vec![0x1B, 0x21, 0x30];
        let sink = RawTcpSink::new(&addr.to_string());
        sink.submit("job", &payload).await.expect("submit");
        assert_eq!(payload, vec![0x1B, 0x21, 0x30]);
    }
}

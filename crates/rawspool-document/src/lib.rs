// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rawspool-document — ESC/POS command stream processing for Rawspool.
//
// Provides the double-size rewrite applied to every incoming command stream
// before it is handed to the print transport.

pub mod rewrite;

pub use rewrite::force_double_size;

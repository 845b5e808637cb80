// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # hhnet-observability
//!
//! Logging set-up shared by everything that drives a simulation, with
//! per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: timestamped run folder with a rolling log file

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use init::*;

/// Known hhnet crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "hhnet",
    "hhnet-neural",
    "hhnet-engine",
    "hhnet-config",
    "hhnet-observability",
];

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uaforge-bin
//!
//! CLI binary for uaforge.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │                 main.rs                  │
//! └────────────────────┬─────────────────────┘
//!                      │
//!               ┌──────▼──────┐
//!               │   cli.rs    │
//!               └──────┬──────┘
//!                      │
//!          ┌───────────┼───────────┐
//!          ▼           ▼           ▼
//!    ┌──────────┐ ┌──────────┐ ┌──────────┐
//!    │ commands │ │provision │ │ logging  │
//!    └────┬─────┘ └────┬─────┘ └──────────┘
//!         │            │
//!   uaforge-config  uaforge-nodes
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Provision and print the tree (default command)
//! uaforge -c plant.yaml
//!
//! # Validate, failing on warnings
//! uaforge -c plant.yaml validate --strict
//!
//! # Show version
//! uaforge version
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod provision;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use provision::{Provisioned, ProvisionedNode, Provisioner};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

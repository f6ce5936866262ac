// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uaforge-config
//!
//! Nodeset definition files for uaforge.
//!
//! A nodeset file declares a tree of folders, objects, variables, types and
//! methods to provision into an OPC UA address space, along with the
//! application structures the DataType inferencer should recognize.
//!
//! ## Features
//!
//! - **Multi-Format Support**: YAML, TOML, and JSON files
//! - **Environment Overrides**: namespace and logging via `UAFORGE_*`
//! - **Placeholders**: `${VAR}` and `${VAR:default}` in file content
//! - **Validation**: every error names the offending field path
//!
//! ## Quick Start
//!
//! ```no_run
//! use uaforge_config::loader::load_config;
//!
//! let config = load_config("plant.yaml").unwrap();
//! println!("Namespace: {}", config.namespace);
//! println!("Nodes: {}", config.node_count());
//! ```
//!
//! ## File Layout
//!
//! ```yaml
//! namespace: 2
//! structures:
//!   - { name: Recipe, data_type: "ns=2;i=5001" }
//! nodes:
//!   - kind: folder
//!     name: Plant
//!     children:
//!       - kind: variable
//!         name: Temperature
//!         value: 21.5
//!         writable: true
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{
    LogFormat, LogLevel, LoggingConfig, NodeKind, NodeSpec, NodesetConfig, StructureSpec,
    ValueSpec, DEFAULT_NAMESPACE,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// =============================================================================
// Prelude
// =============================================================================

/// Convenience re-exports for common use cases.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::loader::{load_config, ConfigFormat, ConfigLoader};
    pub use crate::schema::{NodeKind, NodeSpec, NodesetConfig, ValueSpec};
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the uaforge binary.

use thiserror::Error;
use uaforge_config::ConfigError;
use uaforge_nodes::NodesError;

/// Result type alias for uaforge-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the uaforge binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Nodeset loading error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A node could not be provisioned.
    #[error("Provisioning failed at '{path}': {source}")]
    Provisioning {
        /// Path of the nodeset entry, e.g. `nodes[0].children[2]`.
        path: String,
        /// Underlying node error.
        #[source]
        source: NodesError,
    },

    /// Initialization error.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a provisioning error for the nodeset entry at `path`.
    pub fn provisioning(path: impl Into<String>, source: NodesError) -> Self {
        Self::Provisioning {
            path: path.into(),
            source,
        }
    }

    /// Creates an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Creates an I/O error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the exit code for this error.
    ///
    /// 1 for configuration, 2 for provisioning, 3 for I/O and startup.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(e) if e.is_io_error() => 3,
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::Provisioning { .. } => 2,
            Self::Initialization(_) | Self::Io(_) => 3,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Initialization(format!("{err:#}"))
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with its cause chain on stderr.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error);

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {}", cause);
        source = cause.source();
    }

    if let BinError::Provisioning { source, .. } = error {
        for hint in source.recovery_hints() {
            eprintln!("  Hint: {}", hint);
        }
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

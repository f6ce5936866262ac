// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for node construction.
//!
//! Every failure is reported against the stage that produced it, so a
//! caller can tell identifier parsing, type inference and remote creation
//! apart without inspecting messages.
//!
//! # Error Categories
//!
//! ```text
//! NodesError
//! ├── TypeInference  - no wire DataType can be determined for a value
//! ├── NodeCreation   - the address space rejected an add-node request
//! ├── MethodWiring   - method created, argument or callback wiring failed
//! ├── Protocol       - node id and qualified name grammar errors (passed through unchanged)
//! └── Server         - address space transport failures
//! ```
//!
//! # Examples
//!
//! ```
//! use uaforge_nodes::error::{NodesError, TypeInferenceError};
//!
//! let error = NodesError::from(TypeInferenceError::empty_structure("null"));
//! assert_eq!(error.category(), "type_inference");
//! assert!(!error.is_retryable());
//! ```

use std::fmt;

use thiserror::Error;
use tracing::Level;

use crate::method::MethodPhase;
use crate::status::StatusCode;
use crate::types::NodeId;

/// Result type alias for node operations.
pub type NodesResult<T> = Result<T, NodesError>;

// =============================================================================
// NodesError - Main Error Type
// =============================================================================

/// The main error type for node construction and deletion.
#[derive(Debug, Error)]
pub enum NodesError {
    /// The wire DataType of a value could not be determined.
    #[error("{0}")]
    TypeInference(#[from] TypeInferenceError),

    /// The address space rejected an add-node request.
    #[error("{0}")]
    NodeCreation(#[from] NodeCreationError),

    /// A method node was created but its wiring did not complete.
    #[error("{0}")]
    MethodWiring(#[from] MethodWiringError),

    /// Node id and qualified name grammar errors.
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    /// Address space transport failures.
    #[error("{0}")]
    Server(#[from] ServerError),
}

impl NodesError {
    /// Creates a rejected node creation error.
    pub fn rejected(requested: NodeId, status: StatusCode) -> Self {
        Self::NodeCreation(NodeCreationError::rejected(requested, status))
    }

    // =========================================================================
    // Error Properties
    // =========================================================================

    /// Returns `true` if this error is retryable.
    ///
    /// Nothing in this crate is retried automatically: a repeated add-node
    /// request with the same identifier collides with the first one.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Server(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns the status code reported by the address space, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::NodeCreation(NodeCreationError::Rejected { status, .. }) => Some(*status),
            Self::MethodWiring(e) => e.source.status_code(),
            _ => None,
        }
    }

    /// Returns the severity level of this error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Protocol(_) | Self::TypeInference(_) => ErrorSeverity::Error,
            Self::NodeCreation(_) => ErrorSeverity::Warning,
            Self::MethodWiring(_) => ErrorSeverity::Critical,
            Self::Server(_) => ErrorSeverity::Error,
        }
    }

    /// Returns the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::TypeInference(_) => "type_inference",
            Self::NodeCreation(_) => "node_creation",
            Self::MethodWiring(_) => "method_wiring",
            Self::Protocol(_) => "protocol",
            Self::Server(_) => "server",
        }
    }

    /// Returns a unique error code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::TypeInference(e) => e.error_code(),
            Self::NodeCreation(e) => e.error_code(),
            Self::MethodWiring(_) => ErrorCode::new(3, 1),
            Self::Protocol(e) => e.error_code(),
            Self::Server(e) => e.error_code(),
        }
    }

    /// Returns recovery hints for this error.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::TypeInference(e) => e.recovery_hints(),
            Self::NodeCreation(e) => e.recovery_hints(),
            Self::MethodWiring(_) => vec![
                "The method node exists; delete it recursively before retrying",
            ],
            Self::Protocol(_) => vec![
                "Node id format: ns=<namespace>;i=<numeric> or ns=<namespace>;s=<string>",
                "Browse names use the form <index>:<name>",
            ],
            Self::Server(_) => vec!["Check that the address space is reachable"],
        }
    }

    /// Returns the tracing level for this error.
    pub fn tracing_level(&self) -> Level {
        self.severity().to_tracing_level()
    }

    /// Logs this error with appropriate level and context.
    pub fn log(&self, context: &str) {
        let code = self.error_code();

        match self.tracing_level() {
            Level::ERROR => tracing::error!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
            Level::WARN => tracing::warn!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
            _ => tracing::debug!(
                error_code = %code,
                category = self.category(),
                context = context,
                "{self}"
            ),
        }
    }
}

// =============================================================================
// TypeInferenceError
// =============================================================================

/// A value whose wire DataType cannot be determined.
#[derive(Debug, Error)]
pub enum TypeInferenceError {
    /// Structured payload is null or an empty array.
    #[error("Cannot infer DataType from {shape} structured value")]
    EmptyStructure {
        /// "null" or "empty".
        shape: &'static str,
    },

    /// The structured type has no registered DataType.
    #[error("Structured type '{type_name}' has no registered DataType")]
    UnmappedStructure {
        /// Name of the structured type.
        type_name: String,
    },

    /// The tag does not correspond to a built-in DataType.
    #[error("Variant type '{tag}' does not map to a built-in DataType")]
    UnknownTag {
        /// Tag name.
        tag: String,
    },

    /// The payload does not match the declared tag.
    #[error("Variant tagged '{tag}' carries a {actual} payload")]
    PayloadMismatch {
        /// Declared tag.
        tag: String,
        /// Actual payload kind.
        actual: String,
    },

    /// A raw value has no native type and no hint was given.
    #[error("Cannot determine the variant type of {value}; supply a type hint")]
    Undetermined {
        /// Rendering of the value.
        value: String,
    },
}

impl TypeInferenceError {
    /// Creates an empty structure error (`"null"` or `"empty"`).
    pub fn empty_structure(shape: &'static str) -> Self {
        Self::EmptyStructure { shape }
    }

    /// Creates an unmapped structure error.
    pub fn unmapped_structure(type_name: impl Into<String>) -> Self {
        Self::UnmappedStructure {
            type_name: type_name.into(),
        }
    }

    /// Creates an unknown tag error.
    pub fn unknown_tag(tag: impl Into<String>) -> Self {
        Self::UnknownTag { tag: tag.into() }
    }

    /// Creates a payload mismatch error.
    pub fn payload_mismatch(tag: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::PayloadMismatch {
            tag: tag.into(),
            actual: actual.into(),
        }
    }

    /// Creates an undetermined value error.
    pub fn undetermined(value: impl fmt::Display) -> Self {
        Self::Undetermined {
            value: value.to_string(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyStructure { .. } => ErrorCode::new(1, 1),
            Self::UnmappedStructure { .. } => ErrorCode::new(1, 2),
            Self::UnknownTag { .. } => ErrorCode::new(1, 3),
            Self::PayloadMismatch { .. } => ErrorCode::new(1, 4),
            Self::Undetermined { .. } => ErrorCode::new(1, 5),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::EmptyStructure { .. } => vec![
                "Supply an explicit DataType for null or empty structured values",
            ],
            Self::UnmappedStructure { .. } => vec![
                "Register the structure with StructureRegistry::register at startup",
            ],
            Self::UnknownTag { .. } | Self::Undetermined { .. } => vec![
                "Pass a concrete variant type hint or an explicit DataType",
            ],
            Self::PayloadMismatch { .. } => vec!["Make the type hint match the value"],
        }
    }
}

// =============================================================================
// NodeCreationError
// =============================================================================

/// The address space did not create a requested node.
#[derive(Debug, Error)]
pub enum NodeCreationError {
    /// Non-good status for the request.
    #[error("Creating node '{requested}' failed with {status}")]
    Rejected {
        /// The identifier that was requested.
        requested: NodeId,
        /// Status returned by the address space.
        status: StatusCode,
    },

    /// The response did not carry exactly one result.
    #[error("Creating node '{requested}' returned {actual} results, expected {expected}")]
    ResultCount {
        /// The identifier that was requested.
        requested: NodeId,
        /// Expected number of results.
        expected: usize,
        /// Actual number of results.
        actual: usize,
    },
}

impl NodeCreationError {
    /// Creates a rejected request error.
    pub fn rejected(requested: NodeId, status: StatusCode) -> Self {
        Self::Rejected { requested, status }
    }

    /// Creates a result count error.
    pub fn result_count(requested: NodeId, expected: usize, actual: usize) -> Self {
        Self::ResultCount {
            requested,
            expected,
            actual,
        }
    }

    /// Returns the identifier that was requested.
    pub fn requested(&self) -> &NodeId {
        match self {
            Self::Rejected { requested, .. } | Self::ResultCount { requested, .. } => requested,
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Rejected { .. } => ErrorCode::new(2, 1),
            Self::ResultCount { .. } => ErrorCode::new(2, 2),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Rejected { status, .. } if *status == StatusCode::BAD_NODE_ID_EXISTS => vec![
                "Choose a different node id or request an auto-assigned one",
            ],
            Self::Rejected { .. } => vec![
                "Check the parent node, reference type and type definition",
            ],
            Self::ResultCount { .. } => vec!["The address space returned a malformed response"],
        }
    }
}

// =============================================================================
// MethodWiringError
// =============================================================================

/// A method node was created, but a later wiring phase failed.
///
/// The method node is left in the address space. `completed` lists the
/// phases that succeeded, in order.
#[derive(Debug, Error)]
#[error("Method '{method}' created but {failed} failed: {source}")]
pub struct MethodWiringError {
    /// Identifier of the created method node.
    pub method: NodeId,
    /// Phases that completed before the failure.
    pub completed: Vec<MethodPhase>,
    /// The phase that failed.
    pub failed: MethodPhase,
    /// Underlying failure.
    #[source]
    pub source: Box<NodesError>,
}

// =============================================================================
// ProtocolError
// =============================================================================

/// Identifier grammar errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Malformed node id text.
    #[error("Invalid node id '{input}': {reason}")]
    InvalidNodeId {
        /// The input text.
        input: String,
        /// Reason.
        reason: String,
    },

    /// Malformed qualified name text.
    #[error("Invalid qualified name '{input}': {reason}")]
    InvalidQualifiedName {
        /// The input text.
        input: String,
        /// Reason.
        reason: String,
    },

    /// Unknown variant type name.
    #[error("Unknown variant type '{input}'")]
    InvalidVariantType {
        /// The input text.
        input: String,
    },
}

impl ProtocolError {
    /// Creates an invalid node id error.
    pub fn invalid_node_id(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid qualified name error.
    pub fn invalid_qualified_name(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidQualifiedName {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid variant type error.
    pub fn invalid_variant_type(input: impl Into<String>) -> Self {
        Self::InvalidVariantType {
            input: input.into(),
        }
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidNodeId { .. } => ErrorCode::new(4, 1),
            Self::InvalidQualifiedName { .. } => ErrorCode::new(4, 2),
            Self::InvalidVariantType { .. } => ErrorCode::new(4, 3),
        }
    }
}

// =============================================================================
// ServerError
// =============================================================================

/// Failures of the address space collaborator itself.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The address space cannot be reached.
    #[error("Address space unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// A service call failed as a whole.
    #[error("{service} failed: {message}")]
    ServiceFailed {
        /// Service name (AddNodes, DeleteNodes, ...).
        service: &'static str,
        /// Error message.
        message: String,
    },

    /// The referenced node does not exist.
    #[error("Node '{node_id}' not found")]
    NodeNotFound {
        /// Node id.
        node_id: NodeId,
    },
}

impl ServerError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a service failure.
    pub fn service_failed(service: &'static str, message: impl Into<String>) -> Self {
        Self::ServiceFailed {
            service,
            message: message.into(),
        }
    }

    /// Creates a node not found error.
    pub fn node_not_found(node_id: NodeId) -> Self {
        Self::NodeNotFound { node_id }
    }

    /// Returns `true` if the failure is transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Returns the error code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Unavailable { .. } => ErrorCode::new(5, 1),
            Self::ServiceFailed { .. } => ErrorCode::new(5, 2),
            Self::NodeNotFound { .. } => ErrorCode::new(5, 3),
        }
    }
}

// =============================================================================
// ErrorSeverity
// =============================================================================

/// Error severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Informational - no action required.
    Info,
    /// Warning - action may be required.
    Warning,
    /// Error - action required, but recoverable.
    Error,
    /// Critical - the address space may be left partially modified.
    Critical,
}

impl ErrorSeverity {
    /// Converts to tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// ErrorCode
// =============================================================================

/// Structured error code for categorization.
///
/// Format: `UA-XXYY` where XX is category and YY is specific error.
///
/// Categories:
/// - 1: Type inference
/// - 2: Node creation
/// - 3: Method wiring
/// - 4: Protocol
/// - 5: Server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// Category (1-5).
    pub category: u8,
    /// Specific error within category.
    pub code: u8,
}

impl ErrorCode {
    /// Creates a new error code.
    pub const fn new(category: u8, code: u8) -> Self {
        Self { category, code }
    }

    /// Returns the full error code as a u16.
    pub fn as_u16(&self) -> u16 {
        ((self.category as u16) << 8) | (self.code as u16)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UA-{:02X}{:02X}", self.category, self.code)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        let code = ErrorCode::new(2, 1);
        assert_eq!(code.to_string(), "UA-0201");
        assert_eq!(code.as_u16(), 0x0201);

        let error = NodesError::rejected(NodeId::auto(2), StatusCode::BAD_NODE_ID_EXISTS);
        assert_eq!(error.error_code(), code);
    }

    #[test]
    fn test_rejected_carries_status_and_id() {
        let error = NodesError::rejected(NodeId::string(2, "Pump"), StatusCode::BAD_NODE_ID_EXISTS);

        assert_eq!(error.status_code(), Some(StatusCode::BAD_NODE_ID_EXISTS));
        assert_eq!(error.category(), "node_creation");
        assert!(error.to_string().contains("ns=2;s=Pump"));
        assert!(error.to_string().contains("BadNodeIdExists"));

        match error {
            NodesError::NodeCreation(e) => assert_eq!(e.requested(), &NodeId::string(2, "Pump")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nothing_is_retryable_except_unavailable() {
        assert!(!NodesError::from(ProtocolError::invalid_node_id("ns=2;q=1", "bad type")).is_retryable());
        assert!(!NodesError::from(TypeInferenceError::unknown_tag("Null")).is_retryable());
        assert!(NodesError::from(ServerError::unavailable("down")).is_retryable());
    }

    #[test]
    fn test_method_wiring_error_reports_phases() {
        let error = MethodWiringError {
            method: NodeId::numeric(2, 1000),
            completed: vec![MethodPhase::Node, MethodPhase::InputArguments],
            failed: MethodPhase::OutputArguments,
            source: Box::new(NodesError::rejected(
                NodeId::auto(0),
                StatusCode::BAD_BROWSE_NAME_DUPLICATED,
            )),
        };
        let error = NodesError::from(error);

        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert_eq!(error.status_code(), Some(StatusCode::BAD_BROWSE_NAME_DUPLICATED));
        assert!(error.to_string().contains("OutputArguments"));
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(ErrorSeverity::Warning.to_tracing_level(), Level::WARN);
        assert_eq!(ErrorSeverity::Critical.to_tracing_level(), Level::ERROR);
        assert!(ErrorSeverity::Critical > ErrorSeverity::Error);
    }
}

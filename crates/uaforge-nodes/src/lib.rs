// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node construction for OPC UA address spaces.
//!
//! This crate turns loosely typed arguments into validated AddNodes
//! requests and submits them to an address space:
//!
//! - Identity normalization: `(namespace, name)` or `(node id, browse name)`
//! - DataType inference from dynamically typed values
//! - Per-class attribute and reference selection
//! - Method creation with argument properties and callbacks
//! - Recursive deletion
//!
//! The address space itself is abstract ([`server::AddressSpace`]); an
//! in-memory implementation is included.
//!
//! # Error Handling
//!
//! ```text
//! NodesError
//! ├── TypeInference   - no DataType for a value
//! ├── NodeCreation    - address space rejected the request
//! ├── MethodWiring    - method created, wiring incomplete
//! ├── Protocol        - node id and browse name grammar errors
//! └── Server          - address space failures
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use uaforge_nodes::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> NodesResult<()> {
//!     let space = Arc::new(InMemoryAddressSpace::new());
//!     let objects = Node::objects(space.clone());
//!     let factory = NodeFactory::default();
//!
//!     let pump = factory.create_object(&objects, (2, "Pump"), None).await?;
//!     factory
//!         .create_variable(&pump, (2, "Speed"), VariableOptions::new(1450.0).writable())
//!         .await?;
//!
//!     pump.delete(true).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod attributes;
pub mod delete;
pub mod error;
pub mod factory;
pub mod identity;
pub mod ids;
pub mod inference;
pub mod method;
pub mod node;
pub mod registry;
pub mod request;
pub mod server;
pub mod status;
pub mod types;
pub mod variant;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{
    ErrorCode, ErrorSeverity, MethodWiringError, NodeCreationError, NodesError, NodesResult,
    ProtocolError, ServerError, TypeInferenceError,
};

pub use types::{
    AccessLevel, LocalizedText, NodeClass, NodeId, NodeIdentifier, QualifiedName, ValueRank,
};

pub use variant::{
    Argument, EUInformation, EnumValueType, ExtensionObject, Range, TypedValue, Value,
    ValueInput, VariantType,
};

pub use delete::delete_nodes;
pub use factory::{NodeFactory, TypeOptions, VariableOptions, VariableTypeOptions};
pub use identity::{BrowseNameArg, Identity, NodeIdArg};
pub use inference::TypeInferencer;
pub use method::{ArgumentSpec, MethodCallback, MethodNode, MethodOptions, MethodPhase};
pub use node::Node;
pub use registry::StructureRegistry;
pub use request::{AddNodesItem, AddNodesResult, DeleteNodesItem, NodeAttributes};
pub use server::{AddressSpace, InMemoryAddressSpace, NodeRecord, ReferenceRecord};
pub use status::StatusCode;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types.
pub mod prelude {
    pub use crate::error::{NodesError, NodesResult};
    pub use crate::factory::{NodeFactory, TypeOptions, VariableOptions, VariableTypeOptions};
    pub use crate::identity::{Identity, NodeIdArg};
    pub use crate::ids;
    pub use crate::method::{ArgumentSpec, MethodNode, MethodOptions};
    pub use crate::node::Node;
    pub use crate::server::{AddressSpace, InMemoryAddressSpace};
    pub use crate::status::StatusCode;
    pub use crate::types::{AccessLevel, NodeId, QualifiedName, ValueRank};
    pub use crate::variant::{TypedValue, Value, ValueInput, VariantType};
}

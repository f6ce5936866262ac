// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The address space collaborator.
//!
//! Node construction never touches address space state directly; every
//! mutation goes through [`AddressSpace`]. A remote server session and the
//! bundled [`InMemoryAddressSpace`] are both implementations.
//!
//! ```text
//! NodeFactory ──► AddressSpace::add_nodes ──► Vec<AddNodesResult>
//! delete_nodes ─► AddressSpace::children / delete_nodes
//! ```

mod memory;

pub use memory::{InMemoryAddressSpace, NodeRecord, ReferenceRecord};

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NodesResult;
use crate::method::MethodCallback;
use crate::request::{AddNodesItem, AddNodesResult, DeleteNodesItem};
use crate::status::StatusCode;
use crate::types::NodeId;

/// Abstract address space operations used by node construction.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; handles share one instance
/// behind an `Arc`.
///
/// # Errors
///
/// Per-item outcomes are reported as status codes inside `Ok`. An `Err`
/// means the call as a whole failed, usually as
/// [`NodesError::Server`](crate::error::NodesError::Server).
#[async_trait]
pub trait AddressSpace: Send + Sync {
    /// Adds nodes, returning one result per item in request order.
    async fn add_nodes(&self, items: Vec<AddNodesItem>) -> NodesResult<Vec<AddNodesResult>>;

    /// Deletes nodes, returning one status per item in request order.
    async fn delete_nodes(&self, items: Vec<DeleteNodesItem>) -> NodesResult<Vec<StatusCode>>;

    /// Direct hierarchical children of `node_id`.
    async fn children(&self, node_id: &NodeId) -> NodesResult<Vec<NodeId>>;

    /// The type definition of `node_id`, if it has one.
    async fn type_definition(&self, node_id: &NodeId) -> NodesResult<Option<NodeId>>;

    /// Installs the handler invoked when `method_id` is called.
    async fn register_method_callback(
        &self,
        method_id: NodeId,
        callback: Arc<dyn MethodCallback>,
    ) -> NodesResult<()>;
}

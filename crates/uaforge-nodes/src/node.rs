// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node handles.

use std::fmt;
use std::sync::Arc;

use crate::delete;
use crate::error::NodesResult;
use crate::ids;
use crate::server::AddressSpace;
use crate::status::StatusCode;
use crate::types::NodeId;

/// A reference to a node in an address space.
///
/// Cloning is cheap. The handle holds no node state; every query goes to
/// the address space.
#[derive(Clone)]
pub struct Node {
    server: Arc<dyn AddressSpace>,
    node_id: NodeId,
}

impl Node {
    /// Creates a handle.
    pub fn new(server: Arc<dyn AddressSpace>, node_id: NodeId) -> Self {
        Self { server, node_id }
    }

    /// Handle to the standard Objects folder.
    pub fn objects(server: Arc<dyn AddressSpace>) -> Self {
        Self::new(server, ids::OBJECTS_FOLDER)
    }

    /// Handle to another node of the same address space.
    pub fn sibling(&self, node_id: NodeId) -> Self {
        Self::new(Arc::clone(&self.server), node_id)
    }

    /// The node id.
    #[inline]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// The address space.
    #[inline]
    pub fn server(&self) -> &Arc<dyn AddressSpace> {
        &self.server
    }

    /// Direct hierarchical children.
    pub async fn children(&self) -> NodesResult<Vec<Node>> {
        let children = self.server.children(&self.node_id).await?;
        Ok(children.into_iter().map(|id| self.sibling(id)).collect())
    }

    /// The type definition, if any.
    pub async fn type_definition(&self) -> NodesResult<Option<NodeId>> {
        self.server.type_definition(&self.node_id).await
    }

    /// Deletes this node, and with `recursive` all of its descendants.
    pub async fn delete(&self, recursive: bool) -> NodesResult<Vec<StatusCode>> {
        delete::delete_nodes(self.server.as_ref(), std::slice::from_ref(self), recursive).await
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id && Arc::ptr_eq(&self.server, &other.server)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node").field("node_id", &self.node_id).finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.node_id)
    }
}

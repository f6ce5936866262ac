// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Normalization of node identity arguments.
//!
//! Callers name a new node in one of two ways:
//!
//! ```text
//! Identity::Indexed  { namespace, name }      ──► (ns=<namespace>;i=0, <namespace>:<name>)
//! Identity::Explicit { node_id, browse_name } ──► (parsed node id, parsed browse name)
//! ```
//!
//! The `i=0` identifier of the indexed form asks the address space to
//! assign one.

use std::fmt;

use crate::error::{NodesResult, ProtocolError};
use crate::types::{NodeId, QualifiedName};

// =============================================================================
// Identity
// =============================================================================

/// The identity of a node to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// A namespace index and a plain name; the identifier is auto-assigned.
    Indexed {
        /// Namespace index of both the node id and the browse name.
        namespace: u16,
        /// Browse name text.
        name: String,
    },
    /// An explicit node id and browse name.
    Explicit {
        /// Requested node id.
        node_id: NodeIdArg,
        /// Browse name.
        browse_name: BrowseNameArg,
    },
}

impl Identity {
    /// Creates an indexed identity.
    pub fn indexed(namespace: u16, name: impl Into<String>) -> Self {
        Self::Indexed {
            namespace,
            name: name.into(),
        }
    }

    /// Creates an explicit identity.
    pub fn explicit(node_id: impl Into<NodeIdArg>, browse_name: impl Into<BrowseNameArg>) -> Self {
        Self::Explicit {
            node_id: node_id.into(),
            browse_name: browse_name.into(),
        }
    }

    /// Resolves to the canonical `(NodeId, QualifiedName)` pair.
    ///
    /// Any name is accepted, the empty one included.
    ///
    /// # Errors
    ///
    /// Text outside the grammar fails with [`ProtocolError::InvalidNodeId`]
    /// or [`ProtocolError::InvalidQualifiedName`], unwrapped.
    pub fn resolve(&self) -> NodesResult<(NodeId, QualifiedName)> {
        match self {
            Self::Indexed { namespace, name } => Ok((
                NodeId::auto(*namespace),
                QualifiedName::new(*namespace, name.clone()),
            )),
            Self::Explicit {
                node_id,
                browse_name,
            } => Ok((node_id.resolve()?, browse_name.resolve()?)),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed { namespace, name } => write!(f, "{}, {:?}", namespace, name),
            Self::Explicit {
                node_id,
                browse_name,
            } => write!(f, "{}, {}", node_id, browse_name),
        }
    }
}

impl From<(u16, &str)> for Identity {
    fn from((namespace, name): (u16, &str)) -> Self {
        Self::indexed(namespace, name)
    }
}

impl From<(u16, String)> for Identity {
    fn from((namespace, name): (u16, String)) -> Self {
        Self::indexed(namespace, name)
    }
}

impl From<(NodeId, QualifiedName)> for Identity {
    fn from((node_id, browse_name): (NodeId, QualifiedName)) -> Self {
        Self::explicit(node_id, browse_name)
    }
}

impl From<(&str, &str)> for Identity {
    fn from((node_id, browse_name): (&str, &str)) -> Self {
        Self::explicit(node_id, browse_name)
    }
}

impl From<(NodeId, &str)> for Identity {
    fn from((node_id, browse_name): (NodeId, &str)) -> Self {
        Self::explicit(node_id, browse_name)
    }
}

// =============================================================================
// NodeIdArg
// =============================================================================

/// A node id given as a value or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeIdArg {
    /// Already a node id.
    Id(NodeId),
    /// Text in the `ns=<index>;i=<n>` grammar.
    Text(String),
}

impl NodeIdArg {
    /// Resolves to a node id.
    pub fn resolve(&self) -> Result<NodeId, ProtocolError> {
        match self {
            Self::Id(id) => Ok(id.clone()),
            Self::Text(text) => text.parse(),
        }
    }
}

impl fmt::Display for NodeIdArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Text(text) => write!(f, "{:?}", text),
        }
    }
}

impl From<NodeId> for NodeIdArg {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl From<&NodeId> for NodeIdArg {
    fn from(id: &NodeId) -> Self {
        Self::Id(id.clone())
    }
}

/// A bare number is a namespace 0 numeric identifier.
impl From<u32> for NodeIdArg {
    fn from(value: u32) -> Self {
        Self::Id(NodeId::ns0(value))
    }
}

impl From<&str> for NodeIdArg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for NodeIdArg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

// =============================================================================
// BrowseNameArg
// =============================================================================

/// A browse name given as a value or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseNameArg {
    /// Already a qualified name.
    Name(QualifiedName),
    /// Text in the `<index>:<name>` grammar.
    Text(String),
}

impl BrowseNameArg {
    /// Resolves to a qualified name.
    pub fn resolve(&self) -> Result<QualifiedName, ProtocolError> {
        match self {
            Self::Name(name) => Ok(name.clone()),
            Self::Text(text) => text.parse(),
        }
    }
}

impl fmt::Display for BrowseNameArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{}", name),
            Self::Text(text) => write!(f, "{:?}", text),
        }
    }
}

impl From<QualifiedName> for BrowseNameArg {
    fn from(name: QualifiedName) -> Self {
        Self::Name(name)
    }
}

impl From<&str> for BrowseNameArg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for BrowseNameArg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

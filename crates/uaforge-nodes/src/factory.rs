// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node creation entry points.
//!
//! Every operation follows the same pipeline:
//!
//! ```text
//! Identity ──resolve──► (NodeId, QualifiedName)
//!          ──infer────► (TypedValue, DataType)         variables only
//!          ──build────► AddNodesItem
//!          ──submit───► AddressSpace::add_nodes([item])
//!          ──check────► exactly one Good result ──► Node
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use uaforge_nodes::prelude::*;
//!
//! # async fn example() -> NodesResult<()> {
//! let space: Arc<dyn AddressSpace> = Arc::new(InMemoryAddressSpace::new());
//! let objects = Node::objects(space);
//! let factory = NodeFactory::default();
//!
//! let plant = factory.create_folder(&objects, (2, "Plant")).await?;
//! let temperature = factory
//!     .create_variable(&plant, (2, "Temperature"), VariableOptions::new(21.5).writable())
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::error::{NodeCreationError, NodesError, NodesResult};
use crate::identity::{Identity, NodeIdArg};
use crate::ids;
use crate::inference::TypeInferencer;
use crate::node::Node;
use crate::registry::StructureRegistry;
use crate::request::{AddNodesItem, AddNodesResult};
use crate::types::{AccessLevel, NodeId, ValueRank};
use crate::variant::{ValueInput, VariantType};

// =============================================================================
// Options
// =============================================================================

/// Options for variables and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableOptions {
    /// Initial value.
    pub value: ValueInput,
    /// Variant tag to apply to a raw value.
    pub variant_type: Option<VariantType>,
    /// Explicit DataType; inferred from the value when absent.
    pub data_type: Option<NodeId>,
    /// Access level; CurrentRead when absent.
    pub access_level: Option<AccessLevel>,
}

impl VariableOptions {
    /// Options with only an initial value.
    pub fn new(value: impl Into<ValueInput>) -> Self {
        Self {
            value: value.into(),
            variant_type: None,
            data_type: None,
            access_level: None,
        }
    }

    /// Sets the variant tag.
    pub fn variant_type(mut self, variant_type: VariantType) -> Self {
        self.variant_type = Some(variant_type);
        self
    }

    /// Sets an explicit DataType.
    pub fn data_type(mut self, data_type: NodeId) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Sets the access level.
    pub fn access_level(mut self, access_level: AccessLevel) -> Self {
        self.access_level = Some(access_level);
        self
    }

    /// Makes the current value writable.
    pub fn writable(self) -> Self {
        self.access_level(AccessLevel::READ_WRITE)
    }
}

/// Options for variable types.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableTypeOptions {
    /// DataType of instances.
    pub data_type: NodeIdArg,
    /// Default value.
    pub value: Option<ValueInput>,
    /// Variant tag to apply to a raw default value.
    pub variant_type: Option<VariantType>,
    /// Rank when there is no default value; `Any` when absent.
    pub value_rank: Option<ValueRank>,
    /// Abstract flag.
    pub is_abstract: bool,
}

impl VariableTypeOptions {
    /// Options with only a DataType.
    pub fn new(data_type: impl Into<NodeIdArg>) -> Self {
        Self {
            data_type: data_type.into(),
            value: None,
            variant_type: None,
            value_rank: None,
            is_abstract: false,
        }
    }

    /// Sets the default value.
    pub fn value(mut self, value: impl Into<ValueInput>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the variant tag.
    pub fn variant_type(mut self, variant_type: VariantType) -> Self {
        self.variant_type = Some(variant_type);
        self
    }

    /// Sets the rank used without a default value.
    pub fn value_rank(mut self, value_rank: ValueRank) -> Self {
        self.value_rank = Some(value_rank);
        self
    }

    /// Sets the abstract flag.
    pub fn is_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }
}

/// Options for data types and object types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeOptions {
    /// Abstract flag.
    pub is_abstract: bool,
}

impl TypeOptions {
    /// Abstract type options.
    pub fn abstract_type() -> Self {
        Self { is_abstract: true }
    }
}

// =============================================================================
// NodeFactory
// =============================================================================

/// Creates nodes through a parent handle's address space.
#[derive(Debug, Clone, Default)]
pub struct NodeFactory {
    inferencer: TypeInferencer,
}

impl NodeFactory {
    /// Creates a factory with the given inferencer.
    pub fn new(inferencer: TypeInferencer) -> Self {
        Self { inferencer }
    }

    /// Creates a factory resolving structures through `registry`.
    pub fn with_registry(registry: Arc<StructureRegistry>) -> Self {
        Self::new(TypeInferencer::new(registry))
    }

    /// The type inferencer.
    pub fn inferencer(&self) -> &TypeInferencer {
        &self.inferencer
    }

    /// Creates a FolderType object.
    pub async fn create_folder(
        &self,
        parent: &Node,
        identity: impl Into<Identity>,
    ) -> NodesResult<Node> {
        self.create_object(parent, identity, Some(NodeIdArg::from(ids::FOLDER_TYPE)))
            .await
    }

    /// Creates an object of `object_type`, BaseObjectType when absent.
    ///
    /// The reference from the parent is Organizes when the parent is a
    /// folder and HasComponent otherwise.
    pub async fn create_object(
        &self,
        parent: &Node,
        identity: impl Into<Identity>,
        object_type: Option<NodeIdArg>,
    ) -> NodesResult<Node> {
        let identity: Identity = identity.into();
        let (node_id, browse_name) = identity.resolve()?;
        let object_type = match object_type {
            Some(arg) => arg.resolve()?,
            None => ids::BASE_OBJECT_TYPE,
        };

        let parent_type_definition = parent.type_definition().await?;
        let item = AddNodesItem::object(
            parent.node_id().clone(),
            parent_type_definition.as_ref(),
            node_id,
            browse_name,
            object_type,
        );
        self.submit(parent, item).await
    }

    /// Creates a property (HasProperty, PropertyType).
    pub async fn create_property(
        &self,
        parent: &Node,
        identity: impl Into<Identity>,
        options: VariableOptions,
    ) -> NodesResult<Node> {
        self.variable(parent, identity.into(), options, true).await
    }

    /// Creates a data variable (HasComponent, BaseDataVariableType).
    pub async fn create_variable(
        &self,
        parent: &Node,
        identity: impl Into<Identity>,
        options: VariableOptions,
    ) -> NodesResult<Node> {
        self.variable(parent, identity.into(), options, false).await
    }

    /// Creates a variable type as a subtype of `parent`.
    pub async fn create_variable_type(
        &self,
        parent: &Node,
        identity: impl Into<Identity>,
        options: VariableTypeOptions,
    ) -> NodesResult<Node> {
        let identity: Identity = identity.into();
        let (node_id, browse_name) = identity.resolve()?;
        let data_type = options.data_type.resolve()?;
        let value = match options.value {
            Some(value) => Some(self.inferencer.resolve(value, options.variant_type, None)?.0),
            None => None,
        };

        let item = AddNodesItem::variable_type(
            parent.node_id().clone(),
            node_id,
            browse_name,
            data_type,
            value,
            options.value_rank.unwrap_or(ValueRank::Any),
            options.is_abstract,
        );
        self.submit(parent, item).await
    }

    /// Creates a data type as a subtype of `parent`.
    pub async fn create_data_type(
        &self,
        parent: &Node,
        identity: impl Into<Identity>,
        options: TypeOptions,
    ) -> NodesResult<Node> {
        let identity: Identity = identity.into();
        let (node_id, browse_name) = identity.resolve()?;
        let item = AddNodesItem::data_type(
            parent.node_id().clone(),
            node_id,
            browse_name,
            options.is_abstract,
        );
        self.submit(parent, item).await
    }

    /// Creates an object type as a subtype of `parent`.
    pub async fn create_object_type(
        &self,
        parent: &Node,
        identity: impl Into<Identity>,
        options: TypeOptions,
    ) -> NodesResult<Node> {
        let identity: Identity = identity.into();
        let (node_id, browse_name) = identity.resolve()?;
        let item = AddNodesItem::object_type(
            parent.node_id().clone(),
            node_id,
            browse_name,
            options.is_abstract,
        );
        self.submit(parent, item).await
    }

    /// Creates a concrete object type.
    #[deprecated(note = "use `create_object_type`")]
    pub async fn create_subtype(
        &self,
        parent: &Node,
        identity: impl Into<Identity>,
    ) -> NodesResult<Node> {
        self.create_object_type(parent, identity, TypeOptions::default())
            .await
    }

    async fn variable(
        &self,
        parent: &Node,
        identity: Identity,
        options: VariableOptions,
        is_property: bool,
    ) -> NodesResult<Node> {
        let (node_id, browse_name) = identity.resolve()?;
        let (value, explicit) =
            self.inferencer
                .resolve(options.value, options.variant_type, options.data_type)?;
        let data_type = self.inferencer.data_type_for(&value, explicit)?;

        let item = AddNodesItem::variable(
            parent.node_id().clone(),
            node_id,
            browse_name,
            value,
            data_type,
            is_property,
            options.access_level.unwrap_or_default(),
        );
        self.submit(parent, item).await
    }

    /// Submits a single-item AddNodes batch and checks its one result.
    pub(crate) async fn submit(&self, parent: &Node, item: AddNodesItem) -> NodesResult<Node> {
        let requested = item.requested_new_node_id.clone();
        let browse_name = item.browse_name.clone();
        let node_class = item.node_class;

        tracing::debug!(
            node_class = %node_class,
            browse_name = %browse_name,
            requested = %requested,
            parent = %item.parent_node_id,
            reference_type = %item.reference_type_id,
            "Submitting add node request"
        );

        let results = parent.server().add_nodes(vec![item]).await?;
        let [result]: [AddNodesResult; 1] = results.try_into().map_err(|results: Vec<_>| {
            NodesError::from(NodeCreationError::result_count(requested.clone(), 1, results.len()))
        })?;

        if !result.status_code.is_good() {
            tracing::warn!(
                node_class = %node_class,
                browse_name = %browse_name,
                requested = %requested,
                status = %result.status_code,
                "Add node rejected"
            );
            return Err(NodesError::rejected(requested, result.status_code));
        }

        tracing::info!(
            node_class = %node_class,
            browse_name = %browse_name,
            node_id = %result.added_node_id,
            "Created node"
        );
        Ok(parent.sibling(result.added_node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_options_builders() {
        let options = VariableOptions::new(5i32)
            .variant_type(VariantType::Int64)
            .data_type(NodeId::ns0(8))
            .writable();
        assert_eq!(options.variant_type, Some(VariantType::Int64));
        assert_eq!(options.data_type, Some(NodeId::ns0(8)));
        assert_eq!(options.access_level, Some(AccessLevel::READ_WRITE));
    }

    #[test]
    fn test_variable_type_options_defaults() {
        let options = VariableTypeOptions::new(11u32);
        assert_eq!(options.data_type, NodeIdArg::Id(NodeId::ns0(11)));
        assert!(options.value.is_none());
        assert!(options.value_rank.is_none());
        assert!(!options.is_abstract);
    }

    #[test]
    fn test_type_options() {
        assert!(!TypeOptions::default().is_abstract);
        assert!(TypeOptions::abstract_type().is_abstract);
    }
}

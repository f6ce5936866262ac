// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Nodeset provisioning.
//!
//! Walks a [`NodesetConfig`] tree depth-first and creates each entry through
//! the [`NodeFactory`]:
//!
//! ```text
//! structures ──► StructureRegistry ──► DataType nodes under Structure
//! nodes      ──► Objects folder
//!                ├── folder / object / variable / property / method
//!                └── *_type at top level ──► below the standard base type
//! ```
//!
//! The first failing entry aborts provisioning. Nodes created before it are
//! left in place.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use uaforge_config::{ConfigError, NodeKind, NodeSpec, NodesetConfig};
use uaforge_nodes::prelude::*;
use uaforge_nodes::{
    MethodCallback, NodeCreationError, NodesError, StructureRegistry, TypeOptions,
};

use crate::error::{BinError, BinResult};

// =============================================================================
// Provisioned Tree
// =============================================================================

/// A node created from a nodeset entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionedNode {
    /// Entry kind.
    pub kind: NodeKind,
    /// Browse name.
    pub name: String,
    /// Assigned node id.
    pub node_id: NodeId,
    /// Created children, including method argument properties.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProvisionedNode>,
}

impl ProvisionedNode {
    fn leaf(kind: NodeKind, name: impl Into<String>, node: &Node) -> Self {
        Self {
            kind,
            name: name.into(),
            node_id: node.node_id().clone(),
            children: Vec::new(),
        }
    }

    /// This node and all of its descendants.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ProvisionedNode::count).sum::<usize>()
    }
}

/// Result of provisioning a nodeset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Provisioned {
    /// DataType nodes created for registered structures.
    pub structures: Vec<NodeId>,
    /// Top-level nodes below the Objects folder.
    pub nodes: Vec<ProvisionedNode>,
}

impl Provisioned {
    /// Total number of nodes created from the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(ProvisionedNode::count).sum()
    }
}

// =============================================================================
// Method Callback
// =============================================================================

/// Callback for methods declared in a nodeset file.
///
/// Checks the argument count and answers with a null value per output.
#[derive(Debug)]
struct DeclaredMethod {
    name: String,
    inputs: usize,
    outputs: Vec<VariantType>,
}

impl MethodCallback for DeclaredMethod {
    fn call(&self, parent: &NodeId, arguments: Vec<TypedValue>) -> Result<Vec<TypedValue>, StatusCode> {
        if arguments.len() < self.inputs {
            return Err(StatusCode::BAD_ARGUMENTS_MISSING);
        }
        if arguments.len() > self.inputs {
            return Err(StatusCode::BAD_INVALID_ARGUMENT);
        }

        info!(method = %self.name, object = %parent, arguments = arguments.len(), "Method called");
        Ok(self.outputs.iter().map(|tag| TypedValue::null(*tag)).collect())
    }
}

// =============================================================================
// Provisioner
// =============================================================================

/// Creates the nodes a nodeset describes.
#[derive(Debug, Clone)]
pub struct Provisioner {
    factory: NodeFactory,
    namespace: u16,
}

impl Provisioner {
    /// Creates a provisioner whose inferencer knows the file's structures.
    pub fn new(config: &NodesetConfig) -> BinResult<Self> {
        let mut registry = StructureRegistry::with_builtin_structures();
        for (i, structure) in config.structures.iter().enumerate() {
            let data_type = structure.data_type_id(&format!("structures[{i}]"))?;
            registry.register(structure.name.clone(), data_type);
        }

        Ok(Self {
            factory: NodeFactory::with_registry(Arc::new(registry)),
            namespace: config.namespace,
        })
    }

    /// The node factory.
    pub fn factory(&self) -> &NodeFactory {
        &self.factory
    }

    /// Provisions `config` into `space`.
    pub async fn provision(
        &self,
        space: Arc<dyn AddressSpace>,
        config: &NodesetConfig,
    ) -> BinResult<Provisioned> {
        let objects = Node::objects(Arc::clone(&space));
        let mut provisioned = Provisioned::default();

        for (i, structure) in config.structures.iter().enumerate() {
            let path = format!("structures[{i}]");
            if let Some(data_type) = self.structure_data_type(&objects, structure, &path).await? {
                provisioned.structures.push(data_type);
            }
        }

        for (i, spec) in config.nodes.iter().enumerate() {
            let node = self
                .provision_node(&objects, None, spec, format!("nodes[{i}]"))
                .await?;
            provisioned.nodes.push(node);
        }

        info!(
            structures = provisioned.structures.len(),
            nodes = provisioned.node_count(),
            "Nodeset provisioned"
        );
        Ok(provisioned)
    }

    async fn structure_data_type(
        &self,
        objects: &Node,
        structure: &uaforge_config::StructureSpec,
        path: &str,
    ) -> BinResult<Option<NodeId>> {
        let data_type = structure.data_type_id(path)?;
        let browse_name = QualifiedName::new(data_type.namespace_index, structure.name.as_str());
        let parent = objects.sibling(ids::STRUCTURE);

        match self
            .factory
            .create_data_type(&parent, (data_type.clone(), browse_name), TypeOptions::default())
            .await
        {
            Ok(node) => Ok(Some(node.node_id().clone())),
            Err(NodesError::NodeCreation(NodeCreationError::Rejected { status, .. }))
                if status == StatusCode::BAD_NODE_ID_EXISTS =>
            {
                debug!(data_type = %data_type, "Structure DataType already present");
                Ok(None)
            }
            Err(e) => Err(self.failed(path, e)),
        }
    }

    fn provision_node<'a>(
        &'a self,
        parent: &'a Node,
        parent_kind: Option<NodeKind>,
        spec: &'a NodeSpec,
        path: String,
    ) -> Pin<Box<dyn Future<Output = BinResult<ProvisionedNode>> + 'a>> {
        Box::pin(async move {
            let parent = self.parent_for(parent, parent_kind, spec.kind);
            let (node, mut children) = self.create(&parent, spec, &path).await?;

            for (i, child) in spec.children.iter().enumerate() {
                let child = self
                    .provision_node(&node, Some(spec.kind), child, format!("{path}.children[{i}]"))
                    .await?;
                children.push(child);
            }

            Ok(ProvisionedNode {
                kind: spec.kind,
                name: spec.name.clone(),
                node_id: node.node_id().clone(),
                children,
            })
        })
    }

    /// Type entries outside a type of the same kind go below the standard
    /// base type instead of the Objects folder.
    fn parent_for(&self, parent: &Node, parent_kind: Option<NodeKind>, kind: NodeKind) -> Node {
        if !kind.is_type() || parent_kind == Some(kind) {
            return parent.clone();
        }
        let base = match kind {
            NodeKind::VariableType => ids::BASE_DATA_VARIABLE_TYPE,
            NodeKind::ObjectType => ids::BASE_OBJECT_TYPE,
            _ => ids::BASE_DATA_TYPE,
        };
        parent.sibling(base)
    }

    fn identity(&self, spec: &NodeSpec, path: &str) -> BinResult<Identity> {
        Ok(match spec.node_id(path)? {
            Some(node_id) => {
                Identity::from((node_id, QualifiedName::new(self.namespace, spec.name.as_str())))
            }
            None => Identity::indexed(self.namespace, spec.name.as_str()),
        })
    }

    async fn create(
        &self,
        parent: &Node,
        spec: &NodeSpec,
        path: &str,
    ) -> BinResult<(Node, Vec<ProvisionedNode>)> {
        let identity = self.identity(spec, path)?;
        let factory = &self.factory;

        let created = match spec.kind {
            NodeKind::Folder => factory.create_folder(parent, identity).await,
            NodeKind::Object => {
                let object_type = spec.object_type(path)?.map(NodeIdArg::from);
                factory.create_object(parent, identity, object_type).await
            }
            NodeKind::Variable => {
                let options = variable_options(spec, path)?;
                factory.create_variable(parent, identity, options).await
            }
            NodeKind::Property => {
                let options = variable_options(spec, path)?;
                factory.create_property(parent, identity, options).await
            }
            NodeKind::VariableType => {
                let options = variable_type_options(spec, path)?;
                factory.create_variable_type(parent, identity, options).await
            }
            NodeKind::ObjectType => {
                let options = TypeOptions {
                    is_abstract: spec.is_abstract,
                };
                factory.create_object_type(parent, identity, options).await
            }
            NodeKind::DataType => {
                let options = TypeOptions {
                    is_abstract: spec.is_abstract,
                };
                factory.create_data_type(parent, identity, options).await
            }
            NodeKind::Method => return self.create_method(parent, identity, spec, path).await,
        };

        created
            .map(|node| (node, Vec::new()))
            .map_err(|e| self.failed(path, e))
    }

    async fn create_method(
        &self,
        parent: &Node,
        identity: Identity,
        spec: &NodeSpec,
        path: &str,
    ) -> BinResult<(Node, Vec<ProvisionedNode>)> {
        let inputs = spec.inputs(path)?;
        let outputs = spec.outputs(path)?;
        let callback = DeclaredMethod {
            name: spec.name.clone(),
            inputs: inputs.len(),
            outputs: outputs.clone(),
        };

        let options = MethodOptions::new(callback).inputs(inputs).outputs(outputs);
        let wired = self
            .factory
            .create_method(parent, identity, options)
            .await
            .map_err(|e| self.failed(path, e))?;

        let mut children = Vec::new();
        if let Some(node) = &wired.input_arguments {
            children.push(ProvisionedNode::leaf(NodeKind::Property, "InputArguments", node));
        }
        if let Some(node) = &wired.output_arguments {
            children.push(ProvisionedNode::leaf(NodeKind::Property, "OutputArguments", node));
        }
        Ok((wired.method, children))
    }

    fn failed(&self, path: &str, error: NodesError) -> BinError {
        error.log(path);
        BinError::provisioning(path, error)
    }
}

// =============================================================================
// Option Builders
// =============================================================================

fn variable_options(spec: &NodeSpec, path: &str) -> BinResult<VariableOptions> {
    let value = spec
        .value(path)?
        .ok_or_else(|| ConfigError::missing_field(format!("{path}.value")))?;

    let mut options = VariableOptions::new(value);
    if let Some(tag) = spec.variant_type(path)? {
        options = options.variant_type(tag);
    }
    if let Some(data_type) = spec.data_type(path)? {
        options = options.data_type(data_type);
    }
    if spec.writable {
        options = options.writable();
    }
    Ok(options)
}

fn variable_type_options(spec: &NodeSpec, path: &str) -> BinResult<VariableTypeOptions> {
    let data_type = spec
        .data_type(path)?
        .ok_or_else(|| ConfigError::missing_field(format!("{path}.data_type")))?;

    let mut options = VariableTypeOptions::new(data_type).is_abstract(spec.is_abstract);
    if let Some(value) = spec.value(path)? {
        options = options.value(value);
    }
    if let Some(tag) = spec.variant_type(path)? {
        options = options.variant_type(tag);
    }
    Ok(options)
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-process address space.
//!
//! Holds nodes and forward references in a map behind a single lock.
//! Namespace 0 is bootstrapped with the folders, types and reference types
//! the node builders link to.
//!
//! Add-node validation order, first failure wins:
//!
//! ```text
//! parent exists           -> BadParentNodeIdInvalid
//! hierarchical reference  -> BadReferenceTypeIdInvalid
//! attributes match class  -> BadNodeAttributesInvalid
//! type definition exists  -> BadTypeDefinitionInvalid
//! requested id free       -> BadNodeIdExists
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{NodesResult, ServerError};
use crate::ids;
use crate::method::MethodCallback;
use crate::registry::StructureRegistry;
use crate::request::{AddNodesItem, AddNodesResult, DeleteNodesItem, NodeAttributes};
use crate::status::StatusCode;
use crate::types::{LocalizedText, NodeClass, NodeId, QualifiedName, ValueRank};
use crate::variant::TypedValue;

use super::AddressSpace;

/// First identifier handed out for auto-assigned numeric ids, in every
/// namespace including 0. Taken ids are skipped.
const FIRST_AUTO_ID: u32 = 1000;

/// Built-in data types below BaseDataType.
const BUILTIN_DATA_TYPES: &[(u32, &str)] = &[
    (1, "Boolean"),
    (2, "SByte"),
    (3, "Byte"),
    (4, "Int16"),
    (5, "UInt16"),
    (6, "Int32"),
    (7, "UInt32"),
    (8, "Int64"),
    (9, "UInt64"),
    (10, "Float"),
    (11, "Double"),
    (12, "String"),
    (13, "DateTime"),
    (14, "Guid"),
    (15, "ByteString"),
    (16, "XmlElement"),
    (17, "NodeId"),
    (18, "ExpandedNodeId"),
    (19, "StatusCode"),
    (20, "QualifiedName"),
    (21, "LocalizedText"),
    (22, "Structure"),
    (23, "DataValue"),
    (25, "DiagnosticInfo"),
    (29, "Enumeration"),
];

// =============================================================================
// Records
// =============================================================================

/// A forward reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    /// Reference type.
    pub reference_type_id: NodeId,
    /// Target node.
    pub target: NodeId,
}

/// A stored node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    /// Node id.
    pub node_id: NodeId,
    /// Node class.
    pub node_class: NodeClass,
    /// Browse name.
    pub browse_name: QualifiedName,
    /// Display name.
    pub display_name: LocalizedText,
    /// Type definition.
    pub type_definition: Option<NodeId>,
    /// Attributes as supplied on creation; `None` for bootstrap nodes.
    pub attributes: Option<NodeAttributes>,
    /// Forward references.
    pub references: Vec<ReferenceRecord>,
}

impl NodeRecord {
    fn bootstrap(id: u32, node_class: NodeClass, name: &str, type_definition: Option<NodeId>) -> Self {
        Self {
            node_id: NodeId::ns0(id),
            node_class,
            browse_name: QualifiedName::standard(name),
            display_name: LocalizedText::new(name),
            type_definition,
            attributes: None,
            references: Vec::new(),
        }
    }

    /// DataType of a variable or variable type.
    pub fn data_type(&self) -> Option<&NodeId> {
        self.attributes.as_ref().and_then(NodeAttributes::data_type)
    }

    /// Value of a variable or variable type.
    pub fn value(&self) -> Option<&TypedValue> {
        self.attributes.as_ref().and_then(NodeAttributes::value)
    }

    /// Rank of a variable or variable type.
    pub fn value_rank(&self) -> Option<ValueRank> {
        self.attributes.as_ref().and_then(NodeAttributes::value_rank)
    }

    /// Targets of forward references of `reference_type_id`.
    pub fn targets(&self, reference_type_id: &NodeId) -> Vec<NodeId> {
        self.references
            .iter()
            .filter(|r| &r.reference_type_id == reference_type_id)
            .map(|r| r.target.clone())
            .collect()
    }
}

// =============================================================================
// InMemoryAddressSpace
// =============================================================================

#[derive(Default)]
struct State {
    nodes: HashMap<NodeId, NodeRecord>,
    next_ids: HashMap<u16, u32>,
    callbacks: HashMap<NodeId, Arc<dyn MethodCallback>>,
}

impl State {
    fn insert(&mut self, record: NodeRecord) {
        self.nodes.insert(record.node_id.clone(), record);
    }

    fn link(&mut self, source: &NodeId, reference_type_id: NodeId, target: NodeId) {
        if let Some(node) = self.nodes.get_mut(source) {
            node.references.push(ReferenceRecord {
                reference_type_id,
                target,
            });
        }
    }

    fn next_free_id(&mut self, namespace_index: u16) -> NodeId {
        let next = self.next_ids.entry(namespace_index).or_insert(FIRST_AUTO_ID);
        loop {
            let candidate = NodeId::numeric(namespace_index, *next);
            *next = next.saturating_add(1);
            if !self.nodes.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn validate(&self, item: &AddNodesItem) -> Result<(), StatusCode> {
        if !self.nodes.contains_key(&item.parent_node_id) {
            return Err(StatusCode::BAD_PARENT_NODE_ID_INVALID);
        }
        if !ids::HIERARCHICAL_REFERENCE_TYPES.contains(&item.reference_type_id) {
            return Err(StatusCode::BAD_REFERENCE_TYPE_ID_INVALID);
        }
        if item.node_attributes.node_class() != item.node_class {
            return Err(StatusCode::BAD_NODE_ATTRIBUTES_INVALID);
        }
        if let Some(type_definition) = &item.type_definition {
            if !self.nodes.contains_key(type_definition) {
                return Err(StatusCode::BAD_TYPE_DEFINITION_INVALID);
            }
        }
        if !item.requested_new_node_id.is_auto()
            && self.nodes.contains_key(&item.requested_new_node_id)
        {
            return Err(StatusCode::BAD_NODE_ID_EXISTS);
        }
        Ok(())
    }

    fn add(&mut self, item: AddNodesItem) -> AddNodesResult {
        if let Err(status) = self.validate(&item) {
            tracing::debug!(
                browse_name = %item.browse_name,
                parent = %item.parent_node_id,
                status = %status,
                "Rejected add node"
            );
            return AddNodesResult::bad(status);
        }

        let node_id = if item.requested_new_node_id.is_auto() {
            self.next_free_id(item.requested_new_node_id.namespace_index)
        } else {
            item.requested_new_node_id.clone()
        };

        let mut references = Vec::new();
        if let Some(type_definition) = &item.type_definition {
            references.push(ReferenceRecord {
                reference_type_id: ids::HAS_TYPE_DEFINITION,
                target: type_definition.clone(),
            });
        }

        self.insert(NodeRecord {
            node_id: node_id.clone(),
            node_class: item.node_class,
            display_name: item.node_attributes.base().display_name.clone(),
            browse_name: item.browse_name,
            type_definition: item.type_definition,
            attributes: Some(item.node_attributes),
            references,
        });
        self.link(&item.parent_node_id, item.reference_type_id, node_id.clone());

        AddNodesResult::good(node_id)
    }

    fn remove_references_to(&mut self, target: &NodeId) {
        for node in self.nodes.values_mut() {
            node.references.retain(|r| &r.target != target);
        }
    }
}

/// A thread-safe in-memory address space.
///
/// # Examples
///
/// ```
/// use uaforge_nodes::server::InMemoryAddressSpace;
/// use uaforge_nodes::ids;
///
/// let space = InMemoryAddressSpace::new();
/// assert!(space.contains(&ids::OBJECTS_FOLDER));
/// ```
pub struct InMemoryAddressSpace {
    state: RwLock<State>,
}

impl InMemoryAddressSpace {
    /// Creates an address space holding the standard namespace 0 nodes.
    pub fn new() -> Self {
        let mut state = State::default();
        bootstrap(&mut state);
        tracing::debug!(nodes = state.nodes.len(), "Bootstrapped address space");
        Self {
            state: RwLock::new(state),
        }
    }

    /// Returns a copy of the stored node.
    pub fn node(&self, node_id: &NodeId) -> Option<NodeRecord> {
        self.state.read().nodes.get(node_id).cloned()
    }

    /// Returns the browse name of a stored node.
    pub fn browse_name(&self, node_id: &NodeId) -> Option<QualifiedName> {
        self.state
            .read()
            .nodes
            .get(node_id)
            .map(|node| node.browse_name.clone())
    }

    /// Returns `true` if the node exists.
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.state.read().nodes.contains_key(node_id)
    }

    /// Number of stored nodes, bootstrap nodes included.
    pub fn len(&self) -> usize {
        self.state.read().nodes.len()
    }

    /// Always `false` after bootstrap.
    pub fn is_empty(&self) -> bool {
        self.state.read().nodes.is_empty()
    }

    /// Returns `true` if a callback is registered for the method.
    pub fn has_method_callback(&self, method_id: &NodeId) -> bool {
        self.state.read().callbacks.contains_key(method_id)
    }

    /// Invokes the callback registered for `method_id` on `object_id`.
    ///
    /// The lock is released before the callback runs.
    pub fn call_method(
        &self,
        object_id: &NodeId,
        method_id: &NodeId,
        arguments: Vec<TypedValue>,
    ) -> Result<Vec<TypedValue>, StatusCode> {
        let callback = self
            .state
            .read()
            .callbacks
            .get(method_id)
            .cloned()
            .ok_or(StatusCode::BAD_METHOD_INVALID)?;

        tracing::debug!(object = %object_id, method = %method_id, "Calling method");
        callback.call(object_id, arguments)
    }

    fn hierarchical_children(&self, node_id: &NodeId) -> Vec<NodeId> {
        self.state
            .read()
            .nodes
            .get(node_id)
            .map(|node| {
                node.references
                    .iter()
                    .filter(|r| ids::HIERARCHICAL_REFERENCE_TYPES.contains(&r.reference_type_id))
                    .map(|r| r.target.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for InMemoryAddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryAddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("InMemoryAddressSpace")
            .field("nodes", &state.nodes.len())
            .field("callbacks", &state.callbacks.len())
            .finish()
    }
}

#[async_trait]
impl AddressSpace for InMemoryAddressSpace {
    async fn add_nodes(&self, items: Vec<AddNodesItem>) -> NodesResult<Vec<AddNodesResult>> {
        let mut state = self.state.write();
        Ok(items.into_iter().map(|item| state.add(item)).collect())
    }

    async fn delete_nodes(&self, items: Vec<DeleteNodesItem>) -> NodesResult<Vec<StatusCode>> {
        let mut state = self.state.write();
        let mut deleted = HashSet::new();
        let mut statuses = Vec::with_capacity(items.len());

        for item in items {
            if state.nodes.remove(&item.node_id).is_some() {
                state.callbacks.remove(&item.node_id);
                if item.delete_target_references {
                    state.remove_references_to(&item.node_id);
                }
                deleted.insert(item.node_id);
                statuses.push(StatusCode::GOOD);
            } else if deleted.contains(&item.node_id) {
                statuses.push(StatusCode::GOOD);
            } else {
                statuses.push(StatusCode::BAD_NODE_ID_UNKNOWN);
            }
        }

        Ok(statuses)
    }

    async fn children(&self, node_id: &NodeId) -> NodesResult<Vec<NodeId>> {
        Ok(self.hierarchical_children(node_id))
    }

    async fn type_definition(&self, node_id: &NodeId) -> NodesResult<Option<NodeId>> {
        Ok(self
            .state
            .read()
            .nodes
            .get(node_id)
            .and_then(|node| node.type_definition.clone()))
    }

    async fn register_method_callback(
        &self,
        method_id: NodeId,
        callback: Arc<dyn MethodCallback>,
    ) -> NodesResult<()> {
        let mut state = self.state.write();
        let node_class = state.nodes.get(&method_id).map(|node| node.node_class);
        match node_class {
            Some(NodeClass::Method) => {
                state.callbacks.insert(method_id, callback);
                Ok(())
            }
            Some(other) => Err(ServerError::service_failed(
                "RegisterMethodCallback",
                format!("'{}' is a {}, not a Method", method_id, other),
            )
            .into()),
            None => Err(ServerError::node_not_found(method_id).into()),
        }
    }
}

// =============================================================================
// Bootstrap
// =============================================================================

fn bootstrap(state: &mut State) {
    use NodeClass::{DataType, Object, ObjectType, ReferenceType, VariableType};

    let folder = Some(ids::FOLDER_TYPE);
    for (id, name) in [
        (84, "Root"),
        (85, "Objects"),
        (86, "Types"),
        (87, "Views"),
        (88, "ObjectTypes"),
        (89, "VariableTypes"),
        (90, "DataTypes"),
        (91, "ReferenceTypes"),
    ] {
        state.insert(NodeRecord::bootstrap(id, Object, name, folder.clone()));
    }
    for (parent, child) in [
        (ids::ROOT_FOLDER, ids::OBJECTS_FOLDER),
        (ids::ROOT_FOLDER, ids::TYPES_FOLDER),
        (ids::ROOT_FOLDER, ids::VIEWS_FOLDER),
        (ids::TYPES_FOLDER, ids::OBJECT_TYPES_FOLDER),
        (ids::TYPES_FOLDER, ids::VARIABLE_TYPES_FOLDER),
        (ids::TYPES_FOLDER, ids::DATA_TYPES_FOLDER),
        (ids::TYPES_FOLDER, ids::REFERENCE_TYPES_FOLDER),
        (ids::OBJECT_TYPES_FOLDER, ids::BASE_OBJECT_TYPE),
        (ids::VARIABLE_TYPES_FOLDER, ids::BASE_VARIABLE_TYPE),
        (ids::DATA_TYPES_FOLDER, ids::BASE_DATA_TYPE),
        (ids::REFERENCE_TYPES_FOLDER, ids::REFERENCES),
    ] {
        state.link(&parent, ids::ORGANIZES, child);
    }

    // Object and variable types.
    state.insert(NodeRecord::bootstrap(58, ObjectType, "BaseObjectType", None));
    state.insert(NodeRecord::bootstrap(61, ObjectType, "FolderType", None));
    state.insert(NodeRecord::bootstrap(62, VariableType, "BaseVariableType", None));
    state.insert(NodeRecord::bootstrap(63, VariableType, "BaseDataVariableType", None));
    state.insert(NodeRecord::bootstrap(68, VariableType, "PropertyType", None));
    state.link(&ids::BASE_OBJECT_TYPE, ids::HAS_SUBTYPE, ids::FOLDER_TYPE);
    state.link(&ids::BASE_VARIABLE_TYPE, ids::HAS_SUBTYPE, ids::BASE_DATA_VARIABLE_TYPE);
    state.link(&ids::BASE_VARIABLE_TYPE, ids::HAS_SUBTYPE, ids::PROPERTY_TYPE);

    // Data types.
    state.insert(NodeRecord::bootstrap(24, DataType, "BaseDataType", None));
    for (id, name) in BUILTIN_DATA_TYPES {
        state.insert(NodeRecord::bootstrap(*id, DataType, name, None));
        state.link(&ids::BASE_DATA_TYPE, ids::HAS_SUBTYPE, NodeId::ns0(*id));
    }
    for (name, data_type) in StructureRegistry::with_builtin_structures().iter() {
        if let Some(id) = data_type.as_numeric() {
            state.insert(NodeRecord::bootstrap(id, DataType, name, None));
            state.link(&ids::STRUCTURE, ids::HAS_SUBTYPE, data_type.clone());
        }
    }

    // Reference types.
    for (id, name) in [
        (31, "References"),
        (32, "NonHierarchicalReferences"),
        (33, "HierarchicalReferences"),
        (34, "HasChild"),
        (35, "Organizes"),
        (40, "HasTypeDefinition"),
        (44, "Aggregates"),
        (45, "HasSubtype"),
        (46, "HasProperty"),
        (47, "HasComponent"),
    ] {
        state.insert(NodeRecord::bootstrap(id, ReferenceType, name, None));
    }
    for (parent, child) in [(31, 32), (31, 33), (32, 40), (33, 34), (33, 35), (34, 44), (34, 45), (44, 46), (44, 47)] {
        state.link(&NodeId::ns0(parent), ids::HAS_SUBTYPE, NodeId::ns0(child));
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{Value, VariantType};

    fn folder(parent: NodeId, id: NodeId, name: &str) -> AddNodesItem {
        AddNodesItem::folder(parent, Some(&ids::FOLDER_TYPE), id, QualifiedName::new(2, name))
    }

    #[test]
    fn test_bootstrap_nodes() {
        let space = InMemoryAddressSpace::new();
        for id in [84, 85, 86, 58, 61, 62, 63, 68, 24, 22, 1, 11, 25, 296, 35, 45, 46, 47] {
            assert!(space.contains(&NodeId::ns0(id)), "missing i={id}");
        }
        assert_eq!(
            space.browse_name(&ids::OBJECTS_FOLDER),
            Some(QualifiedName::standard("Objects"))
        );
    }

    #[tokio::test]
    async fn test_auto_ids_are_distinct() {
        let space = InMemoryAddressSpace::new();
        let results = space
            .add_nodes(vec![
                folder(ids::OBJECTS_FOLDER, NodeId::auto(2), "A"),
                folder(ids::OBJECTS_FOLDER, NodeId::auto(2), "B"),
            ])
            .await
            .unwrap();

        assert!(results.iter().all(|r| r.status_code.is_good()));
        assert_eq!(results[0].added_node_id, NodeId::numeric(2, 1000));
        assert_eq!(results[1].added_node_id, NodeId::numeric(2, 1001));
    }

    #[tokio::test]
    async fn test_auto_ids_skip_explicit_ones() {
        let space = InMemoryAddressSpace::new();
        space
            .add_nodes(vec![folder(ids::OBJECTS_FOLDER, NodeId::numeric(2, 1000), "Taken")])
            .await
            .unwrap();
        let results = space
            .add_nodes(vec![folder(ids::OBJECTS_FOLDER, NodeId::auto(2), "Next")])
            .await
            .unwrap();
        assert_eq!(results[0].added_node_id, NodeId::numeric(2, 1001));
    }

    #[tokio::test]
    async fn test_auto_ids_in_namespace_zero() {
        let space = InMemoryAddressSpace::new();
        let results = space
            .add_nodes(vec![
                folder(ids::OBJECTS_FOLDER, NodeId::auto(0), "A"),
                folder(ids::OBJECTS_FOLDER, NodeId::auto(0), "B"),
            ])
            .await
            .unwrap();

        assert_eq!(results[0].added_node_id, NodeId::ns0(1000));
        assert_eq!(results[1].added_node_id, NodeId::ns0(1001));
        assert!(results.iter().all(|r| space.contains(&r.added_node_id)));
    }

    #[tokio::test]
    async fn test_validation_statuses() {
        let space = InMemoryAddressSpace::new();
        let id = NodeId::string(2, "Plant");
        space
            .add_nodes(vec![folder(ids::OBJECTS_FOLDER, id.clone(), "Plant")])
            .await
            .unwrap();

        let mut bad_reference = folder(ids::OBJECTS_FOLDER, NodeId::auto(2), "X");
        bad_reference.reference_type_id = ids::HAS_TYPE_DEFINITION;

        let mut bad_attributes = folder(ids::OBJECTS_FOLDER, NodeId::auto(2), "Y");
        bad_attributes.node_class = NodeClass::Variable;

        let mut bad_type = folder(ids::OBJECTS_FOLDER, NodeId::auto(2), "Z");
        bad_type.type_definition = Some(NodeId::numeric(2, 9999));

        let results = space
            .add_nodes(vec![
                folder(NodeId::numeric(2, 42), NodeId::auto(2), "Orphan"),
                bad_reference,
                bad_attributes,
                bad_type,
                folder(ids::OBJECTS_FOLDER, id, "Again"),
            ])
            .await
            .unwrap();

        let statuses: Vec<_> = results.iter().map(|r| r.status_code).collect();
        assert_eq!(
            statuses,
            vec![
                StatusCode::BAD_PARENT_NODE_ID_INVALID,
                StatusCode::BAD_REFERENCE_TYPE_ID_INVALID,
                StatusCode::BAD_NODE_ATTRIBUTES_INVALID,
                StatusCode::BAD_TYPE_DEFINITION_INVALID,
                StatusCode::BAD_NODE_ID_EXISTS,
            ]
        );
        assert!(results.iter().all(|r| r.added_node_id.is_null()));
    }

    #[tokio::test]
    async fn test_children_and_type_definition() {
        let space = InMemoryAddressSpace::new();
        let results = space
            .add_nodes(vec![folder(ids::OBJECTS_FOLDER, NodeId::string(2, "Plant"), "Plant")])
            .await
            .unwrap();
        let plant = results[0].added_node_id.clone();

        let children = space.children(&ids::OBJECTS_FOLDER).await.unwrap();
        assert_eq!(children, vec![plant.clone()]);
        assert_eq!(
            space.type_definition(&plant).await.unwrap(),
            Some(ids::FOLDER_TYPE)
        );
        assert!(space.children(&NodeId::numeric(9, 9)).await.unwrap().is_empty());
        assert_eq!(space.type_definition(&NodeId::numeric(9, 9)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_removes_target_references() {
        let space = InMemoryAddressSpace::new();
        let plant = NodeId::string(2, "Plant");
        space
            .add_nodes(vec![folder(ids::OBJECTS_FOLDER, plant.clone(), "Plant")])
            .await
            .unwrap();

        let statuses = space
            .delete_nodes(vec![
                DeleteNodesItem::new(plant.clone()),
                DeleteNodesItem::new(plant.clone()),
                DeleteNodesItem::new(NodeId::numeric(2, 77)),
            ])
            .await
            .unwrap();

        assert_eq!(
            statuses,
            vec![StatusCode::GOOD, StatusCode::GOOD, StatusCode::BAD_NODE_ID_UNKNOWN]
        );
        assert!(!space.contains(&plant));
        assert!(space.children(&ids::OBJECTS_FOLDER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_method_callback_dispatch() {
        let space = InMemoryAddressSpace::new();
        let method = NodeId::string(2, "Reset");
        space
            .add_nodes(vec![AddNodesItem::method(
                ids::OBJECTS_FOLDER,
                method.clone(),
                QualifiedName::new(2, "Reset"),
            )])
            .await
            .unwrap();

        assert_eq!(
            space.call_method(&ids::OBJECTS_FOLDER, &method, vec![]),
            Err(StatusCode::BAD_METHOD_INVALID)
        );

        let callback = |parent: &NodeId, _args: Vec<TypedValue>| -> Result<Vec<TypedValue>, StatusCode> {
            Ok(vec![TypedValue::new(VariantType::String, parent.to_string())])
        };
        space
            .register_method_callback(method.clone(), Arc::new(callback))
            .await
            .unwrap();

        let out = space.call_method(&ids::OBJECTS_FOLDER, &method, vec![]).unwrap();
        assert_eq!(out[0].value, Value::from("i=85"));

        space
            .delete_nodes(vec![DeleteNodesItem::new(method.clone())])
            .await
            .unwrap();
        assert!(!space.has_method_callback(&method));
    }

    #[tokio::test]
    async fn test_register_callback_requires_method() {
        let space = InMemoryAddressSpace::new();
        let callback =
            |_: &NodeId, args: Vec<TypedValue>| -> Result<Vec<TypedValue>, StatusCode> { Ok(args) };
        let err = space
            .register_method_callback(ids::OBJECTS_FOLDER, Arc::new(callback))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not a Method"));
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! AddNodes and DeleteNodes request and result records.
//!
//! Constructors that fill these records per node class live in
//! [`crate::attributes`].

use crate::status::StatusCode;
use crate::types::{AccessLevel, LocalizedText, NodeClass, NodeId, QualifiedName, ValueRank};
use crate::variant::TypedValue;

// =============================================================================
// AddNodes
// =============================================================================

/// One element of an AddNodes batch.
#[derive(Debug, Clone, PartialEq)]
pub struct AddNodesItem {
    /// Requested identifier; numeric 0 asks the server to assign one.
    pub requested_new_node_id: NodeId,
    /// Browse name.
    pub browse_name: QualifiedName,
    /// Parent node.
    pub parent_node_id: NodeId,
    /// Reference from the parent to the new node.
    pub reference_type_id: NodeId,
    /// Class of the new node.
    pub node_class: NodeClass,
    /// Type definition, for objects and variables.
    pub type_definition: Option<NodeId>,
    /// Class-specific attributes.
    pub node_attributes: NodeAttributes,
}

/// Result of one AddNodes element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddNodesResult {
    /// Outcome.
    pub status_code: StatusCode,
    /// Identifier of the created node; null when creation failed.
    pub added_node_id: NodeId,
}

impl AddNodesResult {
    /// A successful result.
    pub fn good(added_node_id: NodeId) -> Self {
        Self {
            status_code: StatusCode::GOOD,
            added_node_id,
        }
    }

    /// A failed result.
    pub fn bad(status_code: StatusCode) -> Self {
        Self {
            status_code,
            added_node_id: NodeId::null(),
        }
    }
}

// =============================================================================
// DeleteNodes
// =============================================================================

/// One element of a DeleteNodes batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNodesItem {
    /// Node to delete.
    pub node_id: NodeId,
    /// Also remove references pointing at the node.
    pub delete_target_references: bool,
}

impl DeleteNodesItem {
    /// Deletes `node_id` and every reference targeting it.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            delete_target_references: true,
        }
    }
}

// =============================================================================
// Attributes
// =============================================================================

/// Attributes every node class carries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BaseAttributes {
    /// Display name.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
    /// Write mask.
    pub write_mask: u32,
    /// User write mask.
    pub user_write_mask: u32,
}

impl BaseAttributes {
    /// Display name and description both set to the browse name text.
    pub fn named(browse_name: &QualifiedName) -> Self {
        Self {
            display_name: LocalizedText::new(browse_name.name.clone()),
            description: LocalizedText::new(browse_name.name.clone()),
            write_mask: 0,
            user_write_mask: 0,
        }
    }
}

/// Object attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAttributes {
    /// Common attributes.
    pub base: BaseAttributes,
    /// Event notifier bits.
    pub event_notifier: u8,
}

/// Variable attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableAttributes {
    /// Common attributes.
    pub base: BaseAttributes,
    /// Initial value.
    pub value: TypedValue,
    /// DataType.
    pub data_type: NodeId,
    /// Rank.
    pub value_rank: ValueRank,
    /// Array dimensions.
    pub array_dimensions: Vec<u32>,
    /// Access level.
    pub access_level: AccessLevel,
    /// User access level.
    pub user_access_level: AccessLevel,
    /// Minimum sampling interval in milliseconds.
    pub minimum_sampling_interval: f64,
    /// Historizing flag.
    pub historizing: bool,
}

/// VariableType attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableTypeAttributes {
    /// Common attributes.
    pub base: BaseAttributes,
    /// Default value.
    pub value: Option<TypedValue>,
    /// DataType.
    pub data_type: NodeId,
    /// Rank.
    pub value_rank: ValueRank,
    /// Array dimensions.
    pub array_dimensions: Vec<u32>,
    /// Abstract flag.
    pub is_abstract: bool,
}

/// ObjectType attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectTypeAttributes {
    /// Common attributes.
    pub base: BaseAttributes,
    /// Abstract flag.
    pub is_abstract: bool,
}

/// DataType attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTypeAttributes {
    /// Common attributes.
    pub base: BaseAttributes,
    /// Abstract flag.
    pub is_abstract: bool,
}

/// Method attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodAttributes {
    /// Common attributes.
    pub base: BaseAttributes,
    /// Executable flag.
    pub executable: bool,
    /// User executable flag.
    pub user_executable: bool,
}

/// Class-specific attribute record.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeAttributes {
    /// Object attributes.
    Object(ObjectAttributes),
    /// Variable attributes.
    Variable(VariableAttributes),
    /// VariableType attributes.
    VariableType(VariableTypeAttributes),
    /// ObjectType attributes.
    ObjectType(ObjectTypeAttributes),
    /// DataType attributes.
    DataType(DataTypeAttributes),
    /// Method attributes.
    Method(MethodAttributes),
}

impl NodeAttributes {
    /// The node class this record belongs to.
    pub fn node_class(&self) -> NodeClass {
        match self {
            Self::Object(_) => NodeClass::Object,
            Self::Variable(_) => NodeClass::Variable,
            Self::VariableType(_) => NodeClass::VariableType,
            Self::ObjectType(_) => NodeClass::ObjectType,
            Self::DataType(_) => NodeClass::DataType,
            Self::Method(_) => NodeClass::Method,
        }
    }

    /// Common attributes.
    pub fn base(&self) -> &BaseAttributes {
        match self {
            Self::Object(a) => &a.base,
            Self::Variable(a) => &a.base,
            Self::VariableType(a) => &a.base,
            Self::ObjectType(a) => &a.base,
            Self::DataType(a) => &a.base,
            Self::Method(a) => &a.base,
        }
    }

    /// Value, for variables and variable types that carry one.
    pub fn value(&self) -> Option<&TypedValue> {
        match self {
            Self::Variable(a) => Some(&a.value),
            Self::VariableType(a) => a.value.as_ref(),
            _ => None,
        }
    }

    /// DataType, for variables and variable types.
    pub fn data_type(&self) -> Option<&NodeId> {
        match self {
            Self::Variable(a) => Some(&a.data_type),
            Self::VariableType(a) => Some(&a.data_type),
            _ => None,
        }
    }

    /// Value rank, for variables and variable types.
    pub fn value_rank(&self) -> Option<ValueRank> {
        match self {
            Self::Variable(a) => Some(a.value_rank),
            Self::VariableType(a) => Some(a.value_rank),
            _ => None,
        }
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Well-known namespace 0 node ids.

use crate::types::NodeId;

// =============================================================================
// Folders
// =============================================================================

/// Root folder.
pub const ROOT_FOLDER: NodeId = NodeId::ns0(84);
/// Objects folder.
pub const OBJECTS_FOLDER: NodeId = NodeId::ns0(85);
/// Types folder.
pub const TYPES_FOLDER: NodeId = NodeId::ns0(86);
/// Views folder.
pub const VIEWS_FOLDER: NodeId = NodeId::ns0(87);
/// ObjectTypes folder.
pub const OBJECT_TYPES_FOLDER: NodeId = NodeId::ns0(88);
/// VariableTypes folder.
pub const VARIABLE_TYPES_FOLDER: NodeId = NodeId::ns0(89);
/// DataTypes folder.
pub const DATA_TYPES_FOLDER: NodeId = NodeId::ns0(90);
/// ReferenceTypes folder.
pub const REFERENCE_TYPES_FOLDER: NodeId = NodeId::ns0(91);

// =============================================================================
// Type definitions
// =============================================================================

/// BaseObjectType.
pub const BASE_OBJECT_TYPE: NodeId = NodeId::ns0(58);
/// FolderType.
pub const FOLDER_TYPE: NodeId = NodeId::ns0(61);
/// BaseVariableType.
pub const BASE_VARIABLE_TYPE: NodeId = NodeId::ns0(62);
/// BaseDataVariableType.
pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::ns0(63);
/// PropertyType.
pub const PROPERTY_TYPE: NodeId = NodeId::ns0(68);

// =============================================================================
// Data types
// =============================================================================

/// BaseDataType.
pub const BASE_DATA_TYPE: NodeId = NodeId::ns0(24);
/// Structure.
pub const STRUCTURE: NodeId = NodeId::ns0(22);
/// Argument structure.
pub const ARGUMENT: NodeId = NodeId::ns0(296);

// =============================================================================
// Reference types
// =============================================================================

/// References.
pub const REFERENCES: NodeId = NodeId::ns0(31);
/// HierarchicalReferences.
pub const HIERARCHICAL_REFERENCES: NodeId = NodeId::ns0(33);
/// HasChild.
pub const HAS_CHILD: NodeId = NodeId::ns0(34);
/// Organizes.
pub const ORGANIZES: NodeId = NodeId::ns0(35);
/// Aggregates.
pub const AGGREGATES: NodeId = NodeId::ns0(44);
/// HasSubtype.
pub const HAS_SUBTYPE: NodeId = NodeId::ns0(45);
/// HasProperty.
pub const HAS_PROPERTY: NodeId = NodeId::ns0(46);
/// HasComponent.
pub const HAS_COMPONENT: NodeId = NodeId::ns0(47);
/// HasTypeDefinition.
pub const HAS_TYPE_DEFINITION: NodeId = NodeId::ns0(40);

/// Reference types that build the node hierarchy.
pub const HIERARCHICAL_REFERENCE_TYPES: [NodeId; 4] =
    [ORGANIZES, HAS_COMPONENT, HAS_PROPERTY, HAS_SUBTYPE];

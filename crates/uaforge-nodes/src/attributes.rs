// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-class AddNodes request construction.
//!
//! | Class        | Reference                         | Type definition                    |
//! |--------------|-----------------------------------|------------------------------------|
//! | Object       | Organizes under a folder, else HasComponent | given, default BaseObjectType |
//! | Variable     | HasComponent                      | BaseDataVariableType               |
//! | Property     | HasProperty                       | PropertyType                       |
//! | VariableType | HasSubtype                        | none                               |
//! | ObjectType   | HasSubtype                        | none                               |
//! | DataType     | HasSubtype                        | none                               |
//! | Method       | HasComponent                      | none                               |
//!
//! Every constructor is pure; nothing here talks to the address space.

use crate::ids;
use crate::request::{
    AddNodesItem, BaseAttributes, DataTypeAttributes, MethodAttributes, NodeAttributes,
    ObjectAttributes, ObjectTypeAttributes, VariableAttributes, VariableTypeAttributes,
};
use crate::types::{AccessLevel, NodeClass, NodeId, QualifiedName, ValueRank};
use crate::variant::TypedValue;

impl AddNodesItem {
    /// An Object below `parent`.
    ///
    /// `parent_type_definition` is the parent's own type definition; a
    /// FolderType parent organizes the object, any other parent has it as
    /// a component.
    pub fn object(
        parent: NodeId,
        parent_type_definition: Option<&NodeId>,
        node_id: NodeId,
        browse_name: QualifiedName,
        object_type: NodeId,
    ) -> Self {
        let reference_type_id = if parent_type_definition == Some(&ids::FOLDER_TYPE) {
            ids::ORGANIZES
        } else {
            ids::HAS_COMPONENT
        };

        let base = BaseAttributes::named(&browse_name);
        Self {
            requested_new_node_id: node_id,
            browse_name,
            parent_node_id: parent,
            reference_type_id,
            node_class: NodeClass::Object,
            type_definition: Some(object_type),
            node_attributes: NodeAttributes::Object(ObjectAttributes {
                base,
                event_notifier: 0,
            }),
        }
    }

    /// A FolderType Object below `parent`.
    pub fn folder(
        parent: NodeId,
        parent_type_definition: Option<&NodeId>,
        node_id: NodeId,
        browse_name: QualifiedName,
    ) -> Self {
        Self::object(
            parent,
            parent_type_definition,
            node_id,
            browse_name,
            ids::FOLDER_TYPE,
        )
    }

    /// A Variable, or a Property when `is_property` is set.
    pub fn variable(
        parent: NodeId,
        node_id: NodeId,
        browse_name: QualifiedName,
        value: TypedValue,
        data_type: NodeId,
        is_property: bool,
        access_level: AccessLevel,
    ) -> Self {
        let (reference_type_id, type_definition) = if is_property {
            (ids::HAS_PROPERTY, ids::PROPERTY_TYPE)
        } else {
            (ids::HAS_COMPONENT, ids::BASE_DATA_VARIABLE_TYPE)
        };

        let base = BaseAttributes::named(&browse_name);
        Self {
            requested_new_node_id: node_id,
            browse_name,
            parent_node_id: parent,
            reference_type_id,
            node_class: NodeClass::Variable,
            type_definition: Some(type_definition),
            node_attributes: NodeAttributes::Variable(VariableAttributes {
                base,
                value_rank: value.value_rank(),
                array_dimensions: value.array_dimensions(),
                value,
                data_type,
                access_level,
                user_access_level: access_level,
                minimum_sampling_interval: 0.0,
                historizing: false,
            }),
        }
    }

    /// A VariableType.
    ///
    /// With a default value the rank follows the value's shape; without
    /// one, `value_rank` is used.
    pub fn variable_type(
        parent: NodeId,
        node_id: NodeId,
        browse_name: QualifiedName,
        data_type: NodeId,
        value: Option<TypedValue>,
        value_rank: ValueRank,
        is_abstract: bool,
    ) -> Self {
        let (value_rank, array_dimensions) = match &value {
            Some(value) => (value.value_rank(), value.array_dimensions()),
            None => (value_rank, Vec::new()),
        };

        let base = BaseAttributes::named(&browse_name);
        Self {
            requested_new_node_id: node_id,
            browse_name,
            parent_node_id: parent,
            reference_type_id: ids::HAS_SUBTYPE,
            node_class: NodeClass::VariableType,
            type_definition: None,
            node_attributes: NodeAttributes::VariableType(VariableTypeAttributes {
                base,
                value,
                data_type,
                value_rank,
                array_dimensions,
                is_abstract,
            }),
        }
    }

    /// A DataType.
    pub fn data_type(
        parent: NodeId,
        node_id: NodeId,
        browse_name: QualifiedName,
        is_abstract: bool,
    ) -> Self {
        let base = BaseAttributes::named(&browse_name);
        Self {
            requested_new_node_id: node_id,
            browse_name,
            parent_node_id: parent,
            reference_type_id: ids::HAS_SUBTYPE,
            node_class: NodeClass::DataType,
            type_definition: None,
            node_attributes: NodeAttributes::DataType(DataTypeAttributes { base, is_abstract }),
        }
    }

    /// An ObjectType.
    pub fn object_type(
        parent: NodeId,
        node_id: NodeId,
        browse_name: QualifiedName,
        is_abstract: bool,
    ) -> Self {
        let base = BaseAttributes::named(&browse_name);
        Self {
            requested_new_node_id: node_id,
            browse_name,
            parent_node_id: parent,
            reference_type_id: ids::HAS_SUBTYPE,
            node_class: NodeClass::ObjectType,
            type_definition: None,
            node_attributes: NodeAttributes::ObjectType(ObjectTypeAttributes { base, is_abstract }),
        }
    }

    /// An executable Method.
    pub fn method(parent: NodeId, node_id: NodeId, browse_name: QualifiedName) -> Self {
        let base = BaseAttributes::named(&browse_name);
        Self {
            requested_new_node_id: node_id,
            browse_name,
            parent_node_id: parent,
            reference_type_id: ids::HAS_COMPONENT,
            node_class: NodeClass::Method,
            type_definition: None,
            node_attributes: NodeAttributes::Method(MethodAttributes {
                base,
                executable: true,
                user_executable: true,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::VariantType;

    fn qn(name: &str) -> QualifiedName {
        QualifiedName::new(2, name)
    }

    #[test]
    fn test_object_reference_follows_parent_type() {
        let under_folder = AddNodesItem::object(
            ids::OBJECTS_FOLDER,
            Some(&ids::FOLDER_TYPE),
            NodeId::auto(2),
            qn("Pump"),
            ids::BASE_OBJECT_TYPE,
        );
        assert_eq!(under_folder.reference_type_id, ids::ORGANIZES);

        let under_object = AddNodesItem::object(
            NodeId::numeric(2, 1000),
            Some(&ids::BASE_OBJECT_TYPE),
            NodeId::auto(2),
            qn("Motor"),
            ids::BASE_OBJECT_TYPE,
        );
        assert_eq!(under_object.reference_type_id, ids::HAS_COMPONENT);

        let untyped_parent =
            AddNodesItem::object(ids::TYPES_FOLDER, None, NodeId::auto(2), qn("X"), ids::BASE_OBJECT_TYPE);
        assert_eq!(untyped_parent.reference_type_id, ids::HAS_COMPONENT);
    }

    #[test]
    fn test_object_attributes() {
        let item = AddNodesItem::folder(ids::OBJECTS_FOLDER, Some(&ids::FOLDER_TYPE), NodeId::auto(2), qn("Plant"));
        assert_eq!(item.type_definition, Some(ids::FOLDER_TYPE));
        assert_eq!(item.node_class, NodeClass::Object);

        let base = item.node_attributes.base();
        assert_eq!(base.display_name.text, "Plant");
        assert_eq!(base.description.text, "Plant");
        assert_eq!(base.write_mask, 0);
        assert!(matches!(
            item.node_attributes,
            NodeAttributes::Object(ObjectAttributes { event_notifier: 0, .. })
        ));
    }

    #[test]
    fn test_variable_and_property_linkage() {
        let value = TypedValue::new(VariantType::Double, 1.0);
        let variable = AddNodesItem::variable(
            NodeId::numeric(2, 1),
            NodeId::auto(2),
            qn("Speed"),
            value.clone(),
            NodeId::ns0(11),
            false,
            AccessLevel::CURRENT_READ,
        );
        assert_eq!(variable.reference_type_id, ids::HAS_COMPONENT);
        assert_eq!(variable.type_definition, Some(ids::BASE_DATA_VARIABLE_TYPE));

        let property = AddNodesItem::variable(
            NodeId::numeric(2, 1),
            NodeId::auto(2),
            qn("Serial"),
            value,
            NodeId::ns0(11),
            true,
            AccessLevel::CURRENT_READ,
        );
        assert_eq!(property.reference_type_id, ids::HAS_PROPERTY);
        assert_eq!(property.type_definition, Some(ids::PROPERTY_TYPE));
    }

    #[test]
    fn test_variable_rank_follows_array_ness() {
        let array = TypedValue::new(VariantType::Int32, vec![1i32, 2, 3]);
        let item = AddNodesItem::variable(
            NodeId::numeric(2, 1),
            NodeId::auto(2),
            qn("Samples"),
            array,
            NodeId::ns0(6),
            false,
            AccessLevel::READ_WRITE,
        );
        match item.node_attributes {
            NodeAttributes::Variable(attrs) => {
                assert_eq!(attrs.value_rank, ValueRank::OneDimension);
                assert_eq!(attrs.array_dimensions, vec![3]);
                assert_eq!(attrs.access_level, AccessLevel::READ_WRITE);
                assert_eq!(attrs.user_access_level, AccessLevel::READ_WRITE);
                assert!(!attrs.historizing);
                assert_eq!(attrs.minimum_sampling_interval, 0.0);
            }
            other => panic!("unexpected attributes: {other:?}"),
        }
    }

    #[test]
    fn test_variable_type_rank() {
        let without_value = AddNodesItem::variable_type(
            ids::BASE_DATA_VARIABLE_TYPE,
            NodeId::auto(2),
            qn("TempType"),
            NodeId::ns0(11),
            None,
            ValueRank::Any,
            false,
        );
        assert_eq!(without_value.node_attributes.value_rank(), Some(ValueRank::Any));
        assert_eq!(without_value.reference_type_id, ids::HAS_SUBTYPE);
        assert_eq!(without_value.type_definition, None);

        let with_array = AddNodesItem::variable_type(
            ids::BASE_DATA_VARIABLE_TYPE,
            NodeId::auto(2),
            qn("VectorType"),
            NodeId::ns0(11),
            Some(TypedValue::new(VariantType::Double, vec![0.0, 0.0])),
            ValueRank::Scalar,
            true,
        );
        assert_eq!(with_array.node_attributes.value_rank(), Some(ValueRank::OneDimension));
    }

    #[test]
    fn test_type_and_method_classes() {
        let object_type =
            AddNodesItem::object_type(ids::BASE_OBJECT_TYPE, NodeId::auto(2), qn("PumpType"), false);
        assert_eq!(object_type.node_class, NodeClass::ObjectType);
        assert_eq!(object_type.reference_type_id, ids::HAS_SUBTYPE);

        let data_type = AddNodesItem::data_type(ids::STRUCTURE, NodeId::auto(2), qn("Recipe"), true);
        assert!(matches!(
            data_type.node_attributes,
            NodeAttributes::DataType(DataTypeAttributes { is_abstract: true, .. })
        ));

        let method = AddNodesItem::method(NodeId::numeric(2, 1), NodeId::auto(2), qn("Reset"));
        assert_eq!(method.reference_type_id, ids::HAS_COMPONENT);
        assert!(matches!(
            method.node_attributes,
            NodeAttributes::Method(MethodAttributes {
                executable: true,
                user_executable: true,
                ..
            })
        ));
    }
}

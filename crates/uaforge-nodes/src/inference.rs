// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! DataType inference for variable values.
//!
//! ```text
//! VariantType::ExtensionObject
//!   scalar payload  ──► registry[structure.type_name()]
//!   array payload   ──► registry[first.type_name()]
//!   null / empty    ──► EmptyStructure
//! any other tag     ──► ns=0;i=<built-in id of the tag>
//! ```

use std::sync::Arc;

use crate::error::TypeInferenceError;
use crate::registry::StructureRegistry;
use crate::types::NodeId;
use crate::variant::{TypedValue, Value, ValueInput, VariantType};

/// Resolves the wire DataType of variable values.
#[derive(Debug, Clone)]
pub struct TypeInferencer {
    registry: Arc<StructureRegistry>,
}

impl TypeInferencer {
    /// Creates an inferencer over `registry`.
    pub fn new(registry: Arc<StructureRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the structure registry.
    pub fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    /// Normalizes a caller-supplied value.
    ///
    /// Returns the tagged value and the DataType the caller asked for, if
    /// any. A pre-tagged value is never re-tagged; a `hint` replaces the
    /// explicit DataType with its own built-in DataType.
    pub fn resolve(
        &self,
        value: ValueInput,
        hint: Option<VariantType>,
        data_type: Option<NodeId>,
    ) -> Result<(TypedValue, Option<NodeId>), TypeInferenceError> {
        match value {
            ValueInput::Typed(typed) => {
                let explicit = hint.and_then(|tag| tag.builtin_data_type()).or(data_type);
                Ok((typed, explicit))
            }
            ValueInput::Raw(raw) => Ok((TypedValue::from_value(raw, hint)?, data_type)),
        }
    }

    /// Derives the DataType of a tagged value.
    pub fn guess_data_type(&self, value: &TypedValue) -> Result<NodeId, TypeInferenceError> {
        match value.variant_type {
            VariantType::ExtensionObject => self.structure_data_type(&value.value),
            tag => tag
                .builtin_data_type()
                .ok_or_else(|| TypeInferenceError::unknown_tag(tag.name())),
        }
    }

    /// `explicit` when given, otherwise [`Self::guess_data_type`].
    pub fn data_type_for(
        &self,
        value: &TypedValue,
        explicit: Option<NodeId>,
    ) -> Result<NodeId, TypeInferenceError> {
        match explicit {
            Some(data_type) => Ok(data_type),
            None => self.guess_data_type(value),
        }
    }

    fn structure_data_type(&self, payload: &Value) -> Result<NodeId, TypeInferenceError> {
        let structure = match payload {
            Value::Null => return Err(TypeInferenceError::empty_structure("null")),
            Value::Array(items) => match items.first() {
                None => return Err(TypeInferenceError::empty_structure("empty")),
                Some(Value::ExtensionObject(first)) => first,
                Some(other) => {
                    return Err(TypeInferenceError::payload_mismatch(
                        VariantType::ExtensionObject.name(),
                        format!("array of {}", other.kind()),
                    ))
                }
            },
            Value::ExtensionObject(structure) => structure,
            other => {
                return Err(TypeInferenceError::payload_mismatch(
                    VariantType::ExtensionObject.name(),
                    other.kind(),
                ))
            }
        };

        self.registry
            .lookup(structure.type_name())
            .cloned()
            .ok_or_else(|| TypeInferenceError::unmapped_structure(structure.type_name()))
    }
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::new(StructureRegistry::global())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{Argument, ExtensionObject, Range};

    fn inferencer() -> TypeInferencer {
        TypeInferencer::default()
    }

    #[test]
    fn test_builtin_tags() {
        let inf = inferencer();
        let tv = TypedValue::new(VariantType::Double, 1.5);
        assert_eq!(inf.guess_data_type(&tv).unwrap(), NodeId::ns0(11));

        let tv = TypedValue::new(VariantType::Boolean, vec![true, false]);
        assert_eq!(inf.guess_data_type(&tv).unwrap(), NodeId::ns0(1));
    }

    #[test]
    fn test_tags_without_data_type() {
        let inf = inferencer();
        for tag in [VariantType::Null, VariantType::Variant] {
            let err = inf.guess_data_type(&TypedValue::null(tag)).unwrap_err();
            assert!(matches!(err, TypeInferenceError::UnknownTag { .. }), "{tag}");
        }
    }

    #[test]
    fn test_structure_lookup() {
        let inf = inferencer();
        let range = TypedValue::new(
            VariantType::ExtensionObject,
            ExtensionObject::Range(Range { low: 0.0, high: 10.0 }),
        );
        assert_eq!(inf.guess_data_type(&range).unwrap(), NodeId::ns0(884));

        let args = TypedValue::new(
            VariantType::ExtensionObject,
            vec![
                Argument::new("a", NodeId::ns0(6)),
                Argument::new("b", NodeId::ns0(11)),
            ],
        );
        assert_eq!(inf.guess_data_type(&args).unwrap(), NodeId::ns0(296));
    }

    #[test]
    fn test_empty_and_null_structures() {
        let inf = inferencer();

        let null = TypedValue::null(VariantType::ExtensionObject);
        assert!(matches!(
            inf.guess_data_type(&null),
            Err(TypeInferenceError::EmptyStructure { shape: "null" })
        ));

        let empty = TypedValue::new(VariantType::ExtensionObject, Value::Array(vec![]));
        assert!(matches!(
            inf.guess_data_type(&empty),
            Err(TypeInferenceError::EmptyStructure { shape: "empty" })
        ));
    }

    #[test]
    fn test_unmapped_structure() {
        let inf = inferencer();
        let tv = TypedValue::new(
            VariantType::ExtensionObject,
            ExtensionObject::custom("MyRecipe", vec![1, 2]),
        );
        match inf.guess_data_type(&tv) {
            Err(TypeInferenceError::UnmappedStructure { type_name }) => {
                assert_eq!(type_name, "MyRecipe")
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let mut registry = StructureRegistry::with_builtin_structures();
        registry.register("MyRecipe", NodeId::numeric(2, 5001));
        let inf = TypeInferencer::new(Arc::new(registry));
        assert_eq!(inf.guess_data_type(&tv).unwrap(), NodeId::numeric(2, 5001));
    }

    #[test]
    fn test_payload_mismatch() {
        let tv = TypedValue::new(VariantType::ExtensionObject, 5i32);
        assert!(matches!(
            inferencer().guess_data_type(&tv),
            Err(TypeInferenceError::PayloadMismatch { .. })
        ));
    }

    #[test]
    fn test_resolve_typed_uses_hint_data_type() {
        let inf = inferencer();
        let typed = TypedValue::new(VariantType::Int16, 7i16);

        let (tv, explicit) = inf
            .resolve(typed.clone().into(), Some(VariantType::Int16), None)
            .unwrap();
        assert_eq!(tv, typed);
        assert_eq!(explicit, Some(NodeId::ns0(4)));

        let (_, explicit) = inf
            .resolve(typed.clone().into(), None, Some(NodeId::numeric(2, 9)))
            .unwrap();
        assert_eq!(explicit, Some(NodeId::numeric(2, 9)));

        let (_, explicit) = inf.resolve(typed.into(), None, None).unwrap();
        assert_eq!(explicit, None);
    }

    #[test]
    fn test_resolve_typed_hint_beats_explicit_data_type() {
        let typed = TypedValue::new(VariantType::Int16, 5i16);
        let (tv, explicit) = inferencer()
            .resolve(typed.clone().into(), Some(VariantType::Double), Some(NodeId::ns0(6)))
            .unwrap();

        assert_eq!(tv, typed);
        assert_eq!(explicit, Some(NodeId::ns0(11)));
    }

    #[test]
    fn test_resolve_raw_applies_hint() {
        let inf = inferencer();
        let (tv, explicit) = inf
            .resolve(ValueInput::raw(3i64), Some(VariantType::UInt32), None)
            .unwrap();
        assert_eq!(tv.variant_type, VariantType::UInt32);
        assert_eq!(explicit, None);

        assert!(inf.resolve(ValueInput::Raw(Value::Null), None, None).is_err());
    }

    #[test]
    fn test_inference_is_idempotent() {
        let inf = inferencer();
        let tv = TypedValue::new(VariantType::String, "x");
        let first = inf.data_type_for(&tv, None).unwrap();
        let second = inf.data_type_for(&tv, None).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            inf.data_type_for(&tv, Some(NodeId::ns0(12))).unwrap(),
            NodeId::ns0(12)
        );
    }
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Dynamically typed values.
//!
//! A [`TypedValue`] pairs a payload ([`Value`]) with its variant tag
//! ([`VariantType`]). The tag decides the wire type; the payload decides
//! array-ness.
//!
//! ```text
//! ValueInput ──► Raw(Value) ──(hint or native tag)──► TypedValue
//!          └──► Typed(TypedValue) ─────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ProtocolError, TypeInferenceError};
use crate::status::StatusCode;
use crate::types::{LocalizedText, NodeId, QualifiedName, ValueRank};

// =============================================================================
// VariantType
// =============================================================================

/// OPC UA variant type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantType {
    /// No value.
    Null,
    /// Boolean value.
    Boolean,
    /// Signed 8-bit integer.
    SByte,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit IEEE 754 float.
    Float,
    /// 64-bit IEEE 754 double.
    Double,
    /// UTF-8 string.
    String,
    /// Date and time.
    DateTime,
    /// GUID.
    Guid,
    /// Raw byte string.
    ByteString,
    /// XML element.
    XmlElement,
    /// Node ID.
    NodeId,
    /// Expanded node ID.
    ExpandedNodeId,
    /// Status code.
    StatusCode,
    /// Qualified name.
    QualifiedName,
    /// Localized text.
    LocalizedText,
    /// Structured value.
    ExtensionObject,
    /// Data value.
    DataValue,
    /// Nested variant.
    Variant,
    /// Diagnostic info.
    DiagnosticInfo,
}

impl VariantType {
    /// Returns the tag name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Boolean => "Boolean",
            Self::SByte => "SByte",
            Self::Byte => "Byte",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::String => "String",
            Self::DateTime => "DateTime",
            Self::Guid => "Guid",
            Self::ByteString => "ByteString",
            Self::XmlElement => "XmlElement",
            Self::NodeId => "NodeId",
            Self::ExpandedNodeId => "ExpandedNodeId",
            Self::StatusCode => "StatusCode",
            Self::QualifiedName => "QualifiedName",
            Self::LocalizedText => "LocalizedText",
            Self::ExtensionObject => "ExtensionObject",
            Self::DataValue => "DataValue",
            Self::Variant => "Variant",
            Self::DiagnosticInfo => "DiagnosticInfo",
        }
    }

    /// Returns the namespace 0 DataType id whose name matches the tag.
    ///
    /// `Null` and `Variant` have no such DataType. `ExtensionObject` values
    /// are resolved through the structure registry instead.
    pub const fn builtin_data_type_id(&self) -> Option<u32> {
        let id = match self {
            Self::Boolean => 1,
            Self::SByte => 2,
            Self::Byte => 3,
            Self::Int16 => 4,
            Self::UInt16 => 5,
            Self::Int32 => 6,
            Self::UInt32 => 7,
            Self::Int64 => 8,
            Self::UInt64 => 9,
            Self::Float => 10,
            Self::Double => 11,
            Self::String => 12,
            Self::DateTime => 13,
            Self::Guid => 14,
            Self::ByteString => 15,
            Self::XmlElement => 16,
            Self::NodeId => 17,
            Self::ExpandedNodeId => 18,
            Self::StatusCode => 19,
            Self::QualifiedName => 20,
            Self::LocalizedText => 21,
            Self::DataValue => 23,
            Self::DiagnosticInfo => 25,
            Self::Null | Self::ExtensionObject | Self::Variant => return None,
        };
        Some(id)
    }

    /// Returns the built-in DataType node id, see [`Self::builtin_data_type_id`].
    pub fn builtin_data_type(&self) -> Option<NodeId> {
        self.builtin_data_type_id().map(NodeId::ns0)
    }

    /// Returns `true` for integer and floating point tags.
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::SByte
                | Self::Byte
                | Self::Int16
                | Self::UInt16
                | Self::Int32
                | Self::UInt32
                | Self::Int64
                | Self::UInt64
                | Self::Float
                | Self::Double
        )
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VariantType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "null" | "none" => Ok(Self::Null),
            "bool" | "boolean" => Ok(Self::Boolean),
            "sbyte" | "int8" | "i8" => Ok(Self::SByte),
            "byte" | "uint8" | "u8" => Ok(Self::Byte),
            "int16" | "i16" | "short" => Ok(Self::Int16),
            "uint16" | "u16" | "ushort" => Ok(Self::UInt16),
            "int32" | "i32" | "int" => Ok(Self::Int32),
            "uint32" | "u32" | "uint" => Ok(Self::UInt32),
            "int64" | "i64" | "long" => Ok(Self::Int64),
            "uint64" | "u64" | "ulong" => Ok(Self::UInt64),
            "float" | "f32" | "single" => Ok(Self::Float),
            "double" | "f64" => Ok(Self::Double),
            "string" | "str" => Ok(Self::String),
            "datetime" | "date" | "time" => Ok(Self::DateTime),
            "guid" | "uuid" => Ok(Self::Guid),
            "bytestring" | "bytes" | "binary" => Ok(Self::ByteString),
            "xml" | "xmlelement" => Ok(Self::XmlElement),
            "nodeid" => Ok(Self::NodeId),
            "expandednodeid" => Ok(Self::ExpandedNodeId),
            "statuscode" | "status" => Ok(Self::StatusCode),
            "qualifiedname" | "qname" => Ok(Self::QualifiedName),
            "localizedtext" | "text" => Ok(Self::LocalizedText),
            "extensionobject" | "structure" => Ok(Self::ExtensionObject),
            "datavalue" => Ok(Self::DataValue),
            "variant" | "any" => Ok(Self::Variant),
            "diagnosticinfo" => Ok(Self::DiagnosticInfo),
            _ => Err(ProtocolError::invalid_variant_type(s)),
        }
    }
}

// =============================================================================
// Value
// =============================================================================

/// A value payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// Boolean value.
    Boolean(bool),
    /// Signed 8-bit integer.
    SByte(i8),
    /// Unsigned 8-bit integer.
    Byte(u8),
    /// Signed 16-bit integer.
    Int16(i16),
    /// Unsigned 16-bit integer.
    UInt16(u16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// UTF-8 string.
    String(String),
    /// Date and time.
    DateTime(DateTime<Utc>),
    /// GUID.
    Guid(Uuid),
    /// Byte string.
    ByteString(Vec<u8>),
    /// Node id.
    NodeId(NodeId),
    /// Status code.
    StatusCode(StatusCode),
    /// Qualified name.
    QualifiedName(QualifiedName),
    /// Localized text.
    LocalizedText(LocalizedText),
    /// Structured value.
    ExtensionObject(ExtensionObject),
    /// One-dimensional array.
    Array(Vec<Value>),
}

impl Value {
    /// Returns the tag this payload carries on its own.
    ///
    /// `Null` has none; an array takes the tag of its first element, so an
    /// empty array has none either.
    pub fn native_type(&self) -> Option<VariantType> {
        let tag = match self {
            Self::Null => return None,
            Self::Boolean(_) => VariantType::Boolean,
            Self::SByte(_) => VariantType::SByte,
            Self::Byte(_) => VariantType::Byte,
            Self::Int16(_) => VariantType::Int16,
            Self::UInt16(_) => VariantType::UInt16,
            Self::Int32(_) => VariantType::Int32,
            Self::UInt32(_) => VariantType::UInt32,
            Self::Int64(_) => VariantType::Int64,
            Self::UInt64(_) => VariantType::UInt64,
            Self::Float(_) => VariantType::Float,
            Self::Double(_) => VariantType::Double,
            Self::String(_) => VariantType::String,
            Self::DateTime(_) => VariantType::DateTime,
            Self::Guid(_) => VariantType::Guid,
            Self::ByteString(_) => VariantType::ByteString,
            Self::NodeId(_) => VariantType::NodeId,
            Self::StatusCode(_) => VariantType::StatusCode,
            Self::QualifiedName(_) => VariantType::QualifiedName,
            Self::LocalizedText(_) => VariantType::LocalizedText,
            Self::ExtensionObject(_) => VariantType::ExtensionObject,
            Self::Array(items) => return items.first().and_then(Value::native_type),
        };
        Some(tag)
    }

    /// Returns the payload kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Array(_) => "array",
            Self::ExtensionObject(_) => "structure",
            other => other.native_type().map_or("null", |t| t.name()),
        }
    }

    /// Returns `true` for an array payload.
    #[inline]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns `true` for `Null`.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the array length, if an array.
    pub fn array_len(&self) -> Option<usize> {
        match self {
            Self::Array(items) => Some(items.len()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::SByte(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::Int16(v) => write!(f, "{}", v),
            Self::UInt16(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::UInt32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::UInt64(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Guid(v) => write!(f, "{}", v),
            Self::ByteString(v) => write!(f, "<{} bytes>", v.len()),
            Self::NodeId(v) => write!(f, "{}", v),
            Self::StatusCode(v) => write!(f, "{}", v),
            Self::QualifiedName(v) => write!(f, "{}", v),
            Self::LocalizedText(v) => write!(f, "{:?}", v.text),
            Self::ExtensionObject(v) => write!(f, "{}{{..}}", v.type_name()),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }

            impl From<$ty> for ValueInput {
                fn from(v: $ty) -> Self {
                    Self::Raw(Value::from(v))
                }
            }
        )*
    };
}

impl_value_from! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    &str => String,
    DateTime<Utc> => DateTime,
    Uuid => Guid,
    NodeId => NodeId,
    StatusCode => StatusCode,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
    ExtensionObject => ExtensionObject,
    Argument => ExtensionObject,
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Array(items.into_iter().map(Into::into).collect())
    }
}

// =============================================================================
// TypedValue
// =============================================================================

/// A payload with its variant tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    /// The tag.
    pub variant_type: VariantType,
    /// The payload.
    pub value: Value,
}

impl TypedValue {
    /// Creates a typed value without checking the payload against the tag.
    pub fn new(variant_type: VariantType, value: impl Into<Value>) -> Self {
        Self {
            variant_type,
            value: value.into(),
        }
    }

    /// A null payload carrying `variant_type`.
    pub fn null(variant_type: VariantType) -> Self {
        Self {
            variant_type,
            value: Value::Null,
        }
    }

    /// Wraps a raw value, using `hint` as the tag or else the payload's own.
    ///
    /// # Errors
    ///
    /// An untagged `Null` or empty array has no tag to take.
    pub fn from_value(value: Value, hint: Option<VariantType>) -> Result<Self, TypeInferenceError> {
        let variant_type = match hint.or_else(|| value.native_type()) {
            Some(tag) => tag,
            None => return Err(TypeInferenceError::undetermined(&value)),
        };
        Ok(Self {
            variant_type,
            value,
        })
    }

    /// Returns `true` for an array payload.
    #[inline]
    pub fn is_array(&self) -> bool {
        self.value.is_array()
    }

    /// Rank implied by the payload.
    pub fn value_rank(&self) -> ValueRank {
        ValueRank::for_value(self.is_array())
    }

    /// `[len]` for an array payload, empty otherwise.
    pub fn array_dimensions(&self) -> Vec<u32> {
        self.value
            .array_len()
            .map(|len| vec![u32::try_from(len).unwrap_or(u32::MAX)])
            .unwrap_or_default()
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.variant_type, self.value)
    }
}

// =============================================================================
// ValueInput
// =============================================================================

/// A value as supplied by a caller: already tagged, or raw.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueInput {
    /// A pre-tagged value, used as is.
    Typed(TypedValue),
    /// A raw payload, tagged during inference.
    Raw(Value),
}

impl ValueInput {
    /// Creates a raw input.
    pub fn raw(value: impl Into<Value>) -> Self {
        Self::Raw(value.into())
    }
}

impl From<TypedValue> for ValueInput {
    fn from(value: TypedValue) -> Self {
        Self::Typed(value)
    }
}

impl From<Value> for ValueInput {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

// =============================================================================
// Structured values
// =============================================================================

/// Structured values known to the address space layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionObject {
    /// Method argument description.
    Argument(Argument),
    /// Enumeration value with display text.
    EnumValueType(EnumValueType),
    /// Numeric range.
    Range(Range),
    /// Engineering unit.
    EUInformation(EUInformation),
    /// An application structure, identified by its type name.
    Custom {
        /// Name under which the structure is registered.
        type_name: String,
        /// Encoded body.
        body: Vec<u8>,
    },
}

impl ExtensionObject {
    /// Returns the structure type name used for DataType lookup.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Argument(_) => "Argument",
            Self::EnumValueType(_) => "EnumValueType",
            Self::Range(_) => "Range",
            Self::EUInformation(_) => "EUInformation",
            Self::Custom { type_name, .. } => type_name,
        }
    }

    /// Creates a custom structure.
    pub fn custom(type_name: impl Into<String>, body: Vec<u8>) -> Self {
        Self::Custom {
            type_name: type_name.into(),
            body,
        }
    }
}

impl From<Argument> for ExtensionObject {
    fn from(argument: Argument) -> Self {
        Self::Argument(argument)
    }
}

/// Description of one method argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// DataType of the argument.
    pub data_type: NodeId,
    /// Rank of the argument.
    pub value_rank: ValueRank,
    /// Array dimensions.
    pub array_dimensions: Vec<u32>,
    /// Description.
    pub description: LocalizedText,
}

impl Argument {
    /// Creates a scalar argument.
    pub fn new(name: impl Into<String>, data_type: NodeId) -> Self {
        Self {
            name: name.into(),
            data_type,
            value_rank: ValueRank::Scalar,
            array_dimensions: Vec::new(),
            description: LocalizedText::default(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = LocalizedText::new(description);
        self
    }
}

/// Enumeration value with display name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueType {
    /// Value.
    pub value: i64,
    /// Display name.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
}

/// Numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

/// Engineering unit information.
#[derive(Debug, Clone, PartialEq)]
pub struct EUInformation {
    /// Namespace URI of the unit.
    pub namespace_uri: String,
    /// Unit id.
    pub unit_id: i32,
    /// Display name.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address space identity and attribute types.
//!
//! - **NodeId**: the four OPC UA identifier kinds, with the `ns=..;i=..` grammar
//! - **QualifiedName**: browse names, with the `<index>:<name>` grammar
//! - **LocalizedText**: display names and descriptions
//! - **NodeClass**, **ValueRank**, **AccessLevel**: per-class attribute values
//!
//! # Examples
//!
//! ```
//! use uaforge_nodes::types::{NodeId, QualifiedName};
//!
//! let node_id: NodeId = "ns=2;s=Plant.Pump".parse().unwrap();
//! assert_eq!(node_id, NodeId::string(2, "Plant.Pump"));
//!
//! let name: QualifiedName = "2:Pump".parse().unwrap();
//! assert_eq!(name, QualifiedName::new(2, "Pump"));
//! ```

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ProtocolError;

// =============================================================================
// NodeId
// =============================================================================

/// OPC UA Node Identifier.
///
/// A numeric identifier of `0` outside of namespace 0 is the "assign one
/// for me" request form, see [`NodeId::auto`].
///
/// Serialized as its text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId {
    /// Namespace index (0 = OPC UA standard namespace).
    pub namespace_index: u16,

    /// The node identifier.
    pub identifier: NodeIdentifier,
}

impl NodeId {
    /// Creates a numeric node ID.
    #[inline]
    pub const fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// Creates a numeric node ID in the standard namespace.
    #[inline]
    pub const fn ns0(value: u32) -> Self {
        Self::numeric(0, value)
    }

    /// Creates a string node ID.
    #[inline]
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// Creates a GUID node ID.
    #[inline]
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// Creates an opaque node ID.
    #[inline]
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    /// The null node id, `i=0`.
    #[inline]
    pub const fn null() -> Self {
        Self::numeric(0, 0)
    }

    /// A request for a server-assigned identifier in `namespace_index`.
    ///
    /// ```
    /// use uaforge_nodes::types::NodeId;
    ///
    /// let id = NodeId::auto(2);
    /// assert!(id.is_auto());
    /// assert_eq!(id.to_string(), "ns=2;i=0");
    /// ```
    #[inline]
    pub const fn auto(namespace_index: u16) -> Self {
        Self::numeric(namespace_index, 0)
    }

    /// Returns `true` for a numeric identifier of 0 in any namespace.
    pub fn is_auto(&self) -> bool {
        matches!(self.identifier, NodeIdentifier::Numeric(0))
    }

    /// Returns `true` for `ns=0;i=0`.
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && self.is_auto()
    }

    /// Returns the numeric value, if numeric.
    pub fn as_numeric(&self) -> Option<u32> {
        match self.identifier {
            NodeIdentifier::Numeric(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string value, if a string identifier.
    pub fn as_string(&self) -> Option<&str> {
        match &self.identifier {
            NodeIdentifier::String(v) => Some(v),
            _ => None,
        }
    }

    /// Converts to the OPC UA string format.
    ///
    /// Format: `[ns=<namespace>;]{i|s|g|b}=<identifier>`
    pub fn to_opc_string(&self) -> String {
        if self.namespace_index == 0 {
            self.identifier.to_string()
        } else {
            format!("ns={};{}", self.namespace_index, self.identifier)
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_opc_string())
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self::ns0(value)
    }
}

impl FromStr for NodeId {
    type Err = ProtocolError;

    /// Parses a NodeId from OPC UA string format.
    ///
    /// Supported formats:
    /// - `ns=2;i=1001` (numeric)
    /// - `ns=2;s=MyNode` (string)
    /// - `ns=2;g=550e8400-e29b-41d4-a716-446655440000` (GUID)
    /// - `ns=2;b=SGVsbG8=` (opaque, base64 encoded)
    /// - `i=1001`, `s=MyNode` (namespace 0)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: String| ProtocolError::invalid_node_id(s, reason);

        let (namespace_index, identifier_part) = match s.strip_prefix("ns=") {
            Some(rest) => {
                let (ns, id) = rest
                    .split_once(';')
                    .ok_or_else(|| invalid("Missing identifier after namespace".into()))?;
                let ns: u16 = ns
                    .parse()
                    .map_err(|_| invalid(format!("Invalid namespace index '{}'", ns)))?;
                (ns, id)
            }
            None => (0, s),
        };

        let identifier = if let Some(id) = identifier_part.strip_prefix("i=") {
            let value: u32 = id
                .parse()
                .map_err(|_| invalid("Invalid numeric identifier".into()))?;
            NodeIdentifier::Numeric(value)
        } else if let Some(id) = identifier_part.strip_prefix("s=") {
            if id.is_empty() {
                return Err(invalid("Empty string identifier".into()));
            }
            NodeIdentifier::String(id.to_string())
        } else if let Some(id) = identifier_part.strip_prefix("g=") {
            let uuid = Uuid::parse_str(id).map_err(|e| invalid(format!("Invalid GUID: {}", e)))?;
            NodeIdentifier::Guid(uuid)
        } else if let Some(id) = identifier_part.strip_prefix("b=") {
            let bytes = BASE64
                .decode(id)
                .map_err(|e| invalid(format!("Invalid base64: {}", e)))?;
            NodeIdentifier::Opaque(bytes)
        } else {
            return Err(invalid(
                "Unknown identifier type. Expected i=, s=, g=, or b=".into(),
            ));
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

impl TryFrom<String> for NodeId {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(node_id: NodeId) -> Self {
        node_id.to_opc_string()
    }
}

// =============================================================================
// NodeIdentifier
// =============================================================================

/// OPC UA node identifier kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdentifier {
    /// Numeric identifier.
    Numeric(u32),
    /// String identifier.
    String(String),
    /// GUID identifier.
    Guid(Uuid),
    /// Opaque identifier (application-specific byte array).
    Opaque(Vec<u8>),
}

impl NodeIdentifier {
    /// Returns the identifier type prefix for OPC UA string format.
    pub const fn type_prefix(&self) -> char {
        match self {
            Self::Numeric(_) => 'i',
            Self::String(_) => 's',
            Self::Guid(_) => 'g',
            Self::Opaque(_) => 'b',
        }
    }
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.type_prefix();
        match self {
            Self::Numeric(v) => write!(f, "{prefix}={v}"),
            Self::String(v) => write!(f, "{prefix}={v}"),
            Self::Guid(v) => write!(f, "{prefix}={v}"),
            Self::Opaque(v) => write!(f, "{prefix}={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// QualifiedName
// =============================================================================

/// OPC UA qualified name (namespace index + name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index.
    pub namespace_index: u16,

    /// The name string.
    pub name: String,
}

impl QualifiedName {
    /// Creates a new qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// Creates a qualified name in namespace 0.
    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(0, name)
    }

    /// Returns `true` if the name part is empty.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Returns the string representation.
    pub fn to_string_with_ns(&self) -> String {
        if self.namespace_index == 0 {
            self.name.clone()
        } else {
            format!("{}:{}", self.namespace_index, self.name)
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_ns())
    }
}

impl FromStr for QualifiedName {
    type Err = ProtocolError;

    /// Parses `<index>:<name>` or a bare `<name>` in namespace 0.
    ///
    /// A prefix before the first `:` must be a valid namespace index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((ns, name)) => {
                let ns: u16 = ns.trim().parse().map_err(|_| {
                    ProtocolError::invalid_qualified_name(
                        s,
                        format!("Invalid namespace index '{}'", ns),
                    )
                })?;
                Ok(Self::new(ns, name))
            }
            None => Ok(Self::standard(s)),
        }
    }
}

// =============================================================================
// LocalizedText
// =============================================================================

/// Human readable text with an optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Locale, e.g. `en-US`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    /// Text.
    pub text: String,
}

impl LocalizedText {
    /// Creates text without a locale.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            locale: None,
            text: text.into(),
        }
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// =============================================================================
// NodeClass
// =============================================================================

/// OPC UA node class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeClass {
    /// Object node.
    Object,
    /// Variable node.
    Variable,
    /// Method node.
    Method,
    /// Object type node.
    ObjectType,
    /// Variable type node.
    VariableType,
    /// Reference type node.
    ReferenceType,
    /// Data type node.
    DataType,
    /// View node.
    View,
}

impl NodeClass {
    /// Returns the OPC UA bit mask value.
    pub const fn value(&self) -> u32 {
        match self {
            Self::Object => 1,
            Self::Variable => 2,
            Self::Method => 4,
            Self::ObjectType => 8,
            Self::VariableType => 16,
            Self::ReferenceType => 32,
            Self::DataType => 64,
            Self::View => 128,
        }
    }

    /// Creates from OPC UA value.
    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            1 => Some(Self::Object),
            2 => Some(Self::Variable),
            4 => Some(Self::Method),
            8 => Some(Self::ObjectType),
            16 => Some(Self::VariableType),
            32 => Some(Self::ReferenceType),
            64 => Some(Self::DataType),
            128 => Some(Self::View),
            _ => None,
        }
    }

    /// Returns the class name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Variable => "Variable",
            Self::Method => "Method",
            Self::ObjectType => "ObjectType",
            Self::VariableType => "VariableType",
            Self::ReferenceType => "ReferenceType",
            Self::DataType => "DataType",
            Self::View => "View",
        }
    }

    /// Returns `true` for the type classes, which are linked by HasSubtype.
    pub const fn is_type(&self) -> bool {
        matches!(
            self,
            Self::ObjectType | Self::VariableType | Self::ReferenceType | Self::DataType
        )
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ValueRank
// =============================================================================

/// Dimensionality of a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ValueRank {
    /// Exactly one dimension (`1`).
    OneDimension,
    /// One or more dimensions (`0`).
    OneOrMoreDimensions,
    /// A scalar (`-1`).
    #[default]
    Scalar,
    /// Scalar or any dimensionality (`-2`).
    Any,
    /// Scalar or one dimension (`-3`).
    ScalarOrOneDimension,
}

impl ValueRank {
    /// Returns the wire value.
    pub const fn value(&self) -> i32 {
        match self {
            Self::OneDimension => 1,
            Self::OneOrMoreDimensions => 0,
            Self::Scalar => -1,
            Self::Any => -2,
            Self::ScalarOrOneDimension => -3,
        }
    }

    /// Creates from the wire value.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::OneDimension),
            0 => Some(Self::OneOrMoreDimensions),
            -1 => Some(Self::Scalar),
            -2 => Some(Self::Any),
            -3 => Some(Self::ScalarOrOneDimension),
            _ => None,
        }
    }

    /// Rank for a value, by array-ness.
    pub const fn for_value(is_array: bool) -> Self {
        if is_array {
            Self::OneDimension
        } else {
            Self::Scalar
        }
    }
}

impl fmt::Display for ValueRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

// =============================================================================
// AccessLevel
// =============================================================================

/// Variable access level bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessLevel(pub u8);

impl AccessLevel {
    /// No access.
    pub const NONE: Self = Self(0x00);
    /// The current value is readable.
    pub const CURRENT_READ: Self = Self(0x01);
    /// The current value is writable.
    pub const CURRENT_WRITE: Self = Self(0x02);
    /// History is readable.
    pub const HISTORY_READ: Self = Self(0x04);
    /// History is writable.
    pub const HISTORY_WRITE: Self = Self(0x08);

    /// Read and write of the current value.
    pub const READ_WRITE: Self = Self(0x03);

    /// Returns the raw bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        Self::CURRENT_READ
    }
}

impl std::ops::BitOr for AccessLevel {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// =============================================================================
// Tests
// =============================================================================

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Nodeset definition schema.
//!
//! A nodeset file describes a tree of nodes to provision below the Objects
//! folder, plus the structure types the inferencer should know about.
//!
//! # Schema Structure
//!
//! ```text
//! NodesetConfig
//! ├── namespace: u16              default namespace for unnamed ids
//! ├── logging: LoggingConfig
//! ├── structures: Vec<StructureSpec>
//! └── nodes: Vec<NodeSpec>
//!     └── children: Vec<NodeSpec>
//! ```
//!
//! Identifier fields are kept as text and parsed during validation, so a
//! bad id is reported with the path of the field that holds it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uaforge_nodes::{LocalizedText, NodeId, QualifiedName, Value, VariantType};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Namespace used when a file does not name one.
pub const DEFAULT_NAMESPACE: u16 = 2;

fn default_namespace() -> u16 {
    DEFAULT_NAMESPACE
}

// =============================================================================
// NodesetConfig
// =============================================================================

/// Root of a nodeset definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodesetConfig {
    /// Namespace for nodes without an explicit `node_id`.
    #[serde(default = "default_namespace")]
    pub namespace: u16,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Application structures to register with the inferencer.
    #[serde(default)]
    pub structures: Vec<StructureSpec>,

    /// Top-level nodes, created below the Objects folder.
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

impl NodesetConfig {
    /// Validates the whole file.
    ///
    /// Checks namespaces, names, identifier grammars, per-kind field
    /// requirements and explicit node id uniqueness. The first failure is
    /// returned with the path of the offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.namespace == 0 {
            return Err(ConfigError::validation(
                "namespace",
                "namespace 0 is reserved for the standard address space",
            ));
        }

        self.logging.validate()?;

        let mut structure_names = HashSet::new();
        for (i, structure) in self.structures.iter().enumerate() {
            let path = format!("structures[{i}]");
            structure.validate(&path)?;
            if !structure_names.insert(structure.name.as_str()) {
                return Err(ConfigError::validation(
                    format!("{path}.name"),
                    format!("structure '{}' is defined twice", structure.name),
                ));
            }
        }

        let mut seen = HashMap::new();
        for (i, node) in self.nodes.iter().enumerate() {
            node.validate(&format!("nodes[{i}]"), &mut seen)?;
        }

        Ok(())
    }

    /// Non-fatal findings: fields that are accepted but have no effect.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            node.collect_warnings(&format!("nodes[{i}]"), self.namespace, &mut warnings);
        }
        warnings
    }

    /// Total number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().map(NodeSpec::count).sum()
    }
}

impl Default for NodesetConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE,
            logging: LoggingConfig::default(),
            structures: Vec::new(),
            nodes: Vec::new(),
        }
    }
}

// =============================================================================
// StructureSpec
// =============================================================================

/// A structure type name mapped to its DataType.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructureSpec {
    /// Type name carried by extension object values.
    pub name: String,
    /// DataType node id, e.g. `ns=2;i=5001`.
    pub data_type: String,
}

impl StructureSpec {
    /// Validates the entry.
    pub fn validate(&self, path: &str) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::validation(format!("{path}.name"), "cannot be empty"));
        }
        self.data_type_id(path)?;
        Ok(())
    }

    /// The parsed DataType.
    pub fn data_type_id(&self, path: &str) -> ConfigResult<NodeId> {
        parse_node_id(&format!("{path}.data_type"), &self.data_type)
    }
}

// =============================================================================
// NodeSpec
// =============================================================================

/// Kind of node to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// FolderType object.
    Folder,
    /// Object, BaseObjectType unless `object_type` is given.
    Object,
    /// Data variable.
    Variable,
    /// Property.
    Property,
    /// Variable type.
    VariableType,
    /// Object type.
    ObjectType,
    /// Data type.
    DataType,
    /// Method.
    Method,
}

impl NodeKind {
    /// Returns the kind as written in files.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Folder => "folder",
            NodeKind::Object => "object",
            NodeKind::Variable => "variable",
            NodeKind::Property => "property",
            NodeKind::VariableType => "variable_type",
            NodeKind::ObjectType => "object_type",
            NodeKind::DataType => "data_type",
            NodeKind::Method => "method",
        }
    }

    /// Variables and properties carry a value.
    pub fn is_variable(&self) -> bool {
        matches!(self, NodeKind::Variable | NodeKind::Property)
    }

    /// Type nodes carry the abstract flag.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeKind::VariableType | NodeKind::ObjectType | NodeKind::DataType
        )
    }

    /// Whether nodes of this kind may have children in a nodeset file.
    pub fn allows_children(&self) -> bool {
        !matches!(
            self,
            NodeKind::Variable | NodeKind::Property | NodeKind::Method
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    /// Node kind.
    pub kind: NodeKind,

    /// Browse name; also the display name.
    pub name: String,

    /// Explicit node id; auto-assigned when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,

    /// Type definition of an object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    /// Initial value of a variable or property, default of a variable type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueSpec>,

    /// Variant type hint for `value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_type: Option<String>,

    /// Explicit DataType; required for variable types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,

    /// Grants CurrentWrite on a variable or property.
    #[serde(default)]
    pub writable: bool,

    /// Abstract flag of a type.
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    /// Method input argument types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<String>,

    /// Method output argument types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<String>,

    /// Child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Creates a spec with only a kind and a name.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            node_id: None,
            object_type: None,
            value: None,
            variant_type: None,
            data_type: None,
            writable: false,
            is_abstract: false,
            inputs: Vec::new(),
            outputs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// This node and all of its descendants.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(NodeSpec::count).sum::<usize>()
    }

    /// The parsed explicit node id.
    pub fn node_id(&self, path: &str) -> ConfigResult<Option<NodeId>> {
        self.node_id
            .as_deref()
            .map(|text| parse_node_id(&format!("{path}.node_id"), text))
            .transpose()
    }

    /// The parsed object type.
    pub fn object_type(&self, path: &str) -> ConfigResult<Option<NodeId>> {
        self.object_type
            .as_deref()
            .map(|text| parse_node_id(&format!("{path}.object_type"), text))
            .transpose()
    }

    /// The parsed explicit DataType.
    pub fn data_type(&self, path: &str) -> ConfigResult<Option<NodeId>> {
        self.data_type
            .as_deref()
            .map(|text| parse_node_id(&format!("{path}.data_type"), text))
            .transpose()
    }

    /// The parsed variant type hint.
    pub fn variant_type(&self, path: &str) -> ConfigResult<Option<VariantType>> {
        self.variant_type
            .as_deref()
            .map(|text| parse_variant_type(&format!("{path}.variant_type"), text))
            .transpose()
    }

    /// The value, coerced to the variant type hint when there is one.
    pub fn value(&self, path: &str) -> ConfigResult<Option<Value>> {
        let hint = self.variant_type(path)?;
        self.value
            .as_ref()
            .map(|value| {
                value
                    .to_value(hint)
                    .map_err(|message| ConfigError::validation(format!("{path}.value"), message))
            })
            .transpose()
    }

    /// The parsed input argument types.
    pub fn inputs(&self, path: &str) -> ConfigResult<Vec<VariantType>> {
        parse_variant_types(&format!("{path}.inputs"), &self.inputs)
    }

    /// The parsed output argument types.
    pub fn outputs(&self, path: &str) -> ConfigResult<Vec<VariantType>> {
        parse_variant_types(&format!("{path}.outputs"), &self.outputs)
    }

    fn validate(&self, path: &str, seen: &mut HashMap<NodeId, String>) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::validation(format!("{path}.name"), "cannot be empty"));
        }

        if let Some(node_id) = self.node_id(path)? {
            if node_id.namespace_index == 0 {
                return Err(ConfigError::validation(
                    format!("{path}.node_id"),
                    "namespace 0 is reserved for the standard address space",
                ));
            }
            let field = format!("{path}.node_id");
            if seen.contains_key(&node_id) {
                return Err(ConfigError::duplicate_node_id(node_id.to_string(), field));
            }
            seen.insert(node_id, field);
        }

        self.object_type(path)?;
        self.data_type(path)?;
        self.value(path)?;

        if self.kind.is_variable() && self.value.is_none() {
            return Err(ConfigError::missing_field(format!("{path}.value")));
        }
        if self.kind == NodeKind::VariableType && self.data_type.is_none() {
            return Err(ConfigError::missing_field(format!("{path}.data_type")));
        }

        if self.kind != NodeKind::Method && !(self.inputs.is_empty() && self.outputs.is_empty()) {
            return Err(ConfigError::validation(
                format!("{path}.inputs"),
                format!("arguments are only allowed on methods, not on {}", self.kind),
            ));
        }
        self.inputs(path)?;
        self.outputs(path)?;

        if !self.kind.allows_children() && !self.children.is_empty() {
            return Err(ConfigError::validation(
                format!("{path}.children"),
                format!("a {} cannot have children", self.kind),
            ));
        }
        for (i, child) in self.children.iter().enumerate() {
            child.validate(&format!("{path}.children[{i}]"), seen)?;
        }

        Ok(())
    }

    fn collect_warnings(&self, path: &str, namespace: u16, warnings: &mut Vec<String>) {
        let accepts_value = self.kind.is_variable() || self.kind == NodeKind::VariableType;
        if !accepts_value && (self.value.is_some() || self.variant_type.is_some()) {
            warnings.push(format!("{path}: value is ignored on a {}", self.kind));
        }
        if !accepts_value && self.data_type.is_some() {
            warnings.push(format!("{path}: data_type is ignored on a {}", self.kind));
        }
        if !self.kind.is_variable() && self.writable {
            warnings.push(format!("{path}: writable is ignored on a {}", self.kind));
        }
        if self.kind != NodeKind::Object && self.object_type.is_some() {
            warnings.push(format!("{path}: object_type is ignored on a {}", self.kind));
        }
        if !self.kind.is_type() && self.is_abstract {
            warnings.push(format!("{path}: abstract is ignored on a {}", self.kind));
        }
        if let Ok(Some(node_id)) = self.node_id(path) {
            if node_id.namespace_index != namespace {
                warnings.push(format!(
                    "{path}: node_id is in namespace {} but the file namespace is {namespace}",
                    node_id.namespace_index
                ));
            }
        }
        for (i, child) in self.children.iter().enumerate() {
            child.collect_warnings(&format!("{path}.children[{i}]"), namespace, warnings);
        }
    }
}

// =============================================================================
// ValueSpec
// =============================================================================

/// A value as written in a file.
///
/// Numbers are coerced to the variant type hint when one is given;
/// otherwise integers become Int64 and decimals Double.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueSpec {
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Integer(i64),
    /// Decimal literal.
    Float(f64),
    /// String literal.
    Text(String),
    /// Array literal.
    List(Vec<ValueSpec>),
}

impl ValueSpec {
    /// Converts to a payload of the hinted type.
    pub fn to_value(&self, hint: Option<VariantType>) -> Result<Value, String> {
        use VariantType as T;

        let mismatch = |kind: &str, tag: VariantType| format!("a {kind} cannot be stored as {tag}");

        match self {
            ValueSpec::List(items) => items
                .iter()
                .map(|item| item.to_value(hint))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),

            ValueSpec::Bool(v) => match hint {
                None | Some(T::Boolean) => Ok(Value::Boolean(*v)),
                Some(tag) => Err(mismatch("boolean", tag)),
            },

            ValueSpec::Integer(v) => {
                let v = *v;
                let out_of_range = |tag: VariantType| format!("{v} is out of range for {tag}");
                match hint {
                    None | Some(T::Int64) => Ok(Value::Int64(v)),
                    Some(T::SByte) => i8::try_from(v).map(Value::SByte).map_err(|_| out_of_range(T::SByte)),
                    Some(T::Byte) => u8::try_from(v).map(Value::Byte).map_err(|_| out_of_range(T::Byte)),
                    Some(T::Int16) => i16::try_from(v).map(Value::Int16).map_err(|_| out_of_range(T::Int16)),
                    Some(T::UInt16) => u16::try_from(v).map(Value::UInt16).map_err(|_| out_of_range(T::UInt16)),
                    Some(T::Int32) => i32::try_from(v).map(Value::Int32).map_err(|_| out_of_range(T::Int32)),
                    Some(T::UInt32) => u32::try_from(v).map(Value::UInt32).map_err(|_| out_of_range(T::UInt32)),
                    Some(T::UInt64) => u64::try_from(v).map(Value::UInt64).map_err(|_| out_of_range(T::UInt64)),
                    Some(T::Float) => Ok(Value::Float(v as f32)),
                    Some(T::Double) => Ok(Value::Double(v as f64)),
                    Some(tag) => Err(mismatch("number", tag)),
                }
            }

            ValueSpec::Float(v) => match hint {
                None | Some(T::Double) => Ok(Value::Double(*v)),
                Some(T::Float) => Ok(Value::Float(*v as f32)),
                Some(tag) => Err(mismatch("decimal", tag)),
            },

            ValueSpec::Text(s) => match hint {
                None | Some(T::String) => Ok(Value::String(s.clone())),
                Some(T::LocalizedText) => Ok(Value::LocalizedText(LocalizedText::new(s.clone()))),
                Some(T::QualifiedName) => QualifiedName::from_str(s)
                    .map(Value::QualifiedName)
                    .map_err(|e| e.to_string()),
                Some(T::NodeId) => NodeId::from_str(s).map(Value::NodeId).map_err(|e| e.to_string()),
                Some(tag) => Err(mismatch("string", tag)),
            },
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Validates the logging configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as an env-filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Compact single-line text.
    Compact,
    /// JSON lines.
    Json,
}

impl LogFormat {
    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Field Parsers
// =============================================================================

fn parse_node_id(field: &str, text: &str) -> ConfigResult<NodeId> {
    NodeId::from_str(text).map_err(|e| ConfigError::validation(field, e.to_string()))
}

fn parse_variant_type(field: &str, text: &str) -> ConfigResult<VariantType> {
    VariantType::from_str(text).map_err(|e| ConfigError::validation(field, e.to_string()))
}

fn parse_variant_types(field: &str, texts: &[String]) -> ConfigResult<Vec<VariantType>> {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| parse_variant_type(&format!("{field}[{i}]"), text))
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

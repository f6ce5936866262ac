// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Structure type name to DataType lookup.
//!
//! Structured values carry only a type name. The registry maps that name
//! to the DataType node id written into the Variable's DataType attribute.
//! A registry is built once, wrapped in an `Arc`, and never changes after
//! that.
//!
//! ```
//! use std::sync::Arc;
//! use uaforge_nodes::registry::StructureRegistry;
//! use uaforge_nodes::types::NodeId;
//!
//! let mut registry = StructureRegistry::with_builtin_structures();
//! registry.register("MyRecipe", NodeId::numeric(2, 5001));
//! let registry = Arc::new(registry);
//!
//! assert_eq!(registry.lookup("Argument"), Some(&NodeId::ns0(296)));
//! assert_eq!(registry.lookup("MyRecipe"), Some(&NodeId::numeric(2, 5001)));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::types::NodeId;

/// Namespace 0 structures with a fixed DataType id.
const BUILTIN_STRUCTURES: &[(&str, u32)] = &[
    ("Argument", 296),
    ("EnumValueType", 7594),
    ("Range", 884),
    ("EUInformation", 887),
    ("TimeZoneDataType", 8912),
    ("ServerStatusDataType", 862),
    ("BuildInfo", 338),
];

static GLOBAL: Lazy<Arc<StructureRegistry>> =
    Lazy::new(|| Arc::new(StructureRegistry::with_builtin_structures()));

/// Maps structure type names to DataType node ids.
#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    data_types: HashMap<String, NodeId>,
}

impl StructureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the namespace 0 structures.
    pub fn with_builtin_structures() -> Self {
        let mut registry = Self::new();
        for (name, id) in BUILTIN_STRUCTURES {
            registry.register(*name, NodeId::ns0(*id));
        }
        registry
    }

    /// The shared registry of namespace 0 structures.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Registers a structure, replacing any previous entry for the name.
    pub fn register(&mut self, type_name: impl Into<String>, data_type: NodeId) -> &mut Self {
        let type_name = type_name.into();
        tracing::debug!(type_name = %type_name, data_type = %data_type, "Registered structure");
        self.data_types.insert(type_name, data_type);
        self
    }

    /// Returns the DataType registered for `type_name`.
    pub fn lookup(&self, type_name: &str) -> Option<&NodeId> {
        self.data_types.get(type_name)
    }

    /// Returns `true` if `type_name` is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.data_types.contains_key(type_name)
    }

    /// Iterates over `(type name, DataType)` entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeId)> {
        self.data_types.iter().map(|(name, id)| (name.as_str(), id))
    }

    /// Returns the number of registered structures.
    pub fn len(&self) -> usize {
        self.data_types.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.data_types.is_empty()
    }
}

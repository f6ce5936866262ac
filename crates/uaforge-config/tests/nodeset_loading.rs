// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Nodeset Loading Integration Tests
//!
//! ## Test Categories
//!
//! - Format tests: the same tree in YAML, TOML and JSON
//! - Validation tests: invalid files name the offending field
//! - Placeholder tests: environment substitution in file content

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use uaforge_config::prelude::*;
use uaforge_config::{load_config_str, LogFormat, StructureSpec};

// =============================================================================
// Fixtures
// =============================================================================

const YAML: &str = r#"
namespace: 3
logging: { level: info, format: compact }
structures:
  - { name: Recipe, data_type: "ns=3;i=5001" }
nodes:
  - kind: folder
    name: Plant
    node_id: "ns=3;s=Plant"
    children:
      - kind: variable
        name: Temperature
        value: 21.5
        variant_type: double
        writable: true
      - kind: property
        name: Tags
        value: [1, 2, 3]
        variant_type: int32
      - kind: method
        name: Reset
        inputs: [int32]
        outputs: [boolean]
"#;

const TOML: &str = r#"
namespace = 3

[logging]
level = "info"
format = "compact"

[[structures]]
name = "Recipe"
data_type = "ns=3;i=5001"

[[nodes]]
kind = "folder"
name = "Plant"
node_id = "ns=3;s=Plant"

[[nodes.children]]
kind = "variable"
name = "Temperature"
value = 21.5
variant_type = "double"
writable = true

[[nodes.children]]
kind = "property"
name = "Tags"
value = [1, 2, 3]
variant_type = "int32"

[[nodes.children]]
kind = "method"
name = "Reset"
inputs = ["int32"]
outputs = ["boolean"]
"#;

const JSON: &str = r#"{
  "namespace": 3,
  "logging": { "level": "info", "format": "compact" },
  "structures": [{ "name": "Recipe", "data_type": "ns=3;i=5001" }],
  "nodes": [{
    "kind": "folder",
    "name": "Plant",
    "node_id": "ns=3;s=Plant",
    "children": [
      { "kind": "variable", "name": "Temperature", "value": 21.5,
        "variant_type": "double", "writable": true },
      { "kind": "property", "name": "Tags", "value": [1, 2, 3], "variant_type": "int32" },
      { "kind": "method", "name": "Reset", "inputs": ["int32"], "outputs": ["boolean"] }
    ]
  }]
}"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn loader() -> ConfigLoader {
    ConfigLoader::new().with_env_prefix("UAFORGE_IT_LOADING")
}

// =============================================================================
// Format Tests
// =============================================================================

#[test]
fn test_formats_load_the_same_tree() {
    let dir = TempDir::new().unwrap();

    let yaml = loader().load(write(&dir, "plant.yaml", YAML)).unwrap();
    let toml = loader().load(write(&dir, "plant.toml", TOML)).unwrap();
    let json = loader().load(write(&dir, "plant.json", JSON)).unwrap();

    assert_eq!(yaml, toml);
    assert_eq!(yaml, json);

    assert_eq!(yaml.namespace, 3);
    assert_eq!(yaml.logging.format, LogFormat::Compact);
    assert_eq!(
        yaml.structures,
        vec![StructureSpec {
            name: "Recipe".into(),
            data_type: "ns=3;i=5001".into(),
        }]
    );
    assert_eq!(yaml.node_count(), 4);

    let children = &yaml.nodes[0].children;
    assert_eq!(children[0].value, Some(ValueSpec::Float(21.5)));
    assert!(children[0].writable);
    assert_eq!(children[2].kind, NodeKind::Method);
    assert_eq!(children[2].outputs, vec!["boolean".to_string()]);
}

#[test]
fn test_yml_extension() {
    let dir = TempDir::new().unwrap();
    let config = loader().load(write(&dir, "plant.yml", YAML)).unwrap();
    assert_eq!(config.nodes.len(), 1);
}

#[test]
fn test_unknown_field_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "plant.yaml",
        "nodes:\n  - kind: folder\n    name: Plant\n    colour: red\n",
    );

    let err = loader().load(&path).unwrap_err();
    match err {
        ConfigError::Parse { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let err = loader().load(write(&dir, "plant.ini", YAML)).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_invalid_files_name_the_field() {
    let cases = [
        (
            "nodes:\n  - kind: folder\n    name: Plant\n    node_id: 'ns=2;x=1'\n",
            "nodes[0].node_id",
        ),
        (
            "nodes:\n  - kind: folder\n    name: Plant\n    children:\n      - kind: variable\n        name: Speed\n",
            "nodes[0].children[0].value",
        ),
        (
            "nodes:\n  - kind: variable\n    name: Speed\n    value: 1\n    children:\n      - { kind: folder, name: X }\n",
            "nodes[0].children",
        ),
        (
            "nodes:\n  - { kind: folder, name: A, node_id: 'ns=2;i=7' }\n  - { kind: folder, name: B, node_id: 'ns=2;i=7' }\n",
            "nodes[1].node_id",
        ),
        ("namespace: 0\n", "namespace"),
    ];

    for (content, field) in cases {
        let err = load_config_str(content, ConfigFormat::Yaml).unwrap_err();
        assert_eq!(err.field(), Some(field), "content: {content}");
    }
}

// =============================================================================
// Placeholder Tests
// =============================================================================

#[test]
fn test_placeholders_in_file() {
    std::env::set_var("UAFORGE_IT_PLANT_NAME", "Line7");
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "plant.yaml",
        "nodes:\n  - kind: folder\n    name: ${UAFORGE_IT_PLANT_NAME:Plant}\n  - kind: folder\n    name: ${UAFORGE_IT_UNSET:Fallback}\n",
    );

    let config = loader().load(path).unwrap();
    assert_eq!(config.nodes[0].name, "Line7");
    assert_eq!(config.nodes[1].name, "Fallback");
}

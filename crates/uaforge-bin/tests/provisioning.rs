// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Provisioning Integration Tests
//!
//! Loads nodeset files and provisions them into the in-memory address
//! space.
//!
//! ## Test Categories
//!
//! - Demo tests: the bundled sample nodeset
//! - Failure tests: provisioning errors carry the entry path
//! - Structure tests: DataType nodes for registered structures

use std::path::PathBuf;
use std::sync::Arc;

use uaforge_bin::commands::{check, render_text};
use uaforge_bin::{BinError, Provisioned, ProvisionedNode, Provisioner};
use uaforge_config::{load_config_str, ConfigFormat, ConfigLoader, NodeKind, NodesetConfig};
use uaforge_nodes::prelude::*;
use uaforge_nodes::{NodeClass, NodeCreationError};

// =============================================================================
// Fixtures
// =============================================================================

fn demo_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/plant.yaml")
}

async fn provision(config: &NodesetConfig) -> (Arc<InMemoryAddressSpace>, Result<Provisioned, BinError>) {
    let space = Arc::new(InMemoryAddressSpace::new());
    let provisioner = Provisioner::new(config).unwrap();
    let result = provisioner
        .provision(Arc::clone(&space) as Arc<dyn AddressSpace>, config)
        .await;
    (space, result)
}

fn find<'a>(nodes: &'a [ProvisionedNode], name: &str) -> &'a ProvisionedNode {
    nodes
        .iter()
        .find(|node| node.name == name)
        .unwrap_or_else(|| panic!("no node named {name}"))
}

fn reference(space: &InMemoryAddressSpace, parent: &NodeId, child: &NodeId) -> Option<NodeId> {
    space
        .node(parent)?
        .references
        .into_iter()
        .find(|r| &r.target == child)
        .map(|r| r.reference_type_id)
}

// =============================================================================
// Demo Tests
// =============================================================================

#[tokio::test]
async fn test_demo_nodeset_provisions() {
    let config = ConfigLoader::new()
        .with_env_prefix("UAFORGE_IT_DEMO")
        .load(demo_path())
        .unwrap();
    assert!(check(&config, true).is_ok());

    let (space, result) = provision(&config).await;
    let provisioned = result.unwrap();

    assert_eq!(config.node_count(), 11);
    assert_eq!(provisioned.node_count(), 13);
    assert_eq!(provisioned.structures, vec![NodeId::numeric(2, 5001)]);

    let recipe = space.node(&NodeId::numeric(2, 5001)).unwrap();
    assert_eq!(recipe.node_class, NodeClass::DataType);
    assert_eq!(
        reference(&space, &ids::STRUCTURE, &recipe.node_id),
        Some(ids::HAS_SUBTYPE)
    );

    let plant = find(&provisioned.nodes, "Plant");
    assert_eq!(plant.node_id, NodeId::string(2, "Plant"));
    assert_eq!(
        reference(&space, &ids::OBJECTS_FOLDER, &plant.node_id),
        Some(ids::ORGANIZES)
    );

    let pump = find(&plant.children, "Pump1");
    assert_eq!(reference(&space, &plant.node_id, &pump.node_id), Some(ids::ORGANIZES));

    let speed = space.node(&find(&pump.children, "Speed").node_id).unwrap();
    assert_eq!(reference(&space, &pump.node_id, &speed.node_id), Some(ids::HAS_COMPONENT));
    assert_eq!(speed.data_type(), Some(&NodeId::ns0(11)));
    assert_eq!(speed.value().unwrap().value, Value::Double(1450.0));

    let history = space.node(&find(&pump.children, "History").node_id).unwrap();
    assert_eq!(history.value_rank(), Some(ValueRank::OneDimension));
    assert_eq!(history.data_type(), Some(&NodeId::ns0(6)));

    let serial = find(&pump.children, "SerialNumber");
    assert_eq!(reference(&space, &pump.node_id, &serial.node_id), Some(ids::HAS_PROPERTY));
}

#[tokio::test]
async fn test_demo_types_go_below_base_types() {
    let config = ConfigLoader::new()
        .with_env_prefix("UAFORGE_IT_DEMO_TYPES")
        .load(demo_path())
        .unwrap();
    let (space, result) = provision(&config).await;
    let provisioned = result.unwrap();

    let pump_type = find(&provisioned.nodes, "PumpType");
    assert_eq!(
        reference(&space, &ids::BASE_OBJECT_TYPE, &pump_type.node_id),
        Some(ids::HAS_SUBTYPE)
    );
    assert_eq!(pump_type.children.len(), 1);

    let temperature_type = find(&provisioned.nodes, "TemperatureType");
    assert_eq!(
        reference(&space, &ids::BASE_DATA_VARIABLE_TYPE, &temperature_type.node_id),
        Some(ids::HAS_SUBTYPE)
    );
    let record = space.node(&temperature_type.node_id).unwrap();
    assert_eq!(record.node_class, NodeClass::VariableType);
    assert_eq!(record.value_rank(), Some(ValueRank::Scalar));
}

#[tokio::test]
async fn test_demo_methods_are_wired() {
    let config = ConfigLoader::new()
        .with_env_prefix("UAFORGE_IT_DEMO_METHODS")
        .load(demo_path())
        .unwrap();
    let (space, result) = provision(&config).await;
    let provisioned = result.unwrap();

    let plant = find(&provisioned.nodes, "Plant");
    let pump = find(&plant.children, "Pump1");

    let start = find(&pump.children, "Start");
    assert_eq!(start.kind, NodeKind::Method);
    let names: Vec<_> = start.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["InputArguments", "OutputArguments"]);

    let out = space
        .call_method(
            &pump.node_id,
            &start.node_id,
            vec![TypedValue::new(VariantType::Double, 1.0)],
        )
        .unwrap();
    assert_eq!(out, vec![TypedValue::null(VariantType::Boolean)]);
    assert_eq!(
        space.call_method(&pump.node_id, &start.node_id, Vec::new()),
        Err(StatusCode::BAD_ARGUMENTS_MISSING)
    );

    let stop = find(&pump.children, "Stop");
    assert!(stop.children.is_empty());
    assert!(space.has_method_callback(&stop.node_id));
}

#[tokio::test]
async fn test_demo_renders_tree() {
    let config = ConfigLoader::new()
        .with_env_prefix("UAFORGE_IT_DEMO_RENDER")
        .load(demo_path())
        .unwrap();
    let (_space, result) = provision(&config).await;
    let text = render_text(&result.unwrap());

    assert!(text.starts_with("Objects (i=85)\n"));
    assert!(text.contains("Plant [folder] ns=2;s=Plant"));
    assert!(text.contains("InputArguments [property]"));
    assert_eq!(text.lines().count(), 14);
}

// =============================================================================
// Failure Tests
// =============================================================================

#[tokio::test]
async fn test_unknown_object_type_fails_with_path() {
    let config = load_config_str(
        r#"
nodes:
  - kind: folder
    name: Plant
    children:
      - kind: object
        name: Pump
        object_type: "ns=2;i=9999"
"#,
        ConfigFormat::Yaml,
    )
    .unwrap();

    let (space, result) = provision(&config).await;
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 2);

    match err {
        BinError::Provisioning { path, source } => {
            assert_eq!(path, "nodes[0].children[0]");
            assert!(matches!(
                source,
                NodesError::NodeCreation(NodeCreationError::Rejected {
                    status: StatusCode::BAD_TYPE_DEFINITION_INVALID,
                    ..
                })
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // The folder created before the failure stays.
    let plant = space.children(&ids::OBJECTS_FOLDER).await.unwrap();
    assert_eq!(plant.len(), 1);
}

#[tokio::test]
async fn test_explicit_id_taken_by_standard_node() {
    let config = load_config_str(
        "nodes:\n  - { kind: folder, name: Plant, node_id: 'ns=2;i=1000' }\n  - { kind: folder, name: Line }\n",
        ConfigFormat::Yaml,
    )
    .unwrap();

    let (space, result) = provision(&config).await;
    let provisioned = result.unwrap();

    // Auto ids skip the one requested explicitly.
    assert_eq!(provisioned.nodes[0].node_id, NodeId::numeric(2, 1000));
    assert_ne!(provisioned.nodes[1].node_id, NodeId::numeric(2, 1000));
    assert!(space.contains(&provisioned.nodes[1].node_id));
}

// =============================================================================
// Structure Tests
// =============================================================================

#[tokio::test]
async fn test_existing_structure_data_type_is_reused() {
    let config = load_config_str(
        "structures:\n  - { name: MethodArgument, data_type: 'i=296' }\nnodes:\n  - { kind: folder, name: Plant }\n",
        ConfigFormat::Yaml,
    )
    .unwrap();

    let provisioner = Provisioner::new(&config).unwrap();
    assert_eq!(
        provisioner.factory().inferencer().registry().lookup("MethodArgument"),
        Some(&ids::ARGUMENT)
    );

    let (_space, result) = provision(&config).await;
    assert!(result.unwrap().structures.is_empty());
}

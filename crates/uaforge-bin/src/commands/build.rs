// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `build` command.

use std::sync::Arc;

use uaforge_config::NodesetConfig;
use uaforge_nodes::{ids, AddressSpace, InMemoryAddressSpace};

use crate::cli::{BuildArgs, Cli, OutputFormat};
use crate::error::{BinError, BinResult};
use crate::provision::{Provisioned, ProvisionedNode, Provisioner};

/// Provisions the nodeset into a fresh in-memory address space and prints
/// the created tree.
pub async fn build(cli: &Cli, config: &NodesetConfig, args: BuildArgs) -> BinResult<()> {
    let space = Arc::new(InMemoryAddressSpace::new());
    let provisioner = Provisioner::new(config)?;
    let provisioned = provisioner
        .provision(Arc::clone(&space) as Arc<dyn AddressSpace>, config)
        .await?;

    match args.format {
        OutputFormat::Text => {
            println!("✓ Provisioned {}", cli.config.display());
            println!();
            print!("{}", render_text(&provisioned));
            println!();
            println!("Summary:");
            println!("  Nodes created: {}", provisioned.node_count());
            println!("  Structures:    {}", provisioned.structures.len());
            println!("  Address space: {} nodes", space.len());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "config_path": cli.config.display().to_string(),
                "namespace": config.namespace,
                "structures": provisioned.structures,
                "nodes": provisioned.nodes,
                "node_count": provisioned.node_count(),
                "address_space_size": space.len(),
            });
            let text = serde_json::to_string_pretty(&output)
                .map_err(|e| BinError::io(format!("failed to render output: {e}")))?;
            println!("{}", text);
        }
    }

    Ok(())
}

/// Renders the provisioned tree below the Objects folder.
///
/// ```text
/// Objects (i=85)
/// └── Plant [folder] ns=2;s=Plant
///     ├── Temperature [variable] ns=2;i=1000
///     └── Reset [method] ns=2;i=1001
/// ```
pub fn render_text(provisioned: &Provisioned) -> String {
    let mut out = String::new();
    out.push_str(&format!("Objects ({})\n", ids::OBJECTS_FOLDER));
    render_children(&mut out, &provisioned.nodes, "");
    out
}

fn render_children(out: &mut String, nodes: &[ProvisionedNode], prefix: &str) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
        out.push_str(&format!(
            "{prefix}{branch}{} [{}] {}\n",
            node.name, node.kind, node.node_id
        ));
        render_children(out, &node.children, &format!("{prefix}{indent}"));
    }
}

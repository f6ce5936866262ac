// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Batch and recursive node deletion.

use std::collections::HashSet;

use crate::error::NodesResult;
use crate::node::Node;
use crate::request::DeleteNodesItem;
use crate::server::AddressSpace;
use crate::status::StatusCode;
use crate::types::NodeId;

/// Deletes `nodes` in one DeleteNodes batch.
///
/// With `recursive`, every descendant reachable through hierarchical
/// references is appended to the batch. A node reachable along two paths
/// appears twice, but is only expanded once, so cycles terminate.
///
/// Statuses are returned as reported, one per batch item, inputs first.
pub async fn delete_nodes(
    server: &dyn AddressSpace,
    nodes: &[Node],
    recursive: bool,
) -> NodesResult<Vec<StatusCode>> {
    let mut targets: Vec<NodeId> = nodes.iter().map(|node| node.node_id().clone()).collect();

    if recursive {
        let mut expanded: HashSet<NodeId> = HashSet::new();
        let mut pending: Vec<NodeId> = targets.iter().rev().cloned().collect();

        while let Some(node_id) = pending.pop() {
            if !expanded.insert(node_id.clone()) {
                continue;
            }
            let children = server.children(&node_id).await?;
            for child in children.iter().rev() {
                if !expanded.contains(child) {
                    pending.push(child.clone());
                }
            }
            targets.extend(children);
        }
    }

    tracing::debug!(
        requested = nodes.len(),
        total = targets.len(),
        recursive = recursive,
        "Deleting nodes"
    );

    let items = targets.into_iter().map(DeleteNodesItem::new).collect();
    let statuses = server.delete_nodes(items).await?;

    let failed = statuses.iter().filter(|status| !status.is_good()).count();
    if failed > 0 {
        tracing::warn!(failed = failed, total = statuses.len(), "Some nodes were not deleted");
    } else {
        tracing::info!(total = statuses.len(), "Deleted nodes");
    }

    Ok(statuses)
}

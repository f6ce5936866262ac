// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use uaforge_config::NodesetConfig;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Collects warnings for an already validated nodeset.
///
/// In strict mode any warning is an error.
pub fn check(config: &NodesetConfig, strict: bool) -> BinResult<Vec<String>> {
    let mut warnings = Vec::new();
    if config.nodes.is_empty() {
        warnings.push("No nodes defined".to_string());
    }
    warnings.extend(config.warnings());

    if strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }
    Ok(warnings)
}

/// Executes the `validate` command.
pub fn validate(cli: &Cli, config: &NodesetConfig, args: ValidateArgs) -> BinResult<()> {
    let warnings = check(config, false)?;

    match args.format {
        OutputFormat::Text => {
            println!("✓ Nodeset is valid: {}", cli.config.display());
            println!();
            println!("Summary:");
            println!("  Namespace:  {}", config.namespace);
            println!("  Structures: {}", config.structures.len());
            println!("  Nodes:      {}", config.node_count());

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": cli.config.display().to_string(),
                "summary": {
                    "namespace": config.namespace,
                    "structure_count": config.structures.len(),
                    "node_count": config.node_count(),
                },
                "warnings": warnings,
            });
            let text = serde_json::to_string_pretty(&output)
                .map_err(|e| BinError::io(format!("failed to render output: {e}")))?;
            println!("{}", text);
        }
    }

    if args.strict {
        check(config, true)?;
    }

    Ok(())
}

// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("uaforge - OPC UA address space builder");
    println!();
    println!("Version Information:");
    println!("  uaforge-bin:    {}", env!("CARGO_PKG_VERSION"));
    println!("  uaforge-nodes:  {}", uaforge_nodes::VERSION);
    println!("  uaforge-config: {}", uaforge_config::VERSION);
    println!();
    println!("Build Information:");
    println!("  Target:         {}", std::env::consts::ARCH);
    println!("  OS:             {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}

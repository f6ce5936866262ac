// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `build`: Provision the nodeset and print the tree
//! - `validate`: Validate the nodeset file
//! - `version`: Show version information

mod build;
mod validate;
mod version;

pub use build::{build, render_text};
pub use validate::{check, validate};
pub use version::version;

use uaforge_config::{ConfigLoader, NodesetConfig};

use crate::cli::{Cli, Commands};
use crate::error::BinResult;
use crate::logging::init_logging;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Build(args) => {
            let config = load(&cli)?;
            init_logging(&cli.effective_logging(&config.logging))?;
            build::build(&cli, &config, args).await
        }
        Commands::Validate(args) => {
            let config = load(&cli)?;
            init_logging(&cli.effective_logging(&config.logging))?;
            validate::validate(&cli, &config, args)
        }
        Commands::Version => version::version(&cli),
    }
}

fn load(cli: &Cli) -> BinResult<NodesetConfig> {
    Ok(ConfigLoader::new().load(&cli.config)?)
}

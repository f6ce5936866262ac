// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! uaforge binary entry point.

use uaforge_bin::cli::Cli;
use uaforge_bin::commands;
use uaforge_bin::error::report_error_and_exit;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    if let Err(error) = commands::execute(cli).await {
        report_error_and_exit(error);
    }
}

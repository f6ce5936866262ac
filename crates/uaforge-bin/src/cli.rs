// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `build`: Provision a nodeset into an in-memory address space (default)
//! - `validate`: Validate a nodeset file
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uaforge_config::{LogFormat, LogLevel, LoggingConfig};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// uaforge - OPC UA address space builder
///
/// Loads a nodeset definition and provisions it through the node factory.
#[derive(Parser, Debug)]
#[command(
    name = "uaforge",
    author = "Sylvex <contact@sylvex.io>",
    version = uaforge_nodes::VERSION,
    about = "OPC UA address space builder",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Nodeset file path
    #[arg(
        short,
        long,
        default_value = "nodeset.yaml",
        env = "UAFORGE_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the nodeset file
    #[arg(short, long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Log format (text, json, compact); overrides the nodeset file
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the uaforge CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Provision the nodeset and print the resulting tree
    ///
    /// This is the default command when no subcommand is specified.
    Build(BuildArgs),

    /// Validate the nodeset file
    ///
    /// Parses and validates the file without provisioning anything.
    Validate(ValidateArgs),

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `build` command.
#[derive(Args, Debug, Default, Clone)]
pub struct BuildArgs {
    /// Output format for the provisioned tree
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Build` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Build(BuildArgs::default()))
    }

    /// Logging settings: flags first, then the nodeset file.
    pub fn effective_logging(&self, file: &LoggingConfig) -> LoggingConfig {
        let level = if self.quiet {
            LogLevel::Warn
        } else if self.verbose {
            LogLevel::Debug
        } else {
            self.log_level.unwrap_or(file.level)
        };

        LoggingConfig {
            level,
            format: self.log_format.unwrap_or(file.format),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["uaforge"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Build(_)));
    }

    #[test]
    fn test_build_command() {
        let cli = Cli::parse_from(["uaforge", "build", "--format", "json"]);
        match cli.command {
            Some(Commands::Build(args)) => assert_eq!(args.format, OutputFormat::Json),
            other => panic!("Expected Build command, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["uaforge", "validate", "--strict"]);
        match cli.command {
            Some(Commands::Validate(args)) => {
                assert!(args.strict);
                assert_eq!(args.format, OutputFormat::Text);
            }
            other => panic!("Expected Validate command, got {other:?}"),
        }
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["uaforge", "-c", "/etc/uaforge/plant.yaml", "version"]);
        assert_eq!(cli.config, PathBuf::from("/etc/uaforge/plant.yaml"));
        assert!(matches!(cli.command, Some(Commands::Version)));
    }

    #[test]
    fn test_log_flags_override_file() {
        let file = LoggingConfig {
            level: LogLevel::Error,
            format: LogFormat::Json,
        };

        let cli = Cli::parse_from(["uaforge", "-l", "debug", "--log-format", "compact"]);
        let logging = cli.effective_logging(&file);
        assert_eq!(logging.level, LogLevel::Debug);
        assert_eq!(logging.format, LogFormat::Compact);

        let cli = Cli::parse_from(["uaforge"]);
        assert_eq!(cli.effective_logging(&file), file);
    }

    #[test]
    fn test_quiet_and_verbose() {
        let file = LoggingConfig::default();
        let cli = Cli::parse_from(["uaforge", "-q", "-l", "trace"]);
        assert_eq!(cli.effective_logging(&file).level, LogLevel::Warn);

        let cli = Cli::parse_from(["uaforge", "-v"]);
        assert_eq!(cli.effective_logging(&file).level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        assert!(Cli::try_parse_from(["uaforge", "-l", "loud"]).is_err());
    }
}

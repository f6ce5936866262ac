// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Nodeset file loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file (format chosen by extension)
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw text
//! 3. Parse YAML, TOML or JSON into [`NodesetConfig`]
//! 4. Apply environment variable overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! UAFORGE_NAMESPACE=3
//! UAFORGE_LOG_LEVEL=debug
//! UAFORGE_LOG_FORMAT=json
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogFormat, LogLevel, NodesetConfig};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "UAFORGE";

// =============================================================================
// ConfigLoader
// =============================================================================

/// Nodeset file loader.
///
/// # Examples
///
/// ```no_run
/// use uaforge_config::loader::ConfigLoader;
///
/// let loader = ConfigLoader::new();
/// let config = loader.load("plant.yaml").unwrap();
/// println!("{} nodes", config.node_count());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply overrides.
    resolve_env_vars: bool,

    /// Whether to validate after loading.
    validate: bool,
}

impl ConfigLoader {
    /// Creates a loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
            validate: true,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Enables or disables validation.
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate = enabled;
        self
    }

    /// The environment variable prefix.
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    /// Loads a nodeset file.
    ///
    /// The format is determined by the file extension:
    /// - `.yaml` or `.yml` - YAML format
    /// - `.toml` - TOML format
    /// - `.json` - JSON format
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<NodesetConfig> {
        let path = path.as_ref();
        info!("Loading nodeset from: {}", path.display());

        let format = ConfigFormat::from_path(path)?;
        let content = self.read_file(path)?;
        let content = self.prepare(&content)?;

        let mut config = parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            ConfigError::Parse { message, line, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
                line,
            },
            other => other,
        })?;

        self.finish(&mut config)?;

        info!("Nodeset loaded successfully");
        debug!(
            namespace = config.namespace,
            structures = config.structures.len(),
            nodes = config.node_count(),
            "Nodeset contents"
        );

        Ok(config)
    }

    /// Loads a nodeset from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<NodesetConfig> {
        let content = self.prepare(content)?;
        let mut config = parse_str(&content, format)?;
        self.finish(&mut config)?;
        Ok(config)
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn prepare(&self, content: &str) -> ConfigResult<String> {
        if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            Ok(content.to_string())
        }
    }

    fn finish(&self, config: &mut NodesetConfig) -> ConfigResult<()> {
        if self.resolve_env_vars {
            self.apply_env_overrides(config)?;
        }
        if self.validate {
            config.validate()?;
        }
        Ok(())
    }

    /// Resolves environment variable placeholders in content.
    ///
    /// Supports `${VAR_NAME}` and `${VAR_NAME:default}`. An unset variable
    /// without a default is left in place.
    fn resolve_env_placeholders(&self, content: &str) -> ConfigResult<String> {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut var_content = String::new();
            let mut found_close = false;
            for c in chars.by_ref() {
                if c == '}' {
                    found_close = true;
                    break;
                }
                var_content.push(c);
            }

            if !found_close {
                result.push_str("${");
                result.push_str(&var_content);
                continue;
            }

            let (var_name, default_value) = match var_content.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (var_content.as_str(), None),
            };

            match (env::var(var_name), default_value) {
                (Ok(value), _) => result.push_str(&value),
                (Err(_), Some(default)) => result.push_str(default),
                (Err(_), None) => {
                    warn!("Environment variable '{}' not found", var_name);
                    result.push_str(&format!("${{{}}}", var_name));
                }
            }
        }

        Ok(result)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut NodesetConfig) -> ConfigResult<()> {
        let name = format!("{}_NAMESPACE", self.env_prefix);
        if let Ok(value) = env::var(&name) {
            config.namespace = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(&name, "expected a namespace index"))?;
            debug!(namespace = config.namespace, "Namespace overridden from environment");
        }

        let name = format!("{}_LOG_LEVEL", self.env_prefix);
        if let Ok(value) = env::var(&name) {
            config.logging.level = value
                .parse::<LogLevel>()
                .map_err(|message| ConfigError::invalid_env_var(&name, message))?;
        }

        let name = format!("{}_LOG_FORMAT", self.env_prefix);
        if let Ok(value) = env::var(&name) {
            config.logging.format = value
                .parse::<LogFormat>()
                .map_err(|message| ConfigError::invalid_env_var(&name, message))?;
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported nodeset file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<NodesetConfig> {
    match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
            let line = e.location().map(|location| location.line());
            ConfigError::Parse {
                path: "<string>".into(),
                message: e.to_string(),
                line,
            }
        }),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<string>".into(),
            message: e.to_string(),
            line: Some(e.line()),
        }),
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads a nodeset file with default settings.
///
/// ```no_run
/// use uaforge_config::loader::load_config;
///
/// let config = load_config("plant.yaml").unwrap();
/// ```
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<NodesetConfig> {
    ConfigLoader::new().load(path)
}

/// Loads a nodeset from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<NodesetConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

//! Configuration for MCP-L schema lookup and validation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (mcpl.toml)
//! - Environment variables (MCPL__*)
//!
//! ## Example config file (mcpl.toml):
//! ```toml
//! [schema]
//! dir = "/opt/mcpl/schema"
//! name = "mcp-l-schema.json"
//! embedded_fallback = true
//!
//! [validation]
//! cache_compiled = false
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::loader::SCHEMA_FILE;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McplConfig {
    /// Where the schema is looked up
    #[serde(default)]
    pub schema: SchemaSourceConfig,

    /// Validation settings
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Schema lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSourceConfig {
    /// Directory searched first; defaults to the crate's own `schema/` directory
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Resource name inside the directory and the embedded bundle
    #[serde(default = "default_schema_name")]
    pub name: String,

    /// Fall back to the schema bundled into the binary
    #[serde(default = "default_true")]
    pub embedded_fallback: bool,
}

/// Validation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Reuse the compiled schema while the schema text is unchanged
    #[serde(default)]
    pub cache_compiled: bool,
}

fn default_schema_name() -> String {
    SCHEMA_FILE.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SchemaSourceConfig {
    fn default() -> Self {
        Self {
            dir: None,
            name: default_schema_name(),
            embedded_fallback: true,
        }
    }
}

/// The `schema/` directory next to this crate's manifest
pub fn installation_schema_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema")
}

impl McplConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["mcpl.toml", ".mcpl.toml", "config/mcpl.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("studio", "ainative", "mcpl") {
            let xdg_config = config_dir.config_dir().join("mcpl.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // MCPL__SCHEMA__DIR, MCPL__VALIDATION__CACHE_COMPILED, ...
        builder = builder.add_source(
            Environment::with_prefix("MCPL")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> std::io::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Directory searched before the embedded bundle
    pub fn schema_dir(&self) -> PathBuf {
        match &self.schema.dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => std::env::current_dir().unwrap_or_default().join(dir),
            None => installation_schema_dir(),
        }
    }
}

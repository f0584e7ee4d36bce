//! Error types for MCP-L schema handling

use thiserror::Error;

/// Result type for MCP-L operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors raised while loading a schema or preparing a message for validation.
///
/// A message that does not conform to the schema is not an error; it is
/// reported as `false` or as a non-empty list of violations.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema not found: {name} (searched: {})", .searched.join(", "))]
    NotFound { name: String, searched: Vec<String> },

    #[error("Malformed schema at {origin}: {reason}")]
    Malformed { origin: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SchemaError {
    /// Whether this error means the schema resource could not be located
    pub fn is_not_found(&self) -> bool {
        matches!(self, SchemaError::NotFound { .. })
    }

    /// Whether this error means the schema resource was found but unusable
    pub fn is_malformed(&self) -> bool {
        matches!(self, SchemaError::Malformed { .. })
    }
}

//! Validation of MCP-L messages against the JSON schema
//!
//! The schema is loaded through the [`ResourceLoader`] on every call, so a
//! missing or broken schema always surfaces as an error and is never
//! mistaken for a valid message. A message that does not conform is a
//! normal result: `false`, or a non-empty list of violations.
//!
//! Violations are formatted as `"<dotted.path>: <description>"`, with `/`
//! standing for the message root.

use jsonschema::{Draft, JSONSchema, ValidationError};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::checksum::Checksum;
use crate::config::McplConfig;
use crate::error::{Result, SchemaError};
use crate::loader::ResourceLoader;

/// A parsed and compiled schema
pub struct LoadedSchema {
    /// Source the schema text came from
    pub origin: String,
    /// Checksum of the schema text
    pub checksum: Checksum,
    /// Parsed schema document
    pub document: Value,
    compiled: Arc<JSONSchema>,
}

impl LoadedSchema {
    /// Whether `instance` satisfies the schema
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.validate(instance).is_ok()
    }

    /// Every violation in `instance`, in validator order
    pub fn errors(&self, instance: &Value) -> Vec<String> {
        match self.compiled.validate(instance) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.map(|e| format_violation(&e)).collect(),
        }
    }
}

impl fmt::Debug for LoadedSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedSchema")
            .field("origin", &self.origin)
            .field("checksum", &self.checksum)
            .finish()
    }
}

/// Validates messages against the MCP-L schema
pub struct SchemaValidator {
    loader: ResourceLoader,
    schema_name: String,
    /// Last compiled schema, keyed by the checksum of its text
    cache: Option<Mutex<Option<(Checksum, Arc<JSONSchema>)>>>,
}

impl SchemaValidator {
    /// Create a validator that reads `mcp-l-schema.json` through `loader`
    pub fn new(loader: ResourceLoader) -> Self {
        Self {
            loader,
            schema_name: crate::loader::SCHEMA_FILE.to_string(),
            cache: None,
        }
    }

    /// Create a validator from configuration
    pub fn from_config(config: &McplConfig) -> Self {
        let validator =
            Self::new(ResourceLoader::from_config(config)).with_schema_name(&config.schema.name);
        if config.validation.cache_compiled {
            validator.with_compiled_cache()
        } else {
            validator
        }
    }

    /// Look up a different resource name
    pub fn with_schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = name.into();
        self
    }

    /// Reuse the compiled schema while the schema text is unchanged.
    ///
    /// The resource is still read on every call.
    pub fn with_compiled_cache(mut self) -> Self {
        self.cache = Some(Mutex::new(None));
        self
    }

    /// Lookup strategies used for the schema resource
    pub fn loader(&self) -> &ResourceLoader {
        &self.loader
    }

    /// Load, decode, parse and compile the schema
    pub fn load_schema(&self) -> Result<LoadedSchema> {
        let resource = self.loader.load(&self.schema_name)?;
        let checksum = Checksum::from_bytes(&resource.contents);

        let text = std::str::from_utf8(&resource.contents).map_err(|e| SchemaError::Malformed {
            origin: resource.origin.clone(),
            reason: format!("not valid UTF-8: {e}"),
        })?;

        let document: Value = serde_json::from_str(text).map_err(|e| SchemaError::Malformed {
            origin: resource.origin.clone(),
            reason: format!("invalid JSON: {e}"),
        })?;

        let compiled = match self.cached(&checksum) {
            Some(compiled) => compiled,
            None => {
                let compiled = Arc::new(compile(&document, &resource.origin)?);
                self.store(&checksum, &compiled);
                compiled
            }
        };

        debug!(origin = %resource.origin, checksum = checksum.short(), "schema loaded");

        Ok(LoadedSchema {
            origin: resource.origin,
            checksum,
            document,
            compiled,
        })
    }

    /// `true` if the message conforms to the schema
    pub fn validate<T: Serialize + ?Sized>(&self, message: &T) -> Result<bool> {
        let schema = self.load_schema()?;
        let instance = serde_json::to_value(message)?;
        let valid = schema.is_valid(&instance);
        debug!(valid, "message validated");
        Ok(valid)
    }

    /// Every violation in the message; empty when the message is valid
    pub fn validation_errors<T: Serialize + ?Sized>(&self, message: &T) -> Result<Vec<String>> {
        let schema = self.load_schema()?;
        let instance = serde_json::to_value(message)?;
        let errors = schema.errors(&instance);
        debug!(violations = errors.len(), "message validated");
        Ok(errors)
    }

    fn cached(&self, checksum: &Checksum) -> Option<Arc<JSONSchema>> {
        let slot = self.cache.as_ref()?.lock().unwrap_or_else(|p| p.into_inner());
        match slot.as_ref() {
            Some((key, compiled)) if key == checksum => {
                debug!(checksum = checksum.short(), "reusing compiled schema");
                Some(Arc::clone(compiled))
            }
            _ => None,
        }
    }

    fn store(&self, checksum: &Checksum, compiled: &Arc<JSONSchema>) {
        if let Some(cache) = &self.cache {
            let mut slot = cache.lock().unwrap_or_else(|p| p.into_inner());
            *slot = Some((checksum.clone(), Arc::clone(compiled)));
        }
    }
}

impl Default for SchemaValidator {
    /// Installation `schema/` directory, then the embedded bundle
    fn default() -> Self {
        Self::from_config(&McplConfig::default())
    }
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("loader", &self.loader)
            .field("schema_name", &self.schema_name)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

/// Validate a message (typed or raw JSON) with the default validator
pub fn validate_message<T: Serialize + ?Sized>(message: &T) -> Result<bool> {
    SchemaValidator::default().validate(message)
}

/// List validation errors with the default validator
pub fn get_validation_errors<T: Serialize + ?Sized>(message: &T) -> Result<Vec<String>> {
    SchemaValidator::default().validation_errors(message)
}

fn compile(document: &Value, origin: &str) -> Result<JSONSchema> {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(document)
        .map_err(|e| SchemaError::Malformed {
            origin: origin.to_string(),
            reason: e.to_string(),
        })
}

fn format_violation(error: &ValidationError<'_>) -> String {
    format!("{}: {}", dotted_path(&error.instance_path.to_string()), error)
}

/// `/behavior_tags/sentiment/confidence` -> `behavior_tags.sentiment.confidence`
fn dotted_path(pointer: &str) -> String {
    match pointer.strip_prefix('/') {
        None => "/".to_string(),
        Some(rest) => rest
            .split('/')
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .collect::<Vec<_>>()
            .join("."),
    }
}

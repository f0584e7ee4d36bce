//! Schema resource lookup
//!
//! A [`ResourceLoader`] asks an ordered list of [`SchemaSource`]s for a
//! schema by name and returns the first hit. The canonical order is the
//! on-disk schema directory first, then the copy bundled into the crate at
//! compile time.
//!
//! Sources hand back raw bytes. A source that fails to read for any reason
//! other than "not here" is logged and skipped; if no source yields the
//! resource the load fails with [`SchemaError::NotFound`]. Once a source has
//! the resource, lookup stops there: bytes that do not decode are reported
//! as malformed by the validator rather than replaced by a later source.

use include_dir::{include_dir, Dir};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::McplConfig;
use crate::error::{Result, SchemaError};

/// File name of the canonical MCP-L schema
pub const SCHEMA_FILE: &str = "mcp-l-schema.json";

/// Schema directory compiled into the crate
static BUNDLED_SCHEMAS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/schema");

/// One strategy for locating a schema resource
pub trait SchemaSource: fmt::Debug + Send + Sync {
    /// Short description used in logs and `NotFound` errors
    fn describe(&self) -> String;

    /// Read the named resource. `Ok(None)` means this source does not have it.
    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>>;
}

/// Reads schemas from a directory on disk
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    /// Look up schemas directly under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory searched by this source
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SchemaSource for FileSystemSource {
    fn describe(&self) -> String {
        format!("dir:{}", self.root.display())
    }

    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.root.join(name)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Reads schemas from a directory embedded with `include_dir!`
#[derive(Clone, Copy)]
pub struct EmbeddedSource {
    dir: &'static Dir<'static>,
}

impl EmbeddedSource {
    /// The schema bundle shipped with this crate
    pub fn bundled() -> Self {
        Self { dir: &BUNDLED_SCHEMAS }
    }
}

impl fmt::Debug for EmbeddedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedSource")
            .field("files", &self.dir.files().count())
            .finish()
    }
}

impl SchemaSource for EmbeddedSource {
    fn describe(&self) -> String {
        "embedded".to_string()
    }

    fn read(&self, name: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.dir.get_file(name).map(|file| file.contents().to_vec()))
    }
}

/// A schema resource as read from one of the sources
#[derive(Debug, Clone)]
pub struct SchemaResource {
    /// Logical name that was requested
    pub name: String,
    /// Which source produced it (see [`SchemaSource::describe`])
    pub origin: String,
    /// Raw schema bytes, not yet decoded
    pub contents: Vec<u8>,
}

/// Ordered schema lookup
#[derive(Debug, Default)]
pub struct ResourceLoader {
    sources: Vec<Box<dyn SchemaSource>>,
}

impl ResourceLoader {
    /// Create a loader with no sources; every load fails with `NotFound`
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory from the config (or the installation directory), then the
    /// bundled copy unless `embedded_fallback` is off
    pub fn from_config(config: &McplConfig) -> Self {
        let mut loader = Self::new().with_source(FileSystemSource::new(config.schema_dir()));
        if config.schema.embedded_fallback {
            loader = loader.with_source(EmbeddedSource::bundled());
        }
        loader
    }

    /// Append a lookup strategy after the existing ones
    pub fn with_source(mut self, source: impl SchemaSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Descriptions of the configured sources, in lookup order
    pub fn sources(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.describe()).collect()
    }

    /// Return the first source's copy of `name`
    pub fn load(&self, name: &str) -> Result<SchemaResource> {
        for source in &self.sources {
            let origin = source.describe();
            match source.read(name) {
                Ok(Some(contents)) => {
                    debug!(name, origin = %origin, "schema resource located");
                    return Ok(SchemaResource {
                        name: name.to_string(),
                        origin,
                        contents,
                    });
                }
                Ok(None) => debug!(name, origin = %origin, "schema resource not present"),
                Err(e) => {
                    warn!(
                        name,
                        origin = %origin,
                        error = %e,
                        "schema lookup failed, trying next source"
                    )
                }
            }
        }

        Err(SchemaError::NotFound {
            name: name.to_string(),
            searched: self.sources(),
        })
    }
}

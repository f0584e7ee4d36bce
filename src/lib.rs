//! MCP-L: Model Context Protocol - Listening Layer
//!
//! Builds messages that annotate a conversational exchange with behavior
//! tags (sentiment, intent mirroring, clarification and follow-up needs,
//! tone guidance, agent feedback) plus optional SSCS compliance metadata,
//! and checks them against the published MCP-L JSON schema.
//!
//! ## Usage
//!
//! ```no_run
//! use mcpl::{MessageBuilder, SchemaValidator};
//!
//! let message = MessageBuilder::new()
//!     .add_sentiment("frustrated", Some(0.85))
//!     .add_clarify_before_execute(
//!         true,
//!         Some("Did you mean X?"),
//!         Some(vec!["X".to_string(), "Y".to_string()]),
//!     )
//!     .build();
//!
//! let validator = SchemaValidator::default();
//! assert!(validator.validate(&message)?);
//! # Ok::<(), mcpl::SchemaError>(())
//! ```
//!
//! ## Schema lookup
//!
//! ```text
//! 1. <schema dir>/mcp-l-schema.json    (config `schema.dir`, default: crate's schema/)
//! 2. embedded schema/mcp-l-schema.json (compiled in, config `schema.embedded_fallback`)
//! ```

pub mod builder;
pub mod checksum;
pub mod config;
pub mod error;
pub mod loader;
pub mod message;
pub mod validator;

pub use builder::MessageBuilder;
pub use checksum::Checksum;
pub use config::McplConfig;
pub use error::{Result, SchemaError};
pub use loader::{
    EmbeddedSource, FileSystemSource, ResourceLoader, SchemaResource, SchemaSource, SCHEMA_FILE,
};
pub use message::{
    AgentFeedback, BehaviorTags, ClarifyBeforeExecute, FollowUpRequired, Message, MirrorIntent,
    Sentiment, SscsCompliance, SuggestedTone,
};
pub use validator::{get_validation_errors, validate_message, LoadedSchema, SchemaValidator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

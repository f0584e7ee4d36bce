//! End-to-end tests: build messages, then validate them against the schema.

use std::fs;

use mcpl::{
    get_validation_errors, validate_message, EmbeddedSource, FileSystemSource, McplConfig, Message,
    MessageBuilder, ResourceLoader, SchemaError, SchemaValidator, SCHEMA_FILE,
};
use rstest::rstest;
use serde_json::{json, Value};
use tempfile::tempdir;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn bundled_validator() -> SchemaValidator {
    SchemaValidator::new(ResourceLoader::new().with_source(EmbeddedSource::bundled()))
}

fn missing_schema_validator() -> (tempfile::TempDir, SchemaValidator) {
    let dir = tempdir().unwrap();
    let loader = ResourceLoader::new().with_source(FileSystemSource::new(dir.path()));
    let validator = SchemaValidator::new(loader);
    (dir, validator)
}

fn full_message() -> Message {
    let mut prefs = serde_json::Map::new();
    prefs.insert("verbosity".to_string(), json!("concise"));

    MessageBuilder::new()
        .add_sentiment("frustrated", Some(0.85))
        .add_mirror_intent("You want the build fixed before the demo", Some(0.7))
        .add_clarify_before_execute(true, Some("Did you mean X?"), Some(strings(&["X", "Y"])))
        .add_follow_up_required(true, Some(strings(&["confirm deploy"])))
        .add_suggested_tone("empathetic", Some("user is under time pressure"))
        .add_agent_feedback(Some("prefers terse replies"), Some(prefs))
        .add_sscs_compliance(Some("bug"), Some("green"), Some("implementation"))
        .build()
}

#[test]
fn test_end_to_end_scenario() {
    let message = MessageBuilder::new()
        .add_sentiment("frustrated", Some(0.85))
        .add_clarify_before_execute(true, Some("Did you mean X?"), Some(strings(&["X", "Y"])))
        .build();

    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        json!({
            "behavior_tags": {
                "sentiment": { "detected": "frustrated", "confidence": 0.85 },
                "clarify_before_execute": {
                    "required": true,
                    "clarification_prompt": "Did you mean X?",
                    "options": ["X", "Y"]
                }
            }
        })
    );

    let validator = bundled_validator();
    assert!(validator.validate(&message).unwrap());
    assert!(validator.validation_errors(&message).unwrap().is_empty());
}

#[test]
fn test_full_message_is_valid() {
    let validator = bundled_validator();
    let message = full_message();
    assert!(validator.validate(&message).unwrap(), "{:?}", validator.validation_errors(&message));
}

#[test]
fn test_out_of_range_confidence_is_invalid() {
    let message = MessageBuilder::new().add_sentiment("frustrated", Some(1.5)).build();

    let validator = bundled_validator();
    assert!(!validator.validate(&message).unwrap());

    let errors = validator.validation_errors(&message).unwrap();
    assert!(!errors.is_empty());
    assert!(
        errors.iter().any(|e| e.starts_with("behavior_tags.sentiment.confidence: ")),
        "errors: {:?}",
        errors
    );
}

#[rstest]
#[case::empty(json!({ "behavior_tags": {} }))]
#[case::missing_tags(json!({}))]
#[case::not_an_object(json!("hello"))]
#[case::unknown_tag(json!({ "behavior_tags": { "mood": { "detected": "ok" } } }))]
#[case::missing_required(json!({ "behavior_tags": { "sentiment": { "confidence": 0.2 } } }))]
#[case::negative_confidence(json!({
    "behavior_tags": { "mirror_intent": { "mirrored_text": "x", "confidence": -0.5 } }
}))]
#[case::wrong_option_type(json!({
    "behavior_tags": { "clarify_before_execute": { "required": true, "options": [1, 2] } }
}))]
#[case::bad_story_type(json!({
    "behavior_tags": {},
    "sscs_compliance": { "story_type": "epic" }
}))]
#[case::valid_compliance(json!({
    "behavior_tags": {},
    "sscs_compliance": { "story_type": "chore", "tdd_phase": "refactor" }
}))]
#[case::bad_preferences(json!({
    "behavior_tags": { "agent_feedback": { "user_preferences": ["a"] } }
}))]
fn test_validate_agrees_with_error_list(#[case] message: Value) {
    let validator = bundled_validator();
    let valid = validator.validate(&message).unwrap();
    let errors = validator.validation_errors(&message).unwrap();
    assert_eq!(valid, errors.is_empty(), "errors: {:?}", errors);
}

#[rstest]
#[case::bad_story_type(
    json!({ "behavior_tags": {}, "sscs_compliance": { "story_type": "epic" } }),
    "sscs_compliance.story_type: "
)]
#[case::missing_required(
    json!({ "behavior_tags": { "suggested_tone": {} } }),
    "behavior_tags.suggested_tone: "
)]
#[case::option_item(
    json!({
        "behavior_tags": { "clarify_before_execute": { "required": true, "options": ["a", 2] } }
    }),
    "behavior_tags.clarify_before_execute.options.1: "
)]
#[case::root(json!({ "sscs_compliance": {} }), "/: ")]
fn test_error_paths(#[case] message: Value, #[case] expected_prefix: &str) {
    let errors = bundled_validator().validation_errors(&message).unwrap();
    assert!(
        errors.iter().any(|e| e.starts_with(expected_prefix)),
        "expected {:?} in {:?}",
        expected_prefix,
        errors
    );
}

#[test]
fn test_missing_schema_is_an_error() {
    let (_dir, validator) = missing_schema_validator();
    let message = MessageBuilder::new().add_sentiment("neutral", None).build();

    assert!(matches!(validator.validate(&message), Err(SchemaError::NotFound { .. })));
    assert!(matches!(
        validator.validation_errors(&message),
        Err(SchemaError::NotFound { .. })
    ));
}

#[test]
fn test_embedded_fallback_can_be_disabled() {
    let dir = tempdir().unwrap();
    let mut config = McplConfig::default();
    config.schema.dir = Some(dir.path().to_path_buf());

    let message = json!({ "behavior_tags": {} });
    assert!(SchemaValidator::from_config(&config).validate(&message).unwrap());

    config.schema.embedded_fallback = false;
    let err = SchemaValidator::from_config(&config).validate(&message).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_undecodable_schema_file_is_malformed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(SCHEMA_FILE), b"{\xff}").unwrap();

    let mut config = McplConfig::default();
    config.schema.dir = Some(dir.path().to_path_buf());
    assert!(config.schema.embedded_fallback);
    let validator = SchemaValidator::from_config(&config);

    let message = json!({ "behavior_tags": {} });
    assert!(validator.validate(&message).unwrap_err().is_malformed());
    assert!(validator.validation_errors(&message).unwrap_err().is_malformed());
}

#[test]
fn test_schema_directory_overrides_bundle() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(SCHEMA_FILE),
        r#"{ "type": "object", "required": ["behavior_tags", "session_id"] }"#,
    )
    .unwrap();

    let mut config = McplConfig::default();
    config.schema.dir = Some(dir.path().to_path_buf());
    let validator = SchemaValidator::from_config(&config);

    let message = MessageBuilder::new().add_sentiment("neutral", None).build();
    let errors = validator.validation_errors(&message).unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("/: "));
    assert!(errors[0].contains("session_id"));
}

#[test]
fn test_custom_schema_name() {
    let dir = tempdir().unwrap();
    let strict = r#"{ "type": "object", "maxProperties": 0 }"#;
    fs::write(dir.path().join("strict.json"), strict).unwrap();

    let loader = ResourceLoader::new().with_source(FileSystemSource::new(dir.path()));
    let validator = SchemaValidator::new(loader).with_schema_name("strict.json");
    assert!(!validator.validate(&json!({ "behavior_tags": {} })).unwrap());
    assert!(validator.validate(&json!({})).unwrap());
}

#[test]
fn test_default_validator_functions() {
    let message = serde_json::to_value(full_message()).unwrap();
    assert!(validate_message(&message).unwrap());
    assert!(get_validation_errors(&message).unwrap().is_empty());

    let invalid = json!({ "behavior_tags": { "follow_up_required": { "required": "maybe" } } });
    assert!(!validate_message(&invalid).unwrap());
    assert_eq!(get_validation_errors(&invalid).unwrap().len(), 1);
}

#[test]
fn test_default_validator_functions_take_typed_messages() {
    let message = full_message();
    assert!(validate_message(&message).unwrap());
    assert!(get_validation_errors(&message).unwrap().is_empty());

    let out_of_range = MessageBuilder::new().add_mirror_intent("x", Some(-1.0)).build();
    assert!(!validate_message(&out_of_range).unwrap());
    let errors = get_validation_errors(&out_of_range).unwrap();
    assert!(errors[0].starts_with("behavior_tags.mirror_intent.confidence: "));
}

#[test]
fn test_version_matches_manifest() {
    assert_eq!(mcpl::VERSION, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_validator_accepts_external_messages() {
    let raw = r#"{
        "behavior_tags": {
            "suggested_tone": { "tone": "technical", "explanation": "because user is frustrated" }
        },
        "sscs_compliance": { "workflow_step": "code review" }
    }"#;

    let value: Value = serde_json::from_str(raw).unwrap();
    let message: Message = serde_json::from_str(raw).unwrap();

    let validator = bundled_validator();
    assert!(validator.validate(&value).unwrap());
    assert!(validator.validate(&message).unwrap());
}

#[test]
fn test_compiled_cache_matches_uncached_results() {
    let mut config = McplConfig::default();
    config.validation.cache_compiled = true;
    let cached = SchemaValidator::from_config(&config);
    let uncached = SchemaValidator::default();

    let message = json!({
        "behavior_tags": {
            "sentiment": { "detected": "excited", "confidence": 3 },
            "agent_feedback": { "context_update": 1 }
        }
    });

    for _ in 0..3 {
        assert_eq!(
            cached.validation_errors(&message).unwrap(),
            uncached.validation_errors(&message).unwrap()
        );
    }
}

//! MCP-L message types
//!
//! A message carries a `behavior_tags` mapping (always present, possibly
//! empty) and an optional `sscs_compliance` block. Every optional field is
//! an `Option` that is left out of the serialized form when `None`, so
//! absent values never show up as `null` keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A complete MCP-L message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Behavior tags keyed by tag name
    #[serde(default)]
    pub behavior_tags: BehaviorTags,
    /// Semantic Seed Coding Standards compliance metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sscs_compliance: Option<SscsCompliance>,
}

impl Message {
    /// Create an empty message (`{"behavior_tags": {}}`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the message carries no tags and no compliance block
    pub fn is_empty(&self) -> bool {
        self.behavior_tags.is_empty() && self.sscs_compliance.is_none()
    }

    /// Render the message as a JSON value
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// The closed set of behavior tags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorTags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_intent: Option<MirrorIntent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarify_before_execute: Option<ClarifyBeforeExecute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_required: Option<FollowUpRequired>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_tone: Option<SuggestedTone>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_feedback: Option<AgentFeedback>,
}

impl BehaviorTags {
    /// Whether no tag has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of tags recorded
    pub fn len(&self) -> usize {
        [
            self.sentiment.is_some(),
            self.mirror_intent.is_some(),
            self.clarify_before_execute.is_some(),
            self.follow_up_required.is_some(),
            self.suggested_tone.is_some(),
            self.agent_feedback.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count()
    }
}

/// Detected user sentiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Detected sentiment (e.g. "frustrated", "excited", "neutral")
    pub detected: String,
    /// Confidence score, expected in 0.0..=1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A rephrasing of the user's intent, used to confirm understanding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirrorIntent {
    pub mirrored_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Whether the agent must ask for clarification before acting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarifyBeforeExecute {
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification_prompt: Option<String>,
    /// Candidate answers offered to the user, in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// Whether follow-up is needed after acting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpRequired {
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_items: Option<Vec<String>>,
}

/// Tone the agent should adopt in its reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedTone {
    /// Suggested tone (e.g. "empathetic", "technical")
    pub tone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Feedback the agent records about the interaction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentFeedback {
    /// Context to carry into future interactions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_update: Option<String>,
    /// Learned user preferences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_preferences: Option<Map<String, Value>>,
}

impl AgentFeedback {
    /// True when neither a context update nor preferences are present
    pub fn is_empty(&self) -> bool {
        self.context_update.is_none() && self.user_preferences.is_none()
    }
}

/// Process metadata: story type, TDD phase and workflow step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SscsCompliance {
    /// "feature", "bug" or "chore"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_type: Option<String>,
    /// "red", "green" or "refactor"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdd_phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_step: Option<String>,
}

impl SscsCompliance {
    /// True when no compliance field is set
    pub fn is_empty(&self) -> bool {
        self.story_type.is_none() && self.tdd_phase.is_none() && self.workflow_step.is_none()
    }
}

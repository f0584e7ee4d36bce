//! Incremental construction of MCP-L messages
//!
//! Setters record one tag each and return the builder so calls can be
//! chained. No value is checked here: an out-of-range confidence or an
//! unknown story type is accepted as-is and left to schema validation.

use serde_json::{Map, Value};
use tracing::trace;

use crate::message::{
    AgentFeedback, ClarifyBeforeExecute, FollowUpRequired, Message, MirrorIntent, Sentiment,
    SscsCompliance, SuggestedTone,
};

/// Builder for MCP-L messages
///
/// ```
/// use mcpl::MessageBuilder;
///
/// let message = MessageBuilder::new()
///     .add_sentiment("frustrated", Some(0.85))
///     .add_suggested_tone("empathetic", None)
///     .build();
///
/// assert_eq!(message.behavior_tags.len(), 2);
/// ```
///
/// `build` hands back a copy. Setters called after `build` change the
/// builder only, never a message that was already returned.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Create a builder holding `{"behavior_tags": {}}`
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue building on top of an existing message
    pub fn from_message(message: Message) -> Self {
        Self { message }
    }

    /// Record detected sentiment
    pub fn add_sentiment(
        &mut self,
        sentiment: impl Into<String>,
        confidence: Option<f64>,
    ) -> &mut Self {
        trace!(tag = "sentiment", "recording behavior tag");
        self.message.behavior_tags.sentiment = Some(Sentiment {
            detected: sentiment.into(),
            confidence,
        });
        self
    }

    /// Record a rephrasing of the user's intent
    pub fn add_mirror_intent(
        &mut self,
        mirrored_text: impl Into<String>,
        confidence: Option<f64>,
    ) -> &mut Self {
        trace!(tag = "mirror_intent", "recording behavior tag");
        self.message.behavior_tags.mirror_intent = Some(MirrorIntent {
            mirrored_text: mirrored_text.into(),
            confidence,
        });
        self
    }

    /// Record whether clarification is needed before execution
    pub fn add_clarify_before_execute(
        &mut self,
        required: bool,
        clarification_prompt: Option<&str>,
        options: Option<Vec<String>>,
    ) -> &mut Self {
        trace!(tag = "clarify_before_execute", "recording behavior tag");
        self.message.behavior_tags.clarify_before_execute = Some(ClarifyBeforeExecute {
            required,
            clarification_prompt: present_str(clarification_prompt),
            options: present_list(options),
        });
        self
    }

    /// Record whether follow-up is needed after execution
    pub fn add_follow_up_required(
        &mut self,
        required: bool,
        follow_up_items: Option<Vec<String>>,
    ) -> &mut Self {
        trace!(tag = "follow_up_required", "recording behavior tag");
        self.message.behavior_tags.follow_up_required = Some(FollowUpRequired {
            required,
            follow_up_items: present_list(follow_up_items),
        });
        self
    }

    /// Record the tone the agent should reply in
    pub fn add_suggested_tone(
        &mut self,
        tone: impl Into<String>,
        explanation: Option<&str>,
    ) -> &mut Self {
        trace!(tag = "suggested_tone", "recording behavior tag");
        self.message.behavior_tags.suggested_tone = Some(SuggestedTone {
            tone: tone.into(),
            explanation: present_str(explanation),
        });
        self
    }

    /// Record agent feedback.
    ///
    /// Unlike the other tags, nothing is recorded when both arguments are
    /// absent; an earlier `agent_feedback` value is then left untouched.
    pub fn add_agent_feedback(
        &mut self,
        context_update: Option<&str>,
        user_preferences: Option<Map<String, Value>>,
    ) -> &mut Self {
        let feedback = AgentFeedback {
            context_update: present_str(context_update),
            user_preferences: user_preferences.filter(|prefs| !prefs.is_empty()),
        };

        if !feedback.is_empty() {
            trace!(tag = "agent_feedback", "recording behavior tag");
            self.message.behavior_tags.agent_feedback = Some(feedback);
        }
        self
    }

    /// Record SSCS compliance metadata. No-op when every argument is absent.
    pub fn add_sscs_compliance(
        &mut self,
        story_type: Option<&str>,
        tdd_phase: Option<&str>,
        workflow_step: Option<&str>,
    ) -> &mut Self {
        let compliance = SscsCompliance {
            story_type: present_str(story_type),
            tdd_phase: present_str(tdd_phase),
            workflow_step: present_str(workflow_step),
        };

        if !compliance.is_empty() {
            trace!("recording sscs compliance");
            self.message.sscs_compliance = Some(compliance);
        }
        self
    }

    /// Return a copy of the message accumulated so far
    pub fn build(&self) -> Message {
        self.message.clone()
    }

    /// Borrow the live message without copying it
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Consume the builder and return its message
    pub fn into_message(self) -> Message {
        self.message
    }
}

fn present_str(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

fn present_list(value: Option<Vec<String>>) -> Option<Vec<String>> {
    value.filter(|items| !items.is_empty())
}

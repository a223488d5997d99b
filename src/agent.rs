use tracing::{debug, info_span};

use crate::errors::AgentResult;
use crate::models::conversation::Conversation;
use crate::models::message::Message;
use crate::providers::base::CompletionProvider;

/// Agent answers a conversation turn with a foundational LLM.
///
/// Model and temperature belong to the agent rather than to the provider, so two agents
/// sharing one provider never see each other's settings.
pub struct Agent<'a> {
    provider: &'a dyn CompletionProvider,
    model: String,
    temperature: f64,
}

impl<'a> Agent<'a> {
    pub fn new<S: Into<String>>(
        provider: &'a dyn CompletionProvider,
        model: S,
        temperature: f64,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    /// Run one turn: send the history plus `user_text`, then record the reply.
    ///
    /// Empty `user_text` still requests a completion from the current history. On failure
    /// the conversation is left exactly as it was.
    pub fn turn(&self, conversation: &mut Conversation, user_text: &str) -> AgentResult<String> {
        let _span = info_span!(
            "turn",
            conversation = conversation.id(),
            model = %self.model
        )
        .entered();

        let pending = (!user_text.is_empty()).then(|| Message::user(user_text));
        let outgoing = conversation.outgoing(pending.as_ref());

        let (reply, usage) = self
            .provider
            .complete(&self.model, self.temperature, &outgoing)?;
        debug!(
            input_tokens = ?usage.input_tokens,
            output_tokens = ?usage.output_tokens,
            "turn complete"
        );

        conversation.commit_turn(pending, Message::assistant(reply.clone()));
        Ok(reply)
    }
}

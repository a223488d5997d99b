use uuid::Uuid;

use super::message::{Message, Role};

/// Smallest history window: one user message and its reply
pub const MIN_WINDOW: usize = 2;

fn create_conversation_id() -> String {
    format!("conv_{}", Uuid::new_v4().simple())
}

/// Ordered message history for one agent.
///
/// Holds at most one system message, and when present it is always first. Turns are
/// committed whole through [`Conversation::commit_turn`], so a failed completion never
/// leaves a dangling user message behind.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: String,
    messages: Vec<Message>,
    window: Option<usize>,
}

impl Conversation {
    /// Start a conversation, seeding it with `system_prompt` unless it is empty
    pub fn new(system_prompt: Option<&str>) -> Self {
        let mut messages = Vec::new();
        if let Some(prompt) = system_prompt.filter(|p| !p.is_empty()) {
            messages.push(Message::system(prompt));
        }
        Self {
            id: create_conversation_id(),
            messages,
            window: None,
        }
    }

    /// Keep at most `max_messages` non-system messages after every turn.
    /// Values below [`MIN_WINDOW`] are raised to it so the latest turn always survives.
    pub fn with_window(mut self, max_messages: usize) -> Self {
        self.window = Some(max_messages.max(MIN_WINDOW));
        self.apply_window();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// The payload for the next completion: current history plus the pending user message
    pub fn outgoing(&self, pending: Option<&Message>) -> Vec<Message> {
        let mut messages = self.messages.clone();
        if let Some(message) = pending {
            messages.push(message.clone());
        }
        messages
    }

    /// Append a completed turn. `user` is `None` when the turn had no user text.
    pub fn commit_turn(&mut self, user: Option<Message>, reply: Message) {
        debug_assert!(user.as_ref().map_or(true, |m| m.role == Role::User));
        debug_assert_eq!(reply.role, Role::Assistant);

        if let Some(message) = user {
            self.messages.push(message);
        }
        self.messages.push(reply);
        self.apply_window();
    }

    fn apply_window(&mut self) {
        let Some(window) = self.window else {
            return;
        };

        let offset = usize::from(self.system_prompt().is_some());
        let mut excess = (self.messages.len() - offset).saturating_sub(window);

        // never leave an assistant reply at the head of the retained history
        while offset + excess < self.messages.len()
            && self.messages[offset + excess].role == Role::Assistant
        {
            excess += 1;
        }

        if excess > 0 {
            self.messages.drain(offset..offset + excess);
        }
    }
}

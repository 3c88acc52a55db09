//! Role-tagged conversation transcript exchanged with the chat model.
//!
//! The first message is always the system instruction. Messages are only
//! ever appended; the sole way to shrink a transcript is [`Transcript::reset`],
//! which drops everything after the system message.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::github::models::PullRequestMetadata;

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Fixed instruction framing the conversation.
    System,
    /// Operator input and injected pull request content.
    User,
    /// Model replies.
    Assistant,
}

impl Role {
    /// Wire label used by chat-completions APIs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// One transcript entry. Content is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Creates a message with an explicit role.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered conversation history anchored on a system message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Starts a transcript holding only the system instruction.
    #[must_use]
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Appends a message.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    /// Appends an assistant message.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    /// Drops every message after the system instruction.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Appends the pull request description and then its title as user
    /// messages.
    pub fn seed(&mut self, metadata: &PullRequestMetadata) {
        self.push_user(metadata.body.as_str());
        self.push_user(metadata.title.as_str());
    }

    /// All messages in order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages, including the system instruction.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the system instruction is never removed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recently appended message.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

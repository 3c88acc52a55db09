//! Chat model integration: the role-tagged transcript and the
//! OpenAI-compatible completions client that consumes it.

pub mod openai;
pub mod transcript;

pub use openai::{ChatCompletionService, OpenAiChatConfig, OpenAiChatService};
pub use transcript::{Message, Role, Transcript};

#[cfg(test)]
pub use openai::MockChatCompletionService;

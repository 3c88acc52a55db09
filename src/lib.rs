//! Prchat library crate: a terminal conversation about a GitHub pull request.
//!
//! The operator picks a repository and pull request, the library fetches the
//! pull request's title, description and diff from GitHub, and relays a
//! role-tagged transcript to an OpenAI-compatible chat-completions API. Replies
//! are rendered from Markdown for the terminal.

pub mod ai;
pub mod config;
pub mod github;
pub mod prompts;
pub mod render;
pub mod session;
pub mod telemetry;

#[cfg(feature = "test-support")]
pub mod test_support;

pub use ai::{ChatCompletionService, OpenAiChatConfig, OpenAiChatService, Transcript};
pub use config::{PrChatConfig, ReviewSettings};
pub use github::{HttpPullRequestGateway, IntakeError, PullRequestGateway, PullRequestLocator};
pub use render::MarkdownRenderer;
pub use session::{ReviewSession, Terminal};

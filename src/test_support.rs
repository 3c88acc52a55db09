//! In-memory doubles for integration tests.
//!
//! Only compiled with the `test-support` feature. The doubles record every
//! call so tests can assert on what the session sent without a network.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use url::Url;

use crate::ai::{ChatCompletionService, Message};
use crate::config::ReviewSettings;
use crate::github::{
    IntakeError, PullRequestGateway, PullRequestLocator, PullRequestMetadata, RepositoryName,
    RepositoryOwner,
};
use crate::render::MarkdownRenderer;
use crate::session::Terminal;

/// Which gateway operation a recorded request used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// JSON metadata request.
    Metadata,
    /// Raw diff request.
    Diff,
}

/// Gateway answering every request with the same metadata and diff.
#[derive(Debug, Default)]
pub struct StaticGateway {
    metadata: PullRequestMetadata,
    diff: String,
    requests: RefCell<Vec<(FetchKind, String)>>,
}

impl StaticGateway {
    /// Serves `metadata` and `diff` for every locator.
    #[must_use]
    pub fn new(metadata: PullRequestMetadata, diff: impl Into<String>) -> Self {
        Self {
            metadata,
            diff: diff.into(),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Requests received so far, as `(kind, url)` pairs.
    #[must_use]
    pub fn requests(&self) -> Vec<(FetchKind, String)> {
        self.requests.borrow().clone()
    }
}

impl PullRequestGateway for StaticGateway {
    fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestMetadata, IntakeError> {
        self.requests
            .borrow_mut()
            .push((FetchKind::Metadata, locator.pull_request_url()));
        Ok(self.metadata.clone())
    }

    fn pull_request_diff(&self, locator: &PullRequestLocator) -> Result<String, IntakeError> {
        self.requests
            .borrow_mut()
            .push((FetchKind::Diff, locator.pull_request_url()));
        Ok(self.diff.clone())
    }
}

/// Chat service replying from a script and recording each transcript sent.
///
/// Once the script runs out, every further call fails with
/// [`IntakeError::Api`].
#[derive(Debug, Default)]
pub struct ScriptedChatService {
    replies: RefCell<VecDeque<String>>,
    requests: RefCell<Vec<Vec<Message>>>,
}

impl ScriptedChatService {
    /// Replies with `replies` in order.
    #[must_use]
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: RefCell::new(replies.into_iter().map(Into::into).collect()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Transcripts received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.borrow().clone()
    }
}

impl ChatCompletionService for ScriptedChatService {
    fn complete(&self, messages: &[Message]) -> Result<String, IntakeError> {
        self.requests.borrow_mut().push(messages.to_vec());
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| IntakeError::Api {
                message: "no scripted reply left".to_owned(),
            })
    }
}

/// Settings for owner `acme` with repositories `svc-a` and `svc-b`, pointed
/// at `api_base`, with warm-up disabled.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] if `api_base` is not a URL.
pub fn sample_settings(api_base: &str) -> Result<ReviewSettings, IntakeError> {
    let github_api_base = Url::parse(api_base).map_err(|error| IntakeError::Configuration {
        message: format!("invalid test API base: {error}"),
    })?;

    Ok(ReviewSettings {
        owner: RepositoryOwner::new("acme")?,
        repositories: vec![RepositoryName::new("svc-a")?, RepositoryName::new("svc-b")?],
        model: "gpt-test".to_owned(),
        github_api_base,
        max_prompt_length: crate::prompts::DEFAULT_MAX_PROMPT_LENGTH,
        fetch_timeout: Duration::from_secs(5),
        warm_up: false,
    })
}

/// Terminal reading `input` and capturing output in memory, without styles.
#[must_use]
pub fn scripted_terminal(input: &str) -> Terminal<&[u8], Vec<u8>> {
    Terminal::new(input.as_bytes(), Vec::new(), MarkdownRenderer::plain())
}

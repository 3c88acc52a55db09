//! Pull request metadata returned by the GitHub API.
//!
//! `ApiPullRequest` is the deserialisation target; it converts into the
//! public [`PullRequestMetadata`] used to seed the conversation.

use serde::Deserialize;

/// Title and description of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestMetadata {
    /// Pull request title.
    pub title: String,
    /// Pull request description. GitHub sends `null` for an empty
    /// description, which is stored as the empty string.
    pub body: String,
}

impl PullRequestMetadata {
    /// Builds metadata from owned strings.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) title: String,
    pub(super) body: Option<String>,
}

impl From<ApiPullRequest> for PullRequestMetadata {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            title: value.title,
            body: value.body.unwrap_or_default(),
        }
    }
}

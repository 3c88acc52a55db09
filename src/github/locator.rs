//! Identity wrappers and request locators for pull request lookups.

use std::fmt;

use url::Url;

use super::error::IntakeError;

/// Default GitHub REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Repository owner (user or organisation) wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Wraps an owner name, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when the name is blank.
    pub fn new(value: &str) -> Result<Self, IntakeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::Configuration {
                message: "account name (user) must not be blank".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Wraps a repository name, rejecting blank values.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when the name is blank.
    pub fn new(value: &str) -> Result<Self, IntakeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IntakeError::Configuration {
                message: "repository names must not be blank".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Operator-supplied pull request identifier.
///
/// The value is passed through as typed, including the empty string; GitHub
/// is left to reject anything that is not a pull request number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetId(String);

impl ChangeSetId {
    /// Wraps the identifier without validation.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ChangeSetId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Parses an API base URL supplied through configuration.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when the value is not an absolute
/// URL.
pub fn parse_api_base(value: &str) -> Result<Url, IntakeError> {
    Url::parse(value.trim()).map_err(|error| IntakeError::Configuration {
        message: format!("GitHub API base '{value}' is invalid: {error}"),
    })
}

/// Everything needed to address one pull request on the GitHub API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
    change_set: ChangeSetId,
}

impl PullRequestLocator {
    /// Builds a locator from its parts.
    #[must_use]
    pub const fn new(
        api_base: Url,
        owner: RepositoryOwner,
        repository: RepositoryName,
        change_set: ChangeSetId,
    ) -> Self {
        Self {
            api_base,
            owner,
            repository,
            change_set,
        }
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request identifier.
    #[must_use]
    pub const fn change_set(&self) -> &ChangeSetId {
        &self.change_set
    }

    /// Path of the pull request resource relative to the API base.
    #[must_use]
    pub fn pull_request_path(&self) -> String {
        format!(
            "repos/{}/{}/pulls/{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.change_set.as_str()
        )
    }

    /// Absolute URL of the pull request resource.
    #[must_use]
    pub fn pull_request_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.as_str().trim_end_matches('/'),
            self.pull_request_path()
        )
    }
}

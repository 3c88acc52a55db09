//! Gateways for loading pull request data from the GitHub REST API.
//!
//! The trait seam lets the session loop run against mocks in tests while
//! [`HttpPullRequestGateway`] performs the real blocking HTTP requests.

mod error_mapping;
mod http_client;

pub use http_client::{
    DEFAULT_FETCH_TIMEOUT, DIFF_MEDIA_TYPE, HttpPullRequestGateway, JSON_MEDIA_TYPE,
};

use crate::github::error::IntakeError;
use crate::github::locator::PullRequestLocator;
use crate::github::models::PullRequestMetadata;

/// Gateway that can load a pull request in its two representations.
#[cfg_attr(test, mockall::automock)]
pub trait PullRequestGateway {
    /// Fetch the pull request title and description.
    ///
    /// # Errors
    ///
    /// Returns an [`IntakeError`] when the request fails or the JSON payload
    /// lacks the expected fields.
    fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestMetadata, IntakeError>;

    /// Fetch the pull request as raw unified-diff text.
    ///
    /// # Errors
    ///
    /// Returns an [`IntakeError`] when the request fails.
    fn pull_request_diff(&self, locator: &PullRequestLocator) -> Result<String, IntakeError>;
}

#[cfg(test)]
mod tests;

//! Blocking reqwest implementation of the pull request gateway.

use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::blocking::{Client, Response};

use crate::github::error::IntakeError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::github::models::{ApiPullRequest, PullRequestMetadata};

use super::PullRequestGateway;
use super::error_mapping::{map_http_error, map_transport_error};

/// Media type selecting the JSON metadata representation.
pub const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Media type selecting the raw unified-diff representation.
pub const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";

/// Connect/read timeout applied to every GitHub request.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Gateway issuing authenticated GET requests with a fixed timeout.
///
/// There are no retries: every failure is returned to the caller.
#[derive(Debug, Clone)]
pub struct HttpPullRequestGateway {
    client: Client,
    authorization: String,
}

impl HttpPullRequestGateway {
    /// Builds a gateway that authenticates with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when the HTTP client cannot be
    /// constructed.
    pub fn new(token: &PersonalAccessToken, timeout: Duration) -> Result<Self, IntakeError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|error| IntakeError::Configuration {
                message: format!("failed to configure GitHub HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            authorization: format!("token {}", token.value()),
        })
    }

    fn fetch(
        &self,
        operation: &str,
        locator: &PullRequestLocator,
        accept: &str,
    ) -> Result<String, IntakeError> {
        let url = locator.pull_request_url();
        tracing::debug!(
            %url,
            repository = locator.repository().as_str(),
            change_set = locator.change_set().as_str(),
            accept,
            "fetching {operation}"
        );

        let response = self
            .client
            .get(url.as_str())
            .header(ACCEPT, accept)
            .header(AUTHORIZATION, self.authorization.as_str())
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .map_err(|error| map_transport_error(operation, &error))?;

        read_success_body(operation, response)
    }
}

fn read_success_body(operation: &str, response: Response) -> Result<String, IntakeError> {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .text()
        .map_err(|error| map_transport_error(operation, &error))?;

    if status.is_success() {
        return Ok(body);
    }

    tracing::warn!(%status, "GitHub {operation} request failed");
    Err(map_http_error(operation, status, &headers, &body))
}

impl PullRequestGateway for HttpPullRequestGateway {
    fn pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<PullRequestMetadata, IntakeError> {
        let body = self.fetch("pull request", locator, JSON_MEDIA_TYPE)?;

        serde_json::from_str::<ApiPullRequest>(&body)
            .map(PullRequestMetadata::from)
            .map_err(|error| IntakeError::Decode {
                what: "pull request metadata",
                message: error.to_string(),
            })
    }

    fn pull_request_diff(&self, locator: &PullRequestLocator) -> Result<String, IntakeError> {
        self.fetch("pull request diff", locator, DIFF_MEDIA_TYPE)
    }
}

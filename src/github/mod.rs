//! GitHub pull request fetching.
//!
//! This module addresses a pull request by account, repository and
//! operator-supplied identifier, and fetches either its JSON metadata or its
//! raw diff. HTTP failures are mapped into [`IntakeError`] variants so callers
//! can report them without exposing reqwest internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod rate_limit;

pub use error::IntakeError;
pub use gateway::{HttpPullRequestGateway, PullRequestGateway};
pub use locator::{
    ChangeSetId, PersonalAccessToken, PullRequestLocator, RepositoryName, RepositoryOwner,
};
pub use models::PullRequestMetadata;
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockPullRequestGateway;

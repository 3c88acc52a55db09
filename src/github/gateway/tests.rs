//! HTTP-level tests for the blocking GitHub gateway against a Wiremock server.

use std::time::Duration;

use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{DIFF_MEDIA_TYPE, HttpPullRequestGateway, JSON_MEDIA_TYPE, PullRequestGateway};
use crate::github::error::IntakeError;
use crate::github::locator::{
    ChangeSetId, PersonalAccessToken, PullRequestLocator, RepositoryName, RepositoryOwner,
    parse_api_base,
};

const PR_PATH: &str = "/repos/acme/svc-a/pulls/42";

struct Harness {
    runtime: Runtime,
    server: MockServer,
}

impl Harness {
    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn locator(&self) -> PullRequestLocator {
        PullRequestLocator::new(
            parse_api_base(&self.server.uri()).expect("mock server URI should parse"),
            RepositoryOwner::new("acme").expect("owner should be valid"),
            RepositoryName::new("svc-a").expect("repository should be valid"),
            ChangeSetId::new("42"),
        )
    }

    fn gateway(&self, timeout: Duration) -> HttpPullRequestGateway {
        let token = PersonalAccessToken::new("ghp_test").expect("token should be valid");
        HttpPullRequestGateway::new(&token, timeout).expect("gateway should build")
    }
}

#[fixture]
fn harness() -> Harness {
    let runtime = Runtime::new().expect("runtime should start");
    let server = runtime.block_on(MockServer::start());
    Harness { runtime, server }
}

#[rstest]
fn pull_request_sends_json_accept_and_token(harness: Harness) {
    harness.mount(
        Mock::given(method("GET"))
            .and(path(PR_PATH))
            .and(header("accept", JSON_MEDIA_TYPE))
            .and(header("authorization", "token ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "number": 42,
                "title": "Add retries",
                "body": "Retries the flaky call."
            })))
            .expect(1),
    );

    let metadata = harness
        .gateway(Duration::from_secs(2))
        .pull_request(&harness.locator())
        .expect("metadata should load");

    assert_eq!(metadata.title, "Add retries");
    assert_eq!(metadata.body, "Retries the flaky call.");
}

#[rstest]
fn pull_request_diff_sends_diff_accept(harness: Harness) {
    let diff = "diff --git a/x b/x\n+added\n";
    harness.mount(
        Mock::given(method("GET"))
            .and(path(PR_PATH))
            .and(header("accept", DIFF_MEDIA_TYPE))
            .respond_with(ResponseTemplate::new(200).set_body_string(diff))
            .expect(1),
    );

    let fetched = harness
        .gateway(Duration::from_secs(2))
        .pull_request_diff(&harness.locator())
        .expect("diff should load");

    assert_eq!(fetched, diff);
}

#[rstest]
fn missing_title_is_a_labelled_decode_error(harness: Harness) {
    harness.mount(
        Mock::given(method("GET"))
            .and(path(PR_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"body": "no title"}))),
    );

    let result = harness
        .gateway(Duration::from_secs(2))
        .pull_request(&harness.locator());

    let Err(IntakeError::Decode { what, message }) = result else {
        panic!("expected Decode error, got {result:?}");
    };
    assert_eq!(what, "pull request metadata");
    assert!(message.contains("title"), "message should name the field: {message}");
}

#[rstest]
fn not_found_maps_to_api_error(harness: Harness) {
    harness.mount(
        Mock::given(method("GET"))
            .and(path(PR_PATH))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            ),
    );

    let result = harness
        .gateway(Duration::from_secs(2))
        .pull_request_diff(&harness.locator());

    assert!(
        matches!(result, Err(IntakeError::Api { .. })),
        "expected Api error, got {result:?}"
    );
}

#[rstest]
fn bad_credentials_map_to_authentication_error(harness: Harness) {
    harness.mount(
        Mock::given(method("GET"))
            .and(path(PR_PATH))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
            ),
    );

    let result = harness
        .gateway(Duration::from_secs(2))
        .pull_request(&harness.locator());

    assert!(
        matches!(result, Err(IntakeError::Authentication { .. })),
        "expected Authentication error, got {result:?}"
    );
}

#[rstest]
fn slow_responses_hit_the_fetch_timeout(harness: Harness) {
    harness.mount(
        Mock::given(method("GET"))
            .and(path(PR_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(2)),
            ),
    );

    let result = harness
        .gateway(Duration::from_millis(100))
        .pull_request_diff(&harness.locator());

    assert!(
        matches!(result, Err(IntakeError::Network { .. })),
        "expected Network error, got {result:?}"
    );
}

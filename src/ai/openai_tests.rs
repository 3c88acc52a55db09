//! Unit tests for the OpenAI-compatible chat adapter.

use std::time::Duration;

use rstest::{fixture, rstest};
use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::ai::transcript::Message;
use crate::github::IntakeError;

use super::{
    ChatCompletionService, ChatContent, OpenAiChatConfig, OpenAiChatService, parse_content_value,
};

struct Server {
    runtime: Runtime,
    mock: MockServer,
}

impl Server {
    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.mock));
    }

    fn service(&self) -> OpenAiChatService {
        OpenAiChatService::new(OpenAiChatConfig::new(
            format!("{}/v1", self.mock.uri()),
            "gpt-x",
            Some("sk-test".to_owned()),
        ))
    }
}

#[fixture]
fn server() -> Server {
    let runtime = Runtime::new().expect("runtime should start");
    let mock = runtime.block_on(MockServer::start());
    Server { runtime, mock }
}

#[fixture]
fn messages() -> Vec<Message> {
    vec![
        Message::system("review code"),
        Message::user("body"),
        Message::user("title"),
    ]
}

fn reply(content: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    }))
}

#[test]
fn parse_content_value_supports_string_and_array() {
    let as_string: ChatContent =
        serde_json::from_value(json!("hello")).expect("string content should decode");
    let as_array: ChatContent = serde_json::from_value(json!([{"text":"first"}, {"text":"second"}]))
        .expect("array content should decode");

    assert_eq!(parse_content_value(&as_string), Some("hello"));
    assert_eq!(parse_content_value(&as_array), Some("first"));
}

#[rstest]
fn complete_requires_api_key(messages: Vec<Message>) {
    let service = OpenAiChatService::new(OpenAiChatConfig::new(
        "http://127.0.0.1:9",
        "gpt-x",
        None,
    ));

    let error = service
        .complete(&messages)
        .expect_err("missing key should be rejected");

    assert_eq!(error, IntakeError::MissingApiKey);
}

#[rstest]
fn complete_posts_model_and_full_transcript(server: Server, messages: Vec<Message>) {
    server.mount(
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(json!({
                "model": "gpt-x",
                "messages": [
                    {"role": "system", "content": "review code"},
                    {"role": "user", "content": "body"},
                    {"role": "user", "content": "title"}
                ]
            })))
            .respond_with(reply(json!("  Looks **good**.\n")))
            .expect(1),
    );

    let text = server
        .service()
        .complete(&messages)
        .expect("completion should succeed");

    assert_eq!(text, "  Looks **good**.\n", "reply should be returned verbatim");
}

#[rstest]
fn non_ok_status_maps_to_api_error(server: Server, messages: Vec<Message>) {
    server.mount(
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(json!({"error": {"message": "slow down"}})),
            ),
    );

    let result = server.service().complete(&messages);

    let Err(IntakeError::Api { message }) = result else {
        panic!("expected Api error, got {result:?}");
    };
    assert!(message.contains("429"), "status should be reported: {message}");
}

#[rstest]
#[case::no_choices(json!({"choices": []}))]
#[case::null_content(json!({"choices": [{"message": {"role": "assistant", "content": null}}]}))]
#[case::missing_choices(json!({"id": "chatcmpl-1"}))]
fn malformed_payloads_are_decode_errors(
    server: Server,
    messages: Vec<Message>,
    #[case] payload: serde_json::Value,
) {
    server.mount(
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payload)),
    );

    let result = server.service().complete(&messages);

    assert!(
        matches!(result, Err(IntakeError::Decode { what: "chat completion response", .. })),
        "expected Decode error, got {result:?}"
    );
}

#[rstest]
fn service_reports_configured_model() {
    let service =
        OpenAiChatService::new(OpenAiChatConfig::new("http://127.0.0.1:9", "gpt-x", None));

    assert_eq!(service.model(), "gpt-x");
}

#[rstest]
fn configured_timeout_bounds_slow_replies(server: Server, messages: Vec<Message>) {
    server.mount(
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(reply(json!("late")).set_delay(Duration::from_secs(2))),
    );
    let service = OpenAiChatService::new(
        OpenAiChatConfig::new(
            format!("{}/v1", server.mock.uri()),
            "gpt-x",
            Some("sk-test".to_owned()),
        )
        .with_timeout(Duration::from_millis(100)),
    );

    let result = service.complete(&messages);

    assert!(
        matches!(result, Err(IntakeError::Network { .. })),
        "expected Network error, got {result:?}"
    );
}

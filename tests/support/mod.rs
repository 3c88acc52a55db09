//! Shared test utilities.

pub mod runtime;

/// Collects the `content` of each message in a recorded chat request body.
///
/// # Panics
///
/// Panics if the body has no `messages` array.
pub fn message_contents(body: &serde_json::Value) -> Vec<String> {
    body.get("messages")
        .and_then(serde_json::Value::as_array)
        .unwrap_or_else(|| panic!("request body should carry messages: {body}"))
        .iter()
        .filter_map(|message| message.get("content").and_then(serde_json::Value::as_str))
        .map(str::to_owned)
        .collect()
}

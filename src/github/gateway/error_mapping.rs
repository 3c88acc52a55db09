//! Maps HTTP failures from the GitHub gateway into [`IntakeError`] variants.

use http::{HeaderMap, StatusCode};

use crate::github::error::IntakeError;
use crate::github::rate_limit::RateLimitInfo;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks whether the response represents rate limiting, based on the status
/// and either the message text or an exhausted `X-RateLimit-Remaining`.
pub(super) fn is_rate_limit_error(
    status: StatusCode,
    message: &str,
    rate_limit: Option<&RateLimitInfo>,
) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    status == StatusCode::FORBIDDEN
        && (message.to_lowercase().contains("rate limit")
            || rate_limit.is_some_and(RateLimitInfo::is_exhausted))
}

/// Pulls the `message` field out of a GitHub JSON error body.
pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> IntakeError {
    let message = extract_github_message(body).unwrap_or_else(|| "unknown error".to_owned());
    let rate_limit = RateLimitInfo::from_headers(headers);

    if is_rate_limit_error(status, &message, rate_limit.as_ref()) {
        let reset_hint = rate_limit.map_or_else(String::new, |info| {
            format!(" (resets in {}s)", info.seconds_until_reset())
        });
        return IntakeError::RateLimitExceeded {
            rate_limit,
            message: format!("{operation} failed: {message}{reset_hint}"),
        };
    }

    if is_auth_failure(status) {
        IntakeError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else {
        IntakeError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> IntakeError {
    IntakeError::Network {
        message: format!("{operation} failed: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, HeaderValue, StatusCode};
    use rstest::rstest;

    use super::{IntakeError, map_http_error};

    fn exhausted_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("0"));
        headers
    }

    #[rstest]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, r#"{"message":"Bad credentials"}"#, "Authentication")]
    #[case::forbidden(StatusCode::FORBIDDEN, r#"{"message":"Resource not accessible"}"#, "Authentication")]
    #[case::rate_limited_message(
        StatusCode::FORBIDDEN,
        r#"{"message":"API rate limit exceeded for 1.2.3.4"}"#,
        "RateLimitExceeded"
    )]
    #[case::too_many_requests(StatusCode::TOO_MANY_REQUESTS, "", "RateLimitExceeded")]
    #[case::not_found(StatusCode::NOT_FOUND, r#"{"message":"Not Found"}"#, "Api")]
    #[case::unparseable_body(StatusCode::BAD_GATEWAY, "<html>", "Api")]
    fn maps_status_to_variant(
        #[case] status: StatusCode,
        #[case] body: &str,
        #[case] expected: &str,
    ) {
        let error = map_http_error("fetch", status, &HeaderMap::new(), body);

        let actual = match error {
            IntakeError::Authentication { .. } => "Authentication",
            IntakeError::RateLimitExceeded { .. } => "RateLimitExceeded",
            IntakeError::Api { .. } => "Api",
            _ => "other",
        };
        assert_eq!(actual, expected, "unexpected mapping for {status}");
    }

    #[rstest]
    fn exhausted_headers_mark_forbidden_as_rate_limited() {
        let error = map_http_error(
            "fetch",
            StatusCode::FORBIDDEN,
            &exhausted_headers(),
            r#"{"message":"Forbidden"}"#,
        );

        let IntakeError::RateLimitExceeded { rate_limit, .. } = error else {
            panic!("expected RateLimitExceeded, got {error:?}");
        };
        assert_eq!(rate_limit.map(|info| info.remaining()), Some(0));
    }

    #[rstest]
    fn api_error_message_includes_github_message() {
        let error = map_http_error(
            "pull request",
            StatusCode::NOT_FOUND,
            &HeaderMap::new(),
            r#"{"message":"Not Found"}"#,
        );

        assert!(
            error.to_string().contains("Not Found"),
            "message should carry GitHub detail: {error}"
        );
    }
}

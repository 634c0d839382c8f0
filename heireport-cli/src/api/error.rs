//! Network and server failures

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not logged in: run `heireport auth login` first")]
    Unauthenticated,

    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    /// Build a server error from a non-success response body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthenticated;
        }
        ApiError::Server {
            status: status.as_u16(),
            message: server_message(status, body),
        }
    }
}

/// Pull the human-readable message out of an error body.
///
/// Looks at `message`, then `error`, then the first entry of `errors`
/// (either `{"field": ["msg"]}` or `["msg"]`), and falls back to the raw body
/// or the status text.
pub fn server_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed.starts_with('<') {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            trimmed.to_string()
        }
    };

    let json: serde_json::Value = match serde_json::from_str(body) {
        Ok(json) => json,
        Err(_) => return fallback(),
    };

    if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
        return message.to_string();
    }
    if let Some(error) = json.get("error").and_then(|e| e.as_str()) {
        return error.to_string();
    }

    let first_error = match json.get("errors") {
        Some(serde_json::Value::Object(map)) => map.iter().next().map(|(field, msgs)| {
            let msg = first_string(msgs).unwrap_or_default();
            format!("{}: {}", field, msg)
        }),
        Some(other) => first_string(other),
        None => None,
    };

    first_error.unwrap_or_else(fallback)
}

fn first_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => items.first().and_then(first_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field_wins() {
        let body = r#"{"message":"The name field is required.","errors":{"name":["required"]}}"#;
        assert_eq!(
            server_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "The name field is required."
        );
    }

    #[test]
    fn test_errors_map_first_entry() {
        let body = r#"{"errors":{"student_id":["has already been taken"]}}"#;
        assert_eq!(
            server_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "student_id: has already been taken"
        );
    }

    #[test]
    fn test_non_json_and_html_bodies() {
        assert_eq!(
            server_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Internal Server Error"
        );
        assert_eq!(
            server_message(StatusCode::BAD_GATEWAY, "upstream timed out"),
            "upstream timed out"
        );
    }

    #[test]
    fn test_unauthorized_maps_to_unauthenticated() {
        assert!(matches!(
            ApiError::from_response(StatusCode::UNAUTHORIZED, "{}"),
            ApiError::Unauthenticated
        ));
        assert!(matches!(
            ApiError::from_response(StatusCode::CONFLICT, r#"{"error":"duplicate"}"#),
            ApiError::Server { status: 409, .. }
        ));
    }
}

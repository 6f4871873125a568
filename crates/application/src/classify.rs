//! Failure classification for completed and failed requests.

use lumen_domain::ResponseSpec;
use serde::Deserialize;

use crate::error::SessionError;
use crate::ports::TransportError;

/// What a completed response means for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 2xx: pass the response through.
    Success,
    /// The credential was rejected; the refresh protocol may run, at most
    /// once per request.
    Unauthorized,
    /// Any other failure, with a normalized message.
    Failure(SessionError),
}

/// Shape servers commonly use for error bodies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Maps a transport failure (no response received) to a session error.
#[must_use]
pub fn classify_transport(error: &TransportError) -> SessionError {
    match error {
        TransportError::Unreachable(message) => SessionError::Unreachable {
            message: message.clone(),
        },
        TransportError::Timeout { .. } => SessionError::Unreachable {
            message: error.to_string(),
        },
        TransportError::InvalidRequest(message) | TransportError::Other(message) => {
            SessionError::Transport {
                message: message.clone(),
            }
        }
    }
}

/// Judges a completed response.
#[must_use]
pub fn classify_response(response: &ResponseSpec) -> Classification {
    if response.is_success() {
        Classification::Success
    } else if response.is_unauthorized() {
        Classification::Unauthorized
    } else {
        Classification::Failure(SessionError::Api {
            status: response.status,
            message: failure_message(response),
        })
    }
}

/// Extracts a human-readable message from a failed response.
///
/// Precedence: JSON `message` field, JSON `error` field, the raw body text,
/// then a generic status fallback.
#[must_use]
pub fn failure_message(response: &ResponseSpec) -> String {
    if let Ok(body) = response.json::<ErrorBody>() {
        if let Some(message) = body
            .message
            .or(body.error)
            .filter(|m| !m.trim().is_empty())
        {
            return message;
        }
    }

    let text = response.text();
    let text = text.trim();
    if text.is_empty() {
        format!("request failed with status {}", response.status)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn response(status: u16, body: &str) -> ResponseSpec {
        ResponseSpec::new(status, HashMap::new(), body.as_bytes().to_vec())
    }

    #[test]
    fn test_success_and_unauthorized() {
        assert_eq!(
            classify_response(&response(200, "")),
            Classification::Success
        );
        assert_eq!(
            classify_response(&response(401, "")),
            Classification::Unauthorized
        );
    }

    #[test]
    fn test_json_message_field_wins() {
        let classified = classify_response(&response(
            422,
            r#"{"message":"name already in use","error":"conflict"}"#,
        ));
        assert_eq!(
            classified,
            Classification::Failure(SessionError::Api {
                status: 422,
                message: "name already in use".to_string(),
            })
        );
    }

    #[test]
    fn test_json_error_field_is_second_choice() {
        let classified = classify_response(&response(500, r#"{"error":"database offline"}"#));
        assert_eq!(
            classified,
            Classification::Failure(SessionError::Api {
                status: 500,
                message: "database offline".to_string(),
            })
        );
    }

    #[test]
    fn test_plain_text_body_passes_through() {
        assert_eq!(
            failure_message(&response(502, "upstream gateway fell over")),
            "upstream gateway fell over"
        );
    }

    #[test]
    fn test_empty_body_gets_generic_fallback() {
        assert_eq!(
            failure_message(&response(503, "  ")),
            "request failed with status 503"
        );
    }

    #[test]
    fn test_transport_mapping() {
        let unreachable = classify_transport(&TransportError::Unreachable(
            "connection refused".to_string(),
        ));
        assert!(matches!(unreachable, SessionError::Unreachable { .. }));

        let timeout = classify_transport(&TransportError::Timeout { timeout_ms: 30_000 });
        assert!(matches!(timeout, SessionError::Unreachable { .. }));

        let invalid = classify_transport(&TransportError::InvalidRequest("bad path".to_string()));
        assert_eq!(
            invalid,
            SessionError::Transport {
                message: "bad path".to_string()
            }
        );
    }
}

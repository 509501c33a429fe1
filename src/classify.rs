//! Turns a failed exchange into exactly one [`Error`].

use http::StatusCode;
use serde::Deserialize;

use crate::rate_limit::{self, RateLimitInfo};
use crate::{Error, RawResponse, DEFAULT_RESPONSE_ERROR_MESSAGE};

/// The body Harvest sends when it can explain a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorPayload {
    /// Parses an error payload. Only a JSON object counts; an empty body,
    /// plain text or an array does not.
    pub fn parse(body: &[u8]) -> serde_json::Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(body)?;
        serde_json::from_value(serde_json::Value::Object(object))
    }
}

/// Classifies a response the calling operation does not accept.
///
/// In order:
/// 1. `404` is [`Error::NotFound`], message from the payload or the default.
/// 2. A throttled response (see [`rate_limit::is_rate_limited`]) is
///    [`Error::RateLimitReached`] with the parsed wait hint.
/// 3. A 2xx the operation did not expect is [`Error::UnexpectedStatus`].
/// 4. Any other status with an error payload is [`Error::ResponseError`].
/// 5. Any other status without one is [`Error::DeserializationFailed`]; the
///    server did not say why, so no classification is invented.
pub fn classify(response: &RawResponse) -> Error {
    let status = response.status;
    let payload = ErrorPayload::parse(&response.body);

    let error = if status == StatusCode::NOT_FOUND {
        Error::not_found(payload.ok().and_then(|p| p.message))
    } else if rate_limit::is_rate_limited(status, &response.headers) {
        let info = RateLimitInfo::from_headers(&response.headers);
        Error::rate_limit_reached(payload.ok().and_then(|p| p.message), info)
    } else if status.is_success() {
        Error::UnexpectedStatus {
            status,
            raw_response: response.text(),
        }
    } else {
        match payload {
            Ok(payload) => Error::ResponseError {
                status,
                message: payload
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_RESPONSE_ERROR_MESSAGE.to_string()),
            },
            Err(e) => Error::DeserializationFailed {
                raw_response: response.text(),
                serde_error: e.to_string(),
                status,
            },
        }
    };

    if status.is_client_error() {
        tracing::error!(status = status.as_u16(), error = %error, "Client error (4xx)");
    } else if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), error = %error, "Server error (5xx)");
    } else {
        tracing::warn!(status = status.as_u16(), error = %error, "Unexpected response status");
    }

    error
}

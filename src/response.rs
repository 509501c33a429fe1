//! One completed HTTP exchange, as seen by the classifier and the codec.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A raw response: status, headers and the unread body bytes.
///
/// # Examples
///
/// ```
/// # use harvest::RawResponse;
/// # use http::{HeaderMap, HeaderValue, StatusCode};
/// # use std::time::Duration;
/// let mut headers = HeaderMap::new();
/// headers.insert("location", HeaderValue::from_static("/projects/42"));
///
/// let response = RawResponse::new(StatusCode::CREATED, headers, Vec::new(), Duration::ZERO);
/// assert_eq!(response.location_id(), Some(42));
/// ```
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The response body.
    pub body: Vec<u8>,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>, latency: Duration) -> Self {
        Self {
            status,
            headers,
            body,
            latency,
        }
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The identifier in the `Location` header: its last path segment parsed
    /// as an integer.
    ///
    /// Both `/projects/42` and `https://acme.harvestapp.com/projects/42` give
    /// `42`. A missing header or a non-numeric segment gives `None`.
    pub fn location_id(&self) -> Option<u64> {
        let location = self.header(http::header::LOCATION.as_str())?;
        let path = location.split(['?', '#']).next()?;
        path.trim_end_matches('/').rsplit('/').next()?.parse().ok()
    }
}

//! Request metadata and its conversion into an `http::Request`.

use http::{header, HeaderMap, HeaderValue, Method, Request};
use url::Url;

use crate::{params::Params, Error, Result};

/// Media type used for both request and response bodies.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Everything needed to issue one API request.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path relative to the base URL (`"people"`, `"people/7"`).
    pub path: String,

    /// Query parameters; empty parameters add no `?` to the URL.
    pub params: Params,

    /// Encoded envelope body, if the request has one.
    pub body: Option<Vec<u8>>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Params::new(),
            body: None,
        }
    }

    /// Sets the query parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Resolves the path against `base_url`, appending encoded parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the path does not form a valid URL.
    pub fn url(&self, base_url: &Url) -> Result<Url> {
        let mut url = base_url.join(self.path.trim_start_matches('/'))?;
        if !self.params.is_empty() {
            url.set_query(Some(&self.params.encode()));
        }
        Ok(url)
    }

    /// Builds the `http::Request` sent to the transport.
    ///
    /// `Content-Type` and `Accept` are always JSON; `default_headers` are
    /// added on top and may override neither.
    pub fn into_request(
        self,
        base_url: &Url,
        default_headers: &HeaderMap,
    ) -> Result<Request<Vec<u8>>> {
        let url = self.url(base_url)?;

        let mut builder = Request::builder().method(self.method).uri(url.as_str());
        if let Some(headers) = builder.headers_mut() {
            headers.extend(default_headers.clone());
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
            headers.insert(header::ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        }

        builder
            .body(self.body.unwrap_or_default())
            .map_err(|e| Error::ConfigurationError(format!("Invalid request: {}", e)))
    }
}

//! Error types for Harvest API calls.
//!
//! Every call returns either its result or exactly one [`Error`]. The variants
//! separate what the server explained (not found, rate limited, a business-rule
//! message) from what went wrong on the way (transport failures, undecodable
//! bodies, a broken identifier contract).

use crate::rate_limit::RateLimitInfo;
use http::StatusCode;
use std::time::Duration;

/// Boxed error reported by a custom [`Transport`](crate::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Message used when a 404 response carries no explanation.
pub const DEFAULT_NOT_FOUND_MESSAGE: &str = "Not found";

/// Message used when a rate-limited response carries no explanation.
pub const DEFAULT_RATE_LIMIT_MESSAGE: &str = "Rate limit reached";

/// Message used when an error payload decodes but has no `message` field.
pub const DEFAULT_RESPONSE_ERROR_MESSAGE: &str = "Response error";

/// The main error type for Harvest API calls.
///
/// Prefer the capability checks ([`Error::is_not_found`],
/// [`Error::is_rate_limit_reached`], [`Error::is_retryable`]) over matching on
/// variants when all you need is the classification.
///
/// # Examples
///
/// ```no_run
/// use harvest::{Api, Error, User};
///
/// # async fn example() -> Result<(), Error> {
/// let api = Api::builder().subdomain("acme")?.build()?;
/// let users = api.endpoint("people");
///
/// match users.find::<User>(999, None).await {
///     Ok(user) => println!("found {}", user.email),
///     Err(e) if e.is_not_found() => println!("no such user"),
///     Err(e) if e.is_rate_limit_reached() => {
///         println!("slow down, retry after {:?}", e.retry_after());
///     }
///     Err(e) => return Err(e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error from the reqwest transport (connection refused,
    /// DNS failure, broken body stream).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The transport gave up waiting for the response.
    #[error("Request timed out")]
    Timeout,

    /// A custom transport failed to complete the exchange.
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The requested resource does not exist.
    #[error("{message}")]
    NotFound {
        /// Server supplied message, or [`DEFAULT_NOT_FOUND_MESSAGE`].
        message: String,
    },

    /// The account exceeded its request quota.
    ///
    /// This is the only classification that is safe to retry after waiting.
    #[error("{message}")]
    RateLimitReached {
        /// Server supplied message, or [`DEFAULT_RATE_LIMIT_MESSAGE`].
        message: String,
        /// How long the server asked us to wait, if it said.
        retry_after: Option<Duration>,
        /// Everything parsed from the rate limit headers.
        rate_limit_info: RateLimitInfo,
    },

    /// The server rejected the request and explained why.
    #[error("{message}")]
    ResponseError {
        /// The HTTP status code
        status: StatusCode,
        /// The `message` field of the error payload
        message: String,
    },

    /// The server answered with a status the operation does not accept and
    /// gave no error payload.
    #[error("Unexpected status {status}: {raw_response}")]
    UnexpectedStatus {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// Failed to decode a response body, either the envelope itself, the
    /// resource inside it, or an error body that is not an error payload.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// Failed to encode a resource into its request envelope.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// A `201 Created` response did not carry a parseable identifier in its
    /// `Location` header.
    #[error("Bad request: no resource id in location {location:?}")]
    MissingIdentifier {
        /// The `Location` header as received, if any.
        location: Option<String>,
    },

    /// Invalid configuration was provided.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided or produced.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    pub(crate) fn not_found(message: Option<String>) -> Self {
        Error::NotFound {
            message: non_empty_or(message, DEFAULT_NOT_FOUND_MESSAGE),
        }
    }

    pub(crate) fn rate_limit_reached(message: Option<String>, info: RateLimitInfo) -> Self {
        Error::RateLimitReached {
            message: non_empty_or(message, DEFAULT_RATE_LIMIT_MESSAGE),
            retry_after: info.delay(),
            rate_limit_info: info,
        }
    }

    /// Returns `true` if the resource asked for does not exist.
    ///
    /// ```
    /// use harvest::Error;
    ///
    /// let err = Error::NotFound { message: "Not found".to_string() };
    /// assert!(err.is_not_found());
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns `true` if the server throttled the request.
    pub fn is_rate_limit_reached(&self) -> bool {
        matches!(self, Error::RateLimitReached { .. })
    }

    /// Returns `true` if the failure is temporary and the same call may
    /// succeed later.
    ///
    /// Only [`Error::RateLimitReached`] qualifies. The library never retries
    /// on its own; this is a hint for the caller's policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimitReached { .. } => true,
            Error::Network(_)
            | Error::Timeout
            | Error::Transport(_)
            | Error::NotFound { .. }
            | Error::ResponseError { .. }
            | Error::UnexpectedStatus { .. }
            | Error::DeserializationFailed { .. }
            | Error::SerializationFailed(_)
            | Error::MissingIdentifier { .. }
            | Error::ConfigurationError(_)
            | Error::InvalidUrl(_) => false,
        }
    }

    /// Returns how long to wait before retrying a rate-limited call.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimitReached { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Returns the human readable message the server supplied (or its
    /// documented default) for classified failures.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::NotFound { message }
            | Error::RateLimitReached { message, .. }
            | Error::ResponseError { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Error::ResponseError { status, .. }
            | Error::UnexpectedStatus { status, .. }
            | Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::UnexpectedStatus { raw_response, .. }
            | Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

fn non_empty_or(message: Option<String>, default: &str) -> String {
    match message {
        Some(message) if !message.is_empty() => message,
        _ => default.to_string(),
    }
}

/// A specialized `Result` type for Harvest API calls.
pub type Result<T> = std::result::Result<T, Error>;

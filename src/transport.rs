//! The single capability the engine needs from an HTTP stack.

use async_trait::async_trait;
use http::{Request, Response};

use crate::{Error, Result};

/// Sends one request and returns the complete response.
///
/// Authentication, connection pooling, timeouts and cancellation are all the
/// transport's business. The engine only calls [`Transport::send`].
///
/// Implementations should report their own failures as
/// [`Error::Transport`]; the `reqwest` implementation uses
/// [`Error::Network`] and [`Error::Timeout`].
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use harvest::{Result, Transport};
/// use http::{Request, Response, StatusCode};
///
/// struct AlwaysNotFound;
///
/// #[async_trait]
/// impl Transport for AlwaysNotFound {
///     async fn send(&self, _request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
///         let mut response = Response::new(Vec::new());
///         *response.status_mut() = StatusCode::NOT_FOUND;
///         Ok(response)
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}

#[async_trait]
impl Transport for reqwest::Client {
    async fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let request = reqwest::Request::try_from(request).map_err(map_reqwest_error)?;
        let response = self.execute(request).await.map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        let mut converted = Response::new(body.to_vec());
        *converted.status_mut() = status;
        *converted.headers_mut() = headers;
        Ok(converted)
    }
}

fn map_reqwest_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(error)
    }
}

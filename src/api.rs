//! The generic CRUD engine.
//!
//! [`Api`] owns the transport and base URL; [`Endpoint`] binds it to one
//! resource path and implements list, find, create, update, delete and
//! toggle for any [`Resource`] type. Every operation is a single exchange:
//! nothing is retried, cached or batched here.

use base64::Engine as _;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::{
    classify::classify, envelope, metadata::RequestMetadata, params::Params, Error, RawResponse,
    Resource, Result, Toggle, Transport,
};

const HOSTED_BASE_URL_TEMPLATE: &str = "https://{}.harvestapp.com/";

/// A configured connection to one Harvest account.
///
/// Cheap to clone; clones share the transport.
///
/// # Examples
///
/// ```no_run
/// use harvest::{Api, Params, User};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), harvest::Error> {
/// let api = Api::builder()
///     .subdomain("acme")?
///     .basic_auth("me@example.com", "secret")?
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let people = api.endpoint("people");
/// let mut params = Params::new();
/// params.page(1);
/// let users: Vec<User> = people.all(Some(&params)).await?;
/// println!("{} users", users.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Api {
    inner: Arc<ApiInner>,
}

struct ApiInner {
    transport: Box<dyn Transport>,
    base_url: Url,
    default_headers: HeaderMap,
}

impl Api {
    /// Creates a new `ApiBuilder` for configuring an API connection.
    pub fn builder() -> ApiBuilder {
        ApiBuilder::new()
    }

    /// The base URL every path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Binds the engine to one resource path such as `"people"`.
    pub fn endpoint(&self, path: impl Into<String>) -> Endpoint {
        Endpoint {
            api: self.clone(),
            path: path.into().trim_matches('/').to_string(),
        }
    }

    /// Sends one request and reads the whole response.
    ///
    /// Transport failures are returned as they are; the status code is not
    /// inspected here.
    pub async fn execute(&self, metadata: RequestMetadata) -> Result<RawResponse> {
        let method = metadata.method.clone();
        let request = metadata.into_request(&self.inner.base_url, &self.inner.default_headers)?;

        tracing::debug!(
            method = %method,
            url = %request.uri(),
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let response = match self.inner.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, method = %method, "Request failed");
                return Err(e);
            }
        };
        let latency = start_time.elapsed();

        let (parts, body) = response.into_parts();
        tracing::info!(
            status = parts.status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        Ok(RawResponse::new(parts.status, parts.headers, body, latency))
    }
}

/// The CRUD engine bound to one resource path.
///
/// The resource type is chosen per call, so one endpoint value can serve
/// any type whose envelope the path speaks.
#[derive(Clone)]
pub struct Endpoint {
    api: Api,
    path: String,
}

impl Endpoint {
    /// The resource path, without leading or trailing slashes.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn member_path(&self, id: u64) -> String {
        format!("{}/{}", self.path, id)
    }

    /// Lists every resource at the endpoint.
    ///
    /// Any 2xx status is decoded as an array of envelopes; anything else is
    /// classified.
    pub async fn all<T>(&self, params: Option<&Params>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let metadata = with_params(RequestMetadata::new(Method::GET, &self.path), params);
        let response = self.api.execute(metadata).await?;

        if !response.status.is_success() {
            return Err(classify(&response));
        }

        envelope::decode_list_into(&response.body).map_err(|e| decode_error(&response, e))
    }

    /// Fetches the resource with the given id.
    ///
    /// A `404` is reported as [`Error::NotFound`] with the default message
    /// without reading the body.
    pub async fn find<T>(&self, id: u64, params: Option<&Params>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let metadata = with_params(
            RequestMetadata::new(Method::GET, self.member_path(id)),
            params,
        );
        let response = self.api.execute(metadata).await?;

        match response.status {
            StatusCode::NOT_FOUND => {
                tracing::debug!(path = %self.path, id, "Resource not found");
                Err(Error::not_found(None))
            }
            StatusCode::OK => {
                envelope::decode_into(&response.body).map_err(|e| decode_error(&response, e))
            }
            _ => Err(classify(&response)),
        }
    }

    /// Creates `resource` and stores the server-issued id on it.
    ///
    /// The id comes from the `Location` header of the `201 Created` response.
    /// A `201` without a parseable id is [`Error::MissingIdentifier`] and
    /// leaves the resource untouched.
    pub async fn create<T>(&self, resource: &mut T) -> Result<u64>
    where
        T: Resource,
    {
        let body = encode(resource)?;
        let metadata = RequestMetadata::new(Method::POST, &self.path).with_body(body);
        let response = self.api.execute(metadata).await?;

        if response.status != StatusCode::CREATED {
            return Err(classify(&response));
        }

        match response.location_id() {
            Some(id) => {
                resource.set_id(id);
                Ok(id)
            }
            None => {
                let location = response
                    .header(http::header::LOCATION.as_str())
                    .map(str::to_string);
                tracing::error!(
                    location = ?location,
                    path = %self.path,
                    "Created resource has no id"
                );
                Err(Error::MissingIdentifier { location })
            }
        }
    }

    /// Saves `resource` under its current id.
    pub async fn update<T>(&self, resource: &T) -> Result<()>
    where
        T: Resource,
    {
        self.send_member(Method::PUT, resource).await
    }

    /// Deletes the resource with `resource`'s id.
    pub async fn delete<T>(&self, resource: &T) -> Result<()>
    where
        T: Resource,
    {
        self.send_member(Method::DELETE, resource).await
    }

    /// Flips the resource's active state on the server.
    ///
    /// On success the same flip is applied to `resource` without fetching it
    /// again, and the new state is returned. On failure `resource` is left
    /// as it was.
    pub async fn toggle<T>(&self, resource: &mut T) -> Result<bool>
    where
        T: Toggle,
    {
        self.send_member(Method::POST, resource).await?;
        Ok(resource.toggle_active())
    }

    async fn send_member<T>(&self, method: Method, resource: &T) -> Result<()>
    where
        T: Resource,
    {
        let body = encode(resource)?;
        let metadata =
            RequestMetadata::new(method, self.member_path(resource.id())).with_body(body);
        let response = self.api.execute(metadata).await?;

        if response.status == StatusCode::OK {
            Ok(())
        } else {
            Err(classify(&response))
        }
    }
}

fn with_params(metadata: RequestMetadata, params: Option<&Params>) -> RequestMetadata {
    match params {
        Some(params) => metadata.with_params(params.clone()),
        None => metadata,
    }
}

fn encode<T: Resource>(resource: &T) -> Result<Vec<u8>> {
    envelope::encode(resource).map_err(|e| Error::SerializationFailed(e.to_string()))
}

pub(crate) fn decode_error(response: &RawResponse, e: serde_json::Error) -> Error {
    let raw_response = response.text();
    tracing::error!(
        error = %e,
        raw_response = %raw_response,
        "Failed to deserialize response"
    );

    Error::DeserializationFailed {
        raw_response,
        serde_error: e.to_string(),
        status: response.status,
    }
}

/// Builder for configuring and creating an [`Api`].
///
/// # Examples
///
/// ```no_run
/// use harvest::ApiBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), harvest::Error> {
/// let api = ApiBuilder::new()
///     .base_url("https://acme.harvestapp.com")?
///     .default_header("User-Agent", "my-app/1.0")?
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ApiBuilder {
    base_url: Option<Url>,
    default_headers: HeaderMap,
    transport: Option<Box<dyn Transport>>,
    timeout: Option<Duration>,
}

impl ApiBuilder {
    /// Creates a new `ApiBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            transport: None,
            timeout: None,
        }
    }

    /// Sets the base URL for all requests.
    ///
    /// A trailing `/` is added if missing so resource paths are resolved
    /// below it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let mut url = Url::parse(url.as_ref())?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Sets the base URL from an account subdomain.
    ///
    /// `"acme"` becomes `https://acme.harvestapp.com/`; a value containing a
    /// dot is taken as a full URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the subdomain is blank or the URL is invalid.
    pub fn subdomain(self, subdomain: &str) -> Result<Self> {
        let subdomain = subdomain.trim();
        if subdomain.is_empty() {
            return Err(Error::ConfigurationError(
                "Subdomain can't be blank".to_string(),
            ));
        }
        if subdomain.contains('.') {
            self.base_url(subdomain)
        } else {
            self.base_url(HOSTED_BASE_URL_TEMPLATE.replace("{}", subdomain))
        }
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Authenticates every request with HTTP basic auth.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials produce an invalid header value.
    pub fn basic_auth(mut self, username: &str, password: &str) -> Result<Self> {
        let credentials =
            base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", username, password));
        let mut value = HeaderValue::try_from(format!("Basic {}", credentials))
            .map_err(|e| Error::ConfigurationError(format!("Invalid credentials: {}", e)))?;
        value.set_sensitive(true);
        self.default_headers.insert(http::header::AUTHORIZATION, value);
        Ok(self)
    }

    /// Uses a custom transport instead of a default `reqwest::Client`.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Sets the request timeout of the default transport.
    ///
    /// Ignored when a custom transport is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `Api`.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was provided or if the default
    /// transport cannot be constructed.
    pub fn build(self) -> Result<Api> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::ConfigurationError("Base URL is required".to_string()))?;

        let transport: Box<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                let http_client = builder.build().map_err(|e| {
                    Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
                })?;
                Box::new(http_client)
            }
        };

        Ok(Api {
            inner: Arc::new(ApiInner {
                transport,
                base_url,
                default_headers: self.default_headers,
            }),
        })
    }
}

impl Default for ApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

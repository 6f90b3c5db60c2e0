//! HTTP response handling.
//!
//! [`Response`] gives access to status, protocol version, headers and a
//! one-shot [`Body`]. Reading the body with [`Response::bytes`] or
//! [`Response::text`] consumes the response.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode, Version};

use crate::{Body, Error, Result};

/// HTTP response with status, headers, and body.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Option<Body>,
}

impl Response {
    /// Creates a new HTTP/1.1 response.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Option<Body>) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers,
            body,
        }
    }

    /// Creates a new [`ResponseBuilder`].
    #[must_use]
    pub fn builder(status: StatusCode) -> ResponseBuilder {
        ResponseBuilder::new(status)
    }

    /// Set the protocol version the response arrived with.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Protocol version.
    #[must_use]
    pub const fn version(&self) -> Version {
        self.version
    }

    /// Response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub const fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// First header value by name, if it is visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Mutable access to the body slot, used to swap a consumed body for a replay.
    #[must_use]
    pub const fn body_mut(&mut self) -> &mut Option<Body> {
        &mut self.body
    }

    /// Take the body out, leaving the response without one.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Option<Body>) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Status is 4xx.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Status is 5xx.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    /// Read the whole body. A response without a body yields empty bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the body stream fails.
    pub async fn bytes(self) -> Result<Bytes> {
        match self.body {
            Some(body) => body.collect().await,
            None => Ok(Bytes::new()),
        }
    }

    /// Read the whole body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body stream fails or is not valid UTF-8.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|err| Error::body(format!("response body is not UTF-8: {err}")))
    }
}

/// Builder for [`Response`], mostly useful for transports and test doubles.
#[derive(Debug)]
pub struct ResponseBuilder {
    response: Response,
    error: Option<Error>,
}

impl ResponseBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            response: Response::new(status, HeaderMap::new(), None),
            error: None,
        }
    }

    /// Set the protocol version.
    #[must_use]
    pub fn version(mut self, version: Version) -> Self {
        self.response.version = version;
        self
    }

    /// Appends a header value.
    #[must_use]
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        if self.error.is_some() {
            return self;
        }

        let name = HeaderName::try_from(name).map_err(Into::into);
        let value = HeaderValue::try_from(value).map_err(Into::into);
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.response.headers.append(name, value);
            }
            (Err(err), _) | (_, Err(err)) => self.error = Some(Error::InvalidHeader(err)),
        }
        self
    }

    /// Sets the response body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.response.body = Some(body.into());
        self
    }

    /// Builds the [`Response`].
    ///
    /// # Errors
    ///
    /// Returns the first invalid header recorded by [`ResponseBuilder::header`].
    pub fn build(self) -> Result<Response> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.response),
        }
    }
}

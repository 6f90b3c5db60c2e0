//! Bearer token authentication middleware.
//!
//! This middleware adds an `Authorization: Bearer <token>` header to every
//! outgoing request. The header is appended: any `Authorization` value the
//! caller already set is kept.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use http::HeaderValue;
use http::header::AUTHORIZATION;
use tower::{Layer, Service};

use crate::{Error, Request, Response, Result};

/// Layer that adds bearer token authentication to requests.
///
/// # Example
///
/// ```ignore
/// use sheath::middleware::BearerAuthLayer;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(BearerAuthLayer::new("my-secret-token")?)
///     .service(transport);
/// ```
#[derive(Debug, Clone)]
pub struct BearerAuthLayer {
    value: HeaderValue,
}

impl BearerAuthLayer {
    /// Create a new bearer auth layer with the given token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the token contains bytes that are
    /// not allowed in a header value.
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            value: bearer_value(token.as_ref())?,
        })
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuth<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuth {
            inner,
            value: self.value.clone(),
        }
    }
}

/// Service that adds bearer token authentication to requests.
#[derive(Debug, Clone)]
pub struct BearerAuth<S> {
    inner: S,
    value: HeaderValue,
}

impl<S> BearerAuth<S> {
    /// Create a new bearer auth service wrapping the given service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the token contains bytes that are
    /// not allowed in a header value.
    pub fn new(inner: S, token: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            inner,
            value: bearer_value(token.as_ref())?,
        })
    }
}

/// `Bearer <token>`, flagged sensitive so dumps and `Debug` output hide it.
fn bearer_value(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::try_from(format!("Bearer {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}

impl<S> Service<Request> for BearerAuth<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        request
            .headers_mut()
            .append(AUTHORIZATION, self.value.clone());

        let mut inner = self.inner.clone();
        Box::pin(async move { inner.call(request).await })
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use assert2::{check, let_assert};
    use http::{Method, StatusCode};
    use tower::ServiceExt;

    use super::*;

    /// Echo the received `Authorization` values back as the response body.
    fn echo_authorization()
    -> impl Service<Request, Response = Response, Error = Error, Future: Send> + Clone + Send + 'static
    {
        tower::service_fn(|request: Request| async move {
            let values: Vec<_> = request
                .headers()
                .get_all(AUTHORIZATION)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect();
            let response = Response::builder(StatusCode::OK)
                .body(values.join("\n"))
                .build()?;
            Ok::<_, Error>(response)
        })
    }

    fn request() -> Request {
        Request::builder(Method::GET, "http://localhost/".parse().expect("url"))
            .build()
            .expect("request")
    }

    #[tokio::test]
    async fn adds_bearer_header() {
        let service = BearerAuthLayer::new("abc123")
            .expect("layer")
            .layer(echo_authorization());

        let response = service.oneshot(request()).await.expect("response");

        check!(response.text().await.expect("text") == "Bearer abc123");
    }

    #[tokio::test]
    async fn keeps_existing_authorization_values() {
        let service = BearerAuth::new(echo_authorization(), "abc123").expect("service");
        let mut request = request();
        request
            .headers_mut()
            .append(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));

        let response = service.oneshot(request).await.expect("response");

        check!(response.text().await.expect("text") == "Basic dXNlcjpwdw==\nBearer abc123");
    }

    #[tokio::test]
    async fn empty_token_still_sets_header() {
        let service = BearerAuth::new(echo_authorization(), "").expect("service");

        let response = service.oneshot(request()).await.expect("response");

        check!(response.text().await.expect("text") == "Bearer ");
    }

    #[test]
    fn header_value_is_sensitive() {
        let layer = BearerAuthLayer::new("abc123").expect("layer");
        check!(layer.value.is_sensitive());
    }

    #[test]
    fn debug_output_hides_token() {
        let layer = BearerAuthLayer::new("abc123").expect("layer");
        let service = layer.layer(tower::service_fn(|_: Request| async {
            Ok::<Response, Infallible>(Response::new(StatusCode::OK, http::HeaderMap::new(), None))
        }));

        check!(!format!("{layer:?}").contains("abc123"));
        check!(!format!("{:?}", service.value).contains("abc123"));
    }

    #[test]
    fn rejects_token_with_newline() {
        let_assert!(Err(Error::InvalidHeader(_)) = BearerAuthLayer::new("abc\n123"));
    }
}

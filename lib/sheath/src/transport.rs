//! Base transports: the hyper-backed network transport and the adapter that
//! lifts any [`Transport`] into a Tower service.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::{BodyStream, Full};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use tower_service::Service;

use crate::config::ClientConfig;
use crate::{Body, Error, Request, Response, Result, Transport};

/// HTTPS connector using rustls and the Mozilla root certificates.
///
/// Plain `http` URLs are accepted too. Both HTTP/1.1 and HTTP/2 are enabled.
fn https_connector() -> HttpsConnector<HttpConnector> {
    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .build()
}

/// Network transport using hyper-util with connection pooling and TLS.
///
/// Request bodies are collected before sending. Response bodies are handed
/// back as streams, read from the connection only when consumed.
///
/// # Example
///
/// ```ignore
/// use sheath::{HyperTransport, Request, Method, Transport};
///
/// let transport = HyperTransport::new();
/// let request = Request::builder(Method::GET, "https://example.com".parse()?).build()?;
/// let response = transport.dispatch(request).await?;
/// ```
#[derive(Clone)]
pub struct HyperTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: ClientConfig,
}

impl fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HyperTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperTransport {
    /// Create a transport with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a transport with custom configuration.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let inner = Client::builder(TokioExecutor::new()).build(https_connector());
        Self { inner, config }
    }

    /// Get the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a hyper request, collecting the body into memory.
    async fn build_hyper_request(request: Request) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();
        let body = match body {
            Some(body) => body.collect().await?,
            None => Bytes::new(),
        };

        let mut hyper_request = http::Request::builder()
            .method(method)
            .uri(url.as_str())
            .body(Full::new(body))
            .map_err(|e| Error::invalid_request(e.to_string()))?;
        *hyper_request.headers_mut() = headers;

        Ok(hyper_request)
    }

    async fn execute(&self, request: Request) -> Result<Response> {
        let hyper_request = Self::build_hyper_request(request).await?;

        let response = tokio::time::timeout(self.config.timeout, self.inner.request(hyper_request))
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(Self::map_hyper_error)?;

        let (parts, incoming) = response.into_parts();
        let body = Body::from_stream(
            BodyStream::new(incoming)
                .map_ok(|frame| frame.into_data().unwrap_or_default())
                .map_err(|e| Error::body(e.to_string())),
        );

        Ok(Response::new(parts.status, parts.headers, Some(body)).with_version(parts.version))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Transport for HyperTransport {
    async fn dispatch(&self, request: Request) -> Result<Response> {
        self.execute(request).await
    }
}

impl Service<Request> for HyperTransport {
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send + 'static>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

/// Tower service over any [`Transport`].
///
/// This is how a custom transport (a test double, a different HTTP stack)
/// becomes something the decorator layers can wrap.
///
/// # Example
///
/// ```ignore
/// use sheath::middleware::BearerAuthLayer;
/// use sheath::TransportService;
/// use tower::Layer;
///
/// let service = BearerAuthLayer::new("token")?.layer(TransportService::new(my_transport));
/// ```
pub struct TransportService<T> {
    transport: Arc<T>,
}

impl<T> TransportService<T> {
    /// Wrap a transport.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Wrap a transport that is already shared.
    pub const fn from_arc(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// The wrapped transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T> Clone for TransportService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TransportService<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportService")
            .field("transport", &self.transport)
            .finish()
    }
}

impl<T> Service<Request> for TransportService<T>
where
    T: Transport + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send + 'static>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let transport = Arc::clone(&self.transport);
        Box::pin(async move { transport.dispatch(request).await })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert2::{check, let_assert};
    use http::{HeaderMap, Method, StatusCode};
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug)]
    struct Teapot;

    impl Transport for Teapot {
        async fn dispatch(&self, request: Request) -> Result<Response> {
            let body = request.url().path().to_string();
            Ok(Response::new(StatusCode::IM_A_TEAPOT, HeaderMap::new(), Some(body.into())))
        }
    }

    #[test]
    fn transport_default() {
        let transport = HyperTransport::new();
        check!(transport.config().timeout == Duration::from_secs(30));
    }

    #[test]
    fn transport_is_debug() {
        let transport = HyperTransport::new();
        check!(format!("{transport:?}").contains("HyperTransport"));
    }

    #[tokio::test]
    async fn request_body_is_collected() {
        let request = Request::builder(Method::PUT, "http://localhost:8080/a?b=c".parse().expect("url"))
            .header("x-one", "1")
            .body("payload")
            .build()
            .expect("request");

        let hyper_request = HyperTransport::build_hyper_request(request)
            .await
            .expect("hyper request");

        check!(*hyper_request.method() == Method::PUT);
        check!(hyper_request.uri() == "http://localhost:8080/a?b=c");
        check!(hyper_request.headers().get("x-one").map(|v| v.as_bytes()) == Some(&b"1"[..]));
    }

    #[tokio::test]
    async fn transport_service_dispatches() {
        let service = TransportService::new(Teapot);
        let request = Request::builder(Method::GET, "http://localhost/brew".parse().expect("url"))
            .build()
            .expect("request");

        let response = service.oneshot(request).await.expect("response");

        check!(response.status() == StatusCode::IM_A_TEAPOT);
        check!(response.text().await.expect("text") == "/brew");
    }

    #[tokio::test]
    async fn unreachable_host_is_connection_error() {
        let transport = HyperTransport::new();
        let request = Request::builder(Method::GET, "http://127.0.0.1:1/".parse().expect("url"))
            .build()
            .expect("request");

        let_assert!(Err(err) = transport.dispatch(request).await);
        check!(err.is_connection());
    }
}

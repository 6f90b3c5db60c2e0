//! Client assembled from a base transport and a stack of decorator layers.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::config::{ClientConfig, ClientConfigBuilder, DebugConfig};
use crate::logger::Logger;
use crate::middleware::{BearerAuthLayer, DebugDumpLayer};
use crate::transport::{HyperTransport, TransportService};
use crate::{Error, Request, Response, Result, Transport};

// ============================================================================
// Type-Erased Service for Middleware Composition
// ============================================================================

/// Type-erased service for middleware composition.
///
/// This type allows storing and composing arbitrary Tower layers without
/// exposing complex generic types to users.
pub type BoxedService = BoxCloneService<Request, Response, Error>;

/// Future type for Tower Service implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send + 'static>>;

/// Thread-safe wrapper for `BoxedService`.
///
/// `BoxCloneService` is not `Sync`, which [`Transport`] requires. The lock is
/// only held while cloning the service, never across a request.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request) -> ServiceFuture {
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        Box::pin(async move {
            std::future::poll_fn(|cx| service.poll_ready(cx)).await?;
            service.call(request).await
        })
    }
}

// ============================================================================
// Public Client
// ============================================================================

/// HTTP client: a base transport wrapped in decorator layers.
///
/// The client is cheap to clone and safe to share between tasks; every
/// dispatch runs through its own clone of the layer stack.
///
/// # Example
///
/// ```ignore
/// use sheath::{Client, TracingLogger};
/// use std::time::Duration;
///
/// // Plain network client
/// let client = Client::new();
///
/// // Client with decorators
/// let client = Client::builder()
///     .timeout(Duration::from_secs(10))
///     .with_debug_dump(TracingLogger)
///     .with_bearer_auth("my-token")?
///     .build();
/// ```
#[derive(Clone)]
pub struct Client {
    service: SyncService,
    config: ClientConfig,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a network client with default configuration and no decorators.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a network client with custom configuration and no decorators.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = HyperTransport::with_config(config.clone());
        Self {
            service: SyncService::new(BoxCloneService::new(transport)),
            config,
        }
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for Client {
    async fn dispatch(&self, request: Request) -> Result<Response> {
        self.service.call(request).await
    }
}

// ============================================================================
// Tower Service Implementation
// ============================================================================

impl Service<Request> for Client {
    type Response = Response;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        // Readiness of the layer stack is awaited per call on its own clone
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        self.service.call(request)
    }
}

type LayerFn = Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>;

/// Builder for [`Client`].
///
/// # Example
///
/// ```ignore
/// use sheath::{Client, MemoryLogger};
///
/// let logger = MemoryLogger::new();
/// let client = Client::builder()
///     .transport(my_transport)
///     .with_bearer_auth("my-token")?
///     .with_debug_dump(logger.clone())
///     .build();
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfigBuilder,
    transport: Option<BoxedService>,
    layers: Vec<LayerFn>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl ClientBuilder {
    // ========================================================================
    // Core Configuration
    // ========================================================================

    /// Set the request timeout of the network transport.
    ///
    /// Has no effect on a transport set with [`transport`](Self::transport).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Use a custom base transport instead of [`HyperTransport`].
    #[must_use]
    pub fn transport<T>(mut self, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        self.transport = Some(BoxCloneService::new(TransportService::new(transport)));
        self
    }

    // ========================================================================
    // Generic Middleware API
    // ========================================================================

    /// Add a Tower layer to the client.
    ///
    /// Layers are applied in order: first added = outermost (processes requests first).
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Add middleware using the reqwest-middleware style `.with()` method.
    ///
    /// This is an alias for `.layer()`.
    #[must_use]
    pub fn with<L>(self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
        <L::Service as Service<Request>>::Future: Send,
    {
        self.layer(layer)
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    /// Add bearer token authentication.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if the token is not a valid header value.
    pub fn with_bearer_auth(self, token: impl AsRef<str>) -> Result<Self> {
        Ok(self.layer(BearerAuthLayer::new(token)?))
    }

    /// Add request/response dumps with the default [`DebugConfig`].
    #[must_use]
    pub fn with_debug_dump(self, logger: impl Logger) -> Self {
        self.layer(DebugDumpLayer::new(logger))
    }

    /// Add request/response dumps with a custom [`DebugConfig`].
    #[must_use]
    pub fn with_debug_dump_config(self, logger: impl Logger, config: DebugConfig) -> Self {
        self.layer(DebugDumpLayer::with_config(logger, config))
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the client with all configured middleware.
    #[must_use]
    pub fn build(self) -> Client {
        let config = self.config.build();
        let mut service = self
            .transport
            .unwrap_or_else(|| BoxCloneService::new(HyperTransport::with_config(config.clone())));

        // Wrap from the innermost layer out, so the first added ends up outermost
        for layer_fn in self.layers.into_iter().rev() {
            service = layer_fn(service);
        }

        Client {
            service: SyncService::new(service),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use http::{HeaderMap, Method, StatusCode};

    use super::*;
    use crate::{Field, MemoryLogger};

    #[derive(Debug)]
    struct Echo;

    impl Transport for Echo {
        async fn dispatch(&self, mut request: Request) -> Result<Response> {
            let mut headers = HeaderMap::new();
            for value in request.headers().get_all(http::header::AUTHORIZATION) {
                headers.append(http::header::AUTHORIZATION, value.clone());
            }
            Ok(Response::new(StatusCode::OK, headers, request.take_body()))
        }
    }

    fn request() -> Request {
        Request::builder(Method::POST, "http://localhost/echo".parse().expect("url"))
            .body("ping")
            .build()
            .expect("request")
    }

    #[test]
    fn client_default() {
        let client = Client::new();
        check!(client.config().timeout == Duration::from_secs(30));
    }

    #[test]
    fn client_builder() {
        let client = Client::builder().timeout(Duration::from_secs(60)).build();
        check!(client.config().timeout == Duration::from_secs(60));
    }

    #[test]
    fn client_is_clone_and_debug() {
        let client = Client::new();
        let cloned = client.clone();
        check!(format!("{cloned:?}").contains("Client"));
    }

    #[test]
    fn builder_is_debug() {
        let builder = Client::builder().transport(Echo).with_debug_dump(MemoryLogger::new());
        let debug = format!("{builder:?}");
        check!(debug.contains("layers_count: 1"));
        check!(debug.contains("custom_transport: true"));
    }

    #[tokio::test]
    async fn dispatch_through_custom_transport() {
        let client = Client::builder().transport(Echo).build();

        let response = client.dispatch(request()).await.expect("response");

        check!(response.text().await.expect("text") == "ping");
    }

    #[tokio::test]
    async fn first_layer_added_is_outermost() {
        let outer = MemoryLogger::new();
        let client = Client::builder()
            .transport(Echo)
            .with_debug_dump(outer.clone())
            .with_bearer_auth("token")
            .expect("auth")
            .build();

        let response = client.dispatch(request()).await.expect("response");

        // The dump ran before auth: the request it saw had no Authorization
        let request_dump = outer.value_of(Field::RequestDump).expect("dump");
        check!(!request_dump.contains("authorization"));
        check!(response.headers().contains_key(http::header::AUTHORIZATION));
    }

    #[tokio::test]
    async fn works_as_tower_service() {
        use tower::ServiceExt;

        let client = Client::builder().transport(Echo).build();
        let response = client.oneshot(request()).await.expect("response");

        check!(response.status() == StatusCode::OK);
    }
}

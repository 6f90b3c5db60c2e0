//! Request/response dump middleware.
//!
//! Each round trip produces five debug records on the configured
//! [`Logger`]: the URL, a head dump and a body rendering for the request,
//! then the same two for the response. Bodies are drained into memory for
//! the dump and replaced by buffered equivalents, so whoever reads them next
//! sees exactly the original bytes.
//!
//! When the wrapped service fails, a single error record carrying the error
//! text is logged and the error is returned unchanged.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::{Layer, Service};
use tracing::Instrument;

use super::capture::capture;
use crate::config::{CaptureFailure, DebugConfig};
use crate::logger::{Field, Logger, Record, Severity};
use crate::{Body, Error, Request, Response, Result, dump};

/// Layer that dumps requests and responses to a [`Logger`].
///
/// # Example
///
/// ```ignore
/// use sheath::middleware::DebugDumpLayer;
/// use sheath::TracingLogger;
/// use tower::ServiceBuilder;
///
/// let service = ServiceBuilder::new()
///     .layer(DebugDumpLayer::new(TracingLogger))
///     .service(transport);
/// ```
#[derive(Clone)]
pub struct DebugDumpLayer {
    shared: Arc<Shared>,
}

impl DebugDumpLayer {
    /// Create a dump layer with the default configuration.
    #[must_use]
    pub fn new(logger: impl Logger) -> Self {
        Self::with_config(logger, DebugConfig::default())
    }

    /// Create a dump layer with an explicit configuration.
    #[must_use]
    pub fn with_config(logger: impl Logger, config: DebugConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                logger: Arc::new(logger),
                config,
            }),
        }
    }
}

impl fmt::Debug for DebugDumpLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugDumpLayer")
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for DebugDumpLayer {
    type Service = DebugDump<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DebugDump {
            inner,
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Service that dumps requests and responses to a [`Logger`].
#[derive(Clone)]
pub struct DebugDump<S> {
    inner: S,
    shared: Arc<Shared>,
}

impl<S> DebugDump<S> {
    /// Create a dump service wrapping the given service.
    #[must_use]
    pub fn new(inner: S, logger: impl Logger) -> Self {
        DebugDumpLayer::new(logger).layer(inner)
    }

    /// Create a dump service with an explicit configuration.
    #[must_use]
    pub fn with_config(inner: S, logger: impl Logger, config: DebugConfig) -> Self {
        DebugDumpLayer::with_config(logger, config).layer(inner)
    }
}

impl<S: fmt::Debug> fmt::Debug for DebugDump<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugDump")
            .field("inner", &self.inner)
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl<S> Service<Request> for DebugDump<S>
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
        let span = tracing::debug_span!(
            "http.debug_dump",
            method = %request.method(),
            url = %request.url(),
        );

        let mut inner = self.inner.clone();
        let shared = Arc::clone(&self.shared);
        Box::pin(
            async move {
                let url = request.url().to_string();
                let request_dump = dump::request_head(&request, &shared.config);
                let request_body = shared.capture(Side::Request, request.body_mut()).await;

                let mut response = match inner.call(request).await {
                    Ok(response) => response,
                    Err(err) => {
                        shared.log(Severity::Error, "round trip failed", Field::Error, err.to_string());
                        return Err(err);
                    }
                };

                let response_dump = dump::response_head(&response, &shared.config);
                let response_body = shared.capture(Side::Response, response.body_mut()).await;

                for (field, value) in [
                    (Field::Url, url),
                    (Field::RequestDump, request_dump),
                    (Field::RequestBody, request_body),
                    (Field::ResponseDump, response_dump),
                    (Field::ResponseBody, response_body),
                ] {
                    shared.log(Severity::Debug, "round trip", field, value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

/// State shared by a layer and every service it produced.
struct Shared {
    logger: Arc<dyn Logger>,
    config: DebugConfig,
}

#[derive(Clone, Copy)]
enum Side {
    Request,
    Response,
}

impl Side {
    const fn name(self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Response => "response",
        }
    }

    const fn capture_failed(self) -> &'static str {
        match self {
            Self::Request => "request body capture failed",
            Self::Response => "response body capture failed",
        }
    }
}

impl Shared {
    fn log(&self, severity: Severity, message: &'static str, field: Field, value: String) {
        self.logger.log(&Record {
            severity,
            component: self.config.component.to_string(),
            message,
            field,
            value,
        });
    }

    /// Capture the body in `slot` and return its rendering, applying the
    /// configured [`CaptureFailure`] policy when the stream breaks.
    async fn capture(&self, side: Side, slot: &mut Option<Body>) -> String {
        match capture(slot).await {
            Ok(rendering) => rendering,
            Err(err) => match self.config.capture_failure {
                CaptureFailure::Abort => {
                    panic!("failed to capture {} body: {err}", side.name())
                }
                CaptureFailure::Skip => {
                    self.log(Severity::Error, side.capture_failed(), Field::Error, err.to_string());
                    format!("<capture failed: {err}>")
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use http::{HeaderMap, Method, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::MemoryLogger;

    fn ok_service() -> impl Service<Request, Response = Response, Error = Error, Future: Send>
    + Clone
    + Send
    + 'static {
        tower::service_fn(|_: Request| async {
            Ok::<_, Error>(Response::new(StatusCode::NO_CONTENT, HeaderMap::new(), None))
        })
    }

    fn request() -> Request {
        Request::builder(Method::DELETE, "http://localhost/items/7".parse().expect("url"))
            .build()
            .expect("request")
    }

    #[tokio::test]
    async fn logs_five_records_in_order() {
        let logger = MemoryLogger::new();
        let service = DebugDump::new(ok_service(), logger.clone());

        service.oneshot(request()).await.expect("response");

        let records = logger.records();
        let fields: Vec<_> = records.iter().map(|record| record.field).collect();
        check!(
            fields
                == [
                    Field::Url,
                    Field::RequestDump,
                    Field::RequestBody,
                    Field::ResponseDump,
                    Field::ResponseBody
                ]
        );
        check!(records.iter().all(|record| record.severity == Severity::Debug));
        check!(records.iter().all(|record| record.component == "http/debug"));
        check!(logger.value_of(Field::Url).as_deref() == Some("http://localhost/items/7"));
        check!(logger.value_of(Field::RequestBody).as_deref() == Some(dump::NO_BODY));
        check!(logger.value_of(Field::ResponseBody).as_deref() == Some(dump::NO_BODY));
    }

    #[tokio::test]
    async fn component_comes_from_config() {
        let logger = MemoryLogger::new();
        let config = DebugConfig::builder().component("payments").build();
        let service = DebugDump::with_config(ok_service(), logger.clone(), config);

        service.oneshot(request()).await.expect("response");

        check!(logger.records().iter().all(|record| record.component == "payments"));
    }

    #[test]
    fn debug_output_shows_config() {
        let layer = DebugDumpLayer::new(MemoryLogger::new());
        let rendered = format!("{layer:?}");

        check!(rendered.starts_with("DebugDumpLayer"));
        check!(rendered.contains("http/debug"));
    }
}

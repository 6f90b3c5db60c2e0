//! Composable transport decorators for HTTP clients.
//!
//! Wrap a transport with bearer authentication and body-preserving debug
//! dumps, using Tower layers, without touching the code that issues requests.
//!
//! # Example
//!
//! ```ignore
//! use sheath::prelude::*;
//!
//! let client = Client::builder()
//!     .with_debug_dump(TracingLogger)
//!     .with_bearer_auth("my-secret-token")?
//!     .build();
//!
//! let request = Request::builder(Method::GET, "https://api.example.com/me".parse()?).build()?;
//! let response = client.dispatch(request).await?;
//! println!("{}", response.text().await?);
//! ```
//!
//! Layers are applied in the order they are added: the first one sees the
//! request first. In the example above the debug dump is taken before the
//! `Authorization` header is added, so the dump never shows it.

mod client;
mod config;
pub mod dump;
mod logger;
pub mod middleware;
pub mod prelude;
mod transport;

// Re-export client types
pub use client::{BoxedService, Client, ClientBuilder, ServiceFuture};
pub use config::{
    CaptureFailure, ClientConfig, ClientConfigBuilder, DebugConfig, DebugConfigBuilder,
};
pub use logger::{Field, Logger, MemoryLogger, Record, Severity, TracingLogger};
pub use transport::{HyperTransport, TransportService};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use sheath_core::{
    Body, BodyStream, Error, HeaderMap, HeaderValue, Method, Request, RequestBuilder, Response,
    ResponseBuilder, Result, StatusCode, Transport, Version, header,
};

// Re-export url for request construction
pub use url;

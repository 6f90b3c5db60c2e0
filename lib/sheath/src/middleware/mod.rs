//! Tower middleware layers for the sheath HTTP client.
//!
//! Every decorator is a Tower [`Layer`] producing a [`Service`](tower::Service)
//! over [`Request`](crate::Request) and [`Response`](crate::Response), so any
//! decorator wraps a base transport or another decorator alike and layers
//! nest in any order.
//!
//! # Available Layers
//!
//! | Layer | Effect |
//! |-------|--------|
//! | [`BearerAuthLayer`] | Appends `Authorization: Bearer <token>` |
//! | [`DebugDumpLayer`] | Dumps request/response heads and bodies to a [`Logger`](crate::Logger) |
//!
//! # Example: Using the Builder API
//!
//! ```ignore
//! use sheath::{Client, TracingLogger};
//!
//! // Helper methods: the first one added is the outermost
//! let client = Client::builder()
//!     .with_debug_dump(TracingLogger)
//!     .with_bearer_auth("my-token")?
//!     .build();
//!
//! // Raw layer access
//! use sheath::middleware::BearerAuthLayer;
//! let client = Client::builder()
//!     .layer(BearerAuthLayer::new("my-token")?)
//!     .build();
//! ```

mod bearer_auth;
mod capture;
mod debug_dump;

pub use bearer_auth::{BearerAuth, BearerAuthLayer};
pub use debug_dump::{DebugDump, DebugDumpLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};

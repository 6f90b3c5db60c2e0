//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy glob
//! importing:
//!
//! ```ignore
//! use sheath::prelude::*;
//! ```

pub use crate::middleware::{BearerAuthLayer, DebugDumpLayer, Layer, ServiceBuilder};
pub use crate::{
    Body, CaptureFailure, Client, ClientConfig, DebugConfig, Error, HeaderMap, HeaderValue,
    HyperTransport, Logger, MemoryLogger, Method, Request, Response, Result, StatusCode,
    TracingLogger, Transport, TransportService,
};

//! The dispatch capability.
//!
//! [`Transport`] is the one operation every layer of a sheath stack shares:
//! take a request, produce a response or a failure. Base transports (a real
//! network client, a test double) implement it directly; decorators wrap one
//! transport and are transports themselves.

use std::future::Future;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Core dispatch trait.
///
/// Implementations must be safe to share between concurrent callers: a
/// configured client is normally used process-wide.
pub trait Transport: Send + Sync {
    /// Send a request and wait for the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be completed:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Body stream failures
    fn dispatch(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn dispatch(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).dispatch(request)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn dispatch(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        (**self).dispatch(request)
    }
}

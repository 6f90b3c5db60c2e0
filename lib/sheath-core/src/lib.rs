//! Core types and traits for sheath HTTP decorators.
//!
//! This crate provides the foundational types used by sheath:
//! - [`Body`] - One-shot request/response body (buffered or streaming)
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] and [`ResponseBuilder`] - HTTP response types
//! - [`Error`] and [`Result`] - Error handling
//! - [`Transport`] - The dispatch capability every layer implements
//! - [`Method`], [`StatusCode`], [`Version`], [`HeaderMap`], [`header`] -
//!   re-exported from the `http` crate

mod body;
mod error;
pub mod prelude;
mod request;
mod response;
mod transport;

pub use body::{Body, BodyStream};
pub use error::{Error, Result};
pub use request::{Request, RequestBuilder};
pub use response::{Response, ResponseBuilder};
pub use transport::Transport;

// Re-export http crate types for methods, status codes and headers
pub use http::{HeaderMap, HeaderValue, Method, StatusCode, Version, header};

//! Prelude module for convenient imports.
//!
//! ```ignore
//! use sheath_core::prelude::*;
//! ```

pub use crate::{
    Body, Error, HeaderMap, HeaderValue, Method, Request, RequestBuilder, Response,
    ResponseBuilder, Result, StatusCode, Transport,
};

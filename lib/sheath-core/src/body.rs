//! One-shot request and response bodies.
//!
//! A [`Body`] is either already buffered in memory or a stream of chunks that
//! arrive over time. Every read consumes the body, so a body can only be read
//! once; code that needs to look at the bytes and still pass them on must put
//! a new body back in place (see [`Body::collect`]).

use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures_core::Stream;
use futures_util::{StreamExt, stream};

use crate::Result;

/// A streaming body: chunks of bytes arriving over time.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A request or response body that can be read exactly once.
pub struct Body {
    kind: Kind,
}

enum Kind {
    Full(Bytes),
    Stream(BodyStream),
}

impl Body {
    /// An empty, buffered body.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(Bytes::new())
    }

    /// Wrap a stream of chunks.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            kind: Kind::Stream(Box::pin(stream)),
        }
    }

    /// The buffered bytes, if this body is already held in memory.
    ///
    /// Returns `None` for streaming bodies; those have to be consumed.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.kind {
            Kind::Full(bytes) => Some(bytes),
            Kind::Stream(_) => None,
        }
    }

    /// Returns `true` if the body is held in memory.
    #[must_use]
    pub const fn is_buffered(&self) -> bool {
        matches!(self.kind, Kind::Full(_))
    }

    /// Consume into a stream of chunks.
    ///
    /// A buffered body yields a single chunk, or nothing when it is empty.
    #[must_use]
    pub fn into_stream(self) -> BodyStream {
        match self.kind {
            Kind::Full(bytes) if bytes.is_empty() => Box::pin(stream::empty::<Result<Bytes>>()),
            Kind::Full(bytes) => {
                Box::pin(stream::once(async move { Ok::<_, crate::Error>(bytes) }))
            }
            Kind::Stream(stream) => stream,
        }
    }

    /// Read the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns the first error yielded by the underlying stream.
    pub async fn collect(self) -> Result<Bytes> {
        let mut stream = match self.kind {
            Kind::Full(bytes) => return Ok(bytes),
            Kind::Stream(stream) => stream,
        };

        let mut collected = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            collected.extend_from_slice(&chunk?);
        }

        Ok(collected.freeze())
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Full(bytes) => f.debug_tuple("Body::Full").field(&bytes.len()).finish(),
            Kind::Stream(_) => f.write_str("Body::Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self {
            kind: Kind::Full(bytes),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(bytes))
    }
}

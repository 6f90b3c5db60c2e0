//! Buffer-then-replay capture of one-shot bodies.

use bytes::BytesMut;
use derive_more::Display;
use futures_util::{StreamExt, stream};

use crate::Body;
use crate::dump::{NO_BODY, render_body};

/// A body stream failed while it was being drained.
#[derive(Debug, Display)]
#[display("{message}")]
pub(crate) struct CaptureError {
    message: String,
}

/// Drain the body in `slot`, put an equivalent body back and render what was read.
///
/// On success the slot holds a buffered body over exactly the bytes read. On
/// failure it holds a body that yields the bytes read so far and then the
/// original stream error, so the next consumer still sees the failure.
pub(crate) async fn capture(slot: &mut Option<Body>) -> Result<String, CaptureError> {
    let Some(body) = slot.take() else {
        return Ok(NO_BODY.to_string());
    };

    if let Some(bytes) = body.as_bytes() {
        let rendering = render_body(bytes);
        *slot = Some(body);
        return Ok(rendering);
    }

    let mut chunks = body.into_stream();
    let mut buffer = BytesMut::new();
    while let Some(chunk) = chunks.next().await {
        match chunk {
            Ok(chunk) => buffer.extend_from_slice(&chunk),
            Err(err) => {
                let message = err.to_string();
                let read = buffer.freeze();
                let replay = Some(read)
                    .filter(|read| !read.is_empty())
                    .map(Ok)
                    .into_iter()
                    .chain(std::iter::once(Err(err)));
                *slot = Some(Body::from_stream(stream::iter(replay)));
                return Err(CaptureError { message });
            }
        }
    }

    let bytes = buffer.freeze();
    let rendering = render_body(&bytes);
    *slot = Some(Body::from(bytes));
    Ok(rendering)
}

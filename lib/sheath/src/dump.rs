//! Textual dumps of requests, responses and bodies.
//!
//! Head dumps follow the HTTP/1.1 wire layout (start line, headers, blank
//! line) without a body. Body renderings are the decoded text for UTF-8
//! payloads and a [`HexDump`] for everything else.

use std::fmt::{self, Write as _};

use http::HeaderMap;
use http::header::HOST;

use crate::{DebugConfig, Request, Response};

/// Rendering of an absent body.
pub const NO_BODY: &str = "<none>";

/// Replacement for redacted header values.
pub const REDACTED: &str = "<redacted>";

/// Header-only dump of a request.
///
/// ```text
/// POST /users?page=2 HTTP/1.1
/// Host: api.example.com
/// content-type: application/json
/// ```
#[must_use]
pub fn request_head(request: &Request, config: &DebugConfig) -> String {
    let url = request.url();
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut out = format!("{} {target} HTTP/1.1\r\n", request.method());
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };
    let _ = write!(out, "Host: {host}\r\n");
    write_headers(&mut out, request.headers(), config);
    out
}

/// Header-only dump of a response.
///
/// ```text
/// HTTP/1.1 404 Not Found
/// content-type: text/plain
/// ```
#[must_use]
pub fn response_head(response: &Response, config: &DebugConfig) -> String {
    let status = response.status();
    let mut out = format!("{:?} {}", response.version(), status.as_u16());
    if let Some(reason) = status.canonical_reason() {
        out.push(' ');
        out.push_str(reason);
    }
    out.push_str("\r\n");
    write_headers(&mut out, response.headers(), config);
    out
}

/// Headers sorted by name, one line per value, then the closing blank line.
fn write_headers(out: &mut String, headers: &HeaderMap, config: &DebugConfig) {
    let mut names: Vec<_> = headers.keys().filter(|name| **name != HOST).collect();
    names.sort_by(|a, b| a.as_str().cmp(b.as_str()));

    for name in names {
        let redacted = config.is_redacted(name);
        for value in headers.get_all(name) {
            let value = if redacted || value.is_sensitive() {
                REDACTED.into()
            } else {
                String::from_utf8_lossy(value.as_bytes())
            };
            let _ = write!(out, "{name}: {value}\r\n");
        }
    }
    out.push_str("\r\n");
}

/// Render body bytes for a log line.
///
/// Valid UTF-8 is returned as is; anything else becomes a [`HexDump`].
#[must_use]
pub fn render_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => HexDump(bytes).to_string(),
    }
}

/// Canonical hex+ASCII dump, 16 bytes per line.
///
/// ```text
/// 00000000  48 65 6c 6c 6f 2c 20 77  6f 72 6c 64 21 0a ff 00  |Hello, world!...|
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line, chunk) in self.0.chunks(16).enumerate() {
            write!(f, "{:08x}  ", line * 16)?;
            for column in 0..16 {
                match chunk.get(column) {
                    Some(byte) => write!(f, "{byte:02x} ")?,
                    None => f.write_str("   ")?,
                }
                if column == 7 || column == 15 {
                    f.write_char(' ')?;
                }
            }

            f.write_char('|')?;
            for &byte in chunk {
                let printable = if byte.is_ascii_graphic() || byte == b' ' {
                    char::from(byte)
                } else {
                    '.'
                };
                f.write_char(printable)?;
            }
            f.write_str("|\n")?;
        }
        Ok(())
    }
}

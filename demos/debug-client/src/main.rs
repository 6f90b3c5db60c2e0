//! Debug Client Example
//!
//! Sends a JSON document through a bearer-authenticated, dumped client and
//! prints every record the dump produces.
//!
//! ```text
//! cargo run -p debug-client-demo -- https://httpbin.org/anything
//! ```

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]

use sheath::prelude::*;
use sheath::{Record, header};

const DEFAULT_URL: &str = "https://httpbin.org/anything";

/// Prints records to stdout, one block per record.
#[derive(Debug, Clone, Copy)]
struct StdoutLogger;

impl Logger for StdoutLogger {
    fn log(&self, record: &Record) {
        println!(
            "[{:?}] {} {}: {}\n{}\n",
            record.severity, record.component, record.message, record.field, record.value
        );
    }
}

fn build_client(logger: impl Logger, token: &str) -> sheath::Result<Client> {
    Ok(Client::builder()
        .with_bearer_auth(token)?
        .with_debug_dump_config(logger, DebugConfig::builder().component("demo").build())
        .build())
}

fn build_request(url: &str) -> sheath::Result<Request> {
    Request::builder(Method::POST, url.parse()?)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json")
        .body(r#"{"greeting":"héllo","tags":["debug","dump"]}"#)
        .build()
}

#[tokio::main]
async fn main() -> sheath::Result<()> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_URL.to_string());

    let client = build_client(StdoutLogger, "demo-token")?;
    let response = client.dispatch(build_request(&url)?).await?;

    println!("=== Caller still sees the full response ===");
    println!("status: {}", response.status());
    println!("{}", response.text().await?);

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================

//! The greeting function.

use axum::extract::Request;
use const_format::formatcp;

/// Name the function is registered under
pub const NAME: &str = "HelloWorld";

pub const GREETING: &str = "Hello, World from Go Cloud Function!";

/// Response body: the greeting as a single terminated line
pub const GREETING_LINE: &str = formatcp!("{}\n", GREETING);

/// HTTP Cloud Function that writes the greeting.
///
/// The request is taken whole so that no extractor can reject it; its
/// method, headers, query and body are never read.
pub async fn hello_world(_request: Request) -> &'static str {
    GREETING_LINE
}

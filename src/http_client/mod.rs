//! This module provides the retryable HTTP client used for chat dispatch.

mod client;

pub use client::{HttpClientError, build_dispatch_client, create_retryable_http_client};

#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP client plumbing for chat-ox
//!
//! Request configuration, endpoint description and a server-sent-event line
//! parser, kept apart from the runner so the transport can be exercised on
//! its own.

pub mod error;
pub mod request_builder;
pub mod streaming;

pub use error::CommonRequestError;
pub use request_builder::{Endpoint, HttpMethod, RequestBuilder, RequestConfig};
pub use streaming::{DONE_SENTINEL, SseLine, SseParser};

/// Re-export common types for convenience
pub use reqwest::StatusCode;

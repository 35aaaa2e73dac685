//! One-shot chat-completion runner
//!
//! Sends a single chat request (one system and one user message) to an
//! OpenAI-compatible endpoint and prints the reply. In streaming mode the
//! reply arrives as server-sent events and each delta is written as soon as
//! it is parsed; otherwise the whole body is printed once.
//!
//! # Example
//!
//! ```rust,no_run
//! use chat_ox::{Config, transport_for, run};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::builder()
//!         .endpoint("https://openrouter.ai/api/v1")
//!         .api_key("your-api-key")
//!         .model("qwen/qwen3-235b-a22b-2507")
//!         .build();
//!
//!     let transport = transport_for(&config);
//!     let report = run(&config, transport.as_ref(), &mut std::io::stdout()).await?;
//!     eprintln!("{} characters received", report.response_chars);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod message;
pub mod render;
pub mod request;
pub mod response;
pub mod runner;
pub mod transport;

pub use cli::Cli;
pub use config::Config;
pub use error::ChatOxError;
pub use message::{Message, Role};
pub use render::{StreamSummary, render_body, render_stream};
pub use request::ChatRequest;
pub use response::{ChatCompletionChunk, ChunkChoice, Delta};
pub use runner::{Mode, RunReport, run};
pub use transport::{FixtureTransport, HttpTransport, RawBody, Transport, transport_for};

//! Language-model backend for the medteam pipeline
//!
//! Every agent in the pipeline is a single prompt-templated chat completion.
//! This crate owns that one capability:
//!
//! - [`ChatBackend`]: the seam agents call through (mocked in tests)
//! - [`OpenAiClient`]: an OpenAI-compatible `/chat/completions` client
//!
//! # Example
//!
//! ```no_run
//! use medteam_llm::{ChatBackend, ChatMessage, OpenAiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAiClient::new(&medteam_config::LlmSettings::default())?;
//!     let reply = client
//!         .complete(&[ChatMessage::user("Summarize: patient reports chest pain")])
//!         .await?;
//!     println!("{}", reply.content);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod errors;
pub mod types;

pub use backend::ChatBackend;
pub use client::OpenAiClient;
pub use errors::{LlmError, Result};
pub use types::{ChatMessage, Completion, Usage};

// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod flow;
pub mod observability;
pub mod prompt;
pub mod render;
pub mod sse;
pub mod transcript;
pub mod types;

// Re-exports
pub use client::Gemini;
pub use error::{Error, Result};
pub use flow::Flow;
pub use transcript::{Transcript, Turn, TurnRole};
pub use types::*;

//! Interactive mentor chat built on the Gemini streaming API.
//!
//! This module provides the pieces of the `geminius-mentor` terminal
//! application: configuration, slash commands, and the session loop that
//! turns user input into streamed mentor replies.

mod commands;
mod config;
mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::{ChatSession, ChunkStream, CompletionBackend, SessionStats};

pub use crate::render::{PlainTextRenderer, Renderer};

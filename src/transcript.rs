//! The per-session conversation transcript.
//!
//! A transcript is an append-only, ordered log of turns. It lives for one
//! interactive session, is owned exclusively by that session, and is never
//! persisted.

use serde::{Deserialize, Serialize};

use crate::types::{Content, Role};

/// The speaker of a turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The end user.
    User,

    /// The mentor's generated reply.
    Assistant,
}

/// One message exchanged in a conversation, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who spoke.
    pub role: TurnRole,

    /// What was said.
    pub content: String,
}

impl Turn {
    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for Content {
    /// Maps a turn onto the wire representation: assistant turns travel
    /// with role `model`.
    fn from(turn: &Turn) -> Self {
        match turn.role {
            TurnRole::User => Content::user(&turn.content),
            TurnRole::Assistant => Content::model(&turn.content),
        }
    }
}

/// The ordered history of turns within one session.
///
/// Insertion order is significant: it defines the conversational history
/// sent to the remote model. There is no eviction and no size limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn to the end of the log.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Returns the full ordered sequence of turns.
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if no turns have been recorded.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Empties the log; used when the user resets the session.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Rolls the log back to `len` turns.
    ///
    /// Only the session's failure path uses this, to drop a user turn whose
    /// request never produced a reply.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.turns.truncate(len);
    }

    /// Maps the transcript onto wire contents, preserving order.
    pub fn to_contents(&self) -> Vec<Content> {
        self.turns.iter().map(Content::from).collect()
    }
}

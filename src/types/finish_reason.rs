use std::fmt;

use serde::{Deserialize, Serialize};

/// The reason a candidate stopped generating tokens.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Natural stopping point or stop sequence reached.
    Stop,

    /// The configured maximum token count was reached.
    MaxTokens,

    /// The candidate was flagged for safety.
    Safety,

    /// The candidate was flagged for recitation of training data.
    Recitation,

    /// Unspecified or unrecognized reason.
    #[serde(other)]
    Other,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "STOP"),
            FinishReason::MaxTokens => write!(f, "MAX_TOKENS"),
            FinishReason::Safety => write!(f, "SAFETY"),
            FinishReason::Recitation => write!(f, "RECITATION"),
            FinishReason::Other => write!(f, "OTHER"),
        }
    }
}

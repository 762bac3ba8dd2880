use serde::{Deserialize, Serialize};

/// Token accounting reported by the service.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens consumed by the prompt (history plus the new message).
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens across all generated candidates.
    #[serde(default)]
    pub candidates_token_count: u64,

    /// Total tokens for the request.
    #[serde(default)]
    pub total_token_count: u64,
}

impl UsageMetadata {
    /// Create a new `UsageMetadata` with the given counts.
    pub fn new(prompt_token_count: u64, candidates_token_count: u64) -> Self {
        Self {
            prompt_token_count,
            candidates_token_count,
            total_token_count: prompt_token_count + candidates_token_count,
        }
    }

    /// Folds another usage report into this one.
    pub fn accumulate(&mut self, other: UsageMetadata) {
        self.prompt_token_count = self.prompt_token_count.saturating_add(other.prompt_token_count);
        self.candidates_token_count = self
            .candidates_token_count
            .saturating_add(other.candidates_token_count);
        self.total_token_count = self.total_token_count.saturating_add(other.total_token_count);
    }
}

use serde::{Deserialize, Serialize};

use crate::types::{Content, FinishReason};

/// One generated answer within a response.
///
/// Streaming responses carry partial candidates; `content` may be absent on
/// chunks that only report a finish reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The generated content, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped, present on the final chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,

    /// Index of this candidate within the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

use serde::{Deserialize, Serialize};

use crate::types::{Candidate, FinishReason, UsageMetadata};

/// Response body for `generateContent`, and the per-chunk payload for
/// `streamGenerateContent`.
///
/// When streaming, each chunk is a complete object of this shape carrying
/// one fragment of the answer; the final chunk carries the finish reason
/// and usage totals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated candidates; absent when the prompt itself was blocked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<Candidate>>,

    /// Token accounting, present on the final streaming chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// Which concrete model version produced the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Extracts the text of the first candidate, if any.
    ///
    /// For streaming chunks this is the incremental fragment of the answer.
    pub fn text(&self) -> Option<String> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .text()
    }

    /// Returns the finish reason of the first candidate, if reported.
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.candidates.as_ref()?.first()?.finish_reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_text_from_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "A requisition"}]},
                "index": 0
            }]
        }))
        .unwrap();
        assert_eq!(response.text(), Some("A requisition".to_string()));
        assert!(response.finish_reason().is_none());
    }

    #[test]
    fn final_chunk_carries_usage_and_finish() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 10,
                "candidatesTokenCount": 5,
                "totalTokenCount": 15
            },
            "modelVersion": "gemini-2.5-flash"
        }))
        .unwrap();
        assert_eq!(response.finish_reason(), Some(FinishReason::Stop));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 15);
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.text().is_none());
    }
}

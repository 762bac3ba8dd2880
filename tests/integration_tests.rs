//! Integration tests for the Geminius library.
//! The live tests require an API key in the environment to run.

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use geminius::{
        Content, Flow, Gemini, GenerateContentRequest, GenerationConfig, KnownModel, Model, prompt,
    };

    #[tokio::test]
    async fn test_simple_generate_request() {
        // This test requires GEMINI_API_KEY to be set
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: GEMINI_API_KEY not set");
            return;
        }

        let client = Gemini::new(api_key).expect("Failed to create client");

        let request = GenerateContentRequest::new(vec![Content::user("Say 'test passed'")])
            .with_generation_config(GenerationConfig::new().with_max_output_tokens(32));

        let response = client
            .generate(&Model::Known(KnownModel::Gemini25Flash), request)
            .await;
        assert!(
            response.is_ok(),
            "Request should succeed with valid API key"
        );
    }

    #[tokio::test]
    async fn test_streaming_response() {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: GEMINI_API_KEY not set");
            return;
        }

        let client = Gemini::new(api_key).expect("Failed to create client");

        let request = GenerateContentRequest::new(vec![Content::user("Count to 3")])
            .with_generation_config(GenerationConfig::new().with_max_output_tokens(64));

        let stream = client
            .stream_generate(&Model::Known(KnownModel::Gemini25Flash), request)
            .await;
        assert!(stream.is_ok(), "Stream request should succeed");

        let mut stream = stream.unwrap();
        let mut saw_text = false;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.expect("Chunk should decode");
            if chunk.text().is_some() {
                saw_text = true;
            }
        }
        assert!(saw_text, "Stream should produce at least one text fragment");
    }

    #[test]
    fn test_prompt_assembly_is_flow_scoped() {
        // Offline property: each flow's instructions carry only its own
        // step list and none of the others'.
        for flow in Flow::ALL {
            let instructions = prompt::assemble(flow);
            assert!(instructions.contains(flow.label()));
            for other in Flow::ALL {
                if other != flow {
                    assert!(!instructions.contains(other.knowledge()));
                }
            }
        }
    }
}

//! Core chat session management.
//!
//! `ChatSession` owns one conversation: the configuration, the assembled
//! mentor instructions, and the transcript. Each user submission runs the
//! full turn loop — append, stream, render, append — with exactly one
//! request in flight at a time.

use std::pin::Pin;

use futures::{Stream, StreamExt};

use crate::chat::config::ChatConfig;
use crate::client::Gemini;
use crate::error::Result;
use crate::flow::Flow;
use crate::observability::{CHAT_REPLY_CHARS, CHAT_TURN_ERRORS, CHAT_TURNS};
use crate::prompt;
use crate::render::Renderer;
use crate::transcript::{Transcript, Turn};
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Model,
    UsageMetadata,
};

/// A boxed one-shot stream of response chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>;

/// The remote completion operation the session depends on.
///
/// `Gemini` is the production implementation; tests drive the session with
/// scripted fragment streams instead.
#[async_trait::async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Submits a full conversation and returns a stream of answer fragments.
    async fn stream_generate(
        &self,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<ChunkStream>;
}

#[async_trait::async_trait]
impl CompletionBackend for Gemini {
    async fn stream_generate(
        &self,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<ChunkStream> {
        Gemini::stream_generate(self, model, request).await
    }
}

/// A chat session that manages conversation state and API interactions.
///
/// The session maintains the transcript and handles streaming responses
/// from the Gemini API. Each session owns its configuration and transcript
/// exclusively; nothing is shared across sessions.
pub struct ChatSession<B: CompletionBackend = Gemini> {
    client: B,
    config: ChatConfig,
    system_prompt: String,
    transcript: Transcript,
    usage_totals: UsageMetadata,
    last_turn_usage: Option<UsageMetadata>,
    request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// The business flow the mentor is teaching.
    pub flow: Flow,
    /// The number of turns in the transcript.
    pub turn_count: usize,
    /// The maximum tokens per response.
    pub max_tokens: u32,
    /// The sampling temperature, if set.
    pub temperature: Option<f32>,
    /// The top-p value, if set.
    pub top_p: Option<f32>,
    /// The top-k value, if set.
    pub top_k: Option<u32>,
    /// Total prompt tokens across all requests.
    pub total_prompt_tokens: u64,
    /// Total generated tokens across all requests.
    pub total_reply_tokens: u64,
    /// Total number of API requests made.
    pub total_requests: u64,
    /// Prompt tokens for the last turn, if reported.
    pub last_turn_prompt_tokens: Option<u64>,
    /// Generated tokens for the last turn, if reported.
    pub last_turn_reply_tokens: Option<u64>,
}

impl ChatSession<Gemini> {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: Gemini, config: ChatConfig) -> Self {
        Self::with_backend(client, config)
    }
}

impl<B: CompletionBackend> ChatSession<B> {
    /// Creates a new chat session with a custom completion backend.
    pub fn with_backend(client: B, config: ChatConfig) -> Self {
        let system_prompt = prompt::assemble(config.flow);
        Self {
            client,
            config,
            system_prompt,
            transcript: Transcript::new(),
            usage_totals: UsageMetadata::default(),
            last_turn_usage: None,
            request_count: 0,
        }
    }

    /// Sends a user message and streams the response.
    ///
    /// This method:
    /// 1. Adds the user turn to the transcript
    /// 2. Sends a streaming request carrying the instruction turn followed
    ///    by the full transcript in order
    /// 3. Renders fragments as they arrive
    /// 4. Adds the complete assistant turn to the transcript
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the stream fails. The user turn
    /// is rolled back so the transcript never holds a question without its
    /// answer.
    pub async fn send_streaming(
        &mut self,
        user_input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        CHAT_TURNS.click();
        let previous_len = self.transcript.len();

        self.transcript.append(Turn::user(user_input));

        let request = self.build_request();
        let mut stream = match self.client.stream_generate(&self.config.model, request).await {
            Ok(stream) => stream,
            Err(err) => {
                CHAT_TURN_ERRORS.click();
                self.transcript.truncate(previous_len);
                return Err(err);
            }
        };

        let mut reply = String::new();
        let mut turn_usage = None;
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(chunk) => {
                    if let Some(fragment) = chunk.text() {
                        renderer.print_text(&fragment);
                        reply.push_str(&fragment);
                    }
                    if let Some(usage) = chunk.usage_metadata {
                        turn_usage = Some(usage);
                    }
                }
                Err(err) => {
                    CHAT_TURN_ERRORS.click();
                    self.transcript.truncate(previous_len);
                    return Err(err);
                }
            }
            if renderer.should_interrupt() {
                renderer.print_interrupted();
                break;
            }
        }
        renderer.finish_response();

        CHAT_REPLY_CHARS.add(reply.chars().count() as f64);
        self.transcript.append(Turn::assistant(reply));
        self.record_usage(turn_usage);
        Ok(())
    }

    /// Builds the request body for the current transcript.
    ///
    /// The contents always begin with exactly one synthetic instruction
    /// turn (the assembled prompt) followed by the real turns in
    /// chronological order.
    fn build_request(&self) -> GenerateContentRequest {
        let mut contents = Vec::with_capacity(self.transcript.len() + 1);
        contents.push(Content::user(&self.system_prompt));
        contents.extend(self.transcript.to_contents());
        GenerateContentRequest::new(contents).with_generation_config(self.generation_config())
    }

    fn generation_config(&self) -> GenerationConfig {
        let mut config = GenerationConfig::new().with_max_output_tokens(self.config.max_tokens);
        if let Some(temperature) = self.config.temperature {
            config = config.with_temperature(temperature);
        }
        if let Some(top_p) = self.config.top_p {
            config = config.with_top_p(top_p);
        }
        if let Some(top_k) = self.config.top_k {
            config = config.with_top_k(top_k);
        }
        config
    }

    fn record_usage(&mut self, turn_usage: Option<UsageMetadata>) {
        self.request_count = self.request_count.saturating_add(1);
        self.last_turn_usage = turn_usage;
        if let Some(usage) = turn_usage {
            self.usage_totals.accumulate(usage);
        }
    }

    /// Clears the conversation history.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Returns the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the number of turns in the transcript.
    pub fn turn_count(&self) -> usize {
        self.transcript.len()
    }

    /// Returns the assembled instruction string.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Returns the current flow.
    pub fn flow(&self) -> Flow {
        self.config.flow
    }

    /// Switches the business flow and reassembles the instructions.
    ///
    /// The transcript is kept; only the instruction turn of future requests
    /// changes.
    pub fn set_flow(&mut self, flow: Flow) {
        self.config.flow = flow;
        self.system_prompt = prompt::assemble(flow);
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.config.model
    }

    /// Changes the model used for responses.
    pub fn set_model(&mut self, model: Model) {
        self.config.model = model;
    }

    /// Sets the maximum tokens per response.
    pub fn set_max_tokens(&mut self, max_tokens: u32) {
        self.config.max_tokens = max_tokens;
    }

    /// Sets the sampling temperature.
    pub fn set_temperature(&mut self, temperature: Option<f32>) {
        self.config.temperature = temperature;
    }

    /// Sets the top-p value.
    pub fn set_top_p(&mut self, top_p: Option<f32>) {
        self.config.top_p = top_p;
    }

    /// Sets the top-k value.
    pub fn set_top_k(&mut self, top_k: Option<u32>) {
        self.config.top_k = top_k;
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.config.model.clone(),
            flow: self.config.flow,
            turn_count: self.turn_count(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            top_k: self.config.top_k,
            total_prompt_tokens: self.usage_totals.prompt_token_count,
            total_reply_tokens: self.usage_totals.candidates_token_count,
            total_requests: self.request_count,
            last_turn_prompt_tokens: self.last_turn_usage.map(|usage| usage.prompt_token_count),
            last_turn_reply_tokens: self
                .last_turn_usage
                .map(|usage| usage.candidates_token_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::stream;

    use super::*;
    use crate::error::Error;
    use crate::transcript::TurnRole;
    use crate::types::Candidate;

    /// Backend that replays a scripted chunk sequence and records the
    /// request it was given.
    struct ScriptedBackend {
        script: Vec<Result<GenerateContentResponse>>,
        last_request: Mutex<Option<GenerateContentRequest>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<Result<GenerateContentResponse>>) -> Self {
            Self {
                script,
                last_request: Mutex::new(None),
            }
        }

        fn last_request(&self) -> Option<GenerateContentRequest> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn stream_generate(
            &self,
            _model: &Model,
            request: GenerateContentRequest,
        ) -> Result<ChunkStream> {
            *self.last_request.lock().unwrap() = Some(request);
            let script: Vec<_> = self.script.clone();
            Ok(Box::pin(stream::iter(script)))
        }
    }

    /// Backend that fails before any fragment is produced.
    struct FailingBackend;

    #[async_trait::async_trait]
    impl CompletionBackend for FailingBackend {
        async fn stream_generate(
            &self,
            _model: &Model,
            _request: GenerateContentRequest,
        ) -> Result<ChunkStream> {
            Err(Error::service_unavailable("model overloaded", None))
        }
    }

    /// Renderer that captures everything instead of printing.
    #[derive(Default)]
    struct CaptureRenderer {
        text: String,
        errors: Vec<String>,
        finished: usize,
    }

    impl Renderer for CaptureRenderer {
        fn print_text(&mut self, text: &str) {
            self.text.push_str(text);
        }

        fn print_error(&mut self, error: &str) {
            self.errors.push(error.to_string());
        }

        fn print_info(&mut self, _info: &str) {}

        fn finish_response(&mut self) {
            self.finished += 1;
        }
    }

    fn chunk(text: &str) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(Content::model(text)),
                finish_reason: None,
                index: Some(0),
            }]),
            usage_metadata: None,
            model_version: None,
        }
    }

    fn final_chunk(text: &str, usage: UsageMetadata) -> GenerateContentResponse {
        let mut chunk = chunk(text);
        chunk.usage_metadata = Some(usage);
        chunk
    }

    fn session_with(
        script: Vec<Result<GenerateContentResponse>>,
    ) -> ChatSession<ScriptedBackend> {
        ChatSession::with_backend(ScriptedBackend::new(script), ChatConfig::default())
    }

    #[tokio::test]
    async fn streamed_fragments_concatenate_in_order() {
        let mut session = session_with(vec![
            Ok(chunk("The first step ")),
            Ok(chunk("is a purchase ")),
            Ok(chunk("requisition.")),
        ]);
        let mut renderer = CaptureRenderer::default();

        session
            .send_streaming("What is the first step?", &mut renderer)
            .await
            .unwrap();

        assert_eq!(renderer.text, "The first step is a purchase requisition.");
        assert_eq!(renderer.finished, 1);

        let turns = session.transcript().all();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("What is the first step?"));
        assert_eq!(
            turns[1],
            Turn::assistant("The first step is a purchase requisition.")
        );
    }

    #[tokio::test]
    async fn request_starts_with_instruction_turn() {
        let mut session = session_with(vec![Ok(chunk("Answer."))]);
        let mut renderer = CaptureRenderer::default();

        session
            .send_streaming("What is the first step?", &mut renderer)
            .await
            .unwrap();

        let request = {
            let backend = &session.client;
            backend.last_request().unwrap()
        };
        assert_eq!(request.contents.len(), 2);
        assert_eq!(
            request.contents[0],
            Content::user(session.system_prompt())
        );
        assert_eq!(
            request.contents[1].text(),
            Some("What is the first step?".to_string())
        );
    }

    #[tokio::test]
    async fn transcript_alternates_across_exchanges() {
        let mut session = session_with(vec![Ok(chunk("answer"))]);
        let mut renderer = CaptureRenderer::default();

        for question in ["one?", "two?", "three?"] {
            session.send_streaming(question, &mut renderer).await.unwrap();
        }

        let turns = session.transcript().all();
        assert_eq!(turns.len(), 6);
        for (i, turn) in turns.iter().enumerate() {
            let expected = if i % 2 == 0 {
                TurnRole::User
            } else {
                TurnRole::Assistant
            };
            assert_eq!(turn.role, expected);
        }

        // Each request carries one instruction turn plus the history so far.
        let request = session.client.last_request().unwrap();
        assert_eq!(request.contents.len(), 6);
    }

    #[tokio::test]
    async fn request_failure_rolls_back_user_turn() {
        let mut session = ChatSession::with_backend(FailingBackend, ChatConfig::default());
        let mut renderer = CaptureRenderer::default();

        let err = session
            .send_streaming("hello?", &mut renderer)
            .await
            .unwrap_err();
        assert!(err.is_server_error());
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn mid_stream_failure_rolls_back_user_turn() {
        let mut session = session_with(vec![
            Ok(chunk("partial ")),
            Err(Error::streaming("connection reset", None)),
        ]);
        let mut renderer = CaptureRenderer::default();

        let err = session
            .send_streaming("hello?", &mut renderer)
            .await
            .unwrap_err();
        assert!(err.is_streaming());
        assert!(session.transcript().is_empty());
        // The fragments that did arrive were still displayed.
        assert_eq!(renderer.text, "partial ");
    }

    #[tokio::test]
    async fn usage_totals_accumulate() {
        let mut session = session_with(vec![Ok(final_chunk(
            "answer",
            UsageMetadata::new(100, 25),
        ))]);
        let mut renderer = CaptureRenderer::default();

        session.send_streaming("one?", &mut renderer).await.unwrap();
        session.send_streaming("two?", &mut renderer).await.unwrap();

        let stats = session.stats();
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.total_prompt_tokens, 200);
        assert_eq!(stats.total_reply_tokens, 50);
        assert_eq!(stats.last_turn_prompt_tokens, Some(100));
        assert_eq!(stats.last_turn_reply_tokens, Some(25));
    }

    #[tokio::test]
    async fn set_flow_reassembles_instructions() {
        let mut session = session_with(vec![Ok(chunk("answer"))]);
        assert!(session.system_prompt().contains(Flow::ProcureToPay.label()));

        session.set_flow(Flow::OrderToCash);
        assert_eq!(session.flow(), Flow::OrderToCash);
        assert!(session.system_prompt().contains(Flow::OrderToCash.label()));
        assert!(!session.system_prompt().contains(Flow::ProcureToPay.label()));
    }

    #[tokio::test]
    async fn clear_empties_transcript() {
        let mut session = session_with(vec![Ok(chunk("answer"))]);
        let mut renderer = CaptureRenderer::default();

        session.send_streaming("one?", &mut renderer).await.unwrap();
        assert_eq!(session.turn_count(), 2);

        session.clear();
        assert_eq!(session.turn_count(), 0);
    }
}

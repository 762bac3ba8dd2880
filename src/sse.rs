//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! `streamGenerateContent?alt=sse` delivers one JSON chunk per SSE event.
//! Unlike some providers there are no typed `event:` lines and no `[DONE]`
//! sentinel: every event is a bare `data:` line holding a
//! `GenerateContentResponse`, and the stream simply ends when the answer is
//! complete. This module converts the raw byte stream into a stream of
//! parsed chunks, handling buffering across packet boundaries.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability::{STREAM_CHUNKS, STREAM_ERRORS};
use crate::types::GenerateContentResponse;

/// Process a stream of bytes into a stream of response chunks.
///
/// This function takes a byte stream from an HTTP response and converts it
/// into a stream of parsed `GenerateContentResponse` chunks, handling SSE
/// parsing, buffering, and error conditions.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<GenerateContentResponse>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    // Use a state machine to process the SSE stream. `pending` holds raw
    // bytes not yet decoded: a multi-byte character may straddle a packet
    // boundary, so decoding must happen on the accumulated bytes, not on
    // each packet in isolation.
    let buffer = String::new();
    let pending: Vec<u8> = Vec::new();

    stream::unfold(
        (stream, buffer, pending),
        move |(mut stream, mut buffer, mut pending)| async move {
            loop {
                // First check if we have a complete event in the buffer
                if let Some((event, remaining)) = extract_event(&buffer) {
                    buffer = remaining;
                    match event {
                        Some(event) => {
                            count_event(&event);
                            return Some((event, (stream, buffer, pending)));
                        }
                        // Comment or empty event; keep draining the buffer.
                        None => continue,
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => {
                        pending.extend_from_slice(&bytes);
                        match std::str::from_utf8(&pending) {
                            Ok(text) => {
                                buffer.push_str(text);
                                pending.clear();
                            }
                            Err(e) if e.error_len().is_none() => {
                                // The bytes end mid-character; decode the
                                // valid prefix and keep the tail until the
                                // rest of the character arrives.
                                let valid = e.valid_up_to();
                                if let Ok(text) = std::str::from_utf8(&pending[..valid]) {
                                    buffer.push_str(text);
                                }
                                pending.drain(..valid);
                            }
                            Err(e) => {
                                STREAM_ERRORS.click();
                                return Some((
                                    Err(Error::encoding(
                                        format!("Invalid UTF-8 in stream: {e}"),
                                        Some(Box::new(e)),
                                    )),
                                    (stream, buffer, pending),
                                ));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer, pending)));
                    }
                    None => {
                        // A leftover partial character means the stream was
                        // cut off mid-answer.
                        if !pending.is_empty() {
                            STREAM_ERRORS.click();
                            pending.clear();
                            return Some((
                                Err(Error::encoding(
                                    "Stream ended with an incomplete UTF-8 sequence",
                                    None,
                                )),
                                (stream, buffer, pending),
                            ));
                        }
                        // End of stream; flush anything still buffered.
                        if !buffer.trim().is_empty() {
                            let leftover = std::mem::take(&mut buffer);
                            if let Some(event) = parse_event(&leftover) {
                                count_event(&event);
                                return Some((event, (stream, buffer, pending)));
                            }
                        }
                        return None;
                    }
                }
            }
        },
    )
}

fn count_event(event: &Result<GenerateContentResponse>) {
    match event {
        Ok(_) => STREAM_CHUNKS.click(),
        Err(_) => STREAM_ERRORS.click(),
    }
}

/// Extract one complete SSE event from the buffer.
///
/// Events are delimited by blank lines. Returns the parsed chunk (or `None`
/// in the inner option for comment/empty events) together with the
/// remainder of the buffer.
fn extract_event(buffer: &str) -> Option<(Option<Result<GenerateContentResponse>>, String)> {
    let parts: Vec<&str> = buffer.splitn(2, "\n\n").collect();
    if parts.len() != 2 {
        return None;
    }
    let event_text = parts[0];
    let rest = parts[1].to_string();

    Some((parse_event(event_text), rest))
}

/// Parse the data lines of one SSE event into a response chunk.
///
/// Per the SSE format, multiple `data:` lines within an event concatenate
/// with newlines. Lines starting with `:` are comments and lines with other
/// field names are ignored.
fn parse_event(event_text: &str) -> Option<Result<GenerateContentResponse>> {
    let mut data = String::new();
    for line in event_text.lines() {
        if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }

    if data.is_empty() {
        return None;
    }

    match serde_json::from_str::<GenerateContentResponse>(&data) {
        Ok(chunk) => Some(Ok(chunk)),
        Err(e) => Some(Err(Error::serialization(
            format!("Failed to parse stream chunk: {e}"),
            Some(Box::new(e)),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunk_json(text: &str) -> String {
        format!(
            concat!(
                r#"data: {{"candidates": [{{"content": "#,
                r#"{{"role": "model", "parts": [{{"text": "{}"}}]}}, "index": 0}}]}}"#,
                "\n\n"
            ),
            text
        )
    }

    #[tokio::test]
    async fn parse_single_chunk() {
        let data = chunk_json("Hello");
        let stream = Box::pin(stream::once(async move { Ok(Bytes::from(data)) }));

        let mut sse_stream = Box::pin(process_sse(stream));
        let chunk = sse_stream.next().await.unwrap().unwrap();

        assert_eq!(chunk.text(), Some("Hello".to_string()));
        assert!(sse_stream.next().await.is_none());
    }

    #[tokio::test]
    async fn parse_multiple_chunks_in_order() {
        let data = format!("{}{}{}", chunk_json("one "), chunk_json("two "), chunk_json("three"));
        let stream = Box::pin(stream::once(async move { Ok(Bytes::from(data)) }));

        let mut sse_stream = Box::pin(process_sse(stream));
        let mut collected = String::new();
        while let Some(chunk) = sse_stream.next().await {
            collected.push_str(&chunk.unwrap().text().unwrap());
        }

        assert_eq!(collected, "one two three");
    }

    #[tokio::test]
    async fn handle_chunk_split_across_packets() {
        let whole = chunk_json("split");
        let (first, second) = whole.split_at(20);
        let first = first.to_string();
        let second = second.to_string();

        let stream = Box::pin(stream::iter(vec![
            Ok(Bytes::from(first)),
            Ok(Bytes::from(second)),
        ]));

        let mut sse_stream = Box::pin(process_sse(stream));
        let chunk = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(chunk.text(), Some("split".to_string()));
    }

    #[tokio::test]
    async fn handle_utf8_character_split_across_packets() {
        let bytes = chunk_json("café").into_bytes();
        // Split between the two bytes of 'é'.
        let split = bytes.iter().position(|&b| b == 0xC3).unwrap() + 1;
        let first = Bytes::copy_from_slice(&bytes[..split]);
        let second = Bytes::copy_from_slice(&bytes[split..]);

        let stream = Box::pin(stream::iter(vec![Ok(first), Ok(second)]));

        let mut sse_stream = Box::pin(process_sse(stream));
        let chunk = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(chunk.text(), Some("café".to_string()));
        assert!(sse_stream.next().await.is_none());
    }

    #[tokio::test]
    async fn stream_truncated_mid_character_errors() {
        let mut data = chunk_json("café").into_bytes();
        data.truncate(data.iter().position(|&b| b == 0xC3).unwrap() + 1);
        let stream = Box::pin(stream::once(async move { Ok(Bytes::from(data)) }));

        let mut sse_stream = Box::pin(process_sse(stream));
        let chunk = sse_stream.next().await.unwrap();
        assert!(chunk.is_err());
    }

    #[tokio::test]
    async fn handle_malformed_chunk() {
        let data = "data: this is not json\n\n";
        let stream = Box::pin(stream::once(async { Ok(Bytes::from(&data[..])) }));

        let mut sse_stream = Box::pin(process_sse(stream));
        let chunk = sse_stream.next().await.unwrap();
        assert!(chunk.is_err());
    }

    #[tokio::test]
    async fn skip_comments_and_blank_events() {
        let data = format!(": keep-alive\n\n{}", chunk_json("after"));
        let stream = Box::pin(stream::once(async move { Ok(Bytes::from(data)) }));

        let mut sse_stream = Box::pin(process_sse(stream));
        let chunk = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(chunk.text(), Some("after".to_string()));
        assert!(sse_stream.next().await.is_none());
    }

    #[tokio::test]
    async fn flush_trailing_event_without_terminator() {
        // Final event missing the trailing blank line.
        let whole = chunk_json("tail");
        let data = whole.trim_end().to_string();
        let stream = Box::pin(stream::once(async move { Ok(Bytes::from(data)) }));

        let mut sse_stream = Box::pin(process_sse(stream));
        let chunk = sse_stream.next().await.unwrap().unwrap();
        assert_eq!(chunk.text(), Some("tail".to_string()));
        assert!(sse_stream.next().await.is_none());
    }
}

//! Incremental decoder for OpenAI-style chat completion streams
//!
//! The response body is a sequence of server-sent events. Each `data:` line
//! holds either a JSON chunk whose `choices[0].delta.content` carries the next
//! text fragment, or the literal `[DONE]` sentinel. The decoder appends every
//! fragment to a running buffer and hands the whole buffer (a growing
//! snapshot, never just the delta) to the caller after each fragment.
//!
//! A `data:` chunk with a top-level `error` object aborts the stream with a
//! provider-reported error. A body that never contains a single event is
//! read as a plain chat completion, since some compatible servers ignore
//! `stream: true`.

use crate::config::constants::sse::DONE_SENTINEL;
use crate::llm::error::{ProviderError, extract_provider_message};
use crate::llm::providers::openai::parse_chat_completion;
use crate::utils::sse::{LineBuffer, data_payload};
use futures::{Stream, StreamExt};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Upper bound on the non-event text kept for the plain-body fallback
const MAX_UNFRAMED_BYTES: usize = 256 * 1024;

/// One decoded event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// Text fragment, `None` when the chunk carried no content (role headers, finish markers)
    Delta(Option<String>),
    /// Structured error sent in place of a chunk; holds the raw event payload
    Error(String),
    /// The `[DONE]` sentinel
    Done,
}

impl StreamFrame {
    /// Parse one line. Returns `None` for lines that are not `data:` events.
    pub fn parse(line: &str) -> Option<Result<Self, serde_json::Error>> {
        let payload = data_payload(line)?;
        if payload.is_empty() {
            return None;
        }
        if payload == DONE_SENTINEL {
            return Some(Ok(StreamFrame::Done));
        }

        Some(serde_json::from_str::<Value>(payload).map(|chunk| {
            if chunk.get("error").is_some_and(|error| !error.is_null()) {
                return StreamFrame::Error(payload.to_string());
            }

            let content = chunk
                .get("choices")
                .and_then(|choices| choices.get(0))
                .and_then(|choice| choice.get("delta"))
                .and_then(|delta| delta.get("content"))
                .and_then(Value::as_str)
                .map(str::to_string);
            StreamFrame::Delta(content)
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    Continue,
    Finished,
}

#[derive(Debug, Default)]
pub struct StreamDecoder {
    text: String,
    lines: LineBuffer,
    finished: bool,
    frames: usize,
    skipped_frames: usize,
    unframed: String,
    error: Option<ProviderError>,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one network chunk, emitting a snapshot after every fragment
    pub fn push_chunk<F>(&mut self, chunk: &[u8], on_partial: &mut F) -> DecodeStatus
    where
        F: FnMut(&str) + ?Sized,
    {
        if self.finished {
            return DecodeStatus::Finished;
        }

        for line in self.lines.push(chunk) {
            if self.handle_line(&line, on_partial) == DecodeStatus::Finished {
                return DecodeStatus::Finished;
            }
        }
        DecodeStatus::Continue
    }

    /// Flush a final line that arrived without a trailing newline
    pub fn finish<F>(&mut self, on_partial: &mut F)
    where
        F: FnMut(&str) + ?Sized,
    {
        if self.finished {
            return;
        }
        if let Some(line) = self.lines.finish() {
            self.handle_line(&line, on_partial);
        }
        self.finished = true;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of `data:` events seen so far, malformed ones included
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of `data:` lines dropped because they were not valid JSON
    pub fn skipped_frames(&self) -> usize {
        self.skipped_frames
    }

    /// Error reported by the provider inside the stream, if any
    pub fn error(&self) -> Option<&ProviderError> {
        self.error.as_ref()
    }

    /// Settle the decoded body: the provider's error, the streamed text, or
    /// the plain-body reading when no event ever arrived
    pub fn into_result<F>(
        self,
        provider: &str,
        on_partial: &mut F,
    ) -> Result<String, ProviderError>
    where
        F: FnMut(&str) + ?Sized,
    {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.frames > 0 {
            return Ok(self.text);
        }

        debug!(provider, "stream body carried no events, reading it as a plain completion");
        let text = parse_unframed(provider, &self.unframed)?;
        if !text.is_empty() {
            on_partial(&text);
        }
        Ok(text)
    }

    fn handle_line<F>(&mut self, line: &str, on_partial: &mut F) -> DecodeStatus
    where
        F: FnMut(&str) + ?Sized,
    {
        if data_payload(line).is_none() {
            self.keep_unframed(line);
            return DecodeStatus::Continue;
        }

        let Some(frame) = StreamFrame::parse(line) else {
            return DecodeStatus::Continue;
        };
        self.frames += 1;

        match frame {
            Ok(StreamFrame::Done) => {
                debug!(chars = self.text.len(), "stream sentinel received");
                self.finished = true;
                DecodeStatus::Finished
            }
            Ok(StreamFrame::Error(payload)) => {
                warn!(frame = %preview(line), "provider reported an error mid-stream");
                self.error = Some(ProviderError::reported(
                    "Provider reported an error while streaming",
                    payload,
                ));
                self.finished = true;
                DecodeStatus::Finished
            }
            Ok(StreamFrame::Delta(Some(fragment))) if !fragment.is_empty() => {
                self.text.push_str(&fragment);
                on_partial(&self.text);
                DecodeStatus::Continue
            }
            Ok(StreamFrame::Delta(_)) => DecodeStatus::Continue,
            Err(error) => {
                self.skipped_frames += 1;
                warn!(%error, frame = %preview(line), "skipping malformed stream frame");
                DecodeStatus::Continue
            }
        }
    }

    fn keep_unframed(&mut self, line: &str) {
        if self.frames > 0 || self.unframed.len() + line.len() > MAX_UNFRAMED_BYTES {
            return;
        }
        self.unframed.push_str(line);
        self.unframed.push('\n');
    }
}

/// Drive a decoder over a live response body until the sentinel or end of stream
pub async fn decode_stream<S, B, E, F>(
    provider: &str,
    stream: S,
    on_partial: &mut F,
) -> Result<String, ProviderError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: fmt::Display,
    F: FnMut(&str) + ?Sized,
{
    let mut stream = std::pin::pin!(stream);
    let mut decoder = StreamDecoder::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|error| {
            ProviderError::transport(format!("Failed to read stream chunk: {error}"))
        })?;
        if decoder.push_chunk(chunk.as_ref(), on_partial) == DecodeStatus::Finished {
            break;
        }
    }

    decoder.finish(on_partial);
    decoder.into_result(provider, on_partial)
}

fn parse_unframed(provider: &str, body: &str) -> Result<String, ProviderError> {
    if body.trim().is_empty() {
        return Err(ProviderError::malformed(format!(
            "{provider} stream ended without any events"
        )));
    }
    if extract_provider_message(body).is_some() {
        return Err(ProviderError::reported(
            format!("{provider} returned an error instead of a stream"),
            body.trim().to_string(),
        ));
    }
    parse_chat_completion(provider, body)
}

fn preview(line: &str) -> String {
    line.chars().take(120).collect()
}

//! Decoding of streamed chat completions.
//!
//! The endpoint answers a `stream: true` request with Server-Sent Events:
//!
//! ```text
//! data: {"choices":[{"delta":{"content":"Hel"},"finish_reason":null}]}
//!
//! data: {"choices":[{"delta":{"content":"lo"},"finish_reason":"stop"}],"usage":{...}}
//!
//! data: [DONE]
//! ```
//!
//! `finish_reason` stays null until the last substantive chunk, which may
//! also carry `usage`. Nothing after `[DONE]` is read.

use super::types::{ChatCompletionChunk, Usage};
use crate::{Error, Result};
use bytes::{Bytes, BytesMut};
use futures_util::{
    Stream, StreamExt,
    stream::{self, BoxStream},
};
use tracing::{debug, warn};

pub const DONE_SENTINEL: &str = "[DONE]";

/// Longest line accepted before the stream is abandoned.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

pub type ChatStream = BoxStream<'static, Result<ChatCompletionChunk>>;

#[derive(Debug)]
pub enum SseEvent {
    Chunk(Box<ChatCompletionChunk>),
    Done,
    /// Blank lines, comments and non-`data` fields.
    Ignored,
    Malformed { payload: String, error: String },
}

pub fn parse_sse_line(line: &str) -> SseEvent {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return SseEvent::Ignored;
    }

    let Some(payload) = trimmed.strip_prefix("data:") else {
        return SseEvent::Ignored;
    };
    let payload = payload.trim();

    if payload == DONE_SENTINEL {
        return SseEvent::Done;
    }

    match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(chunk) => SseEvent::Chunk(Box::new(chunk)),
        Err(e) => SseEvent::Malformed {
            payload: payload.to_string(),
            error: e.to_string(),
        },
    }
}

struct DecoderState<S> {
    stream: S,
    buf: BytesMut,
    /// Bytes of `buf` already known to hold no newline.
    scanned: usize,
    eof: bool,
    done: bool,
}

/// Turns a raw SSE byte stream into completion chunks.
///
/// Malformed `data:` payloads are logged and skipped. A transport error, or
/// a line longer than [`MAX_LINE_BYTES`], ends the stream after being
/// yielded once.
pub fn decode_chunks<S, E>(byte_stream: S) -> ChatStream
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
    E: Into<Error> + Send + 'static,
{
    let state = DecoderState {
        stream: byte_stream.boxed(),
        buf: BytesMut::new(),
        scanned: 0,
        eof: false,
        done: false,
    };

    stream::unfold(state, |mut st| async move {
        if st.done {
            return None;
        }

        loop {
            let Some(line) = next_line(&mut st.buf, &mut st.scanned, st.eof) else {
                if st.buf.len() > MAX_LINE_BYTES {
                    st.done = true;
                    let err = Error::stream(format!(
                        "stream line exceeds {} bytes without a newline",
                        MAX_LINE_BYTES
                    ));
                    warn!("{}", err);
                    return Some((Err(err), st));
                }
                if st.eof {
                    debug!("Chat stream ended without {}", DONE_SENTINEL);
                    return None;
                }
                match st.stream.next().await {
                    Some(Ok(bytes)) => st.buf.extend_from_slice(&bytes),
                    Some(Err(e)) => {
                        st.done = true;
                        let err: Error = e.into();
                        warn!("Chat stream transport error: {}", err);
                        return Some((Err(err), st));
                    }
                    None => st.eof = true,
                }
                continue;
            };

            match parse_sse_line(&line) {
                SseEvent::Chunk(chunk) => return Some((Ok(*chunk), st)),
                SseEvent::Done => {
                    debug!("Chat stream finished with {} signal", DONE_SENTINEL);
                    st.done = true;
                    return None;
                }
                SseEvent::Ignored => continue,
                SseEvent::Malformed { payload, error } => {
                    warn!("Skipping malformed stream chunk: {} - Data: {}", error, payload);
                    continue;
                }
            }
        }
    })
    .boxed()
}

/// Splits one line off `buf`, resuming the newline search at `scanned`.
fn next_line(buf: &mut BytesMut, scanned: &mut usize, eof: bool) -> Option<String> {
    if let Some(pos) = buf[*scanned..].iter().position(|b| *b == b'\n') {
        let line = buf.split_to(*scanned + pos + 1);
        *scanned = 0;
        return Some(String::from_utf8_lossy(&line).into_owned());
    }
    *scanned = buf.len();

    if eof && !buf.is_empty() {
        let rest = buf.split();
        *scanned = 0;
        return Some(String::from_utf8_lossy(&rest).into_owned());
    }

    None
}

/// Everything a finished stream produced, folded together.
#[derive(Debug, Clone, Default)]
pub struct StreamSummary {
    pub id: String,
    pub model: String,
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
    pub chunks: usize,
}

pub async fn collect_stream(mut stream: ChatStream) -> Result<StreamSummary> {
    let mut summary = StreamSummary::default();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        summary.chunks += 1;

        if summary.id.is_empty() {
            summary.id = chunk.id.clone();
        }
        if summary.model.is_empty() {
            summary.model = chunk.model.clone();
        }
        if let Some(content) = chunk.content_delta() {
            summary.content.push_str(content);
        }
        if let Some(reason) = chunk.finish_reason() {
            summary.finish_reason = Some(reason.to_string());
        }
        if chunk.usage.is_some() {
            summary.usage = chunk.usage;
        }
    }

    Ok(summary)
}

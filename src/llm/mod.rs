mod client;
mod stream;
mod types;

pub use client::{ChutesLlmClient, ImageInput, LlmClient, ask_with_images, vision_message};
pub use stream::{
    ChatStream, DONE_SENTINEL, SseEvent, StreamSummary, collect_stream, decode_chunks,
    parse_sse_line,
};
pub use types::*;

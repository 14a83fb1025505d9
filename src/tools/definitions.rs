use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use std::sync::Arc;

pub const GENERATE_MUSIC: &str = "generate_music";
pub const GENERATE_VIDEO_FROM_TEXT: &str = "generate_video_from_text";
pub const GENERATE_VIDEO_FROM_IMAGE: &str = "generate_video_from_image";
pub const GENERATE_VIDEO_FROM_IMAGE_FAST: &str = "generate_video_from_image_fast";
pub const GENERATE_IMAGE: &str = "generate_image";
pub const EDIT_IMAGE: &str = "edit_image";
pub const CHUTES_CHAT: &str = "chutes_chat";
pub const CHUTES_CHAT_STREAM: &str = "chutes_chat_stream";
pub const CHUTES_VISION_CHAT: &str = "chutes_vision_chat";
pub const CHECK_MCP_STATUS: &str = "check_mcp_status";

fn save_to_file() -> Value {
    json!({
        "type": "boolean",
        "default": true,
        "description": "If true, the generated file is also written to the configured output directory."
    })
}

fn chat_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "messages": {
                "type": "array",
                "description": "The conversation so far.",
                "items": {
                    "type": "object",
                    "properties": {
                        "role": {"type": "string"},
                        "content": {"type": "string"}
                    },
                    "required": ["role", "content"]
                }
            },
            "model": {"type": "string", "description": "Model to use. Defaults to the configured LLM model."},
            "temperature": {"type": "number", "default": 0.7},
            "max_tokens": {"type": "integer", "default": 1024, "minimum": 1}
        },
        "required": ["messages"]
    })
}

fn tool(name: &'static str, description: &'static str, input_schema: Value) -> Tool {
    let schema: JsonObject = match input_schema {
        Value::Object(map) => map,
        _ => JsonObject::new(),
    };
    Tool::new(name, description, Arc::new(schema))
}

pub fn tool_definitions() -> Vec<Tool> {
    vec![
        tool(
            GENERATE_MUSIC,
            "Generates a music file (WAV). By default it is also saved to the output directory.",
            json!({
                "type": "object",
                "properties": {
                    "style_prompt": {"type": "string", "description": "A description of the desired music style."},
                    "lyrics": {"type": "string", "description": "The lyrics for the song."},
                    "audio_b64": {"type": "string", "description": "A base64 encoded reference audio file."},
                    "save_to_file": save_to_file()
                }
            }),
        ),
        tool(
            GENERATE_VIDEO_FROM_TEXT,
            "Generates a video (MP4) from a text prompt.",
            json!({
                "type": "object",
                "properties": {
                    "prompt": {"type": "string", "description": "A text description of the desired video."},
                    "negative_prompt": {"type": "string", "description": "What to avoid in the video."},
                    "resolution": {"type": "string", "default": "832*480", "description": "Resolution such as '832*480' or '1024*576'."},
                    "fps": {"type": "integer", "default": 24, "minimum": 1, "maximum": 60},
                    "frames": {"type": "integer", "default": 81, "minimum": 1},
                    "steps": {"type": "integer", "default": 25, "minimum": 1, "maximum": 100},
                    "guidance_scale": {"type": "number", "default": 5.0, "minimum": 1.0, "maximum": 20.0},
                    "seed": {"type": ["integer", "null"], "default": 42},
                    "save_to_file": save_to_file()
                },
                "required": ["prompt"]
            }),
        ),
        tool(
            GENERATE_VIDEO_FROM_IMAGE,
            "Generates a video (MP4) from a starting image and a prompt.",
            json!({
                "type": "object",
                "properties": {
                    "prompt": {"type": "string", "description": "A text description of the desired video."},
                    "image_b64": {"type": "string", "description": "Base64 encoded starting image."},
                    "negative_prompt": {"type": "string"},
                    "resolution": {"type": "string"},
                    "fps": {"type": "integer", "minimum": 1, "maximum": 60},
                    "frames": {"type": "integer", "minimum": 1},
                    "steps": {"type": "integer", "default": 25, "minimum": 1, "maximum": 100},
                    "guidance_scale": {"type": "number", "default": 5.0, "minimum": 1.0, "maximum": 20.0},
                    "seed": {"type": ["integer", "null"], "default": 42},
                    "save_to_file": save_to_file()
                },
                "required": ["prompt", "image_b64"]
            }),
        ),
        tool(
            GENERATE_VIDEO_FROM_IMAGE_FAST,
            "Generates a video (MP4) from an image using the fast image-to-video endpoint.",
            json!({
                "type": "object",
                "properties": {
                    "prompt": {"type": "string"},
                    "image": {"type": "string", "description": "Image URL or base64 encoded data."},
                    "negative_prompt": {"type": "string"},
                    "resolution": {"type": "string", "default": "480p", "description": "'480p', '720p' or '1080p'."},
                    "fps": {"type": "integer", "default": 16, "minimum": 1, "maximum": 60},
                    "frames": {"type": "integer", "default": 81, "minimum": 1},
                    "guidance_scale": {"type": "number", "default": 1.0, "minimum": 1.0, "maximum": 20.0},
                    "guidance_scale_2": {"type": "number", "default": 1.0, "minimum": 1.0, "maximum": 20.0},
                    "seed": {"type": ["integer", "null"]},
                    "fast": {"type": "boolean", "default": true},
                    "save_to_file": save_to_file()
                },
                "required": ["prompt", "image"]
            }),
        ),
        tool(
            GENERATE_IMAGE,
            "Generates a JPEG image from a text prompt.",
            json!({
                "type": "object",
                "properties": {
                    "prompt": {"type": "string"},
                    "negative_prompt": {"type": "string", "default": ""},
                    "width": {"type": "integer", "default": 1024, "minimum": 1},
                    "height": {"type": "integer", "default": 1024, "minimum": 1},
                    "num_inference_steps": {"type": "integer", "default": 50, "minimum": 1},
                    "seed": {"type": ["integer", "null"]},
                    "true_cfg_scale": {"type": "number"},
                    "save_to_file": save_to_file()
                },
                "required": ["prompt"]
            }),
        ),
        tool(
            EDIT_IMAGE,
            "Edits one or more images according to a text prompt and returns a JPEG.",
            json!({
                "type": "object",
                "properties": {
                    "prompt": {"type": "string"},
                    "image_b64s": {"type": "array", "items": {"type": "string"}, "minItems": 1},
                    "negative_prompt": {"type": "string", "default": ""},
                    "width": {"type": "integer", "default": 1024, "minimum": 1},
                    "height": {"type": "integer", "default": 1024, "minimum": 1},
                    "num_inference_steps": {"type": "integer", "default": 40, "minimum": 1},
                    "seed": {"type": ["integer", "null"]},
                    "true_cfg_scale": {"type": "number", "default": 4.0},
                    "save_to_file": save_to_file()
                },
                "required": ["prompt", "image_b64s"]
            }),
        ),
        tool(
            CHUTES_CHAT,
            "Sends a conversation to a Chutes LLM and returns a single response.",
            chat_schema(),
        ),
        tool(
            CHUTES_CHAT_STREAM,
            "Sends a conversation to a Chutes LLM using a streaming response and returns the assembled text.",
            chat_schema(),
        ),
        tool(
            CHUTES_VISION_CHAT,
            "Asks a vision LLM a question about one or more images.",
            json!({
                "type": "object",
                "properties": {
                    "prompt": {"type": "string"},
                    "images": {"type": "array", "items": {"type": "string"}, "description": "Image URLs or data:image URLs."},
                    "model": {"type": "string"},
                    "temperature": {"type": "number", "default": 0.7},
                    "max_tokens": {"type": "integer", "default": 1024, "minimum": 1}
                },
                "required": ["prompt", "images"]
            }),
        ),
        tool(
            CHECK_MCP_STATUS,
            "Checks that the server is running and can reach its configured endpoints.",
            json!({"type": "object", "properties": {}}),
        ),
    ]
}

use crate::{Error, Result, config::EndpointKind};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Negative prompt the video endpoints are tuned against.
pub const DEFAULT_VIDEO_NEGATIVE_PROMPT: &str = "Vibrant colors, overexposed, static, blurry details, subtitles, style, artwork, painting, picture, still, overall grayish, worst quality, low quality, JPEG compression artifacts, ugly, incomplete, extra fingers, poorly drawn hands, poorly drawn face, deformed, disfigured, malformed limbs, fused fingers, motionless image, cluttered background, three legs, many people in the background, walking backwards, slow motion";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaFormat {
    Wav,
    Mp4,
    Jpeg,
}

impl MediaFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            MediaFormat::Wav => "audio/wav",
            MediaFormat::Mp4 => "video/mp4",
            MediaFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            MediaFormat::Wav => "wav",
            MediaFormat::Mp4 => "mp4",
            MediaFormat::Jpeg => "jpeg",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedMedia {
    pub format: MediaFormat,
    pub data: Bytes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_b64: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToVideoRequest {
    pub prompt: String,
    #[serde(default = "default_video_negative_prompt")]
    pub negative_prompt: String,
    #[serde(default = "default_video_resolution")]
    pub resolution: String,
    #[serde(default = "default_video_fps")]
    pub fps: u32,
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default = "default_video_steps")]
    pub steps: u32,
    #[serde(default = "default_video_guidance_scale")]
    pub guidance_scale: f32,
    #[serde(default = "default_video_seed", skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageToVideoRequest {
    pub prompt: String,
    pub image_b64: String,
    #[serde(default = "default_video_negative_prompt")]
    pub negative_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<u32>,
    #[serde(default = "default_video_steps")]
    pub steps: u32,
    #[serde(default = "default_video_guidance_scale")]
    pub guidance_scale: f32,
    #[serde(default = "default_video_seed", skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastImageToVideoRequest {
    pub prompt: String,
    /// Image URL or base64 payload.
    pub image: String,
    #[serde(default = "default_video_negative_prompt")]
    pub negative_prompt: String,
    #[serde(default = "default_fast_resolution")]
    pub resolution: String,
    #[serde(default = "default_fast_fps")]
    pub fps: u32,
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default = "default_fast_guidance_scale")]
    pub guidance_scale: f32,
    #[serde(default = "default_fast_guidance_scale")]
    pub guidance_scale_2: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_true")]
    pub fast: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: String,
    #[serde(default = "default_image_side")]
    pub width: u32,
    #[serde(default = "default_image_side")]
    pub height: u32,
    #[serde(default = "default_generation_steps")]
    pub num_inference_steps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub true_cfg_scale: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEditRequest {
    pub prompt: String,
    pub image_b64s: Vec<String>,
    #[serde(default)]
    pub negative_prompt: String,
    #[serde(default = "default_image_side")]
    pub width: u32,
    #[serde(default = "default_image_side")]
    pub height: u32,
    #[serde(default = "default_edit_steps")]
    pub num_inference_steps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_true_cfg_scale")]
    pub true_cfg_scale: f32,
}

impl TextToVideoRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: default_video_negative_prompt(),
            resolution: default_video_resolution(),
            fps: default_video_fps(),
            frames: default_frames(),
            steps: default_video_steps(),
            guidance_scale: default_video_guidance_scale(),
            seed: default_video_seed(),
        }
    }
}

impl ImageToVideoRequest {
    pub fn new(prompt: impl Into<String>, image_b64: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image_b64: image_b64.into(),
            negative_prompt: default_video_negative_prompt(),
            resolution: None,
            fps: None,
            frames: None,
            steps: default_video_steps(),
            guidance_scale: default_video_guidance_scale(),
            seed: default_video_seed(),
        }
    }
}

impl FastImageToVideoRequest {
    pub fn new(prompt: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image: image.into(),
            negative_prompt: default_video_negative_prompt(),
            resolution: default_fast_resolution(),
            fps: default_fast_fps(),
            frames: default_frames(),
            guidance_scale: default_fast_guidance_scale(),
            guidance_scale_2: default_fast_guidance_scale(),
            seed: None,
            fast: true,
        }
    }
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            negative_prompt: String::new(),
            width: default_image_side(),
            height: default_image_side(),
            num_inference_steps: default_generation_steps(),
            seed: None,
            true_cfg_scale: None,
        }
    }
}

impl ImageEditRequest {
    pub fn new(prompt: impl Into<String>, image_b64s: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            image_b64s,
            negative_prompt: String::new(),
            width: default_image_side(),
            height: default_image_side(),
            num_inference_steps: default_edit_steps(),
            seed: None,
            true_cfg_scale: default_true_cfg_scale(),
        }
    }
}

/// One call to a media endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaRequest {
    Music(MusicRequest),
    TextToVideo(TextToVideoRequest),
    ImageToVideo(ImageToVideoRequest),
    FastImageToVideo(FastImageToVideoRequest),
    ImageGeneration(ImageGenerationRequest),
    ImageEdit(ImageEditRequest),
}

impl MediaRequest {
    pub fn endpoint(&self) -> EndpointKind {
        match self {
            MediaRequest::Music(_) => EndpointKind::TextToMusic,
            MediaRequest::TextToVideo(_) => EndpointKind::TextToVideo,
            MediaRequest::ImageToVideo(_) => EndpointKind::ImageToVideo,
            MediaRequest::FastImageToVideo(_) => EndpointKind::ImageToVideoFast,
            MediaRequest::ImageGeneration(_) => EndpointKind::TextToImage,
            MediaRequest::ImageEdit(_) => EndpointKind::ImageToImage,
        }
    }

    pub fn format(&self) -> MediaFormat {
        match self {
            MediaRequest::Music(_) => MediaFormat::Wav,
            MediaRequest::TextToVideo(_)
            | MediaRequest::ImageToVideo(_)
            | MediaRequest::FastImageToVideo(_) => MediaFormat::Mp4,
            MediaRequest::ImageGeneration(_) | MediaRequest::ImageEdit(_) => MediaFormat::Jpeg,
        }
    }

    pub fn to_body(&self) -> Result<serde_json::Value> {
        let body = match self {
            MediaRequest::Music(r) => serde_json::to_value(r)?,
            MediaRequest::TextToVideo(r) => serde_json::to_value(r)?,
            MediaRequest::ImageToVideo(r) => serde_json::to_value(r)?,
            MediaRequest::FastImageToVideo(r) => serde_json::to_value(r)?,
            MediaRequest::ImageGeneration(r) => serde_json::to_value(r)?,
            MediaRequest::ImageEdit(r) => serde_json::to_value(r)?,
        };
        Ok(body)
    }

    /// Generation parameters worth recording next to the produced file.
    /// Base64 payloads are dropped.
    pub fn parameters(&self) -> Result<serde_json::Value> {
        let mut body = self.to_body()?;
        if let Some(map) = body.as_object_mut() {
            for key in ["audio_b64", "image_b64", "image", "image_b64s"] {
                map.remove(key);
            }
        }
        Ok(body)
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            MediaRequest::Music(_) => Ok(()),
            MediaRequest::TextToVideo(r) => {
                require_text("prompt", &r.prompt)?;
                check_range("fps", r.fps, 1, 60)?;
                check_range("frames", r.frames, 1, u32::MAX)?;
                check_range("steps", r.steps, 1, 100)?;
                check_guidance("guidance_scale", r.guidance_scale)
            }
            MediaRequest::ImageToVideo(r) => {
                require_text("prompt", &r.prompt)?;
                require_text("image_b64", &r.image_b64)?;
                if let Some(fps) = r.fps {
                    check_range("fps", fps, 1, 60)?;
                }
                if let Some(frames) = r.frames {
                    check_range("frames", frames, 1, u32::MAX)?;
                }
                check_range("steps", r.steps, 1, 100)?;
                check_guidance("guidance_scale", r.guidance_scale)
            }
            MediaRequest::FastImageToVideo(r) => {
                require_text("prompt", &r.prompt)?;
                require_text("image", &r.image)?;
                check_range("fps", r.fps, 1, 60)?;
                check_range("frames", r.frames, 1, u32::MAX)?;
                check_guidance("guidance_scale", r.guidance_scale)?;
                check_guidance("guidance_scale_2", r.guidance_scale_2)
            }
            MediaRequest::ImageGeneration(r) => {
                require_text("prompt", &r.prompt)?;
                check_range("width", r.width, 1, u32::MAX)?;
                check_range("height", r.height, 1, u32::MAX)?;
                check_range("num_inference_steps", r.num_inference_steps, 1, u32::MAX)
            }
            MediaRequest::ImageEdit(r) => {
                require_text("prompt", &r.prompt)?;
                if r.image_b64s.is_empty() {
                    return Err(Error::invalid_request("image_b64s must contain at least one image"));
                }
                if r.image_b64s.iter().any(|img| img.trim().is_empty()) {
                    return Err(Error::invalid_request("image_b64s must not contain empty entries"));
                }
                check_range("width", r.width, 1, u32::MAX)?;
                check_range("height", r.height, 1, u32::MAX)?;
                check_range("num_inference_steps", r.num_inference_steps, 1, u32::MAX)
            }
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(Error::invalid_request(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

fn check_guidance(field: &str, value: f32) -> Result<()> {
    if !(1.0..=20.0).contains(&value) {
        return Err(Error::invalid_request(format!(
            "{} must be between 1.0 and 20.0, got {}",
            field, value
        )));
    }
    Ok(())
}

fn default_video_negative_prompt() -> String {
    DEFAULT_VIDEO_NEGATIVE_PROMPT.to_string()
}

fn default_video_resolution() -> String {
    "832*480".to_string()
}

fn default_fast_resolution() -> String {
    "480p".to_string()
}

fn default_video_fps() -> u32 {
    24
}

fn default_fast_fps() -> u32 {
    16
}

fn default_frames() -> u32 {
    81
}

fn default_video_steps() -> u32 {
    25
}

fn default_video_guidance_scale() -> f32 {
    5.0
}

fn default_fast_guidance_scale() -> f32 {
    1.0
}

fn default_video_seed() -> Option<u64> {
    Some(42)
}

fn default_true() -> bool {
    true
}

fn default_image_side() -> u32 {
    1024
}

fn default_generation_steps() -> u32 {
    50
}

fn default_edit_steps() -> u32 {
    40
}

fn default_true_cfg_scale() -> f32 {
    4.0
}

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub chutes: ChutesConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub logs: LogsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsConfig {
    /// `error` to `trace`, or `none` to silence output.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write `mcp.log` and `error.log` under `dir`.
    #[serde(default)]
    pub file_enabled: bool,
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Rotated files kept per log before the oldest is removed.
    #[serde(default = "default_log_max_files")]
    pub max_files: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChutesConfig {
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_quota_url")]
    pub quota_url: String,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub models: ModelsConfig,
}

/// Full URLs of each generation endpoint. Unset or empty means "not configured".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub llm: Option<String>,
    pub text_to_image: Option<String>,
    pub image_to_image: Option<String>,
    pub text_to_music: Option<String>,
    pub text_to_video: Option<String>,
    pub image_to_video: Option<String>,
    pub image_to_video_fast: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_llm_model")]
    pub llm: String,
    pub vision_llm: Option<String>,
    pub text_to_image: Option<String>,
    pub image_to_image: Option<String>,
    pub text_to_music: Option<String>,
    pub text_to_video: Option<String>,
    pub image_to_video: Option<String>,
    pub image_to_video_fast: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory generated files are written to. Saving is disabled when unset.
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Llm,
    TextToImage,
    ImageToImage,
    TextToMusic,
    TextToVideo,
    ImageToVideo,
    ImageToVideoFast,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 7] = [
        EndpointKind::Llm,
        EndpointKind::TextToImage,
        EndpointKind::TextToMusic,
        EndpointKind::ImageToImage,
        EndpointKind::TextToVideo,
        EndpointKind::ImageToVideo,
        EndpointKind::ImageToVideoFast,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EndpointKind::Llm => "LLM",
            EndpointKind::TextToImage => "Text to Image",
            EndpointKind::ImageToImage => "Image to Image",
            EndpointKind::TextToMusic => "Text to Music",
            EndpointKind::TextToVideo => "Text to Video",
            EndpointKind::ImageToVideo => "Image to Video",
            EndpointKind::ImageToVideoFast => "Image to Video Fast",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl EndpointsConfig {
    pub fn get(&self, kind: EndpointKind) -> Option<&str> {
        let value = match kind {
            EndpointKind::Llm => &self.llm,
            EndpointKind::TextToImage => &self.text_to_image,
            EndpointKind::ImageToImage => &self.image_to_image,
            EndpointKind::TextToMusic => &self.text_to_music,
            EndpointKind::TextToVideo => &self.text_to_video,
            EndpointKind::ImageToVideo => &self.image_to_video,
            EndpointKind::ImageToVideoFast => &self.image_to_video_fast,
        };
        non_empty(value)
    }
}

impl ModelsConfig {
    /// Model name recorded alongside artifacts produced by `kind`.
    pub fn for_endpoint(&self, kind: EndpointKind) -> Option<&str> {
        match kind {
            EndpointKind::Llm => Some(self.llm.as_str()).filter(|s| !s.is_empty()),
            EndpointKind::TextToImage => non_empty(&self.text_to_image),
            EndpointKind::ImageToImage => non_empty(&self.image_to_image),
            EndpointKind::TextToMusic => non_empty(&self.text_to_music),
            EndpointKind::TextToVideo => non_empty(&self.text_to_video),
            EndpointKind::ImageToVideo => non_empty(&self.image_to_video),
            EndpointKind::ImageToVideoFast => non_empty(&self.image_to_video_fast),
        }
    }

    pub fn vision_llm(&self) -> &str {
        non_empty(&self.vision_llm).unwrap_or(self.llm.as_str())
    }
}

impl ChutesConfig {
    pub fn has_token(&self) -> bool {
        !self.api_token.trim().is_empty()
    }
}

impl StorageConfig {
    pub fn output_dir(&self) -> Option<&str> {
        non_empty(&self.output_dir)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            logs: LogsConfig::default(),
        }
    }
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_enabled: false,
            dir: default_log_dir(),
            max_files: default_log_max_files(),
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            llm: default_llm_model(),
            vision_llm: None,
            text_to_image: None,
            image_to_image: None,
            text_to_music: None,
            text_to_video: None,
            image_to_video: None,
            image_to_video_fast: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_max_files() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    600
}

fn default_quota_url() -> String {
    "https://api.chutes.ai/users/me/quota_usage/0".to_string()
}

fn default_llm_model() -> String {
    "deepseek-ai/DeepSeek-R1-0528".to_string()
}

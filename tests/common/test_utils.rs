use chutes_mcp_rust::{
    Result,
    config::{
        ChutesConfig, Config, EndpointsConfig, LogsConfig, ModelsConfig, ServerConfig,
        StorageConfig,
    },
};
use tempfile::TempDir;
use tokio::fs;

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            logs: LogsConfig {
                level: "debug".to_string(),
                ..LogsConfig::default()
            },
        },
        chutes: ChutesConfig {
            api_token: "test-api-token".to_string(),
            timeout_secs: 10,
            quota_url: "http://127.0.0.1:9/users/me/quota_usage/0".to_string(),
            endpoints: EndpointsConfig::default(),
            models: ModelsConfig {
                text_to_image: Some("Qwen/Qwen-Image".to_string()),
                text_to_music: Some("DiffRhythm".to_string()),
                vision_llm: Some("Qwen/Qwen2.5-VL-32B-Instruct".to_string()),
                ..ModelsConfig::default()
            },
        },
        storage: StorageConfig::default(),
    }
}

/// Point every endpoint at `base_url`, using the documented paths
pub fn with_endpoints(mut config: Config, base_url: &str) -> Config {
    config.chutes.endpoints = EndpointsConfig {
        llm: Some(format!("{}/v1/chat/completions", base_url)),
        text_to_image: Some(format!("{}/image/generate", base_url)),
        image_to_image: Some(format!("{}/edit/generate", base_url)),
        text_to_music: Some(format!("{}/music/generate", base_url)),
        text_to_video: Some(format!("{}/text2video", base_url)),
        image_to_video: Some(format!("{}/image2video", base_url)),
        image_to_video_fast: Some(format!("{}/fast/generate", base_url)),
    };
    config
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "0.0.0.0"
  port: 8123
  logs:
    level: "debug"
    file_enabled: true
    dir: "/var/log/chutes"

chutes:
  api_token: "${CHUTES_TEST_TOKEN_THAT_IS_NEVER_SET}"
  timeout_secs: 120
  endpoints:
    llm: "https://llm.chutes.ai/v1/chat/completions"
    text_to_image: "https://chutes-qwen-image.chutes.ai/generate"
    image_to_image: "https://chutes-qwen-image-edit.chutes.ai/generate"
    text_to_music: "https://chutes-diffrhythm.chutes.ai/generate"
    text_to_video: "https://chutes-wan2-1-14b.chutes.ai/text2video"
    image_to_video: "https://chutes-wan2-1-14b.chutes.ai/image2video"
    image_to_video_fast: ""
  models:
    llm: "deepseek-ai/DeepSeek-V3-0324"
    text_to_image: "Qwen/Qwen-Image"

storage:
  output_dir: "generated/${CARGO_PKG_NAME}"
"#;

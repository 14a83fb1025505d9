use super::{definitions::*, status::StatusChecker};
use crate::{
    Error, Result,
    artifacts::ArtifactStore,
    config::{Config, EndpointKind},
    http::ChutesHttp,
    llm::{
        ChatCompletionRequest, ChatMessage, ChutesLlmClient, ImageInput, LlmClient,
        ask_with_images, collect_stream,
    },
    media::*,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rmcp::model::{CallToolRequestParam, CallToolResult, Content, JsonObject, ResourceContents, Tool};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Deserialize)]
struct ChatArgs {
    messages: Vec<ChatMessage>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct VisionArgs {
    prompt: String,
    images: Vec<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// Dispatches MCP tool calls to the Chutes clients.
///
/// Cloning is cheap; every MCP session gets its own clone.
#[derive(Clone)]
pub struct ToolRegistry {
    config: Arc<Config>,
    media: Arc<dyn MediaClient>,
    llm: Arc<dyn LlmClient>,
    artifacts: ArtifactStore,
    tools: Arc<[Tool]>,
}

impl ToolRegistry {
    pub fn new(
        config: Config,
        media: Arc<dyn MediaClient>,
        llm: Arc<dyn LlmClient>,
        artifacts: ArtifactStore,
    ) -> Self {
        Self {
            config: Arc::new(config),
            media,
            llm,
            artifacts,
            tools: tool_definitions().into(),
        }
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let http = ChutesHttp::new(&config.chutes)?;
        let media = Arc::new(HttpMediaClient::new(
            http.clone(),
            config.chutes.endpoints.clone(),
        ));
        let llm = Arc::new(ChutesLlmClient::new(http, &config.chutes.endpoints));
        let artifacts = ArtifactStore::new(&config.storage);

        if !config.chutes.has_token() {
            warn!("CHUTES_API_TOKEN is not set; generation tools will fail until it is configured");
        }
        if !artifacts.is_enabled() {
            info!("No storage.output_dir configured; generated files will not be saved");
        }

        Ok(Self::new(config, media, llm, artifacts))
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Runs one tool.
    ///
    /// Unknown tools and undecodable arguments are `Err`; failures of the
    /// call itself come back as an `is_error` result.
    pub async fn call(&self, request: CallToolRequestParam) -> Result<CallToolResult> {
        let name = request.name.to_string();
        let mut arguments = request.arguments.unwrap_or_default();
        info!("Calling tool '{}'", name);

        let save_to_file = match arguments.remove("save_to_file") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(flag)) => flag,
            Some(other) => {
                return Err(Error::invalid_request(format!(
                    "save_to_file must be a boolean, got {}",
                    other
                )));
            }
        };

        let outcome = match name.as_str() {
            GENERATE_MUSIC => {
                let request = MediaRequest::Music(decode_args(&name, arguments)?);
                self.run_media("generated_music", request, save_to_file).await
            }
            GENERATE_VIDEO_FROM_TEXT => {
                let request = MediaRequest::TextToVideo(decode_args(&name, arguments)?);
                self.run_media("generated_video_from_text", request, save_to_file)
                    .await
            }
            GENERATE_VIDEO_FROM_IMAGE => {
                let request = MediaRequest::ImageToVideo(decode_args(&name, arguments)?);
                self.run_media("generated_video_from_image", request, save_to_file)
                    .await
            }
            GENERATE_VIDEO_FROM_IMAGE_FAST => {
                let request = MediaRequest::FastImageToVideo(decode_args(&name, arguments)?);
                self.run_media("generated_video_from_image_fast", request, save_to_file)
                    .await
            }
            GENERATE_IMAGE => {
                let mut args: ImageGenerationRequest = decode_args(&name, arguments)?;
                if args.model.is_none() {
                    args.model = self
                        .config
                        .chutes
                        .models
                        .for_endpoint(EndpointKind::TextToImage)
                        .map(str::to_string);
                }
                self.run_media(
                    "generated_image",
                    MediaRequest::ImageGeneration(args),
                    save_to_file,
                )
                .await
            }
            EDIT_IMAGE => {
                let request = MediaRequest::ImageEdit(decode_args(&name, arguments)?);
                self.run_media("edited_image", request, save_to_file).await
            }
            CHUTES_CHAT => self.chat(decode_args(&name, arguments)?).await,
            CHUTES_CHAT_STREAM => self.chat_stream(decode_args(&name, arguments)?).await,
            CHUTES_VISION_CHAT => self.vision_chat(decode_args(&name, arguments)?).await,
            CHECK_MCP_STATUS => self.check_status().await,
            _ => {
                return Err(Error::ToolNotFound {
                    tool_name: name.clone(),
                });
            }
        };

        Ok(match outcome {
            Ok(response) => {
                info!("Tool '{}' completed", name);
                response
            }
            Err(e) => {
                error!("Tool '{}' failed: {}", name, e);
                CallToolResult::error(vec![Content::text(format!("Error calling {}: {}", name, e))])
            }
        })
    }

    async fn run_media(
        &self,
        prefix: &str,
        request: MediaRequest,
        save_to_file: bool,
    ) -> Result<CallToolResult> {
        let media = self.media.generate(&request).await?;

        let mut content = vec![media_content(prefix, &media)];

        if save_to_file {
            let model = self
                .config
                .chutes
                .models
                .for_endpoint(request.endpoint());
            match self
                .artifacts
                .save(prefix, &media, model, request.parameters()?)
                .await
            {
                Ok(Some(saved)) => {
                    content.push(Content::text(format!("Saved to {}", saved.path.display())))
                }
                Ok(None) => {}
                // The generated media is still returned
                Err(e) => error!("Failed to save {}: {}", prefix, e),
            }
        }

        Ok(CallToolResult::success(content))
    }

    fn chat_request(&self, args: ChatArgs) -> ChatCompletionRequest {
        let model = args
            .model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.config.chutes.models.llm.clone());
        debug!(
            "Chat parameters: model={}, temperature={}, max_tokens={}",
            model, args.temperature, args.max_tokens
        );

        let mut request = ChatCompletionRequest::new(model, args.messages);
        request.temperature = Some(args.temperature);
        request.max_tokens = Some(args.max_tokens);
        request
    }

    async fn chat(&self, args: ChatArgs) -> Result<CallToolResult> {
        let request = self.chat_request(args);
        let response = self.llm.create_chat_completion(request).await?;
        let content = response
            .first_content()
            .ok_or_else(|| Error::internal("Chat completion response contained no message content"))?;
        Ok(CallToolResult::success(vec![Content::text(content)]))
    }

    async fn chat_stream(&self, args: ChatArgs) -> Result<CallToolResult> {
        let request = self.chat_request(args);
        let stream = self.llm.stream_chat_completion(request).await?;
        let summary = collect_stream(stream).await?;
        debug!(
            "Stream produced {} chunks (finish_reason={:?})",
            summary.chunks, summary.finish_reason
        );
        Ok(CallToolResult::success(vec![Content::text(summary.content)]))
    }

    async fn vision_chat(&self, args: VisionArgs) -> Result<CallToolResult> {
        let model = args
            .model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.config.chutes.models.vision_llm().to_string());
        let images: Vec<ImageInput> = args.images.into_iter().map(ImageInput::Url).collect();

        let answer = ask_with_images(
            self.llm.as_ref(),
            &model,
            &args.prompt,
            &images,
            args.temperature,
            args.max_tokens,
        )
        .await?;
        Ok(CallToolResult::success(vec![Content::text(answer)]))
    }

    async fn check_status(&self) -> Result<CallToolResult> {
        let checker = StatusChecker::new(&self.config.chutes)?;
        Ok(CallToolResult::success(vec![Content::text(
            checker.report().await,
        )]))
    }
}

fn decode_args<T: DeserializeOwned>(tool: &str, arguments: JsonObject) -> Result<T> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| Error::invalid_request(format!("Invalid arguments for '{}': {}", tool, e)))
}

/// JPEG becomes image content. WAV and MP4 have no dedicated MCP content
/// type, so they are embedded as blob resources.
fn media_content(prefix: &str, media: &GeneratedMedia) -> Content {
    let data = STANDARD.encode(&media.data);
    let mime_type = media.format.mime_type().to_string();
    match media.format {
        MediaFormat::Jpeg => Content::image(data, mime_type),
        MediaFormat::Wav | MediaFormat::Mp4 => {
            Content::resource(ResourceContents::BlobResourceContents {
                uri: format!("chutes://{}.{}", prefix, media.format.extension()),
                mime_type: Some(mime_type),
                blob: data,
            })
        }
    }
}

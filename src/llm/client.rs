use super::stream::{ChatStream, decode_chunks};
use super::types::*;
use crate::{Error, Result, config::EndpointsConfig, config::EndpointKind, http::ChutesHttp};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::{debug, info, warn};

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;

    async fn stream_chat_completion(&self, request: ChatCompletionRequest) -> Result<ChatStream>;
}

pub struct ChutesLlmClient {
    http: ChutesHttp,
    endpoint: Option<String>,
}

impl ChutesLlmClient {
    pub fn new(http: ChutesHttp, endpoints: &EndpointsConfig) -> Self {
        Self {
            http,
            endpoint: endpoints.get(EndpointKind::Llm).map(str::to_string),
        }
    }

    fn endpoint(&self) -> Result<&str> {
        self.endpoint
            .as_deref()
            .ok_or_else(|| Error::config("LLM endpoint not configured"))
    }
}

fn validate(request: &ChatCompletionRequest) -> Result<()> {
    if request.model.trim().is_empty() {
        return Err(Error::invalid_request("model must not be empty"));
    }
    if request.messages.is_empty() {
        return Err(Error::invalid_request("messages must not be empty"));
    }
    Ok(())
}

#[async_trait]
impl LlmClient for ChutesLlmClient {
    async fn create_chat_completion(
        &self,
        mut request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = self.endpoint()?;
        validate(&request)?;
        request.stream = Some(false);

        debug!(
            "Creating chat completion with {} messages (model={}, temperature={:?}, max_tokens={:?})",
            request.messages.len(),
            request.model,
            request.temperature,
            request.max_tokens
        );

        let response = self.http.post_json(url, &request).await?;
        let completion: ChatCompletionResponse = response.json().await?;

        debug!(
            "Received chat completion response with {} choices",
            completion.choices.len()
        );
        Ok(completion)
    }

    async fn stream_chat_completion(&self, mut request: ChatCompletionRequest) -> Result<ChatStream> {
        let url = self.endpoint()?;
        validate(&request)?;
        request.stream = Some(true);

        info!(
            "Opening chat completion stream with {} messages (model={})",
            request.messages.len(),
            request.model
        );

        let response = self.http.post_json(url, &request).await?;
        Ok(decode_chunks(response.bytes_stream()))
    }
}

/// An image attached to a vision prompt.
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// Raw image bytes, sent as a JPEG data URL.
    Bytes(Vec<u8>),
    /// An `http(s)` URL or a `data:image/...` URL.
    Url(String),
}

/// Builds the single user message for a vision prompt.
///
/// Strings that are neither `http` URLs nor `data:image` URLs are skipped.
pub fn vision_message(prompt: &str, images: &[ImageInput]) -> ChatMessage {
    let mut parts = vec![ContentPart::Text {
        text: prompt.to_string(),
    }];

    for image in images {
        let url = match image {
            ImageInput::Bytes(data) => format!("data:image/jpeg;base64,{}", STANDARD.encode(data)),
            ImageInput::Url(url) if url.starts_with("http") || url.starts_with("data:image") => {
                url.clone()
            }
            ImageInput::Url(_) => {
                warn!("Unsupported image reference, skipping image");
                continue;
            }
        };
        parts.push(ContentPart::ImageUrl {
            image_url: ImageUrl { url },
        });
    }

    ChatMessage {
        role: "user".to_string(),
        content: MessageContent::Parts(parts),
    }
}

/// Asks a vision model about `images`, returning the first choice's text.
pub async fn ask_with_images(
    client: &dyn LlmClient,
    model: &str,
    prompt: &str,
    images: &[ImageInput],
    temperature: f32,
    max_tokens: u32,
) -> Result<String> {
    let mut request = ChatCompletionRequest::new(model, vec![vision_message(prompt, images)]);
    request.temperature = Some(temperature);
    request.max_tokens = Some(max_tokens);

    let response = client.create_chat_completion(request).await?;
    response
        .first_content()
        .map(str::to_string)
        .ok_or_else(|| Error::internal("Chat completion response contained no message content"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ChutesConfig, llm::collect_stream};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    fn client_for(server: &MockServer) -> ChutesLlmClient {
        let config: ChutesConfig = serde_yaml::from_str("api_token: token\n").unwrap();
        let endpoints = EndpointsConfig {
            llm: Some(format!("{}/v1/chat/completions", server.uri())),
            ..Default::default()
        };
        ChutesLlmClient::new(ChutesHttp::new(&config).unwrap(), &endpoints)
    }

    fn request() -> ChatCompletionRequest {
        let mut request = ChatCompletionRequest::new("deepseek-ai/DeepSeek-R1-0528", vec![
            ChatMessage::user("Say hello"),
        ]);
        request.temperature = Some(0.7);
        request.max_tokens = Some(1024);
        request
    }

    #[tokio::test]
    async fn non_streaming_request_forces_stream_false() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer token"))
            .and(body_partial_json(json!({"stream": false, "max_tokens": 1024})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "created": 1700000000,
                "model": "deepseek-ai/DeepSeek-R1-0528",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello!"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 4, "completion_tokens": 2, "total_tokens": 6}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .create_chat_completion(request())
            .await
            .unwrap();
        assert_eq!(response.first_content(), Some("Hello!"));
        assert_eq!(response.usage.unwrap().total_tokens, 6);
    }

    #[tokio::test]
    async fn streaming_request_decodes_chunks() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"id\":\"s\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"Hi\"},\"finish_reason\":null}]}\n\n",
            "data: {\"id\":\"s\",\"choices\":[{\"index\":0,\"delta\":{\"content\":\" there\"},\"finish_reason\":\"stop\"}],\"usage\":{\"prompt_tokens\":3,\"completion_tokens\":2,\"total_tokens\":5}}\n\n",
            "data: [DONE]\n\n"
        );
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .expect(1)
            .mount(&server)
            .await;

        let stream = client_for(&server)
            .stream_chat_completion(request())
            .await
            .unwrap();
        let summary = collect_stream(stream).await.unwrap();
        assert_eq!(summary.content, "Hi there");
        assert_eq!(summary.finish_reason.as_deref(), Some("stop"));
        assert_eq!(summary.usage.unwrap().completion_tokens, 2);
    }

    #[tokio::test]
    async fn error_status_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("{\"detail\":\"Invalid token\"}"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .stream_chat_completion(request())
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn empty_messages_are_rejected() {
        let server = MockServer::start().await;
        let mut bad = request();
        bad.messages.clear();
        let err = client_for(&server).create_chat_completion(bad).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn vision_message_encodes_bytes_and_skips_unknown_references() {
        let message = vision_message("Describe", &[
            ImageInput::Bytes(b"abc".to_vec()),
            ImageInput::Url("https://example.com/a.png".to_string()),
            ImageInput::Url("/tmp/local.png".to_string()),
        ]);

        let MessageContent::Parts(parts) = &message.content else {
            panic!("expected content parts");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1], ContentPart::ImageUrl {
            image_url: ImageUrl {
                url: "data:image/jpeg;base64,YWJj".to_string()
            }
        });
    }
}

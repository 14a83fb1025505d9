use async_trait::async_trait;
use bytes::Bytes;
use chutes_mcp_rust::{
    Error, Result,
    llm::{
        ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatStream, Choice,
        ChunkChoice, Delta, LlmClient, ResponseMessage, Usage,
    },
    media::{GeneratedMedia, MediaClient, MediaRequest},
};
use futures_util::{StreamExt, stream};
use std::sync::{Arc, Mutex};

/// Mock media client returning a fixed payload in the request's format
#[derive(Debug, Default)]
pub struct MockMediaClient {
    pub requests: Arc<Mutex<Vec<MediaRequest>>>,
    pub payload: Vec<u8>,
    pub error: Option<Error>,
}

impl MockMediaClient {
    pub fn new(payload: &[u8]) -> Self {
        Self {
            payload: payload.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_error(mut self, error: Error) -> Self {
        self.error = Some(error);
        self
    }

    pub fn get_requests(&self) -> Vec<MediaRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaClient for MockMediaClient {
    async fn generate(&self, request: &MediaRequest) -> Result<GeneratedMedia> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(ref error) = self.error {
            return Err(error.clone());
        }

        Ok(GeneratedMedia {
            format: request.format(),
            data: Bytes::from(self.payload.clone()),
        })
    }
}

/// Mock LLM client for testing
#[derive(Debug, Default)]
pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<ChatCompletionResponse>>>,
    pub streams: Arc<Mutex<Vec<Vec<ChatCompletionChunk>>>>,
    pub requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
    pub error: Option<String>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(self, responses: Vec<ChatCompletionResponse>) -> Self {
        *self.responses.lock().unwrap() = responses;
        self
    }

    pub fn with_stream(self, chunks: Vec<ChatCompletionChunk>) -> Self {
        self.streams.lock().unwrap().push(chunks);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn get_requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn create_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::Api {
                status: 500,
                body: error.clone(),
            });
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(Error::internal("No more mock responses available"));
        }

        Ok(responses.remove(0))
    }

    async fn stream_chat_completion(&self, request: ChatCompletionRequest) -> Result<ChatStream> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.error {
            return Err(Error::Api {
                status: 500,
                body: error.clone(),
            });
        }

        let mut streams = self.streams.lock().unwrap();
        if streams.is_empty() {
            return Err(Error::internal("No more mock streams available"));
        }

        let chunks = streams.remove(0);
        Ok(stream::iter(chunks.into_iter().map(Ok)).boxed())
    }
}

pub fn create_mock_completion(content: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: "chatcmpl-test".to_string(),
        object: "chat.completion".to_string(),
        created: 1_700_000_000,
        model: "deepseek-ai/DeepSeek-R1-0528".to_string(),
        choices: vec![Choice {
            index: 0,
            message: ResponseMessage {
                role: "assistant".to_string(),
                content: Some(content.to_string()),
            },
            finish_reason: Some("stop".to_string()),
        }],
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

pub fn create_mock_chunk(content: &str, finish_reason: Option<&str>) -> ChatCompletionChunk {
    ChatCompletionChunk {
        id: "chatcmpl-stream".to_string(),
        object: "chat.completion.chunk".to_string(),
        created: 1_700_000_000,
        model: "deepseek-ai/DeepSeek-R1-0528".to_string(),
        choices: vec![ChunkChoice {
            index: 0,
            delta: Delta {
                role: None,
                content: Some(content.to_string()),
            },
            finish_reason: finish_reason.map(str::to_string),
        }],
        usage: None,
    }
}

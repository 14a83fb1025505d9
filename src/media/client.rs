use super::types::*;
use crate::{Error, Result, config::EndpointsConfig, http::ChutesHttp};
use async_trait::async_trait;
use tracing::{debug, info};

#[async_trait]
pub trait MediaClient: Send + Sync {
    async fn generate(&self, request: &MediaRequest) -> Result<GeneratedMedia>;
}

pub struct HttpMediaClient {
    http: ChutesHttp,
    endpoints: EndpointsConfig,
}

impl HttpMediaClient {
    pub fn new(http: ChutesHttp, endpoints: EndpointsConfig) -> Self {
        Self { http, endpoints }
    }
}

#[async_trait]
impl MediaClient for HttpMediaClient {
    async fn generate(&self, request: &MediaRequest) -> Result<GeneratedMedia> {
        let kind = request.endpoint();
        let url = self
            .endpoints
            .get(kind)
            .ok_or_else(|| Error::config(format!("{} endpoint not configured", kind)))?;

        request.validate()?;
        let body = request.to_body()?;
        debug!("{} parameters: {}", kind, request.parameters()?);

        info!("Calling {} endpoint at {}", kind, url);
        let response = self.http.post_json(url, &body).await?;
        let data = response.bytes().await?;

        info!("Received {} bytes from {} endpoint", data.len(), kind);
        Ok(GeneratedMedia {
            format: request.format(),
            data,
        })
    }
}

//! Authenticated JSON POSTs against the Chutes endpoints.

use crate::{Error, Result, config::ChutesConfig};
use reqwest::{
    Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ChutesHttp {
    client: reqwest::Client,
    api_token: String,
}

impl ChutesHttp {
    pub fn new(config: &ChutesConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_token: config.api_token.trim().to_string(),
        })
    }

    /// Headers every endpoint requires.
    pub fn auth_headers(&self) -> Result<HeaderMap> {
        if self.api_token.is_empty() {
            return Err(Error::config("CHUTES_API_TOKEN is not set"));
        }

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_token))
            .map_err(|e| Error::config(format!("Invalid API token: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// POSTs `body` as JSON and returns the response if the status is 2xx.
    ///
    /// Any other status is turned into [`Error::Api`] carrying the status code
    /// and the response body as sent by the server.
    pub async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Response> {
        let headers = self.auth_headers()?;

        debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await?;

        ensure_success(response).await
    }
}

pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Error bodies are not always UTF-8; keep what can be shown.
    let body = match response.bytes().await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!("Failed to read error body for status {}: {}", status, e);
            String::new()
        }
    };
    warn!("Upstream returned {}: {}", status, body);
    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}

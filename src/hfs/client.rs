// HFS HTTP client.
// Handles bearer authentication, request timeouts, and status checking.

use async_trait::async_trait;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue},
};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{HfsError, Result};

use super::transport::Transport;

/// reqwest-backed [`Transport`] for the HFS backend.
#[derive(Debug, Clone)]
pub struct HfsClient {
    client: Client,
    base_url: String,
}

impl HfsClient {
    /// Create a new client from the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(HfsError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an authenticated GET request.
    pub async fn get(&self, url: &str, token: &str) -> Result<Response> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(HfsError::Http)?;

        check_response(response).await
    }
}

#[async_trait]
impl Transport for HfsClient {
    async fn get_json(&self, url: &str, token: &str) -> Result<Value> {
        let response = self.get(url, token).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED => Err(HfsError::Unauthorized),
        status => {
            let url = response.url().to_string();
            Err(HfsError::Status {
                status: status.as_u16(),
                url,
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}

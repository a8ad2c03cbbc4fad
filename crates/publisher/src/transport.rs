use crate::error::PublisherError;
use async_trait::async_trait;
use std::time::Duration;

/// A decoded HTTP response from the media API.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The abstract transport used to reach the media-publish API.
///
/// The seam that lets tests assert call counts with a scripted mock.
#[async_trait]
pub trait MediaTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        bearer_token: &str,
    ) -> Result<HttpResponse, PublisherError>;
}

/// The live transport backed by `reqwest`, with connect and read timeouts.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, PublisherError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MediaTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        bearer_token: &str,
    ) -> Result<HttpResponse, PublisherError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer_token)
            .json(body)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

// Remote reading source fetched over HTTP
use crate::application::reading_source::ReadingSource;
use crate::domain::reading::SensorReading;
use crate::infrastructure::reading_codec::decode_readings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpReadingSource {
    url: String,
    client: reqwest::Client,
}

impl HttpReadingSource {
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: String, client: reqwest::Client) -> Self {
        Self { url, client }
    }
}

#[async_trait]
impl ReadingSource for HttpReadingSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch_readings(&self) -> Result<Vec<SensorReading>> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json, application/x-ndjson")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Reading source responded with status {}: {}", status, body);
        }

        let body = response
            .text()
            .await
            .context("Failed to read reading source response")?;

        decode_readings(&body)
    }
}

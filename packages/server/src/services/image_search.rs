use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::PixabayConfig;

#[derive(Debug, Error)]
pub enum ImageSearchError {
    #[error("Image search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image search returned status {0}")]
    Status(StatusCode),

    #[error("Image search returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Finds a decorative image for a mood query.
///
/// Callers must treat failures as a missing image, never as a reason to fail
/// the surrounding operation.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Returns the URL of the best match, or `None` when nothing fits.
    async fn search(&self, query: &str) -> Result<Option<String>, ImageSearchError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "largeImageURL")]
    large_image_url: String,
}

fn first_hit_url(body: &str) -> Result<Option<String>, serde_json::Error> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .hits
        .into_iter()
        .next()
        .map(|hit| hit.large_image_url))
}

/// Pixabay-backed image search.
///
/// Queries are constrained to large landscape photos in the "feelings"
/// category, which is what the entry header renders.
pub struct PixabayClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PixabayClient {
    pub fn new(config: &PixabayConfig) -> Result<Self, ImageSearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl ImageSearch for PixabayClient {
    async fn search(&self, query: &str) -> Result<Option<String>, ImageSearchError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("min_width", "1280"),
                ("min_height", "720"),
                ("image_type", "photo"),
                ("category", "feelings"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ImageSearchError::Status(response.status()));
        }

        let body = response.text().await?;
        Ok(first_hit_url(&body)?)
    }
}

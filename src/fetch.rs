//! Downloading and decoding the image to evaluate.

use bytes::Bytes;
use image::RgbImage;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// HTTP client for image downloads with a bounded per-request timeout.
#[derive(Clone)]
pub struct ImageFetcher {
    client: reqwest::Client,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        // Pooled connections would be bound to whichever worker runtime
        // opened them.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self { client })
    }

    /// Downloads the raw bytes behind `url`. Any non-2xx status is an error.
    pub async fn fetch(&self, url: &Url) -> Result<Bytes, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        debug!(%url, bytes = body.len(), "image downloaded");
        Ok(body)
    }
}

/// Decodes image bytes and converts them to 8-bit RGB.
///
/// Alpha is dropped and grayscale is expanded; images already in RGB8 are
/// returned untouched.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, FetchError> {
    let image = image::load_from_memory(bytes).map_err(|e| FetchError::Decode(e.to_string()))?;
    Ok(image.into_rgb8())
}

/// Byte fetching for remote URLs and local paths
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use image::ImageReader;
use reqwest::Client;

use crate::error::{GalleryError, Result};

const USER_AGENT: &str = concat!("event-gallery/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

/// A fetched image with its decoded header dimensions
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub url: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Shared HTTP client. Cheap to clone.
pub fn client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(TIMEOUT)
        .build()
        .unwrap_or_default()
}

pub fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Fetch the bytes behind an HTTP(S) URL or a local file path
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    if !is_remote(url) {
        return Ok(tokio::fs::read(Path::new(url)).await?);
    }

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(GalleryError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

/// Fetch an image and read its dimensions from the header
pub async fn fetch_image(client: Client, url: String) -> Result<FetchedImage> {
    let bytes = fetch_bytes(&client, &url).await?;
    let (width, height) = probe_dimensions(&bytes)?;
    Ok(FetchedImage {
        url,
        bytes,
        width,
        height,
    })
}

/// Best-effort variant of `fetch_image`: failures are logged and dropped
pub async fn prefetch_image(client: Client, url: String) -> Option<FetchedImage> {
    match fetch_image(client, url.clone()).await {
        Ok(image) => Some(image),
        Err(e) => {
            log::debug!("🛰️  Prefetch of {} skipped: {}", url, e);
            None
        }
    }
}

pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    Ok(reader.into_dimensions()?)
}

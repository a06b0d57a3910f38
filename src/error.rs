/// Error types for the gallery
///
/// Everything that can fail while loading collections, fetching images
/// or saving downloads ends up as a `GalleryError`.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("HTTP error! status: {status} ({url})")]
    HttpStatus { url: String, status: u16 },

    #[error("duplicate collection name: {0}")]
    DuplicateCollection(String),

    #[error("no collections found in {0}")]
    EmptySource(String),

    #[error("no URL provided for download")]
    EmptyUrl,

    #[error("could not determine a download directory")]
    NoDownloadDir,

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, GalleryError>;

/// Photo downloads
///
/// Saves the full resolution file under a timestamped name so repeated
/// downloads never overwrite each other.
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;

use super::fetch::fetch_bytes;
use crate::error::{GalleryError, Result};

const FALLBACK_NAME: &str = "photo.jpg";
const FALLBACK_EXT: &str = ".jpg";

/// Build the file name for a download of `url`
pub fn derive_filename(url: &str, filename: Option<&str>, now: DateTime<Utc>) -> String {
    let mut name = match filename.filter(|f| !f.is_empty()) {
        Some(name) => name.to_string(),
        None => {
            let path = url.split(['#', '?']).next().unwrap_or_default();
            match path.rsplit(['/', '\\']).next() {
                Some(last) if !last.is_empty() => last.to_string(),
                _ => FALLBACK_NAME.to_string(),
            }
        }
    };
    if !name.contains('.') {
        name.push_str(FALLBACK_EXT);
    }

    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => (&name[..dot], &name[dot..]),
        Some(dot) => (&name[..dot], FALLBACK_EXT),
        None => (name.as_str(), FALLBACK_EXT),
    };
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");

    format!("{stem}_{timestamp}{ext}")
}

/// Where downloads go when the settings don't say
pub fn default_download_dir() -> Result<PathBuf> {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .ok_or(GalleryError::NoDownloadDir)
}

/// Fetch `url` and save it into `dir`. Returns the saved path.
pub async fn download(client: Client, url: String, filename: Option<String>, dir: PathBuf) -> Result<PathBuf> {
    if url.is_empty() {
        return Err(GalleryError::EmptyUrl);
    }

    let name = derive_filename(&url, filename.as_deref(), Utc::now());
    let target = dir.join(&name);
    let partial = dir.join(format!("{name}.part"));

    let result = save(&client, &url, &partial, &target).await;
    if result.is_err() {
        // the partial file may or may not exist at this point
        let _ = tokio::fs::remove_file(&partial).await;
    }
    result?;

    log::info!("💾 Saved {}", target.display());
    Ok(target)
}

async fn save(client: &Client, url: &str, partial: &Path, target: &Path) -> Result<()> {
    let bytes = fetch_bytes(client, url).await?;
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(partial, &bytes).await?;
    tokio::fs::rename(partial, target).await?;
    Ok(())
}

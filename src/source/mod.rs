/// Collection sources
///
/// This module loads the tab/photo listing once per (re)load:
/// - JSON manifests from disk or over HTTP (manifest.rs)
/// - Folders of photo folders (folder.rs)

pub mod folder;
pub mod manifest;

use std::fmt;
use std::path::PathBuf;

use reqwest::Client;

use crate::error::Result;
use crate::net::fetch::{fetch_bytes, is_remote};
use crate::state::data::Collections;

/// Where the collections come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    RemoteManifest(String),
    LocalManifest(PathBuf),
    Folder(PathBuf),
}

impl Origin {
    pub fn parse(source: &str) -> Self {
        if is_remote(source) {
            return Origin::RemoteManifest(source.to_string());
        }
        let path = PathBuf::from(source);
        if path.is_dir() {
            Origin::Folder(path)
        } else {
            Origin::LocalManifest(path)
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::RemoteManifest(url) => write!(f, "{url}"),
            Origin::LocalManifest(path) | Origin::Folder(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load every collection from `origin`
pub async fn load(client: Client, origin: Origin) -> Result<Collections> {
    let name = origin.to_string();
    let collections = match origin {
        Origin::RemoteManifest(url) => {
            let bytes = fetch_bytes(&client, &url).await?;
            manifest::parse(&String::from_utf8_lossy(&bytes), &name)?
        }
        Origin::LocalManifest(path) => {
            let json = tokio::fs::read_to_string(&path).await?;
            manifest::parse(&json, &name)?
        }
        Origin::Folder(path) => folder::load(path).await?,
    };

    log::info!(
        "📁 Loaded {} collections ({} photos) from {}",
        collections.len(),
        collections.total_images(),
        name
    );
    Ok(collections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_parse() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            Origin::parse("https://cms.example.com/photos.json"),
            Origin::RemoteManifest("https://cms.example.com/photos.json".to_string())
        );
        assert_eq!(Origin::parse(&dir.path().to_string_lossy()), Origin::Folder(dir.path().to_path_buf()));
        assert_eq!(
            Origin::parse("photos.json"),
            Origin::LocalManifest(PathBuf::from("photos.json"))
        );
    }

    #[tokio::test]
    async fn test_load_local_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photos.json");
        std::fs::write(
            &path,
            r#"{ "collections": [ { "name": "Day 1", "items": [ { "media": { "url": "a.jpg" } } ] } ] }"#,
        )
        .unwrap();

        let collections = load(crate::net::fetch::client(), Origin::LocalManifest(path)).await.unwrap();
        assert_eq!(collections.len_of("Day 1"), 1);
    }
}

/// Folder source
///
/// Every sub-folder of the root is one tab, named after the folder.
/// Photos inside are ordered by file name.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{GalleryError, Result};
use crate::state::data::{Collection, Collections, ImageRecord};

/// Supported image file extensions
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Scan `root` on a blocking thread
pub async fn load(root: PathBuf) -> Result<Collections> {
    tokio::task::spawn_blocking(move || load_blocking(&root)).await?
}

fn load_blocking(root: &Path) -> Result<Collections> {
    log::info!("🔍 Scanning folder: {}", root.display());

    let mut folders: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    folders.sort();

    let mut collections = Vec::new();
    for folder in folders {
        let name = folder
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let images = scan_images(&folder);
        log::info!("📁 {}: {} photos", name, images.len());
        collections.push(Collection::new(name, images));
    }

    if collections.is_empty() {
        return Err(GalleryError::EmptySource(root.display().to_string()));
    }
    Collections::new(collections)
}

fn scan_images(folder: &Path) -> Vec<ImageRecord> {
    let paths = WalkDir::new(folder)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image(p));

    paths
        .enumerate()
        .map(|(id, path)| {
            let url = path.to_string_lossy().to_string();
            let (width, height) = match image::image_dimensions(&path) {
                Ok((w, h)) => (Some(w), Some(h)),
                Err(e) => {
                    log::warn!("⚠️  Could not read dimensions of {}: {}", path.display(), e);
                    (None, None)
                }
            };
            ImageRecord {
                id,
                source_url: url.clone(),
                display_url: url,
                alt_text: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default(),
                width,
                height,
            }
        })
        .collect()
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

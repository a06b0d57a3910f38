/// Application settings
///
/// Settings come from `settings.json` in the user's config directory:
/// - Linux: ~/.config/event-gallery/settings.json
/// - macOS: ~/Library/Application Support/event-gallery/settings.json
/// - Windows: %APPDATA%\event-gallery\settings.json
///
/// Command line flags override whatever the file says.
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Manifest file, manifest URL or photo folder
    pub source: Option<String>,
    /// Heading shown above the tabs
    pub title: String,
    /// Records revealed when a tab is first shown
    pub initial_batch: usize,
    /// Records revealed per proximity signal or "Load more"
    pub batch_size: usize,
    /// Gap after each tile, in column widths
    pub column_margin: f32,
    /// How close (px) the sentinel must get to the viewport to fire
    pub proximity_margin: f32,
    /// Delay before the sentinel is observed again after a reveal
    pub rearm_delay_ms: u64,
    /// Width requested for low resolution prefetches
    pub low_res_width: u32,
    /// Quality requested for low resolution prefetches
    pub low_res_quality: u8,
    /// Where downloads are saved (system download dir when unset)
    pub download_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: None,
            title: "2025 Event Photos".to_string(),
            initial_batch: 12,
            batch_size: 12,
            column_margin: crate::state::columns::DEFAULT_MARGIN,
            proximity_margin: 50.0,
            rearm_delay_ms: 16,
            low_res_width: 256,
            low_res_quality: 50,
            download_dir: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            log::info!("⚙️  No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(&path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("⚙️  Settings loaded from {}", path.display());
        Ok(settings.normalized())
    }

    fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("event-gallery");
        path.push("settings.json");
        Some(path)
    }

    /// Apply command line overrides
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(source) = &cli.source {
            self.source = Some(source.clone());
        }
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.initial_batch = self.initial_batch.max(1);
        self.batch_size = self.batch_size.max(1);
        self.column_margin = self.column_margin.max(0.0);
        self.proximity_margin = self.proximity_margin.max(0.0);
        self
    }
}

/// Command line interface
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "event-gallery", version, about = "Browse event photos by tab")]
pub struct Cli {
    /// Manifest file, manifest URL or folder of photo folders
    pub source: Option<String>,

    /// Photo reference to open at startup, e.g. "/?photoId=5"
    #[arg(long)]
    pub link: Option<String>,

    /// Tab to show first
    #[arg(long)]
    pub tab: Option<String>,

    /// Settings file to use instead of the default one
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(Some(&dir.path().join("nope.json"))).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_and_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "batch_size": 0, "title": "Miami" }"#).unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.batch_size, 1);
        assert_eq!(settings.initial_batch, 12);
        assert_eq!(settings.title, "Miami");
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load(Some(&path)).is_err());
    }

    #[test]
    fn test_cli_overrides_source() {
        let cli = Cli::parse_from(["event-gallery", "photos.json", "--link", "/?photoId=3"]);
        let settings = Settings::default().with_cli(&cli);
        assert_eq!(settings.source.as_deref(), Some("photos.json"));
        assert_eq!(cli.link.as_deref(), Some("/?photoId=3"));
    }
}

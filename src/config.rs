use crate::post::Platform;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "artisanpost";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default = "default_widgets")]
    pub widgets: Vec<WidgetConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Backend that turns a recorded interview into landing content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_upload_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Local path or http(s) URL of the content JSON.
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_instagram_url")]
    pub instagram_url: String,
    #[serde(default = "default_email_subject")]
    pub email_subject: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WidgetConfig {
    Landing(LandingConfig),
    Composer(ComposerConfig),
    Contact(ContactConfig),
    Photos(PhotosConfig),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandingConfig {
    #[serde(default = "default_landing_title")]
    pub title: String,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposerConfig {
    #[serde(default = "default_composer_title")]
    pub title: String,
    #[serde(default)]
    pub default_platform: Platform,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_contact_title")]
    pub title: String,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotosConfig {
    #[serde(default = "default_photos_title")]
    pub title: String,
    pub dir: Option<PathBuf>,
    pub pixel_size: Option<u32>,
    pub position: Position,
}

fn default_tick_rate() -> u64 {
    250
}

fn default_endpoint() -> String {
    "http://127.0.0.1:5000/api/generate_post".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_upload_endpoint() -> String {
    "http://127.0.0.1:5000/process-audio-upload".to_string()
}

// Transcription runs on the server before it answers
fn default_upload_timeout_secs() -> u64 {
    300
}

fn default_instagram_url() -> String {
    "https://www.instagram.com/".to_string()
}

fn default_email_subject() -> String {
    "Artisan Campaign".to_string()
}

fn default_landing_title() -> String {
    "Shop".to_string()
}

fn default_composer_title() -> String {
    "Social Post".to_string()
}

fn default_contact_title() -> String {
    "Contact Details".to_string()
}

fn default_photos_title() -> String {
    "Photos".to_string()
}

fn default_widgets() -> Vec<WidgetConfig> {
    vec![
        WidgetConfig::Landing(LandingConfig {
            title: default_landing_title(),
            position: Position { row: 0, col: 0 },
        }),
        WidgetConfig::Photos(PhotosConfig {
            title: default_photos_title(),
            dir: None,
            pixel_size: None,
            position: Position { row: 0, col: 1 },
        }),
        WidgetConfig::Composer(ComposerConfig {
            title: default_composer_title(),
            default_platform: Platform::default(),
            position: Position { row: 1, col: 0 },
        }),
        WidgetConfig::Contact(ContactConfig {
            title: default_contact_title(),
            position: Position { row: 1, col: 1 },
        }),
    ]
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_upload_endpoint(),
            timeout_secs: default_upload_timeout_secs(),
        }
    }
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            instagram_url: default_instagram_url(),
            email_subject: default_email_subject(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            generator: GeneratorConfig::default(),
            upload: UploadConfig::default(),
            content: ContentConfig::default(),
            share: ShareConfig::default(),
            widgets: default_widgets(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Where `upload` saves the content document by default.
    pub fn default_content_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_DIR).join("content.json"))
    }

    /// Configured content source, else the last saved upload if there is one.
    pub fn content_source(&self) -> Option<String> {
        resolve_content_source(self.content.source.as_deref(), Self::default_content_path())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// An explicit path must exist; the default location may be absent.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn resolve_content_source(explicit: Option<&str>, saved: Option<PathBuf>) -> Option<String> {
    match explicit {
        Some(source) => Some(source.to_string()),
        None => saved
            .filter(|path| path.exists())
            .map(|path| path.display().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.generator.timeout_secs, 10);
        assert_eq!(config.share.email_subject, "Artisan Campaign");
        assert_eq!(config.widgets.len(), 4);
        assert!(config.content.source.is_none());
    }

    #[test]
    fn test_parse_widgets() {
        let toml = r#"
            [generator]
            endpoint = "http://localhost:9000/api/generate_post"

            [[widgets]]
            type = "composer"
            position = { row = 0, col = 0 }
            default_platform = "twitter"

            [[widgets]]
            type = "photos"
            title = "Workshop"
            dir = "/tmp/photos"
            pixel_size = 16
            position = { row = 0, col = 1 }
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.generator.endpoint, "http://localhost:9000/api/generate_post");
        assert_eq!(config.generator.timeout_secs, 10);
        assert_eq!(config.widgets.len(), 2);

        match &config.widgets[0] {
            WidgetConfig::Composer(c) => {
                assert_eq!(c.title, "Social Post");
                assert_eq!(c.default_platform, Platform::Twitter);
            }
            other => panic!("unexpected widget {:?}", other),
        }
        match &config.widgets[1] {
            WidgetConfig::Photos(p) => {
                assert_eq!(p.title, "Workshop");
                assert_eq!(p.pixel_size, Some(16));
                assert_eq!(p.position, Position { row: 0, col: 1 });
            }
            other => panic!("unexpected widget {:?}", other),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.content.source = Some("content.json".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.content.source.as_deref(), Some("content.json"));
        assert_eq!(loaded.widgets.len(), config.widgets.len());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load_or_default(Some(&missing)).is_err());
    }

    #[test]
    fn test_upload_defaults() {
        let config: Config = toml::from_str("[upload]\ntimeout_secs = 60").unwrap();
        assert_eq!(config.upload.endpoint, "http://127.0.0.1:5000/process-audio-upload");
        assert_eq!(config.upload.timeout_secs, 60);
    }

    #[test]
    fn test_content_source_prefers_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("content.json");
        std::fs::write(&saved, "{}").unwrap();

        assert_eq!(
            resolve_content_source(Some("https://shop.example/content.json"), Some(saved.clone())),
            Some("https://shop.example/content.json".to_string())
        );
        assert_eq!(
            resolve_content_source(None, Some(saved.clone())),
            Some(saved.display().to_string())
        );
        assert_eq!(
            resolve_content_source(None, Some(dir.path().join("missing.json"))),
            None
        );
        assert_eq!(resolve_content_source(None, None), None);
    }
}

pub mod content;
pub mod generator;
pub mod upload;

use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct FeedMessage {
    pub widget_id: String,
    pub data: FeedData,
}

#[derive(Debug, Clone)]
pub enum FeedData {
    Content(LandingContent),
    Loading,
    Error(String),
}

/// Text shown in the about/story sections of the landing pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LandingContent {
    /// Name found in the recording; empty when the backend gave none.
    pub artisan_name: String,
    pub about_text: String,
    pub description: String,
    pub keywords: String,
    pub transcript: String,
}

impl LandingContent {
    pub fn placeholder() -> Self {
        Self {
            about_text: "Could not load about text.".to_string(),
            keywords: "Could not load keywords".to_string(),
            transcript: "Could not load story text.".to_string(),
            ..Self::default()
        }
    }

    /// Shown when no content source is set at all.
    pub fn unconfigured() -> Self {
        Self {
            about_text: "No content source configured. Set [content] source or run `artisanpost upload <audio>`.".to_string(),
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self) -> Result<FeedData>;
}

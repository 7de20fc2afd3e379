use super::{FeedData, FeedFetcher, LandingContent};
use crate::error::ContentLoadError;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    File(PathBuf),
    Url(String),
}

impl ContentSource {
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            ContentSource::Url(source.to_string())
        } else {
            ContentSource::File(PathBuf::from(source))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentDocument {
    content: ContentBody,
    #[serde(default)]
    transcript: String,
}

#[derive(Debug, Deserialize)]
struct ContentBody {
    #[serde(default)]
    artisan_name: String,
    #[serde(default)]
    about_text: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    keywords: Keywords,
}

/// The upload backend writes a list; hand-written feeds often use a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Keywords {
    List(Vec<String>),
    Text(String),
}

impl Default for Keywords {
    fn default() -> Self {
        Keywords::Text(String::new())
    }
}

impl Keywords {
    fn into_display(self) -> String {
        match self {
            Keywords::List(words) => words
                .iter()
                .map(|w| w.trim())
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            Keywords::Text(text) => text.trim().to_string(),
        }
    }
}

pub fn parse_content(body: &str) -> Result<LandingContent, ContentLoadError> {
    let doc: ContentDocument = serde_json::from_str(body)?;
    Ok(LandingContent {
        artisan_name: doc.content.artisan_name.trim().to_string(),
        about_text: doc.content.about_text,
        description: doc.content.description,
        keywords: doc.content.keywords.into_display(),
        transcript: doc.transcript,
    })
}

#[derive(Clone)]
pub struct ContentFetcher {
    source: ContentSource,
    client: reqwest::Client,
}

impl ContentFetcher {
    pub fn new(source: ContentSource) -> Result<Self, ContentLoadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { source, client })
    }

    pub async fn load(&self) -> Result<LandingContent, ContentLoadError> {
        let body = match &self.source {
            ContentSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| ContentLoadError::Io {
                        path: path.display().to_string(),
                        source,
                    })?
            }
            ContentSource::Url(url) => {
                let response = self.client.get(url).send().await?;
                if !response.status().is_success() {
                    return Err(ContentLoadError::Status(response.status().as_u16()));
                }
                response.text().await?
            }
        };

        parse_content(&body)
    }
}

#[async_trait]
impl FeedFetcher for ContentFetcher {
    async fn fetch(&self) -> Result<FeedData> {
        match self.load().await {
            Ok(content) => Ok(FeedData::Content(content)),
            Err(e) => {
                tracing::warn!(source = ?self.source, error = %e, "content feed unavailable");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FEED: &str = r#"{
        "id": "3fdc4688",
        "transcript": "I have been throwing pots for twenty years.",
        "content": {
            "artisan_name": " Meera ",
            "about_text": "Hand-thrown terracotta from Jaipur.",
            "description": "Each cup is wheel-thrown and wood-fired.",
            "keywords": ["terracotta", " pottery ", "", "handmade"]
        }
    }"#;

    #[test]
    fn test_parse_keyword_list() {
        let content = parse_content(FEED).unwrap();
        assert_eq!(content.about_text, "Hand-thrown terracotta from Jaipur.");
        assert_eq!(content.keywords, "terracotta, pottery, handmade");
        assert_eq!(content.transcript, "I have been throwing pots for twenty years.");
        assert_eq!(content.artisan_name, "Meera");
        assert_eq!(content.description, "Each cup is wheel-thrown and wood-fired.");
    }

    #[test]
    fn test_parse_keyword_string() {
        let body = r#"{"content": {"about_text": "a", "keywords": "clay, kiln"}, "transcript": "t"}"#;
        let content = parse_content(body).unwrap();
        assert_eq!(content.keywords, "clay, kiln");
        assert!(content.artisan_name.is_empty());
        assert!(content.description.is_empty());
    }

    #[test]
    fn test_parse_missing_content_is_error() {
        assert!(matches!(
            parse_content(r#"{"transcript": "t"}"#),
            Err(ContentLoadError::Json(_))
        ));
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            ContentSource::parse("https://example.com/a.json"),
            ContentSource::Url("https://example.com/a.json".to_string())
        );
        assert_eq!(
            ContentSource::parse("uploads/data/a.json"),
            ContentSource::File(PathBuf::from("uploads/data/a.json"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("content.json");
        std::fs::write(&file, FEED).unwrap();

        let fetcher = ContentFetcher::new(ContentSource::File(file)).unwrap();
        match fetcher.fetch().await.unwrap() {
            FeedData::Content(content) => assert_eq!(content.keywords, "terracotta, pottery, handmade"),
            other => panic!("unexpected feed data {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ContentFetcher::new(ContentSource::File(dir.path().join("missing.json"))).unwrap();
        assert!(matches!(fetcher.load().await, Err(ContentLoadError::Io { .. })));
    }

    #[tokio::test]
    async fn test_load_from_url() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/uploads/data/content.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
            .mount(&mock_server)
            .await;

        let url = format!("{}/uploads/data/content.json", mock_server.uri());
        let content = ContentFetcher::new(ContentSource::Url(url)).unwrap().load().await.unwrap();
        assert_eq!(content.about_text, "Hand-thrown terracotta from Jaipur.");
    }

    #[tokio::test]
    async fn test_load_from_url_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/missing.json", mock_server.uri());
        let result = ContentFetcher::new(ContentSource::Url(url)).unwrap().load().await;
        assert!(matches!(result, Err(ContentLoadError::Status(404))));
    }
}

use super::content::parse_content;
use super::LandingContent;
use crate::config::UploadConfig;
use crate::error::UploadError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const AUDIO_FIELD: &str = "audio_file";

#[derive(Debug, Deserialize)]
struct UploadReceipt {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// What the backend made of one recording.
#[derive(Debug, Clone)]
pub struct UploadedContent {
    pub id: String,
    pub content: LandingContent,
    /// Response body as received, in the content feed format.
    pub document: String,
}

/// Sends an interview recording to the transcription backend, which answers
/// with the landing page content built from it.
#[derive(Clone)]
pub struct UploadClient {
    endpoint: String,
    client: reqwest::Client,
}

impl UploadClient {
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("artisanpost/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    pub async fn upload(&self, audio: &Path) -> Result<UploadedContent, UploadError> {
        let data = tokio::fs::read(audio).await.map_err(|source| UploadError::Io {
            path: audio.display().to_string(),
            source,
        })?;
        let filename = audio
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording".to_string());

        tracing::info!(endpoint = %self.endpoint, file = %filename, bytes = data.len(), "uploading recording");

        let form = reqwest::multipart::Form::new()
            .part(AUDIO_FIELD, reqwest::multipart::Part::bytes(data).file_name(filename));

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| body.trim().to_string());
            tracing::warn!(status = status.as_u16(), error = %message, "upload rejected");
            return Err(UploadError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let content = parse_content(&body)?;
        let id = serde_json::from_str::<UploadReceipt>(&body)
            .map(|r| r.id)
            .unwrap_or_default();

        tracing::info!(id = %id, artisan = %content.artisan_name, "recording processed");
        Ok(UploadedContent {
            id,
            content,
            document: body,
        })
    }
}

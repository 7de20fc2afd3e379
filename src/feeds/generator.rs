use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::post::{GeneratedPost, PostDraft};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    text: &'a str,
    post_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    post: String,
}

/// Client for the remote post generator. One call per `generate`, no retries.
#[derive(Clone)]
pub struct GenerationClient {
    endpoint: String,
    client: reqwest::Client,
}

impl GenerationClient {
    pub fn new(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("artisanpost/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn generate(&self, draft: &PostDraft) -> Result<GeneratedPost, GenerationError> {
        let request = GenerateRequest {
            text: &draft.text,
            post_type: draft.platform.as_str(),
        };
        tracing::debug!(endpoint = %self.endpoint, platform = %draft.platform, "requesting post");

        let response = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::MalformedBody(e.to_string()))?;

        tracing::info!(platform = %draft.platform, chars = parsed.post.len(), "post generated");
        Ok(GeneratedPost::new(parsed.post, draft.platform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::Platform;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout_secs: u64) -> GenerationClient {
        GenerationClient::new(&GeneratorConfig {
            endpoint: format!("{}/api/generate_post", server.uri()),
            timeout_secs,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate_post"))
            .and(body_json(serde_json::json!({"text": "draft", "post_type": "twitter"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"post": "final"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 5);
        let post = client
            .generate(&PostDraft::new("draft", Platform::Twitter))
            .await
            .unwrap();

        assert_eq!(post.text, "final");
        assert_eq!(post.platform, Platform::Twitter);
    }

    #[tokio::test]
    async fn test_generate_non_success_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server, 5)
            .generate(&PostDraft::new("draft", Platform::Email))
            .await;

        assert!(matches!(result, Err(GenerationError::Status(500))));
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "wrong key"})),
            )
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server, 5)
            .generate(&PostDraft::new("draft", Platform::Instagram))
            .await;

        assert!(matches!(result, Err(GenerationError::MalformedBody(_))));
    }

    #[tokio::test]
    async fn test_generate_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"post": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server, 1)
            .generate(&PostDraft::new("draft", Platform::Whatsapp))
            .await;

        assert!(matches!(result, Err(GenerationError::Timeout)));
    }

    #[tokio::test]
    async fn test_generate_connection_refused() {
        let client = GenerationClient::new(&GeneratorConfig {
            endpoint: "http://127.0.0.1:9/api/generate_post".to_string(),
            timeout_secs: 2,
        })
        .unwrap();

        let result = client.generate(&PostDraft::new("draft", Platform::Twitter)).await;

        assert!(matches!(
            result,
            Err(GenerationError::Request(_)) | Err(GenerationError::Timeout)
        ));
    }
}

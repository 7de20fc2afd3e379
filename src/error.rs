use thiserror::Error;

/// The remote generator did not hand back a usable post.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("generator timed out")]
    Timeout,
    #[error("generator returned HTTP {0}")]
    Status(u16),
    #[error("generator returned an unexpected body: {0}")]
    MalformedBody(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Request(err)
        }
    }
}

/// The host could not open a share destination. Never fatal.
#[derive(Debug, Error)]
#[error("could not open {url}: {source}")]
pub struct ShareActionError {
    pub url: String,
    #[source]
    pub source: std::io::Error,
}

/// The static landing content could not be loaded.
#[derive(Debug, Error)]
pub enum ContentLoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("content request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("content source returned HTTP {0}")]
    Status(u16),
    #[error("content is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Recording upload did not produce landing content.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upload server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error(transparent)]
    Content(#[from] ContentLoadError),
}

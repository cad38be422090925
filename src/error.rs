//! Error handling module for tag retrieval

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagsError {
    /// Connection, TLS, DNS or timeout failure of an HTTP call
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body is not the expected JSON document
    #[error("Decode error: {0}")]
    Decode(String),

    /// Catalog answered with a non-success status and no usable page
    #[error("Registry returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Login rejected by the auth endpoint
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Request could not be built (bad URL, bad header value)
    #[error("Request error: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A worker went away without reporting its job
    #[error("Worker error: {0}")]
    Worker(String),

    /// Failure isolated to one repository's crawl
    #[error("Repository {repository}: {source}")]
    Repository {
        repository: String,
        #[source]
        source: Box<TagsError>,
    },
}

impl TagsError {
    /// Attach the repository a failure was encountered for.
    pub fn for_repository(self, repository: &str) -> Self {
        match self {
            TagsError::Repository { .. } => self,
            other => TagsError::Repository {
                repository: repository.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// Timeouts are reported separately by the CLI.
    pub fn is_timeout(&self) -> bool {
        match self {
            TagsError::Transport(err) => err.is_timeout(),
            TagsError::Repository { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for TagsError {
    fn from(err: serde_json::Error) -> Self {
        TagsError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for TagsError {
    fn from(err: url::ParseError) -> Self {
        TagsError::Request(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TagsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_wrapping_is_not_nested() {
        let err = TagsError::Decode("unexpected EOF".to_string())
            .for_repository("redis")
            .for_repository("redis");

        match &err {
            TagsError::Repository { repository, source } => {
                assert_eq!(repository, "redis");
                assert!(matches!(**source, TagsError::Decode(_)));
            }
            other => panic!("expected repository error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "Repository redis: Decode error: unexpected EOF");
    }

    #[test]
    fn test_url_errors_map_to_request() {
        let err: TagsError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, TagsError::Request(_)));
    }
}

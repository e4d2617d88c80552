use thiserror::Error;

/// Failure of a single remote advisory request.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("rate limit or quota exceeded: {0}")]
    RateLimited(String),

    #[error("model not found: {model}")]
    ModelNotFound { model: String },

    #[error("API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response carried no text")]
    EmptyResponse,
}

/// Coarse grouping used only to pick a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    RateLimit,
    ModelNotFound,
    Other,
}

impl RemoteError {
    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            RemoteError::RateLimited(_) => RemoteErrorKind::RateLimit,
            RemoteError::ModelNotFound { .. } => RemoteErrorKind::ModelNotFound,
            _ => RemoteErrorKind::Other,
        }
    }

    /// Map a non-success HTTP reply onto the error taxonomy.
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        if status == 429 || body.to_lowercase().contains("quota") {
            RemoteError::RateLimited(body)
        } else if status == 404 {
            RemoteError::ModelNotFound {
                model: model.to_string(),
            }
        } else {
            RemoteError::Http { status, body }
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let m = "models/gemini-3-flash-preview";
        assert_eq!(
            RemoteError::from_status(429, "slow down".into(), m).kind(),
            RemoteErrorKind::RateLimit
        );
        assert_eq!(
            RemoteError::from_status(403, "Quota exceeded for project".into(), m).kind(),
            RemoteErrorKind::RateLimit
        );
        assert_eq!(
            RemoteError::from_status(404, "".into(), m).kind(),
            RemoteErrorKind::ModelNotFound
        );
        assert_eq!(
            RemoteError::from_status(500, "boom".into(), m).kind(),
            RemoteErrorKind::Other
        );
        assert_eq!(RemoteError::EmptyResponse.kind(), RemoteErrorKind::Other);
    }

    #[test]
    fn test_model_name_in_message() {
        let err = RemoteError::from_status(404, "".into(), "models/nope");
        assert_eq!(err.to_string(), "model not found: models/nope");
    }
}

use thiserror::Error;

/// Errors from the catalog, AI edit and export collaborators.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Invalid payload: {0}")]
    Payload(String),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("Export integrity check failed: {0}")]
    Integrity(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Export cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for MediaError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Payload(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, MediaError>;

use releasefeed_utils::BoxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// The source answered with a non-2xx status.
    #[error("Failed to fetch releases: {status} {status_text}")]
    Fetch { status: u16, status_text: String },

    /// No response was received.
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("Invalid release payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FeedError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;

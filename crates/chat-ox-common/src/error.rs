use thiserror::Error;

/// Errors that can occur while talking to a chat-completion endpoint
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP status {status} for {url}")]
    Status {
        /// Status code returned by the server
        status: reqwest::StatusCode,
        /// URL the request was sent to
        url: String,
    },

    /// Invalid event data in streaming response
    #[error("Invalid event data: {0}")]
    InvalidEventData(String),

    /// UTF-8 conversion error
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// Reading the response body from a local source failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CommonRequestError {
    /// Status code carried by the error, if the server produced one.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

use std::path::PathBuf;

use chat_ox_common::{CommonRequestError, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatOxError {
    /// Transport, status or event-stream failure
    #[error(transparent)]
    Request(#[from] CommonRequestError),

    /// The fixture file could not be opened or read
    #[error("Failed to read fixture {}: {source}", path.display())]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output stream failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ChatOxError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Request(e) => e.status(),
            _ => None,
        }
    }
}

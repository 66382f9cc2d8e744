//! Fetch error type shared by the page fetcher and the download worker.

use std::fmt;
use thiserror::Error;

/// Error from a single HTTP fetch or the local write that follows it.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported a transport error (connect, DNS, timeout, reset).
    #[error("network error: {0}")]
    Network(#[from] curl::Error),
    /// The final response had a non-2xx status.
    #[error("HTTP {code}")]
    HttpStatus { code: u32 },
    /// Local filesystem failure (directory creation, temp file, rename).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The blocking transfer task was cancelled or panicked.
    #[error("worker task failed: {0}")]
    Join(String),
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network(_) => FailureKind::Network,
            FetchError::HttpStatus { code } => FailureKind::HttpStatus(*code),
            FetchError::Io(_) => FailureKind::Io,
            FetchError::Join(_) => FailureKind::Worker,
        }
    }
}

impl From<tokio::task::JoinError> for FetchError {
    fn from(e: tokio::task::JoinError) -> Self {
        FetchError::Join(e.to_string())
    }
}

/// Classification carried by a failed [`crate::pipeline::DownloadOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    HttpStatus(u32),
    Io,
    /// Task never reported back (panicked or was aborted).
    Worker,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network"),
            FailureKind::HttpStatus(code) => write!(f, "http {}", code),
            FailureKind::Io => write!(f, "io"),
            FailureKind::Worker => write!(f, "worker"),
        }
    }
}

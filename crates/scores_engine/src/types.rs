use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

/// What the fetcher learned about the response besides its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    /// URL as requested.
    pub url: String,
    /// URL after redirects.
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub elapsed: Duration,
}

impl FetchMetadata {
    pub fn redirected(&self) -> bool {
        self.url != self.final_url
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Why a single fetch failed. Only the request client decides what is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureKind {
    #[error("invalid url")]
    InvalidUrl,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("redirect limit exceeded")]
    RedirectLimitExceeded,
    #[error("response too large ({actual} bytes, limit {max_bytes})")]
    TooLarge { max_bytes: u64, actual: u64 },
    #[error("unsupported content type {content_type}")]
    UnsupportedContentType { content_type: String },
    #[error("could not decode page as {encoding}")]
    Decode { encoding: String },
    #[error("network error")]
    Network,
    #[error("gave up after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl FailureKind {
    /// Connection-level trouble worth a plain delayed retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, FailureKind::Timeout | FailureKind::Network)
    }
}

use thiserror::Error;

/// Top-level error type for the `mirakurun-api` crate.
///
/// Covers every failure mode of a request: client configuration, request
/// construction, transport, HTTP status, streaming media type, and body
/// decoding. Nothing is retried or logged here; callers decide.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// The client was configured with an unusable value
    /// (base URL without a trailing slash, invalid header value, ...).
    #[error("Invalid client configuration: {message}")]
    Configuration { message: String },

    // ── Request construction ────────────────────────────────────────
    /// The relative path could not be resolved against the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request body or query string serialization failed.
    #[error("Failed to encode request: {message}")]
    Encoding { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, ...).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request was aborted through a cancellation token.
    #[error("Request cancelled")]
    Cancelled,

    /// Local I/O failed while copying a streamed body.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── API ─────────────────────────────────────────────────────────
    /// The server answered with a status outside 200..=202.
    #[error("Mirakurun API error: {message}")]
    Api { status: u16, message: String },

    /// A streaming endpoint answered with an unexpected media type.
    #[error("Unexpected content type: expected {expected}, got {actual}")]
    ContentType {
        expected: &'static str,
        actual: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status code carried by an [`Error::Api`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the request never produced a usable response
    /// (connection failure, timeout, or cancellation).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Cancelled)
    }

    /// Returns `true` if the transport deadline expired.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding {
            message: err.to_string(),
        }
    }
}

impl From<serde_qs::Error> for Error {
    fn from(err: serde_qs::Error) -> Self {
        Self::Encoding {
            message: err.to_string(),
        }
    }
}

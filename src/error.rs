use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], stable across context wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Unauthorized,
    Api,
    Decode,
    NotFound,
    Unsupported,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid statsig url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unauthorized request to {url}, please check your console api key")]
    Unauthorized { url: String },

    #[error("statsig error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("statsig error: request to {url} failed with status {status}")]
    Status { status: u16, url: String },

    #[error("error parsing statsig response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    #[error("{operation} is not supported for {kind} by the statsig console api")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any operation context.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Context { source, .. } => source.kind(),
            Error::Config(_) | Error::InvalidUrl(_) => ErrorKind::Config,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Unauthorized { .. } => ErrorKind::Unauthorized,
            Error::Api { .. } | Error::Status { .. } => ErrorKind::Api,
            Error::Decode(_) => ErrorKind::Decode,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Unsupported { .. } => ErrorKind::Unsupported,
        }
    }
}

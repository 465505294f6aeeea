use thiserror::Error;

/// Reasons a secret key could not be established at startup.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no secret key was specified")]
    NoKeySpecified,

    #[error("failed to read secret key file '{path}': {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("secret key is not valid base64: {0}")]
    MalformedKey(#[from] base64::DecodeError),

    #[error("secret key is empty")]
    EmptyKey,
}

#[derive(Debug, Error)]
pub enum VrageError {
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("received HTTP {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("failed to read response body from {url}: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("liveness check returned {0:?} instead of \"Pong\"")]
    Liveness(String),

    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

impl VrageError {
    /// True for failures that mean startup cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VrageError::Credential(_))
    }
}

pub type Result<T> = std::result::Result<T, VrageError>;

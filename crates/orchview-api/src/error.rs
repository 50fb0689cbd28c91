use reqwest::StatusCode;

/// Errors returned by the orchestrator client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The body was not valid JSON
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record lacked a required field
    #[error("{entity} record is missing field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A record field had a value we cannot use
    #[error("{entity} record has invalid `{field}`: {value}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
}

impl ApiError {
    /// True for connectivity failures and non-success responses
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }

    /// HTTP status, when the service answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

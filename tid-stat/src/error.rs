use thiserror::Error;

/// Errors raised while fetching or decoding statistics.
#[derive(Error, Debug)]
pub enum StatError {
    /// The request never produced a response
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The body is not the JSON shape the endpoint promises
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to parse {field}: {value:?}")]
    Parse { field: String, value: String },

    /// Raised by strict resolvers only
    #[error("Unknown code {code:?} for {family}")]
    UnknownCode { family: String, code: String },

    #[error("Failed to read code table: {0}")]
    CodeTable(#[from] csv::Error),
}

impl StatError {
    pub fn parse(field: impl Into<String>, value: impl Into<String>) -> Self {
        StatError::Parse {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True when the failure happened before a body could be decoded.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, StatError::Transport(_) | StatError::Status(_))
    }
}

impl From<serde_json::Error> for StatError {
    fn from(err: serde_json::Error) -> Self {
        StatError::MalformedResponse(err.to_string())
    }
}

#[cfg(feature = "api")]
impl From<reqwest::Error> for StatError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            StatError::Status(status.as_u16())
        } else if err.is_decode() {
            StatError::MalformedResponse(err.to_string())
        } else {
            StatError::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, StatError>;

//! Error types for backend requests and the request orchestrator.

use thiserror::Error;

/// Failure of a single HTTP request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("{}", http_detail(*status, body))]
    Http { status: u16, body: String },

    #[error("{0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

fn http_detail(status: u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("Server error: {}", status)
    } else {
        body.trim().to_string()
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            RequestError::Decode(e.to_string())
        } else {
            RequestError::Transport(e.to_string())
        }
    }
}

/// Form rule violated before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Brand, product and type must be filled in")]
    MissingIdentity,
    #[error("Screen size is not valid")]
    InvalidScreenSize,
    #[error("RAM is not valid")]
    InvalidRam,
    #[error("Weight is not valid")]
    InvalidWeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Options,
    Predict,
}

/// Everything that can end an orchestrated operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{operation:?} request timed out")]
    Timeout { operation: Operation },

    #[error("request cancelled")]
    Cancelled,

    #[error("{operation:?} request failed: {source}")]
    Request {
        operation: Operation,
        #[source]
        source: RequestError,
    },
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }

    /// The one string the views show for this error.
    pub fn user_message(&self, base_url: &str) -> String {
        match self {
            FetchError::Validation(rule) => rule.to_string(),
            FetchError::Timeout { operation: Operation::Options } => format!(
                "Connection timed out. Make sure the backend is running at {}",
                base_url
            ),
            FetchError::Timeout { operation: Operation::Predict } => {
                "Prediction timed out. Please try again.".to_string()
            }
            FetchError::Cancelled => "Request was cancelled".to_string(),
            FetchError::Request { operation: Operation::Options, source } => {
                format!("Failed to load data: {}", source)
            }
            FetchError::Request { operation: Operation::Predict, source } => {
                format!("Prediction failed: {}", source)
            }
        }
    }
}

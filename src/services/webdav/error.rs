use thiserror::Error;

/// Failure classes for the listing pipeline. Every stage boundary returns
/// one of these; the binary maps them to exit codes.
#[derive(Debug, Error)]
pub enum WebDAVError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse XML response: {0}")]
    Xml(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WebDAVError {
    /// Transport failures exit 1, parse and configuration failures exit 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            WebDAVError::Request(_) | WebDAVError::Http { .. } => 1,
            WebDAVError::Xml(_) | WebDAVError::InvalidConfig(_) => 2,
        }
    }
}

//! Error types for the research core.

use thiserror::Error;

/// Errors surfaced by the store client and the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The question was empty; nothing was sent.
    #[error("{0}")]
    Validation(String),
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("request rejected: {0}")]
    RemoteRejected(String),
    /// The object was submitted but fetching it failed.
    #[error("failed to retrieve research results: {0}")]
    Retrieval(Box<Error>),
}

impl Error {
    /// The transport or rejection error underneath any retrieval wrapper.
    pub fn root(&self) -> &Error {
        match self {
            Error::Retrieval(inner) => inner.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

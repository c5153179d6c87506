use crate::router::RouterError;

use std::error::Error as StdError;

pub type BoxError = Box<dyn StdError + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("can't set headers after they are sent")]
    AlreadyCommitted,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error("no not-found handler registered under {0:?}")]
    MissingNotFoundHandler(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Handler(BoxError),
}

impl Error {
    /// Wraps a failure raised by a filter or servlet collaborator.
    pub fn handler(e: impl Into<BoxError>) -> Self {
        Self::Handler(e.into())
    }
}

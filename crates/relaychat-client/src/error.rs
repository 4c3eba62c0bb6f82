use thiserror::Error;

use crate::store::StoreError;

/// Errors produced by a client session.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay could not be reached or the connection broke mid-reply.
    #[error("relay request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The relay answered with a non-success status.
    #[error("relay returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A buffered relay reply was not a completion body.
    #[error("invalid relay payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A buffered completion had no message content.
    #[error("relay reply carried no completion content")]
    EmptyCompletion,

    /// Reading from or writing to the conversation store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The submitted input was empty after trimming.
    #[error("message is empty")]
    EmptyInput,
}

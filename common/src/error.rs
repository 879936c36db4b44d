//! Error type for the shared pipeline

use thiserror::Error;

/// Shared error type
#[derive(Error, Debug)]
pub enum Error {
    /// Results view entered without a submission to show.
    #[error("no submission to display")]
    MissingPayload,

    /// The response shape does not match the submission mode.
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),
}

/// Result alias
pub type Result<T> = std::result::Result<T, Error>;

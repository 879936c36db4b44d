use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgeClientError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("No images found: {0}")]
    NoImagesFound(String),

    /// Submission failed; the message is what the user sees.
    #[error("{0}")]
    Request(String),

    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("A submission is already in progress")]
    Busy,

    #[error("Cancelled")]
    Cancelled,

    #[error("Prompt error: {0}")]
    Interaction(String),

    #[error(transparent)]
    Common(#[from] xray_edge_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, EdgeClientError>;

//! X-ray Edge Common Library
//!
//! I/O-free half of the client: data model, response normalization,
//! one-shot navigation, results-viewer state and pagination.

pub mod types;
pub mod error;
pub mod endpoint;
pub mod normalizer;
pub mod navigation;
pub mod pagination;
pub mod viewer;
pub mod filename;

pub use types::{
    ApiResponse, BatchResponse, NavigationPayload, ProcessingResult, SelectedFile, SubmissionMode,
    Timing, Variant, VariantPaths,
};
pub use error::{Error, Result};
pub use endpoint::{resolve_variant_url, VariantUrlResolver};
pub use normalizer::{normalize, NormalizedResults};
pub use navigation::{Navigator, ResultsEntry, Route};
pub use pagination::{page_window, PageAction, Pagination};
pub use viewer::{DownloadRequest, ImageDimensions, LoadTicket, ResultsViewer, SlotState};
pub use filename::download_filename;

//! Data model shared by the client pipeline
//!
//! - SelectedFile: a user-chosen image, held only until submission resolves
//! - ProcessingResult / Timing: one server outcome
//! - ApiResponse: the two wire shapes (single object, batch array)
//! - NavigationPayload: the one-shot bundle handed to the results view

use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge-detection output rendered by the server for each processed image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Canny,
    Fuzzy,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Canny, Variant::Fuzzy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Canny => "canny",
            Variant::Fuzzy => "fuzzy",
        }
    }

    /// The other variant; the viewer toggle only ever has two positions.
    pub fn toggled(&self) -> Variant {
        match self {
            Variant::Canny => Variant::Fuzzy,
            Variant::Fuzzy => Variant::Canny,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "canny" | "c" => Ok(Variant::Canny),
            "fuzzy" | "f" => Ok(Variant::Fuzzy),
            _ => Err(format!("Unknown variant: {}. Use canny or fuzzy", s)),
        }
    }
}

/// A file picked by the user for submission.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Short format label such as `PNG` or `JPEG`, derived from the mime type.
    pub fn format_label(&self) -> String {
        self.mime_type
            .strip_prefix("image/")
            .unwrap_or(&self.mime_type)
            .to_uppercase()
    }
}

// file contents are not worth printing
impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Per-stage processing time in seconds.
///
/// `total` is measured by the server and is not guaranteed to equal the
/// sum of the stages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub preprocess: f64,
    pub canny: f64,
    pub fuzzy: f64,
    pub total: f64,
}

impl Timing {
    /// Labelled stage rows in whole milliseconds, total last.
    pub fn rows_ms(&self) -> [(&'static str, u64); 4] {
        [
            ("Preprocessing", to_millis(self.preprocess)),
            ("Canny Edge Detection", to_millis(self.canny)),
            ("Fuzzy Edge Detection", to_millis(self.fuzzy)),
            ("Total Time", to_millis(self.total)),
        ]
    }
}

fn to_millis(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

/// Relative retrieval paths the server reports for each variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantPaths {
    pub canny: String,
    pub fuzzy: String,
}

/// One processed image as returned by the edge-detection API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub image_id: String,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default, rename = "timing_sec", alias = "timing")]
    pub timing: Option<Timing>,

    #[serde(default)]
    pub images: Option<VariantPaths>,
}

/// Success body of `POST /batch-edge-detect`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    #[serde(default)]
    pub batch_id: Option<String>,

    pub results: Vec<ProcessingResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionMode {
    Single,
    Batch,
}

impl fmt::Display for SubmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionMode::Single => write!(f, "single"),
            SubmissionMode::Batch => write!(f, "batch"),
        }
    }
}

/// Raw API response, kept in the shape the server sent it.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Single(ProcessingResult),
    Batch(BatchResponse),
}

/// Bundle carried from the upload flow to the results flow.
///
/// `entry_names[i]` is the name `files[i]` was submitted under. It differs
/// from `files[i].name` only when a batch contained colliding names.
#[derive(Debug, Clone)]
pub struct NavigationPayload {
    pub mode: SubmissionMode,
    pub result: ApiResponse,
    pub files: Vec<SelectedFile>,
    pub entry_names: Vec<String>,
}

impl NavigationPayload {
    pub fn single(result: ProcessingResult, file: SelectedFile) -> Self {
        let entry_names = vec![file.name.clone()];
        Self {
            mode: SubmissionMode::Single,
            result: ApiResponse::Single(result),
            files: vec![file],
            entry_names,
        }
    }

    pub fn batch(result: BatchResponse, files: Vec<SelectedFile>, entry_names: Vec<String>) -> Self {
        Self {
            mode: SubmissionMode::Batch,
            result: ApiResponse::Batch(result),
            files,
            entry_names,
        }
    }
}

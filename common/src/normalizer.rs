//! Response normalization
//!
//! Reduces the two API response shapes (single object, batch array) into one
//! ordered result sequence paired with the submitted files. This is the only
//! place that branches on the submission mode.

use crate::error::{Error, Result};
use crate::types::{ApiResponse, NavigationPayload, ProcessingResult, SelectedFile, SubmissionMode};

/// Uniform result set consumed by the results viewer.
#[derive(Debug, Clone)]
pub struct NormalizedResults {
    pub results: Vec<ProcessingResult>,
    pub files: Vec<SelectedFile>,
    entry_names: Vec<String>,
}

impl NormalizedResults {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True when every result has a submitted file at the same index.
    pub fn is_aligned(&self) -> bool {
        self.results.len() == self.files.len()
    }

    /// The submitted file behind result `index`, if it can be told.
    ///
    /// Counts match: pair by index. Counts differ (the server skipped an
    /// entry): pair by the entry name echoed back as `filename`, and treat
    /// the file as unknown when that does not identify exactly one entry.
    pub fn file_for(&self, index: usize) -> Option<&SelectedFile> {
        let result = self.results.get(index)?;
        if self.is_aligned() {
            return self.files.get(index);
        }

        let reported = result.filename.as_deref()?;
        let mut matches = self
            .entry_names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.as_str() == reported);
        match (matches.next(), matches.next()) {
            (Some((i, _)), None) => self.files.get(i),
            _ => None,
        }
    }
}

/// Normalize a navigation payload.
///
/// # Errors
/// * `Error::MissingPayload` - no payload was handed over
/// * `Error::ResponseShape` - the response does not match `payload.mode`
pub fn normalize(payload: Option<NavigationPayload>) -> Result<NormalizedResults> {
    let payload = payload.ok_or(Error::MissingPayload)?;

    let NavigationPayload { mode, result, files, entry_names } = payload;

    let results = match (mode, result) {
        (SubmissionMode::Single, ApiResponse::Single(result)) => vec![result],
        // server order is kept as sent
        (SubmissionMode::Batch, ApiResponse::Batch(batch)) => batch.results,
        (mode, ApiResponse::Single(_)) => {
            return Err(Error::ResponseShape(format!("{} submission with a single-object response", mode)));
        }
        (mode, ApiResponse::Batch(_)) => {
            return Err(Error::ResponseShape(format!("{} submission with a batch response", mode)));
        }
    };

    let entry_names = if entry_names.len() == files.len() {
        entry_names
    } else {
        files.iter().map(|f| f.name.clone()).collect()
    };

    Ok(NormalizedResults { results, files, entry_names })
}

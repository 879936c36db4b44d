//! View navigation with one-shot payload transfer
//!
//! The upload flow hands a [`NavigationPayload`] to the results flow. The
//! results view takes it exactly once; entering again without a fresh
//! submission redirects to the upload view instead of showing stale results.

use crate::error::Error;
use crate::normalizer::normalize;
use crate::types::NavigationPayload;
use crate::viewer::ResultsViewer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Upload,
    Results,
}

/// Outcome of entering the results view.
#[derive(Debug)]
pub enum ResultsEntry {
    Show(ResultsViewer),
    /// No payload: go back to upload silently.
    RedirectToUpload,
    /// The submission succeeded but produced nothing to display.
    NoResults,
    /// The response did not match the submission mode.
    Invalid(Error),
}

#[derive(Debug)]
pub struct Navigator {
    route: Route,
    pending: Option<NavigationPayload>,
    max_visible: usize,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(crate::pagination::DEFAULT_MAX_VISIBLE)
    }
}

impl Navigator {
    pub fn new(max_visible: usize) -> Self {
        Self {
            route: Route::Upload,
            pending: None,
            max_visible,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Transition to the results view carrying `payload`.
    pub fn navigate_to_results(&mut self, payload: NavigationPayload) {
        self.pending = Some(payload);
        self.route = Route::Results;
    }

    /// Enter the results view (including by direct navigation or refresh).
    ///
    /// Consumes the pending payload. Every outcome except `Show` leaves the
    /// navigator on the upload route.
    pub fn enter_results(&mut self) -> ResultsEntry {
        self.route = Route::Results;
        let entry = match normalize(self.pending.take()) {
            Ok(results) => match ResultsViewer::new(results) {
                Some(viewer) => ResultsEntry::Show(viewer.with_max_visible(self.max_visible)),
                None => ResultsEntry::NoResults,
            },
            Err(Error::MissingPayload) => ResultsEntry::RedirectToUpload,
            Err(err) => ResultsEntry::Invalid(err),
        };
        if !matches!(entry, ResultsEntry::Show(_)) {
            self.route = Route::Upload;
        }
        entry
    }

    /// "Upload another": back to the upload view, dropping anything pending.
    pub fn back_to_upload(&mut self) {
        self.pending = None;
        self.route = Route::Upload;
    }
}

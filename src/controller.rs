//! Upload controller
//!
//! Owns the file selection, picks the submission strategy (one file goes to
//! `/edge-detect`, several go to `/batch-edge-detect` as one archive) and
//! turns the outcome into a navigation payload or an inline error message.
//!
//! At most one submission is in flight; a second `submit` while one is
//! outstanding is rejected with [`SubmitOutcome::Busy`], never queued.
//! Submission errors stop here and are reported through the outcome and
//! `last_error`.

use crate::archive::build_archive;
use crate::error::{EdgeClientError, Result};
use crate::gateway::EdgeDetectApi;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use xray_edge_common::{NavigationPayload, SelectedFile};

/// Message used when an error carries no text of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "Processing failed";

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Nothing selected; nothing happened.
    NothingSelected,
    /// Another submission is still running.
    Busy,
    /// Success: hand this to the navigator.
    Navigate(NavigationPayload),
    /// Failure; selection kept for retry.
    Failed(String),
}

#[derive(Debug, Default)]
struct UploadState {
    selected_files: Vec<SelectedFile>,
    last_error: Option<String>,
}

/// Clears the processing flag however `submit` ends, including when its
/// future is dropped mid-request.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct UploadController<A> {
    api: A,
    state: Mutex<UploadState>,
    processing: AtomicBool,
}

impl<A: EdgeDetectApi> UploadController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(UploadState::default()),
            processing: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn state(&self) -> MutexGuard<'_, UploadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the selection. Refused while a submission is running.
    pub fn select_files(&self, files: Vec<SelectedFile>) -> Result<()> {
        if self.is_processing() {
            return Err(EdgeClientError::Busy);
        }
        self.state().selected_files = files;
        Ok(())
    }

    pub fn selected_files(&self) -> Vec<SelectedFile> {
        self.state().selected_files.clone()
    }

    pub fn selected_count(&self) -> usize {
        self.state().selected_files.len()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    /// Submit the current selection.
    pub async fn submit(&self) -> SubmitOutcome {
        if self
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("submit rejected: already processing");
            return SubmitOutcome::Busy;
        }
        let _guard = ProcessingGuard(&self.processing);

        let files = {
            let mut state = self.state();
            if state.selected_files.is_empty() {
                return SubmitOutcome::NothingSelected;
            }
            state.last_error = None;
            state.selected_files.clone()
        };

        match self.dispatch(files).await {
            Ok(payload) => {
                self.state().selected_files.clear();
                SubmitOutcome::Navigate(payload)
            }
            Err(err) => {
                let message = match err.to_string() {
                    m if m.trim().is_empty() => GENERIC_FAILURE_MESSAGE.to_string(),
                    m => m,
                };
                tracing::warn!(error = %message, "submission failed");
                self.state().last_error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    async fn dispatch(&self, mut files: Vec<SelectedFile>) -> Result<NavigationPayload> {
        if files.len() == 1 {
            let file = files.remove(0);
            let result = self.api.submit_single(&file).await?;
            return Ok(NavigationPayload::single(result, file));
        }

        let archive = build_archive(&files)?;
        let result = self.api.submit_batch(&archive).await?;
        Ok(NavigationPayload::batch(result, files, archive.entry_names))
    }
}

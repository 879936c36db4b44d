//! Results viewer state
//!
//! Owns the current index, the selected variant and the load state of the
//! one displayed image slot. Every change of `(index, variant)` starts a new
//! load generation; completions carrying an older ticket are discarded so a
//! slow fetch can never overwrite what is on screen now.

use crate::endpoint::VariantUrlResolver;
use crate::filename::download_filename;
use crate::normalizer::NormalizedResults;
use crate::pagination::{page_window, PageAction, Pagination, DEFAULT_MAX_VISIBLE};
use crate::types::{ProcessingResult, SelectedFile, Variant};

/// Text shown in place of an image that failed to load.
pub const IMAGE_LOAD_ERROR: &str = "Failed to load processed image";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Load state of the displayed slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Loading,
    Loaded(ImageDimensions),
    /// Holds the underlying reason; the user sees [`IMAGE_LOAD_ERROR`].
    Failed(String),
}

/// Identifies the `(index, variant)` a load was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub index: usize,
    pub variant: Variant,
    generation: u64,
}

/// What a download needs: which image, which variant, and the local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub image_id: String,
    pub variant: Variant,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct ResultsViewer {
    results: NormalizedResults,
    current_index: usize,
    selected_variant: Variant,
    slot: SlotState,
    generation: u64,
    max_visible: usize,
}

impl ResultsViewer {
    /// Viewer positioned on the first result, `canny` selected.
    ///
    /// Returns `None` for an empty result set; there is nothing to show.
    pub fn new(results: NormalizedResults) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        Some(Self {
            results,
            current_index: 0,
            selected_variant: Variant::default(),
            slot: SlotState::Loading,
            generation: 0,
            max_visible: DEFAULT_MAX_VISIBLE,
        })
    }

    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected_variant(&self) -> Variant {
        self.selected_variant
    }

    pub fn results(&self) -> &NormalizedResults {
        &self.results
    }

    pub fn current(&self) -> &ProcessingResult {
        &self.results.results[self.current_index]
    }

    pub fn current_file(&self) -> Option<&SelectedFile> {
        self.results.file_for(self.current_index)
    }

    /// URL of the image currently on display.
    pub fn image_url<R: VariantUrlResolver + ?Sized>(&self, resolver: &R) -> String {
        resolver.variant_url(&self.current().image_id, self.selected_variant)
    }

    pub fn slot(&self) -> &SlotState {
        &self.slot
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.slot, SlotState::Loading)
    }

    pub fn has_error(&self) -> bool {
        matches!(self.slot, SlotState::Failed(_))
    }

    /// Ticket for the load the current slot is waiting on.
    pub fn load_ticket(&self) -> LoadTicket {
        LoadTicket {
            index: self.current_index,
            variant: self.selected_variant,
            generation: self.generation,
        }
    }

    /// Record a finished load. Returns `false` and changes nothing when the
    /// ticket no longer matches the displayed slot or the slot has already
    /// settled.
    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: Result<ImageDimensions, String>) -> bool {
        if ticket != self.load_ticket() || !self.is_loading() {
            return false;
        }
        self.slot = match outcome {
            Ok(dimensions) => SlotState::Loaded(dimensions),
            Err(reason) => SlotState::Failed(reason),
        };
        true
    }

    /// Switch variant, keeping the index. Returns whether anything changed.
    pub fn select_variant(&mut self, variant: Variant) -> bool {
        if variant == self.selected_variant {
            return false;
        }
        self.selected_variant = variant;
        self.reset_slot();
        true
    }

    pub fn toggle_variant(&mut self) {
        self.select_variant(self.selected_variant.toggled());
    }

    /// Move to `index`. Out-of-range or same-index requests are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len() || index == self.current_index {
            return false;
        }
        self.current_index = index;
        self.reset_slot();
        true
    }

    /// Pagination control, absent when there is a single result.
    pub fn pagination(&self) -> Option<Pagination> {
        page_window(self.len(), self.current_index, self.max_visible)
    }

    pub fn apply(&mut self, action: PageAction) -> bool {
        match self.pagination().and_then(|p| p.on_action(action)) {
            Some(index) => self.go_to(index),
            None => false,
        }
    }

    pub fn download_filename(&self) -> String {
        download_filename(
            self.current_file().map(|f| f.name.as_str()),
            self.current().filename.as_deref(),
            self.selected_variant,
        )
    }

    pub fn download_request(&self) -> DownloadRequest {
        DownloadRequest {
            image_id: self.current().image_id.clone(),
            variant: self.selected_variant,
            filename: self.download_filename(),
        }
    }

    fn reset_slot(&mut self) {
        self.generation += 1;
        self.slot = SlotState::Loading;
    }
}

//! Pagination window over result indices
//!
//! Pure function of `(total, current, max_visible)`. No hidden state: the
//! control is a rendering of its inputs plus the index an action asks for.

use std::ops::Range;

/// Default number of page buttons shown at once.
pub const DEFAULT_MAX_VISIBLE: usize = 5;

/// Rendered pagination control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub total: usize,
    pub current: usize,
    /// Contiguous page indices to show, within `[0, total)`.
    pub pages: Range<usize>,
}

/// User action on the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    Previous,
    Next,
    Goto(usize),
}

/// Compute the pagination control, or `None` when there is nothing to page
/// (`total <= 1`).
///
/// The window has length `min(total, max_visible)`, is centered on `current`
/// where possible and slides toward the end range near the last page.
pub fn page_window(total: usize, current: usize, max_visible: usize) -> Option<Pagination> {
    if total <= 1 {
        return None;
    }

    let current = current.min(total - 1);
    let width = max_visible.max(1).min(total);
    let half = width / 2;

    let mut start = current.saturating_sub(half);
    let end = (start + width).min(total);
    if end - start < width {
        start = end.saturating_sub(width);
    }

    Some(Pagination {
        total,
        current,
        pages: start..end,
    })
}

impl Pagination {
    pub fn prev_disabled(&self) -> bool {
        self.current == 0
    }

    pub fn next_disabled(&self) -> bool {
        self.current + 1 == self.total
    }

    /// Index an action asks for, or `None` when the action is disabled or
    /// out of range.
    pub fn on_action(&self, action: PageAction) -> Option<usize> {
        match action {
            PageAction::Previous if !self.prev_disabled() => Some(self.current - 1),
            PageAction::Next if !self.next_disabled() => Some(self.current + 1),
            PageAction::Goto(page) if page < self.total => Some(page),
            _ => None,
        }
    }

    /// One-line text rendering, e.g. `‹ 1 [2] 3 4 5 ›`, pages 1-based.
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.pages.len() + 2);
        parts.push(if self.prev_disabled() { " ".to_string() } else { "‹".to_string() });
        for page in self.pages.clone() {
            if page == self.current {
                parts.push(format!("[{}]", page + 1));
            } else {
                parts.push(format!("{}", page + 1));
            }
        }
        parts.push(if self.next_disabled() { " ".to_string() } else { "›".to_string() });
        parts.join(" ")
    }
}

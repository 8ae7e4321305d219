//! Transactional undo/redo history.
//!
//! Entries are immutable snapshots of the page list plus the selection at
//! one committed moment. Pages are shared behind an `Arc`, so an entry is
//! never aliased by the live document: restoring an entry clones the pages
//! out of it.

use crate::config::HistoryConfig;
use crate::document::{Page, PageId};
use crate::elements::ElementId;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// One committed state.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub pages: Arc<Vec<Page>>,
    pub selected_page_id: Option<PageId>,
    pub selected_ids: Vec<ElementId>,
    pub timestamp: Instant,
    pub label: Option<String>,
}

impl HistoryEntry {
    fn new(
        pages: &[Page],
        selected_page_id: Option<PageId>,
        selected_ids: &[ElementId],
        label: Option<&str>,
        timestamp: Instant,
    ) -> Self {
        Self {
            pages: Arc::new(pages.to_vec()),
            selected_page_id,
            selected_ids: selected_ids.to_vec(),
            timestamp,
            label: label.map(str::to_string),
        }
    }
}

/// Past/present/future stacks with transactions and a merge window.
#[derive(Debug)]
pub struct History {
    past: Vec<HistoryEntry>,
    present: Option<HistoryEntry>,
    future: Vec<HistoryEntry>,
    /// Snapshot taken when the active transaction began.
    transaction: Option<HistoryEntry>,
    merge_window: Duration,
    suppress_window: Duration,
    suppress_until: Option<Instant>,
    /// Present came from an undo or redo and has not been edited since.
    restored: bool,
    max_depth: Option<usize>,
    undo_requests: u64,
    redo_requests: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}

impl History {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            past: Vec::new(),
            present: None,
            future: Vec::new(),
            transaction: None,
            merge_window: Duration::from_millis(config.merge_window_ms),
            suppress_window: Duration::from_millis(config.suppress_window_ms),
            suppress_until: None,
            restored: false,
            max_depth: config.max_depth,
            undo_requests: 0,
            redo_requests: 0,
        }
    }

    /// Seed the present state and clear both stacks.
    pub fn init(&mut self, pages: &[Page], selected_page_id: Option<PageId>, selected_ids: &[ElementId]) {
        self.init_at(pages, selected_page_id, selected_ids, Instant::now());
    }

    pub fn init_at(
        &mut self,
        pages: &[Page],
        selected_page_id: Option<PageId>,
        selected_ids: &[ElementId],
        now: Instant,
    ) {
        self.past.clear();
        self.future.clear();
        self.transaction = None;
        self.suppress_until = None;
        self.restored = false;
        self.present = Some(HistoryEntry::new(pages, selected_page_id, selected_ids, None, now));
        log::debug!("History initialized with {} page(s)", pages.len());
    }

    /// Record a committed state. Returns whether history changed.
    pub fn record(
        &mut self,
        pages: &[Page],
        selected_page_id: Option<PageId>,
        selected_ids: &[ElementId],
        label: Option<&str>,
    ) -> bool {
        self.record_at(pages, selected_page_id, selected_ids, label, Instant::now())
    }

    /// Like [`History::record`] with an explicit clock.
    ///
    /// Ignored during a transaction and when `pages` equal the present
    /// pages, which covers the host re-applying an undo or redo. An
    /// unlabeled record arriving within the merge window of an unlabeled
    /// present replaces it instead of pushing a new step, except right
    /// after an undo or redo: the restored state always stays a step of
    /// its own. Any recorded change drops the redo stack.
    pub fn record_at(
        &mut self,
        pages: &[Page],
        selected_page_id: Option<PageId>,
        selected_ids: &[ElementId],
        label: Option<&str>,
        now: Instant,
    ) -> bool {
        if self.transaction.is_some() {
            return false;
        }
        let Some(present) = &self.present else {
            self.init_at(pages, selected_page_id, selected_ids, now);
            return false;
        };
        if present.pages.as_slice() == pages {
            if self.is_suppressed(now) {
                log::trace!("Ignoring re-application of restored history entry");
            }
            return false;
        }

        let entry = HistoryEntry::new(pages, selected_page_id, selected_ids, label, now);
        let mergeable = !self.restored
            && label.is_none()
            && present.label.is_none()
            && !self.past.is_empty()
            && now.saturating_duration_since(present.timestamp) < self.merge_window;
        self.restored = false;
        self.suppress_until = None;
        self.future.clear();
        if mergeable {
            self.present = Some(entry);
        } else {
            self.push(entry);
        }
        true
    }

    fn push(&mut self, entry: HistoryEntry) {
        if let Some(previous) = self.present.replace(entry) {
            self.past.push(previous);
        }
        if let Some(max) = self.max_depth {
            if self.past.len() > max {
                let excess = self.past.len() - max;
                self.past.drain(..excess);
            }
        }
    }

    fn is_suppressed(&self, now: Instant) -> bool {
        self.suppress_until.is_some_and(|until| now < until)
    }

    /// Start bracketing a multi-step gesture. Nested calls are ignored.
    pub fn begin_transaction(
        &mut self,
        pages: &[Page],
        selected_page_id: Option<PageId>,
        selected_ids: &[ElementId],
    ) -> bool {
        self.begin_transaction_at(pages, selected_page_id, selected_ids, Instant::now())
    }

    pub fn begin_transaction_at(
        &mut self,
        pages: &[Page],
        selected_page_id: Option<PageId>,
        selected_ids: &[ElementId],
        now: Instant,
    ) -> bool {
        if self.transaction.is_some() {
            return false;
        }
        self.transaction = Some(HistoryEntry::new(pages, selected_page_id, selected_ids, None, now));
        log::debug!("History transaction started");
        true
    }

    /// Close the transaction as one undo step. Nothing is pushed when the
    /// pages are unchanged since the transaction began.
    pub fn commit_transaction(
        &mut self,
        pages: &[Page],
        selected_page_id: Option<PageId>,
        selected_ids: &[ElementId],
        label: Option<&str>,
    ) -> bool {
        self.commit_transaction_at(pages, selected_page_id, selected_ids, label, Instant::now())
    }

    pub fn commit_transaction_at(
        &mut self,
        pages: &[Page],
        selected_page_id: Option<PageId>,
        selected_ids: &[ElementId],
        label: Option<&str>,
        now: Instant,
    ) -> bool {
        let Some(start) = self.transaction.take() else {
            return false;
        };
        if start.pages.as_slice() == pages {
            log::debug!("History transaction committed without changes");
            return false;
        }
        self.future.clear();
        self.restored = false;
        self.suppress_until = None;
        self.push(HistoryEntry::new(pages, selected_page_id, selected_ids, label, now));
        log::debug!("History transaction committed ({})", label.unwrap_or("unlabeled"));
        true
    }

    /// Abandon the transaction, returning the snapshot to restore.
    pub fn rollback_transaction(&mut self) -> Option<HistoryEntry> {
        let start = self.transaction.take();
        if start.is_some() {
            log::debug!("History transaction rolled back");
        }
        start
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Step back. Returns the entry to apply to the live document.
    pub fn request_undo(&mut self) -> Option<HistoryEntry> {
        self.request_undo_at(Instant::now())
    }

    pub fn request_undo_at(&mut self, now: Instant) -> Option<HistoryEntry> {
        if self.transaction.is_some() {
            return None;
        }
        let previous = self.past.pop()?;
        if let Some(current) = self.present.replace(previous) {
            self.future.push(current);
        }
        self.undo_requests += 1;
        self.suppress_until = Some(now + self.suppress_window);
        self.restored = true;
        self.present.clone()
    }

    /// Step forward. Returns the entry to apply to the live document.
    pub fn request_redo(&mut self) -> Option<HistoryEntry> {
        self.request_redo_at(Instant::now())
    }

    pub fn request_redo_at(&mut self, now: Instant) -> Option<HistoryEntry> {
        if self.transaction.is_some() {
            return None;
        }
        let next = self.future.pop()?;
        if let Some(current) = self.present.replace(next) {
            self.past.push(current);
        }
        self.redo_requests += 1;
        self.suppress_until = Some(now + self.suppress_window);
        self.restored = true;
        self.present.clone()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty() && self.transaction.is_none()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty() && self.transaction.is_none()
    }

    pub fn present(&self) -> Option<&HistoryEntry> {
        self.present.as_ref()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Number of undo applications so far.
    pub fn undo_request_count(&self) -> u64 {
        self.undo_requests
    }

    /// Number of redo applications so far.
    pub fn redo_request_count(&self) -> u64 {
        self.redo_requests
    }

    /// Drop all state. `present` is `None` until the next `init`.
    pub fn teardown(&mut self) {
        self.past.clear();
        self.future.clear();
        self.present = None;
        self.transaction = None;
        self.suppress_until = None;
        self.restored = false;
    }
}

//! Debounced persistence of the live document.
//!
//! The host reports edits with [`AutoSaveManager::note_change`] (typically
//! from `EditorEvent::DocumentChanged`) and calls
//! [`AutoSaveManager::flush_at`] on its own tick. A flush writes only when
//! the interval has passed and the snapshot differs from the last one
//! written, so an edit followed by its undo costs nothing.

use crate::document::CanvasDocument;
use crate::storage::{Storage, StorageResult};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Id used when the host never assigned one.
pub const DEFAULT_DOCUMENT_ID: &str = "untitled";

/// Mirror of the most recent write, restored on the next start.
pub const LAST_DOCUMENT_KEY: &str = "__last_worksheet__";

pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    document_id: String,
    interval: Duration,
    written_at: Option<Instant>,
    written: Option<CanvasDocument>,
    pending: bool,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_id(storage, DEFAULT_DOCUMENT_ID)
    }

    pub fn with_id(storage: Arc<S>, document_id: impl Into<String>) -> Self {
        Self {
            storage,
            document_id: document_id.into(),
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            written_at: None,
            written: None,
            pending: false,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn note_change(&mut self) {
        self.pending = true;
    }

    pub fn has_pending_changes(&self) -> bool {
        self.pending
    }

    /// A flush at `now` would be allowed to write.
    pub fn is_due_at(&self, now: Instant) -> bool {
        self.pending
            && self
                .written_at
                .is_none_or(|at| now.saturating_duration_since(at) >= self.interval)
    }

    /// Write `document` if changes are pending and the interval has passed.
    /// Returns whether anything was written.
    pub async fn flush_at(&mut self, document: &CanvasDocument, now: Instant) -> StorageResult<bool> {
        if !self.is_due_at(now) {
            return Ok(false);
        }
        if self.written.as_ref() == Some(document) {
            log::debug!("Document '{}' unchanged since last write", self.document_id);
            self.pending = false;
            return Ok(false);
        }
        self.write(document, now).await?;
        Ok(true)
    }

    /// Write unconditionally, e.g. on shutdown.
    pub async fn save_now(&mut self, document: &CanvasDocument) -> StorageResult<()> {
        self.write(document, Instant::now()).await
    }

    async fn write(&mut self, document: &CanvasDocument, now: Instant) -> StorageResult<()> {
        self.storage.save(&self.document_id, document).await?;
        self.storage.save(LAST_DOCUMENT_KEY, document).await?;
        log::info!("Saved document '{}' ({} page(s))", self.document_id, document.pages.len());
        self.written = Some(document.clone());
        self.written_at = Some(now);
        self.pending = false;
        Ok(())
    }

    /// Load `id`, or the last written document when `id` is `None`.
    /// The loaded snapshot counts as written.
    pub async fn restore(&mut self, id: Option<&str>) -> StorageResult<CanvasDocument> {
        let key = id.unwrap_or(LAST_DOCUMENT_KEY);
        let document = self.storage.load(key).await?;
        if let Some(id) = id {
            self.document_id = id.to_string();
        }
        self.written = Some(document.clone());
        self.written_at = Some(Instant::now());
        self.pending = false;
        Ok(document)
    }

    /// Stored document ids, without the last-document mirror.
    pub async fn saved_ids(&self) -> StorageResult<Vec<String>> {
        let ids = self.storage.list().await?;
        Ok(ids.into_iter().filter(|id| id != LAST_DOCUMENT_KEY).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageError, block_on};

    fn manager() -> AutoSaveManager<MemoryStorage> {
        AutoSaveManager::with_id(Arc::new(MemoryStorage::new()), "week-3").with_interval(Duration::from_secs(10))
    }

    #[test]
    fn test_nothing_pending_writes_nothing() {
        let mut manager = manager();
        let now = Instant::now();
        assert!(!manager.is_due_at(now));
        assert!(!block_on(manager.flush_at(&CanvasDocument::new(), now)).unwrap());
        assert!(block_on(manager.saved_ids()).unwrap().is_empty());
    }

    #[test]
    fn test_flush_waits_for_interval() {
        let mut manager = manager();
        let start = Instant::now();
        let mut document = CanvasDocument::new();

        manager.note_change();
        assert!(block_on(manager.flush_at(&document, start)).unwrap());
        assert!(!manager.has_pending_changes());

        document.add_page(None, None);
        manager.note_change();
        assert!(!block_on(manager.flush_at(&document, start + Duration::from_secs(5))).unwrap());
        assert!(block_on(manager.flush_at(&document, start + Duration::from_secs(11))).unwrap());
    }

    #[test]
    fn test_reverted_change_skips_write() {
        let mut manager = manager();
        let start = Instant::now();
        let document = CanvasDocument::new();
        manager.note_change();
        block_on(manager.flush_at(&document, start)).unwrap();

        manager.note_change();
        assert!(!block_on(manager.flush_at(&document, start + Duration::from_secs(20))).unwrap());
        assert!(!manager.has_pending_changes());
    }

    #[test]
    fn test_restore_last_and_by_id() {
        let mut manager = manager();
        let mut document = CanvasDocument::new();
        document.add_page(None, None);
        block_on(manager.save_now(&document)).unwrap();

        let mut other = AutoSaveManager::new(Arc::clone(manager.storage()));
        assert_eq!(block_on(other.restore(None)).unwrap(), document);
        assert_eq!(other.document_id(), DEFAULT_DOCUMENT_ID);
        assert_eq!(block_on(other.restore(Some("week-3"))).unwrap(), document);
        assert_eq!(other.document_id(), "week-3");
        assert_eq!(block_on(other.saved_ids()).unwrap(), vec!["week-3".to_string()]);
    }

    #[test]
    fn test_restore_without_history_is_not_found() {
        let mut manager = manager();
        assert!(matches!(block_on(manager.restore(None)), Err(StorageError::NotFound(_))));
    }
}

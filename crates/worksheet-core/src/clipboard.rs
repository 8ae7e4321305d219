//! Session-scoped element and page clipboard.
//!
//! Elements are stored as a JSON array next to a `{pageId}` provenance entry.
//! A whole-page copy is a separate single entry holding the page id. Any
//! entry that fails to parse counts as empty.

use crate::config::ClipboardConfig;
use crate::document::{Page, PageId};
use crate::elements::{CanvasElement, ElementId, duplicate_elements};
use crate::storage::SessionStore;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const CLIPBOARD_ELEMENTS_KEY: &str = "worksheet.clipboard.elements";
pub const CLIPBOARD_META_KEY: &str = "worksheet.clipboard.meta";
pub const CLIPBOARD_PAGE_KEY: &str = "worksheet.clipboard.page";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClipboardMeta {
    page_id: PageId,
}

/// What a paste would produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardContent {
    Elements {
        elements: Vec<CanvasElement>,
        source_page: Option<PageId>,
    },
    Page(PageId),
}

pub struct Clipboard {
    store: Arc<dyn SessionStore>,
    paste_offset: f64,
}

impl std::fmt::Debug for Clipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Clipboard")
            .field("paste_offset", &self.paste_offset)
            .finish_non_exhaustive()
    }
}

impl Clipboard {
    pub fn new(store: Arc<dyn SessionStore>, config: &ClipboardConfig) -> Self {
        Self {
            store,
            paste_offset: config.paste_offset,
        }
    }

    /// Copy the given elements of `page` in page order.
    ///
    /// With no ids the page itself is copied and any element entries are
    /// cleared. Returns the number of elements copied.
    pub fn copy(&self, page: &Page, ids: &[ElementId]) -> usize {
        if ids.is_empty() {
            self.store.remove(CLIPBOARD_ELEMENTS_KEY);
            self.store.remove(CLIPBOARD_META_KEY);
            if let Err(e) = self.store.set(CLIPBOARD_PAGE_KEY, page.id.to_string()) {
                log::warn!("Failed to store copied page: {}", e);
            }
            log::debug!("Copied page {}", page.page_number);
            return 0;
        }

        let elements: Vec<&CanvasElement> = page
            .elements
            .iter()
            .filter(|e| ids.contains(&e.id()))
            .collect();
        if elements.is_empty() {
            return 0;
        }

        let meta = ClipboardMeta { page_id: page.id };
        let stored = serde_json::to_string(&elements).and_then(|elements_json| {
            serde_json::to_string(&meta).map(|meta_json| (elements_json, meta_json))
        });
        match stored {
            Ok((elements_json, meta_json)) => {
                let result = self
                    .store
                    .set(CLIPBOARD_ELEMENTS_KEY, elements_json)
                    .and_then(|_| self.store.set(CLIPBOARD_META_KEY, meta_json));
                if let Err(e) = result {
                    log::warn!("Failed to store copied elements: {}", e);
                    return 0;
                }
            }
            Err(e) => {
                log::warn!("Failed to encode copied elements: {}", e);
                return 0;
            }
        }
        self.store.remove(CLIPBOARD_PAGE_KEY);
        log::debug!("Copied {} element(s)", elements.len());
        elements.len()
    }

    /// Element entries take precedence over a copied page.
    pub fn content(&self) -> Option<ClipboardContent> {
        if let Some(elements) = self.read_elements() {
            let source_page = self.read_meta().map(|m| m.page_id);
            return Some(ClipboardContent::Elements {
                elements,
                source_page,
            });
        }
        self.read_page().map(ClipboardContent::Page)
    }

    /// Fresh copies of the clipboard elements for pasting into `target`.
    ///
    /// Pasting back onto the source page offsets every copy so it does not
    /// cover its original; pasting elsewhere keeps coordinates.
    pub fn paste_elements(&self, target: PageId) -> Option<Vec<CanvasElement>> {
        let elements = self.read_elements()?;
        let same_page = self.read_meta().is_some_and(|m| m.page_id == target);
        let mut copies = duplicate_elements(&elements);
        if same_page {
            let offset = Vec2::new(self.paste_offset, self.paste_offset);
            for copy in &mut copies {
                copy.translate(offset);
            }
        }
        Some(copies)
    }

    pub fn has_elements(&self) -> bool {
        self.read_elements().is_some()
    }

    pub fn clear(&self) {
        self.store.remove(CLIPBOARD_ELEMENTS_KEY);
        self.store.remove(CLIPBOARD_META_KEY);
        self.store.remove(CLIPBOARD_PAGE_KEY);
    }

    fn read_elements(&self) -> Option<Vec<CanvasElement>> {
        let raw = self.store.get(CLIPBOARD_ELEMENTS_KEY)?;
        match serde_json::from_str::<Vec<CanvasElement>>(&raw) {
            Ok(elements) if !elements.is_empty() => Some(elements),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Ignoring corrupt clipboard elements: {}", e);
                None
            }
        }
    }

    fn read_meta(&self) -> Option<ClipboardMeta> {
        let raw = self.store.get(CLIPBOARD_META_KEY)?;
        serde_json::from_str(&raw)
            .map_err(|e| log::warn!("Ignoring corrupt clipboard metadata: {}", e))
            .ok()
    }

    fn read_page(&self) -> Option<PageId> {
        let raw = self.store.get(CLIPBOARD_PAGE_KEY)?;
        raw.trim()
            .parse()
            .map_err(|e| log::warn!("Ignoring corrupt copied page id: {}", e))
            .ok()
    }
}

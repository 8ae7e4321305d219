//! Worksheet document: an ordered list of pages, each owning its elements.
//!
//! Element order on a page is z-order (index 0 is the bottom). Page numbers
//! are dense and 1-based, recomputed after every structural page change.

use crate::elements::{CanvasElement, ElementId, GroupId, duplicate_elements};
use crate::error::DocumentError;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Unique identifier for pages.
pub type PageId = Uuid;

/// A4 at 96 dpi, in document units.
pub const A4_WIDTH: f64 = 794.0;
pub const A4_HEIGHT: f64 = 1123.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn page_size(self) -> Size {
        match self {
            Orientation::Portrait => Size::new(A4_WIDTH, A4_HEIGHT),
            Orientation::Landscape => Size::new(A4_HEIGHT, A4_WIDTH),
        }
    }
}

/// One sheet of paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub elements: Vec<CanvasElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
}

impl Page {
    pub fn new(page_number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            page_number,
            template_id: None,
            elements: Vec::new(),
            orientation: None,
        }
    }

    pub fn size(&self) -> Size {
        self.orientation.unwrap_or_default().page_size()
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    /// Ids of every member of a group, in z-order.
    pub fn group_members(&self, group: GroupId) -> Vec<ElementId> {
        self.elements
            .iter()
            .filter(|e| e.group_id() == Some(group))
            .map(CanvasElement::id)
            .collect()
    }

    /// The text a shape names through its `labelId`, if it still exists.
    pub fn linked_label(&self, shape_id: ElementId) -> Option<ElementId> {
        let label = self.element(shape_id)?.label_id()?;
        self.element(label).filter(|e| e.as_text().is_some()).map(CanvasElement::id)
    }

    /// The caption text of a shape, for carrying it along a move.
    ///
    /// An explicit `labelId` wins. Otherwise the topmost text element lying
    /// inside the shape's box inflated by `tolerance` is used.
    pub fn paired_label(&self, shape_id: ElementId, tolerance: f64) -> Option<ElementId> {
        let shape = self.element(shape_id)?.as_shape()?;
        if shape.label_id.is_some() {
            return self.linked_label(shape_id);
        }
        let area = shape.rect().abs().inflate(tolerance, tolerance);
        self.elements
            .iter()
            .rev()
            .filter_map(CanvasElement::as_text)
            .find(|t| {
                let r = t.rect().abs();
                area.contains(r.origin()) && r.x1 <= area.x1 && r.y1 <= area.y1
            })
            .map(|t| t.base.id)
    }
}

/// Result of deleting a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRemoval {
    /// The page was removed from the document.
    Removed(PageId),
    /// It was the last page; its unlocked elements were cleared instead.
    Cleared,
}

/// Direction of a z-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMove {
    Front,
    Back,
    Forward,
    Backward,
}

/// The unit of persistence and of undo/redo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    pub pages: Vec<Page>,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasDocument {
    /// Create a document with one empty page.
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new(1)],
        }
    }

    /// Build from a page list, guaranteeing at least one page.
    pub fn from_pages(pages: Vec<Page>) -> Self {
        let mut doc = Self { pages };
        if doc.pages.is_empty() {
            doc.pages.push(Page::new(1));
        }
        doc.renumber();
        doc
    }

    pub fn first_page_id(&self) -> Option<PageId> {
        self.pages.first().map(|p| p.id)
    }

    pub fn page_index(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    /// The page holding an element.
    pub fn page_of_element(&self, id: ElementId) -> Option<PageId> {
        self.pages.iter().find(|p| p.contains(id)).map(|p| p.id)
    }

    pub fn element_count(&self) -> usize {
        self.pages.iter().map(|p| p.elements.len()).sum()
    }

    /// Recompute dense 1-based page numbers.
    pub fn renumber(&mut self) {
        for (i, page) in self.pages.iter_mut().enumerate() {
            page.page_number = i as u32 + 1;
        }
    }

    fn insert_page_after(&mut self, after: Option<PageId>, page: Page) -> PageId {
        let id = page.id;
        let at = after
            .and_then(|a| self.page_index(a))
            .map(|i| i + 1)
            .unwrap_or(self.pages.len());
        self.pages.insert(at, page);
        self.renumber();
        id
    }

    /// Insert an empty page after `after` (or at the end).
    pub fn add_page(&mut self, after: Option<PageId>, orientation: Option<Orientation>) -> PageId {
        let mut page = Page::new(0);
        page.orientation = orientation;
        let id = self.insert_page_after(after, page);
        log::info!("Added page {}", id);
        id
    }

    /// Copy a page with fresh element ids right after the original.
    pub fn duplicate_page(&mut self, id: PageId) -> Option<PageId> {
        let source = self.page(id)?;
        let copy = Page {
            id: Uuid::new_v4(),
            page_number: 0,
            template_id: source.template_id.clone(),
            elements: duplicate_elements(&source.elements),
            orientation: source.orientation,
        };
        let new_id = self.insert_page_after(Some(id), copy);
        log::info!("Duplicated page {} as {}", id, new_id);
        Some(new_id)
    }

    /// Create a page from template elements. The template is copied with
    /// fresh ids so it can be applied repeatedly.
    pub fn apply_template(
        &mut self,
        after: Option<PageId>,
        template_id: &str,
        elements: &[CanvasElement],
        orientation: Option<Orientation>,
    ) -> PageId {
        let page = Page {
            id: Uuid::new_v4(),
            page_number: 0,
            template_id: Some(template_id.to_string()),
            elements: duplicate_elements(elements),
            orientation,
        };
        let id = self.insert_page_after(after, page);
        log::info!("Applied template {} as page {}", template_id, id);
        id
    }

    /// Delete a page. The last remaining page is cleared instead.
    pub fn delete_page(&mut self, id: PageId) -> Option<PageRemoval> {
        let index = self.page_index(id)?;
        if self.pages.len() == 1 {
            self.clear_unlocked(id);
            return Some(PageRemoval::Cleared);
        }
        self.pages.remove(index);
        self.renumber();
        log::info!("Deleted page {}", id);
        Some(PageRemoval::Removed(id))
    }

    /// Move a page to a new index (clamped).
    pub fn move_page(&mut self, id: PageId, to: usize) -> bool {
        let Some(from) = self.page_index(id) else {
            return false;
        };
        let to = to.min(self.pages.len() - 1);
        if from == to {
            return false;
        }
        let page = self.pages.remove(from);
        self.pages.insert(to, page);
        self.renumber();
        true
    }

    /// Append elements on top of a page. Ids are kept as given.
    pub fn insert_elements(&mut self, page_id: PageId, elements: Vec<CanvasElement>) -> Vec<ElementId> {
        let Some(page) = self.page_mut(page_id) else {
            return Vec::new();
        };
        let ids = elements.iter().map(CanvasElement::id).collect();
        page.elements.extend(elements);
        ids
    }

    /// Remove unlocked elements, cascading to the labels of removed shapes.
    ///
    /// Shapes whose label disappears lose their `labelId`. Returns the ids
    /// actually removed.
    pub fn remove_elements(&mut self, page_id: PageId, ids: &[ElementId]) -> Vec<ElementId> {
        let Some(page) = self.page_mut(page_id) else {
            return Vec::new();
        };
        let mut doomed: HashSet<ElementId> = page
            .elements
            .iter()
            .filter(|e| ids.contains(&e.id()) && !e.is_locked())
            .map(CanvasElement::id)
            .collect();
        let cascaded: Vec<ElementId> = page
            .elements
            .iter()
            .filter(|e| doomed.contains(&e.id()))
            .filter_map(CanvasElement::label_id)
            .filter(|label| page.element(*label).is_some_and(|l| !l.is_locked()))
            .collect();
        doomed.extend(cascaded);
        if doomed.is_empty() {
            return Vec::new();
        }

        let removed: Vec<ElementId> = page
            .elements
            .iter()
            .map(CanvasElement::id)
            .filter(|id| doomed.contains(id))
            .collect();
        page.elements.retain(|e| !doomed.contains(&e.id()));
        for element in &mut page.elements {
            if let CanvasElement::Shape(shape) = element {
                if shape.label_id.is_some_and(|l| doomed.contains(&l)) {
                    shape.label_id = None;
                }
            }
        }
        removed
    }

    /// Remove every unlocked element from a page.
    pub fn clear_unlocked(&mut self, page_id: PageId) -> usize {
        let ids: Vec<ElementId> = self
            .page(page_id)
            .map(|p| p.elements.iter().map(CanvasElement::id).collect())
            .unwrap_or_default();
        self.remove_elements(page_id, &ids).len()
    }

    /// Give the unlocked elements among `ids` a shared fresh group id.
    pub fn group_elements(&mut self, page_id: PageId, ids: &[ElementId]) -> Option<GroupId> {
        let page = self.page_mut(page_id)?;
        let members: Vec<usize> = page
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| ids.contains(&e.id()) && !e.is_locked())
            .map(|(i, _)| i)
            .collect();
        if members.len() < 2 {
            return None;
        }
        let group = Uuid::new_v4();
        for i in members {
            page.elements[i].base_mut().group_id = Some(group);
        }
        Some(group)
    }

    /// Clear the group of every element sharing a group with any of `ids`.
    /// Returns the ids that left a group.
    pub fn ungroup_elements(&mut self, page_id: PageId, ids: &[ElementId]) -> Vec<ElementId> {
        let Some(page) = self.page_mut(page_id) else {
            return Vec::new();
        };
        let groups: HashSet<GroupId> = page
            .elements
            .iter()
            .filter(|e| ids.contains(&e.id()))
            .filter_map(CanvasElement::group_id)
            .collect();
        let mut released = Vec::new();
        for element in &mut page.elements {
            if element.group_id().is_some_and(|g| groups.contains(&g)) {
                element.base_mut().group_id = None;
                released.push(element.id());
            }
        }
        released
    }

    /// Reorder elements in z-order. Relative order among moved elements is
    /// preserved. Returns false when nothing moved.
    pub fn move_layer(&mut self, page_id: PageId, ids: &[ElementId], direction: LayerMove) -> bool {
        let Some(page) = self.page_mut(page_id) else {
            return false;
        };
        let before: Vec<ElementId> = page.elements.iter().map(CanvasElement::id).collect();
        let is_moved = |e: &CanvasElement| ids.contains(&e.id());

        match direction {
            LayerMove::Front | LayerMove::Back => {
                let (moved, rest): (Vec<_>, Vec<_>) = page.elements.drain(..).partition(is_moved);
                page.elements = if direction == LayerMove::Front {
                    rest.into_iter().chain(moved).collect()
                } else {
                    moved.into_iter().chain(rest).collect()
                };
            }
            LayerMove::Forward => {
                let len = page.elements.len();
                for i in (0..len.saturating_sub(1)).rev() {
                    if is_moved(&page.elements[i]) && !is_moved(&page.elements[i + 1]) {
                        page.elements.swap(i, i + 1);
                    }
                }
            }
            LayerMove::Backward => {
                for i in 1..page.elements.len() {
                    if is_moved(&page.elements[i]) && !is_moved(&page.elements[i - 1]) {
                        page.elements.swap(i, i - 1);
                    }
                }
            }
        }

        page.elements.iter().map(CanvasElement::id).ne(before.into_iter())
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: Self = serde_json::from_str(json)?;
        if doc.pages.is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(doc)
    }
}

//! Selection state and hit testing.

use crate::document::Page;
use crate::elements::{CanvasElement, ElementId};
use crate::geometry::{hit_test_element, normalize_rect, rect_from_element, rects_intersect, selection_bounds};
use kurbo::{Point, Rect};

/// Selected element ids plus the element in text-edit mode.
///
/// Ids keep insertion order and are never duplicated. The editing element,
/// when set, is always the sole selected element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<ElementId>,
    editing_text: Option<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// The most recently selected element, used as the Tab-cycle cursor.
    pub fn active(&self) -> Option<ElementId> {
        self.ids.last().copied()
    }

    /// The single selected element, if exactly one is selected.
    pub fn sole(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn editing_text(&self) -> Option<ElementId> {
        self.editing_text
    }

    pub fn select_only(&mut self, id: ElementId) {
        self.set(vec![id]);
    }

    pub fn add(&mut self, id: ElementId) {
        if !self.ids.contains(&id) {
            self.ids.push(id);
            self.editing_text = None;
        }
    }

    pub fn remove(&mut self, id: ElementId) {
        self.ids.retain(|i| *i != id);
        if self.editing_text == Some(id) {
            self.editing_text = None;
        }
    }

    /// Add if absent, remove if present.
    pub fn toggle(&mut self, id: ElementId) {
        if self.contains(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.editing_text = None;
    }

    /// Replace the selection, dropping duplicates while keeping first
    /// occurrences in order.
    pub fn set(&mut self, ids: Vec<ElementId>) {
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        if self.editing_text.is_some_and(|e| unique != [e]) {
            self.editing_text = None;
        }
        self.ids = unique;
    }

    /// Keep only ids accepted by `keep`.
    pub fn retain(&mut self, keep: impl Fn(ElementId) -> bool) {
        self.ids.retain(|id| keep(*id));
        if self.editing_text.is_some_and(|e| !self.ids.contains(&e)) {
            self.editing_text = None;
        }
    }

    /// Enter text editing. Only allowed when `id` is already the sole selection.
    pub fn begin_text_edit(&mut self, id: ElementId) -> bool {
        if self.sole() != Some(id) {
            return false;
        }
        self.editing_text = Some(id);
        true
    }

    pub fn end_text_edit(&mut self) -> Option<ElementId> {
        self.editing_text.take()
    }

    /// Clear everything. Returns whether anything changed.
    pub fn escape(&mut self) -> bool {
        let changed = !self.ids.is_empty() || self.editing_text.is_some();
        self.clear();
        changed
    }
}

/// What a finished marquee gesture amounts to.
#[derive(Debug, Clone, PartialEq)]
pub enum MarqueeOutcome {
    /// Movement stayed under the drag threshold.
    Click { additive: bool },
    /// The new selection.
    Select(Vec<ElementId>),
}

/// A rubber-band selection in progress. Never persisted.
#[derive(Debug, Clone)]
pub struct MarqueeState {
    pub start: Point,
    pub current: Point,
    pub additive: bool,
    previous: Vec<ElementId>,
}

impl MarqueeState {
    pub fn new(start: Point, additive: bool, previous: Vec<ElementId>) -> Self {
        Self {
            start,
            current: start,
            additive,
            previous,
        }
    }

    pub fn update(&mut self, current: Point) {
        self.current = current;
    }

    pub fn rect(&self) -> Rect {
        normalize_rect(self.start, self.current)
    }

    /// A marquee smaller than the threshold on both axes is a click.
    pub fn is_click(&self, threshold: f64) -> bool {
        let rect = self.rect();
        rect.width() < threshold && rect.height() < threshold
    }

    pub fn finish(&self, elements: &[CanvasElement], threshold: f64) -> MarqueeOutcome {
        if self.is_click(threshold) {
            return MarqueeOutcome::Click {
                additive: self.additive,
            };
        }
        let hits = marquee_hits(elements, self.rect());
        let ids = if self.additive {
            self.previous.iter().copied().chain(hits).collect()
        } else {
            hits
        };
        let mut unique: Vec<ElementId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        MarqueeOutcome::Select(unique)
    }
}

/// Unlocked, selectable elements whose selection bounds overlap `rect`.
pub fn marquee_hits(elements: &[CanvasElement], rect: Rect) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|e| !e.is_locked())
        .filter(|e| selection_bounds(e).is_some_and(|b| rects_intersect(rect, b)))
        .map(CanvasElement::id)
        .collect()
}

/// Topmost visible, selectable element under `point`, locked ones included.
pub fn hit_test_point(elements: &[CanvasElement], point: Point, tolerance: f64) -> Option<ElementId> {
    elements
        .iter()
        .rev()
        .find(|e| hit_test_element(e, point, tolerance))
        .map(CanvasElement::id)
}

/// A clicked element together with the rest of its group.
pub fn with_group(page: &Page, id: ElementId) -> Vec<ElementId> {
    match page.element(id).and_then(CanvasElement::group_id) {
        Some(group) => {
            let mut members = page.group_members(group);
            members.retain(|m| *m != id && !page.element(*m).is_some_and(CanvasElement::is_locked));
            let mut ids = vec![id];
            ids.extend(members);
            ids
        }
        None => vec![id],
    }
}

/// Ids of every element that may be keyboard-selected.
pub fn selectable_ids(elements: &[CanvasElement]) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|e| e.is_visible() && e.is_selectable() && !e.is_locked())
        .map(CanvasElement::id)
        .collect()
}

/// Selectable, unlocked elements in reading order.
///
/// Elements are sorted by top edge, then grouped into rows: an element
/// joins the current row while its top is within `row_tolerance` of the
/// row's first element. Rows are ordered left to right.
pub fn reading_order(elements: &[CanvasElement], row_tolerance: f64) -> Vec<ElementId> {
    let mut placed: Vec<(ElementId, Rect)> = elements
        .iter()
        .filter(|e| e.is_visible() && e.is_selectable() && !e.is_locked())
        .filter_map(|e| rect_from_element(e).map(|r| (e.id(), r)))
        .collect();
    placed.sort_by(|a, b| a.1.y0.total_cmp(&b.1.y0));

    let mut order = Vec::with_capacity(placed.len());
    let mut row: Vec<(ElementId, Rect)> = Vec::new();
    for item in placed {
        let same_row = row.first().is_some_and(|first| item.1.y0 - first.1.y0 <= row_tolerance);
        if !same_row && !row.is_empty() {
            flush_row(&mut row, &mut order);
        }
        row.push(item);
    }
    flush_row(&mut row, &mut order);
    order
}

fn flush_row(row: &mut Vec<(ElementId, Rect)>, order: &mut Vec<ElementId>) {
    row.sort_by(|a, b| a.1.x0.total_cmp(&b.1.x0));
    order.extend(row.drain(..).map(|(id, _)| id));
}

/// Next element in `order` after `current`, wrapping at both ends. With
/// nothing current, forward picks the first and backward the last.
pub fn cycle(order: &[ElementId], current: Option<ElementId>, forward: bool) -> Option<ElementId> {
    if order.is_empty() {
        return None;
    }
    let len = order.len();
    let index = match current.and_then(|c| order.iter().position(|id| *id == c)) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(order[index])
}

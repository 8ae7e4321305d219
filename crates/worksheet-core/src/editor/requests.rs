//! Requests from outside the editing surface: image and element insertion
//! and page management.

use super::Editor;
use crate::document::{Orientation, PageId, PageRemoval};
use crate::elements::{
    AlignX, CanvasElement, ElementId, Fill, ShapeElement, ShapeKind, TextElement, TextStyle, WidthMode,
    duplicate_elements,
};
use crate::rich_text::is_blank;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Side of an inserted image when the request carries no size.
pub const DEFAULT_IMAGE_SIZE: f64 = 200.0;

/// An image to place on the active page, e.g. from an upload or a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInsertRequest {
    pub image_url: String,
    /// Caption placed under the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

impl ImageInsertRequest {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            label: None,
            size: None,
        }
    }
}

impl Editor {
    /// Insert an image-filled shape centered on the active page and select
    /// it. Returns the shape id.
    pub fn insert_image(&mut self, request: ImageInsertRequest) -> Option<ElementId> {
        let page_size = self.active_page()?.size();
        let limits = &self.config.interaction;
        let size = request
            .size
            .filter(|s| s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0)
            .unwrap_or(Size::new(DEFAULT_IMAGE_SIZE, DEFAULT_IMAGE_SIZE));
        let size = Size::new(size.width.max(limits.shape_min_width), size.height.max(limits.shape_min_height));
        let origin = Point::new((page_size.width - size.width) / 2.0, (page_size.height - size.height) / 2.0);

        let mut shape = ShapeElement::new(ShapeKind::Rect, Rect::from_origin_size(origin, size));
        shape.fill = Fill::image(request.image_url);
        shape.border = None;
        let id = shape.base.id;

        let caption = request.label.filter(|l| !is_blank(l)).map(|label| {
            let style = TextStyle {
                font_size: self.config.text.default_font_size,
                color: self.config.text.default_color.clone(),
                align_x: AlignX::Center,
                ..TextStyle::default()
            };
            let measured = self.measurer.measure(&label, &style, Some(size.width));
            let top = origin.y + size.height + self.config.text.label_gap;
            let rect = Rect::new(
                origin.x,
                top,
                origin.x + size.width,
                top + measured.height.max(limits.text_min_height),
            );
            let mut text = TextElement::new(rect, label);
            text.style = style;
            text.width_mode = WidthMode::Fixed;
            text
        });

        let mut elements = Vec::with_capacity(2);
        match caption {
            Some(text) => {
                shape.label_id = Some(text.base.id);
                elements.push(CanvasElement::Shape(shape));
                elements.push(CanvasElement::Text(text));
            }
            None => elements.push(CanvasElement::Shape(shape)),
        }

        self.end_text_edit();
        self.exit_crop_mode();
        self.document.insert_elements(self.active_page, elements);
        log::info!("Inserted image {}", id);
        self.set_selection(vec![id]);
        self.commit(Some("Insert image"));
        Some(id)
    }

    /// Insert copies of `elements` with fresh ids on the active page.
    pub fn insert_elements(&mut self, elements: &[CanvasElement], select: bool) -> Vec<ElementId> {
        if elements.is_empty() {
            return Vec::new();
        }
        self.end_text_edit();
        let ids = self
            .document
            .insert_elements(self.active_page, duplicate_elements(elements));
        log::info!("Inserted {} element(s)", ids.len());
        if select {
            self.set_selection(ids.clone());
        }
        self.commit(Some("Insert"));
        ids
    }

    /// Add an empty page after the active one and switch to it.
    pub fn add_page(&mut self, orientation: Option<Orientation>) -> PageId {
        let id = self.document.add_page(Some(self.active_page), orientation);
        self.switch_to_new_page(id);
        self.commit(Some("Add page"));
        id
    }

    /// Copy a page right after itself and switch to the copy.
    pub fn duplicate_page(&mut self, id: PageId) -> Option<PageId> {
        let copy = self.document.duplicate_page(id)?;
        self.switch_to_new_page(copy);
        self.commit(Some("Duplicate page"));
        Some(copy)
    }

    /// New page built from template elements, after the active page.
    pub fn apply_template(
        &mut self,
        template_id: &str,
        elements: &[CanvasElement],
        orientation: Option<Orientation>,
    ) -> PageId {
        let id = self
            .document
            .apply_template(Some(self.active_page), template_id, elements, orientation);
        self.switch_to_new_page(id);
        self.commit(Some("Apply template"));
        id
    }

    /// Delete a page. The last page is cleared of unlocked elements instead.
    /// Deleting the active page activates the one before it.
    pub fn delete_page(&mut self, id: PageId) -> bool {
        let Some(index) = self.document.page_index(id) else {
            return false;
        };
        let active = id == self.active_page;
        if active {
            self.cancel_gesture();
            self.end_text_edit();
            self.exit_crop_mode();
        }
        let before = self.document.page(id).map(|p| p.elements.len());
        match self.document.delete_page(id) {
            Some(PageRemoval::Removed(_)) => {
                if active {
                    let next = self.document.pages[index.saturating_sub(1)].id;
                    self.set_selection(Vec::new());
                    self.set_active_page_unchecked(next);
                }
                self.commit(Some("Delete page"));
                true
            }
            Some(PageRemoval::Cleared) => {
                let after = self.document.page(id).map(|p| p.elements.len());
                if after == before {
                    return false;
                }
                self.prune_selection();
                self.commit(Some("Clear page"));
                true
            }
            None => false,
        }
    }

    /// Move a page to `to` (clamped to the page count).
    pub fn move_page(&mut self, id: PageId, to: usize) -> bool {
        if !self.document.move_page(id, to) {
            return false;
        }
        self.commit(Some("Move page"));
        true
    }

    fn switch_to_new_page(&mut self, id: PageId) {
        self.cancel_gesture();
        self.end_text_edit();
        self.exit_crop_mode();
        self.set_selection(Vec::new());
        self.set_active_page_unchecked(id);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::document::{A4_HEIGHT, A4_WIDTH};
    use crate::elements::GroupId;

    #[test]
    fn test_insert_image_centers_and_links_label() {
        let (mut editor, _) = editor_with(vec![]);
        let mut request = ImageInsertRequest::new("https://example.com/dog.png");
        request.label = Some("dog".to_string());

        let id = editor.insert_image(request).unwrap();
        assert_eq!(editor.selected_ids(), &[id]);
        let page = editor.active_page().unwrap();
        assert_eq!(page.elements.len(), 2);
        let shape = page.element(id).and_then(CanvasElement::as_shape).unwrap();
        assert!(shape.fill.is_image());
        assert!((shape.x - (A4_WIDTH - DEFAULT_IMAGE_SIZE) / 2.0).abs() < 1e-9);
        assert!((shape.y - (A4_HEIGHT - DEFAULT_IMAGE_SIZE) / 2.0).abs() < 1e-9);

        let label = page.element(shape.label_id.unwrap()).and_then(CanvasElement::as_text).unwrap();
        assert_eq!(label.text, "dog");
        assert!((label.y - (shape.y + shape.h + 8.0)).abs() < 1e-9);
        assert_eq!(editor.history().past_len(), 1);
    }

    #[test]
    fn test_insert_image_blank_label_is_skipped() {
        let (mut editor, _) = editor_with(vec![]);
        let mut request = ImageInsertRequest::new("data:image/png;base64,AAAA");
        request.label = Some("   ".to_string());
        request.size = Some(Size::new(10.0, 300.0));

        let id = editor.insert_image(request).unwrap();
        let page = editor.active_page().unwrap();
        assert_eq!(page.elements.len(), 1);
        assert_eq!(page.element(id).and_then(CanvasElement::box_rect).map(|r| r.size()), Some(Size::new(80.0, 300.0)));
    }

    #[test]
    fn test_insert_elements_uses_fresh_ids() {
        let (mut editor, _) = editor_with(vec![]);
        let group: GroupId = uuid::Uuid::new_v4();
        let mut template = vec![
            shape_at(Rect::new(0.0, 0.0, 80.0, 80.0)),
            shape_at(Rect::new(100.0, 0.0, 180.0, 80.0)),
        ];
        for element in &mut template {
            element.base_mut().group_id = Some(group);
        }

        let ids = editor.insert_elements(&template, true);
        assert_eq!(ids.len(), 2);
        assert_eq!(editor.selected_ids(), ids.as_slice());
        assert!(!ids.contains(&template[0].id()));
        let page = editor.active_page().unwrap();
        assert_ne!(page.elements[0].group_id(), Some(group));
        assert_eq!(page.elements[0].group_id(), page.elements[1].group_id());
    }

    #[test]
    fn test_page_operations_renumber_and_undo() {
        let (mut editor, clock) = editor_with(vec![text_at(Rect::new(0.0, 0.0, 40.0, 20.0), "a")]);
        let first = editor.active_page_id();

        advance(&clock, 1000);
        let copy = editor.duplicate_page(first).unwrap();
        advance(&clock, 1000);
        let template = editor.apply_template("emotions", &[text_at(Rect::new(0.0, 0.0, 40.0, 20.0), "happy")], None);
        advance(&clock, 1000);
        assert!(editor.move_page(template, 0));

        let numbers: Vec<(PageId, u32)> = editor.document().pages.iter().map(|p| (p.id, p.page_number)).collect();
        assert_eq!(numbers, vec![(template, 1), (first, 2), (copy, 3)]);
        assert_eq!(editor.document().pages[0].template_id.as_deref(), Some("emotions"));

        advance(&clock, 1000);
        assert!(editor.undo());
        advance(&clock, 1000);
        assert!(editor.undo());
        assert_eq!(editor.document().pages.len(), 2);
        assert_eq!(editor.active_page_id(), copy);
    }

    #[test]
    fn test_delete_active_page_activates_previous() {
        let (mut editor, _) = editor_with(vec![]);
        let first = editor.active_page_id();
        let second = editor.add_page(Some(Orientation::Landscape));
        let third = editor.add_page(None);
        editor.set_active_page(second);

        assert!(editor.delete_page(second));
        assert_eq!(editor.active_page_id(), first);
        assert!(editor.delete_page(third));
        assert_eq!(editor.document().pages.len(), 1);
        assert!(!editor.delete_page(first));
    }
}

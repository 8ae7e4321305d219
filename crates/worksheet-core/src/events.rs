//! Editor notifications and a minimal observer list.

use crate::document::PageId;
use crate::elements::ElementId;
use crate::snap::AlignmentGuide;
use kurbo::Rect;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

/// Ordered list of event handlers.
pub struct EventBus<E> {
    handlers: Vec<(SubscriptionId, Handler<E>)>,
    next_id: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    /// Deliver an event to every handler in subscription order.
    pub fn emit(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Notifications published by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// The live document was replaced or mutated.
    DocumentChanged,
    ActivePageChanged(PageId),
    SelectionChanged(Vec<ElementId>),
    /// Opens at the first movement of a gesture and closes at its end,
    /// carrying the final rect of the primary element.
    DragState { dragging: bool, rect: Option<Rect> },
    /// A text element was left blank and should be removed.
    DeleteRequested(ElementId),
    TextEditStarted(ElementId),
    TextEditEnded(ElementId),
    CropModeChanged(Option<ElementId>),
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// An undo or redo was applied; `request` increases on every application.
    UndoApplied { request: u64 },
    RedoApplied { request: u64 },
    AlignmentGuides(Vec<AlignmentGuide>),
}

//! Worksheet Core Library
//!
//! Platform-agnostic editing engine for paged worksheet documents: the
//! element model, selection and hit testing, pointer gestures, text editing,
//! undo history, clipboard and keyboard commands. Rendering is left to the
//! host; the engine only consumes input and publishes events.

pub mod clipboard;
pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod error;
pub mod events;
pub mod geometry;
pub mod handles;
pub mod history;
pub mod input;
pub mod interaction;
pub mod keyboard;
pub mod measure;
pub mod rich_text;
pub mod selection;
pub mod snap;
pub mod storage;
pub mod viewport;

pub use clipboard::{Clipboard, ClipboardContent};
pub use config::EditorConfig;
pub use document::{CanvasDocument, LayerMove, Orientation, Page, PageId};
pub use editor::{Clock, Editor, ImageInsertRequest};
pub use elements::{CanvasElement, ElementId, GroupId, LineElement, ShapeElement, TextElement};
pub use error::{ConfigError, DocumentError};
pub use events::{EditorEvent, SubscriptionId};
pub use history::{History, HistoryEntry};
pub use input::{Key, KeyInput, Modifiers, MouseButton, PointerEvent};
pub use interaction::{InteractionState, TransformContext, TransformHook, TransformKind};
pub use keyboard::{Command, ShortcutRegistry};
pub use measure::{ApproxMeasurer, TextMeasurer};
pub use rich_text::{RichText, RunStyle, TextRun};
pub use selection::Selection;
pub use snap::AlignmentGuide;
pub use storage::{Storage, StorageError};
pub use viewport::Viewport;

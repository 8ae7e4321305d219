//! Pointer capture held for the lifetime of one gesture.

use std::cell::Cell;
use std::rc::Rc;

/// Tracks whether a gesture currently owns the pointer.
#[derive(Debug, Clone, Default)]
pub struct PointerCapture {
    held: Rc<Cell<bool>>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pointer. Returns `None` while another guard holds it.
    pub fn acquire(&self) -> Option<CaptureGuard> {
        if self.held.get() {
            return None;
        }
        self.held.set(true);
        Some(CaptureGuard {
            held: Rc::clone(&self.held),
        })
    }

    pub fn is_held(&self) -> bool {
        self.held.get()
    }
}

/// Releases the capture when dropped, on every exit path of a gesture.
#[derive(Debug)]
pub struct CaptureGuard {
    held: Rc<Cell<bool>>,
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        self.held.set(false);
        log::debug!("Pointer capture released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_holder() {
        let capture = PointerCapture::new();
        let guard = capture.acquire().unwrap();
        assert!(capture.is_held());
        assert!(capture.acquire().is_none());
        drop(guard);
        assert!(!capture.is_held());
        assert!(capture.acquire().is_some());
    }

    #[test]
    fn test_release_on_unwind() {
        let capture = PointerCapture::new();
        let shared = capture.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = shared.acquire().unwrap();
            panic!("gesture aborted");
        }));
        assert!(result.is_err());
        assert!(!capture.is_held());
    }
}

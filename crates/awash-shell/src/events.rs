//! Registry for the session's "line" event listeners.

use std::fmt;
use std::sync::Arc;

/// A listener for the session's "line" event.
pub type LineListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Ordered listener registry. Listeners are identified by `Arc` identity,
/// so the same closure handle registers and removes the same entry.
#[derive(Default)]
pub struct LineListeners {
    listeners: Vec<LineListener>,
}

impl LineListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener.
    pub fn add(&mut self, listener: LineListener) {
        self.listeners.push(listener);
    }

    /// Remove a listener by identity. Returns whether anything was removed.
    pub fn remove(&mut self, listener: &LineListener) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !Arc::ptr_eq(l, listener));
        self.listeners.len() != before
    }

    /// Snapshot of the listeners, in registration order.
    pub fn snapshot(&self) -> Vec<LineListener> {
        self.listeners.clone()
    }

    /// Detach every listener, returning them in registration order.
    pub fn take(&mut self) -> Vec<LineListener> {
        std::mem::take(&mut self.listeners)
    }

    /// Reattach previously taken listeners, preserving their order.
    pub fn restore(&mut self, saved: Vec<LineListener>) {
        self.listeners.extend(saved);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for LineListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> LineListener {
        Arc::new(|_line: &str| {})
    }

    #[test]
    fn remove_matches_by_identity_not_shape() {
        let mut registry = LineListeners::new();
        let a = noop();
        let b = noop();
        registry.add(a.clone());
        registry.add(b.clone());

        assert!(registry.remove(&a));
        assert_eq!(registry.len(), 1);
        // `a` is gone; removing it again is a no-op.
        assert!(!registry.remove(&a));
        assert!(registry.remove(&b));
        assert!(registry.is_empty());
    }

    #[test]
    fn take_then_restore_preserves_order() {
        let mut registry = LineListeners::new();
        let listeners: Vec<LineListener> = (0..3).map(|_| noop()).collect();
        for l in &listeners {
            registry.add(l.clone());
        }

        let taken = registry.take();
        assert!(registry.is_empty());
        assert_eq!(taken.len(), 3);

        registry.restore(taken);
        let restored = registry.snapshot();
        for (original, restored) in listeners.iter().zip(&restored) {
            assert!(Arc::ptr_eq(original, restored));
        }
    }
}

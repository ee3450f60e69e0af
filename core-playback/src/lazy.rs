//! Memoized component slots.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A component built from a factory on first read and memoized afterwards.
///
/// `set` replaces the current instance without constructing the default.
/// The slot only drops its `Arc`; a replaced instance is released when its
/// last holder lets go of it.
pub struct LazyComponent<T: ?Sized> {
    factory: Box<dyn Fn() -> Arc<T> + Send + Sync>,
    slot: Mutex<Option<Arc<T>>>,
}

impl<T: ?Sized> LazyComponent<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            slot: Mutex::new(None),
        }
    }

    /// Current instance, constructing it if the slot is empty.
    ///
    /// The factory runs while the slot is locked, so concurrent first reads
    /// construct a single instance.
    pub fn get(&self) -> Arc<T> {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(value) => Arc::clone(value),
            None => {
                let value = (self.factory)();
                *slot = Some(Arc::clone(&value));
                value
            }
        }
    }

    pub fn set(&self, value: Arc<T>) {
        *self.slot.lock() = Some(value);
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.lock().is_some()
    }
}

impl<T: ?Sized> fmt::Debug for LazyComponent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyComponent")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (Arc<AtomicUsize>, LazyComponent<String>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let lazy = LazyComponent::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new("default".to_string())
        });
        (calls, lazy)
    }

    #[test]
    fn constructs_once() {
        let (calls, lazy) = counting();
        assert!(!lazy.is_resolved());

        let first = lazy.get();
        let second = lazy.get();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(lazy.is_resolved());
    }

    #[test]
    fn set_before_get_skips_factory() {
        let (calls, lazy) = counting();
        lazy.set(Arc::new("injected".to_string()));

        assert_eq!(lazy.get().as_str(), "injected");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn set_replaces_resolved_instance() {
        let (calls, lazy) = counting();
        let original = lazy.get();
        lazy.set(Arc::new("replacement".to_string()));

        assert_eq!(lazy.get().as_str(), "replacement");
        assert_eq!(original.as_str(), "default");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_reads_share_instance() {
        let (calls, lazy) = counting();
        let lazy = Arc::new(lazy);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = lazy.clone();
                std::thread::spawn(move || lazy.get())
            })
            .collect();

        let values: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(values.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

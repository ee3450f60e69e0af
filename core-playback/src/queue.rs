//! # Playback Queue
//!
//! Ordered list of [`MediaItem`]s owned by the media manager. Insertion order
//! is play order. The native player's queue is a projection of this one; the
//! manager re-projects it after every mutation it performs itself.
//!
//! The queue is shared with UI consumers as a [`SharedQueue`]. Consumers that
//! mutate it directly take the write lock, and their changes reach the native
//! player on the next queue-replacing call.

use bridge_traits::{MediaItem, MediaItemId};
use parking_lot::RwLock;
use std::sync::Arc;

/// Queue handle shared between the manager and its consumers.
pub type SharedQueue = Arc<RwLock<MediaQueue>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaQueue {
    items: Vec<MediaItem>,
}

impl MediaQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an empty queue for sharing.
    pub fn shared() -> SharedQueue {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Append to the end of the queue.
    pub fn add(&mut self, item: MediaItem) {
        self.items.push(item);
    }

    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = MediaItem>,
    {
        self.items.extend(items);
    }

    /// Insert at `index`, or append when `index` is past the end.
    pub fn insert(&mut self, index: usize, item: MediaItem) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
    }

    /// Remove the item at `index`.
    pub fn remove(&mut self, index: usize) -> Option<MediaItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove the first item with the given id.
    pub fn remove_id(&mut self, id: MediaItemId) -> Option<MediaItem> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaItem> {
        self.items.iter()
    }

    /// Snapshot of the queued items in play order.
    pub fn items(&self) -> Vec<MediaItem> {
        self.items.clone()
    }

    pub fn contains_uri(&self, uri: &str) -> bool {
        self.items.iter().any(|item| item.uri() == uri)
    }
}

impl<'a> IntoIterator for &'a MediaQueue {
    type Item = &'a MediaItem;
    type IntoIter = std::slice::Iter<'a, MediaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(queue: &MediaQueue) -> Vec<&str> {
        queue.iter().map(|item| item.uri()).collect()
    }

    #[test]
    fn add_preserves_order() {
        let mut queue = MediaQueue::new();
        queue.add(MediaItem::new("a"));
        queue.add(MediaItem::new("b"));
        queue.extend([MediaItem::new("c"), MediaItem::new("d")]);

        assert_eq!(uris(&queue), ["a", "b", "c", "d"]);
        assert_eq!(queue.len(), 4);
        assert!(queue.contains_uri("c"));
        assert!(!queue.contains_uri("e"));
    }

    #[test]
    fn insert_past_end_appends() {
        let mut queue = MediaQueue::new();
        queue.add(MediaItem::new("a"));
        queue.insert(0, MediaItem::new("first"));
        queue.insert(10, MediaItem::new("last"));

        assert_eq!(uris(&queue), ["first", "a", "last"]);
    }

    #[test]
    fn remove_by_index_and_id() {
        let mut queue = MediaQueue::new();
        let b = MediaItem::new("b");
        let b_id = b.id();
        queue.extend([MediaItem::new("a"), b, MediaItem::new("c")]);

        assert!(queue.remove(5).is_none());
        assert_eq!(queue.remove(0).map(|item| item.uri().to_string()), Some("a".to_string()));
        assert_eq!(queue.remove_id(b_id).map(|item| item.id()), Some(b_id));
        assert!(queue.remove_id(b_id).is_none());
        assert_eq!(uris(&queue), ["c"]);
    }

    #[test]
    fn clear_empties_queue() {
        let mut queue = MediaQueue::new();
        queue.add(MediaItem::new("a"));
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.get(0).is_none());
    }

    #[test]
    fn items_is_a_snapshot() {
        let shared = MediaQueue::shared();
        shared.write().add(MediaItem::new("a"));

        let snapshot = shared.read().items();
        shared.write().add(MediaItem::new("b"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(shared.read().len(), 2);
    }
}

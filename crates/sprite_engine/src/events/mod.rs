//! Event queue
//!
//! Producers push events during a tick; the owning system drains them once,
//! in push order. Nothing is delivered through global callbacks, so the order
//! a consumer observes never depends on who registered first.

use std::collections::VecDeque;

/// FIFO of pending events owned by a single system
#[derive(Debug, Clone)]
pub struct EventQueue<E> {
    pending: VecDeque<E>,
    capacity: Option<usize>,
    dropped: u64,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    /// Create an unbounded queue
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            capacity: None,
            dropped: 0,
        }
    }

    /// Create a queue that discards the oldest event once `capacity` is reached
    ///
    /// Useful when nobody drains the queue for a while (e.g. a paused scene)
    /// and the backlog would otherwise grow without bound.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity: Some(capacity.max(1)),
            dropped: 0,
        }
    }

    /// Queue an event for the next drain
    pub fn push(&mut self, event: E) {
        if let Some(capacity) = self.capacity {
            if self.pending.len() >= capacity {
                self.pending.pop_front();
                self.dropped += 1;
            }
        }
        self.pending.push_back(event);
    }

    /// Take every pending event in push order
    pub fn drain(&mut self) -> impl Iterator<Item = E> + '_ {
        self.pending.drain(..)
    }

    /// Look at pending events without consuming them
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.pending.iter()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Discard everything pending
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Events discarded because a bounded queue overflowed
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_push_order() {
        let mut queue = EventQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_bounded_queue_drops_oldest() {
        let mut queue = EventQueue::bounded(2);
        queue.push('a');
        queue.push('b');
        queue.push('c');
        assert_eq!(queue.iter().copied().collect::<Vec<_>>(), vec!['b', 'c']);
        assert_eq!(queue.dropped(), 1);
    }
}

//! Min-priority queue used by the shortest-path solvers.
//!
//! The queue is an array-backed binary heap with no decrease-key operation.
//! Solvers push a fresh entry whenever a distance improves and skip stale
//! entries on dequeue (lazy deletion). Entries with equal priority come out in
//! heap order, not insertion order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug)]
struct QueueEntry<T> {
    element: T,
    priority: FloatOrd,
}

impl<T> PartialEq for QueueEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl<T> Eq for QueueEntry<T> {}

impl<T> Ord for QueueEntry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by priority.
        other.priority.cmp(&self.priority)
    }
}

impl<T> PartialOrd for QueueEntry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Binary min-heap over `(element, priority)` pairs.
#[derive(Debug)]
pub struct PriorityQueue<T> {
    heap: BinaryHeap<QueueEntry<T>>,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    /// Insert an element; lower priority values dequeue first. O(log n).
    pub fn enqueue(&mut self, element: T, priority: f64) {
        self.heap.push(QueueEntry {
            element,
            priority: FloatOrd(priority),
        });
    }

    /// Remove and return the element with the lowest priority. O(log n).
    pub fn dequeue(&mut self) -> Option<T> {
        self.heap.pop().map(|entry| entry.element)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeues_in_ascending_priority() {
        let mut queue = PriorityQueue::new();
        queue.enqueue("gate", 30.0);
        queue.enqueue("lounge", 5.0);
        queue.enqueue("counter", 12.5);
        queue.enqueue("exit", 0.0);

        let order: Vec<_> = std::iter::from_fn(|| queue.dequeue()).collect();
        assert_eq!(order, vec!["exit", "lounge", "counter", "gate"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn empty_queue_returns_none() {
        let mut queue: PriorityQueue<u32> = PriorityQueue::default();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn keeps_duplicate_elements() {
        let mut queue = PriorityQueue::new();
        queue.enqueue('a', 10.0);
        queue.enqueue('a', 3.0);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue(), Some('a'));
        assert_eq!(queue.dequeue(), Some('a'));
        assert!(queue.is_empty());
    }

    #[test]
    fn infinity_sorts_last() {
        let mut queue = PriorityQueue::new();
        queue.enqueue(1, f64::INFINITY);
        queue.enqueue(2, 1e12);
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(queue.dequeue(), Some(1));
    }
}

//! Binary min-heap with handle-addressed decrease-key.
//!
//! `IndexedPriorityQueue` keeps its entries in a heap-ordered `Vec` and a map from
//! each entry's `Handle` to its current position in that `Vec`. Both are updated on
//! every swap, so a caller holding a handle can lower that entry's priority and
//! restore heap order in `O(log n)` instead of removing and reinserting it.
//! Entries with equal priority come out in no particular order.
use std::collections::HashMap;

/// Stable identity of an entry for as long as it stays in the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug, Clone)]
struct Node<T> {
    handle: Handle,
    priority: u32,
    item: T,
}

#[derive(Debug, Clone)]
pub struct IndexedPriorityQueue<T> {
    heap: Vec<Node<T>>,
    positions: HashMap<Handle, usize>,
    next_handle: usize,
}

impl<T> Default for IndexedPriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IndexedPriorityQueue<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            positions: HashMap::new(),
            next_handle: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Removes every entry. Handles issued earlier become stale.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.positions.clear();
    }

    /// Inserts `item` with `priority` and returns its handle.
    pub fn push(&mut self, priority: u32, item: T) -> Handle {
        let handle = Handle(self.next_handle);
        self.next_handle += 1;

        let position = self.heap.len();
        self.heap.push(Node {
            handle,
            priority,
            item,
        });
        self.positions.insert(handle, position);
        self.sift_up(position);
        handle
    }

    /// Removes and returns the entry with the smallest priority.
    pub fn pop(&mut self) -> Option<(Handle, u32, T)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let node = self.heap.pop()?;
        self.positions.remove(&node.handle);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((node.handle, node.priority, node.item))
    }

    /// Smallest priority and its item, without removing them.
    #[cfg(test)]
    fn peek(&self) -> Option<(u32, &T)> {
        self.heap.first().map(|node| (node.priority, &node.item))
    }

    #[cfg(test)]
    fn contains(&self, handle: Handle) -> bool {
        self.positions.contains_key(&handle)
    }

    #[cfg(test)]
    fn priority(&self, handle: Handle) -> Option<u32> {
        let &position = self.positions.get(&handle)?;
        Some(self.heap[position].priority)
    }

    /// Mutable access to a queued item. Changing the item never reorders the queue.
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let &position = self.positions.get(&handle)?;
        Some(&mut self.heap[position].item)
    }

    /// Lowers the priority of a queued entry and restores heap order.
    ///
    /// Returns `false` if the handle is no longer queued or `priority` is not lower
    /// than the current one; the queue is left unchanged in that case.
    pub fn decrease_key(&mut self, handle: Handle, priority: u32) -> bool {
        let Some(&position) = self.positions.get(&handle) else {
            return false;
        };
        if priority >= self.heap[position].priority {
            return false;
        }
        self.heap[position].priority = priority;
        self.sift_up(position);
        true
    }

    fn swap(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        self.heap.swap(i, j);
        self.positions.insert(self.heap[i].handle, i);
        self.positions.insert(self.heap[j].handle, j);
    }

    fn sift_up(&mut self, mut position: usize) {
        while position > 0 {
            let parent = (position - 1) / 2;
            if self.heap[position].priority >= self.heap[parent].priority {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
    }

    fn sift_down(&mut self, mut position: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * position + 1;
            let right = left + 1;
            let mut smallest = position;
            if left < len && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < len && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == position {
                break;
            }
            self.swap(position, smallest);
            position = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(queue: &mut IndexedPriorityQueue<T>) -> Vec<(u32, T)> {
        let mut out = Vec::new();
        while let Some((_, priority, item)) = queue.pop() {
            out.push((priority, item));
        }
        out
    }

    #[test]
    fn test_pop_in_priority_order() {
        let mut queue = IndexedPriorityQueue::new();
        for (priority, item) in [(5, "e"), (1, "a"), (4, "d"), (2, "b"), (3, "c")] {
            queue.push(priority, item);
        }
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.peek(), Some((1, &"a")));
        assert_eq!(
            drain(&mut queue),
            vec![(1, "a"), (2, "b"), (3, "c"), (4, "d"), (5, "e")]
        );
        assert!(queue.is_empty());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_decrease_key_moves_entry_forward() {
        let mut queue = IndexedPriorityQueue::new();
        queue.push(3, 'x');
        queue.push(4, 'y');
        let z = queue.push(10, 'z');
        assert!(queue.decrease_key(z, 1));
        assert_eq!(queue.priority(z), Some(1));
        assert_eq!(queue.pop(), Some((z, 1, 'z')));
        assert!(!queue.contains(z));
    }

    #[test]
    fn test_decrease_key_rejects_increase_and_stale_handles() {
        let mut queue = IndexedPriorityQueue::new();
        let a = queue.push(2, ());
        assert!(!queue.decrease_key(a, 5));
        assert!(!queue.decrease_key(a, 2));
        assert_eq!(queue.priority(a), Some(2));
        queue.pop();
        assert!(!queue.decrease_key(a, 0));
        assert!(queue.get_mut(a).is_none());
    }

    #[test]
    fn test_get_mut_updates_item_in_place() {
        let mut queue = IndexedPriorityQueue::new();
        let a = queue.push(7, String::from("old"));
        queue.push(1, String::from("first"));
        *queue.get_mut(a).unwrap() = String::from("new");
        assert!(queue.decrease_key(a, 0));
        assert_eq!(queue.pop().map(|(_, _, item)| item), Some(String::from("new")));
    }

    #[test]
    fn test_positions_track_heap_after_mixed_operations() {
        let mut queue = IndexedPriorityQueue::new();
        let handles: Vec<Handle> = (0..50u32).map(|i| queue.push(100 + (i * 37) % 50, i)).collect();
        for (i, &handle) in handles.iter().enumerate().step_by(3) {
            assert!(queue.decrease_key(handle, i as u32));
        }
        for (&handle, &position) in &queue.positions {
            assert_eq!(queue.heap[position].handle, handle);
        }
        let priorities: Vec<u32> = drain(&mut queue).into_iter().map(|(p, _)| p).collect();
        assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(priorities.len(), 50);
    }
}

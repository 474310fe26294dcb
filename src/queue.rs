// BinaryHeap can only pop its top; the search also evicts stale entries.

pub trait Prioritized {
    type Priority: Ord;

    fn priority(&self) -> Self::Priority;
}

/// Binary min-heap, smallest priority at index 0. Ties come out in heap
/// order.
#[derive(Debug, Clone)]
pub struct MinPriorityQueue<T> {
    items: Vec<T>,
}

impl<T: Prioritized> Default for MinPriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Prioritized> MinPriorityQueue<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Items in heap order, not priority order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn enqueue(&mut self, item: T) {
        if self.items.len() == self.items.capacity() {
            // grow to three times the current size
            let extra = (self.items.capacity() * 2).max(4);
            self.items.reserve_exact(extra);
        }

        self.items.push(item);
        self.swim(self.items.len() - 1);
    }

    pub fn dequeue_min(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }

        let item = self.items.swap_remove(0);
        self.sink(0);
        Some(item)
    }

    /// Evicts the item at `index` (as returned by [`find`](Self::find)) and
    /// returns it. Out-of-range indices leave the queue untouched.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }

        let item = self.items.swap_remove(index);
        if index < self.items.len() {
            // The former last element may belong above or below `index`.
            self.sink(index);
            self.swim(index);
        }
        Some(item)
    }

    fn less(&self, i: usize, j: usize) -> bool {
        self.items[i].priority() < self.items[j].priority()
    }

    fn sink(&mut self, mut index: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }

            let mut child = left;
            if left + 1 < len && self.less(left + 1, left) {
                child = left + 1;
            }

            if !self.less(child, index) {
                break;
            }

            self.items.swap(index, child);
            index = child;
        }
    }

    fn swim(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }

            self.items.swap(index, parent);
            index = parent;
        }
    }
}

impl<T: Prioritized + PartialEq> MinPriorityQueue<T> {
    /// Linear scan for an element equal to `item`.
    pub fn find(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == item)
    }
}

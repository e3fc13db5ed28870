use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::hash::{Hash, Hasher};

use fnv::FnvHashMap;

/// A heuristic estimate usable as a queue priority: a totally ordered,
/// hashable wrapper over `f32`. Estimates are never NaN, they are integers
/// or infinity, so the total order agrees with the usual one.
#[derive(Clone, Copy, Debug)]
pub struct Cost(pub f32);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Cost {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// A queue that pops the element with the minimum associated priority.
///
/// Elements and priorities are kept separate. The same element may be pushed
/// several times, with equal or different priorities; a later push never
/// replaces an earlier entry.
pub trait PriorityQueue<E, P> {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    fn push(&mut self, element: E, priority: P);

    /// The element with the minimum priority, or `None` when empty.
    fn top(&self) -> Option<&E>;

    /// The priority of the `top` element, or `None` when empty.
    fn min_priority(&self) -> Option<&P>;

    /// Removes and returns the element with the minimum priority.
    fn pop(&mut self) -> Option<E>;
}

#[derive(Debug)]
struct Entry<E, P: Ord> {
    element: E,
    priority: P,
}

// Entries are ordered by priority alone, reversed so that the std max-heap
// pops the minimum.
impl<E, P: Ord> Ord for Entry<E, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority.cmp(&self.priority)
    }
}

impl<E, P: Ord> PartialOrd for Entry<E, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E, P: Ord> PartialEq for Entry<E, P> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl<E, P: Ord> Eq for Entry<E, P> {}

/// A priority queue backed by the std binary heap.
#[derive(Debug, Default)]
pub struct HeapQueue<E, P: Ord> {
    heap: BinaryHeap<Entry<E, P>>,
}

impl<E, P: Ord> HeapQueue<E, P> {
    pub fn new() -> Self {
        HeapQueue {
            heap: BinaryHeap::new(),
        }
    }
}

impl<E, P: Ord> PriorityQueue<E, P> for HeapQueue<E, P> {
    fn len(&self) -> usize {
        self.heap.len()
    }

    fn clear(&mut self) {
        self.heap.clear();
    }

    fn push(&mut self, element: E, priority: P) {
        self.heap.push(Entry { element, priority });
    }

    fn top(&self) -> Option<&E> {
        self.heap.peek().map(|entry| &entry.element)
    }

    fn min_priority(&self) -> Option<&P> {
        self.heap.peek().map(|entry| &entry.priority)
    }

    fn pop(&mut self) -> Option<E> {
        self.heap.pop().map(|entry| entry.element)
    }
}

/// A priority queue that stacks elements of equal priority into buckets, so
/// the heap only holds distinct priorities. Cheaper than `HeapQueue` when
/// many elements share priorities, slower when they do not.
#[derive(Debug, Default)]
pub struct BucketQueue<E, P: Ord + Hash + Copy> {
    priority_heap: BinaryHeap<Reverse<P>>,
    buckets: FnvHashMap<P, Vec<E>>,
    num_elements: usize,
}

impl<E, P: Ord + Hash + Copy> BucketQueue<E, P> {
    pub fn new() -> Self {
        BucketQueue {
            priority_heap: BinaryHeap::new(),
            buckets: FnvHashMap::default(),
            num_elements: 0,
        }
    }
}

impl<E, P: Ord + Hash + Copy> PriorityQueue<E, P> for BucketQueue<E, P> {
    fn len(&self) -> usize {
        self.num_elements
    }

    fn clear(&mut self) {
        self.priority_heap.clear();
        self.buckets.clear();
        self.num_elements = 0;
    }

    fn push(&mut self, element: E, priority: P) {
        let bucket = self.buckets.entry(priority).or_insert_with(Vec::new);
        // empty buckets are removed in pop, so an empty bucket is a new one
        if bucket.is_empty() {
            self.priority_heap.push(Reverse(priority));
        }
        bucket.push(element);
        self.num_elements += 1;
    }

    fn top(&self) -> Option<&E> {
        let Reverse(priority) = self.priority_heap.peek()?;
        self.buckets.get(priority)?.last()
    }

    fn min_priority(&self) -> Option<&P> {
        self.priority_heap.peek().map(|reverse| &reverse.0)
    }

    fn pop(&mut self) -> Option<E> {
        let Reverse(priority) = *self.priority_heap.peek()?;
        let bucket = self.buckets.get_mut(&priority)?;
        let element = bucket.pop();

        if bucket.is_empty() {
            self.priority_heap.pop();
            self.buckets.remove(&priority);
        }
        self.num_elements -= 1;

        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queues() -> Vec<Box<dyn PriorityQueue<&'static str, i32>>> {
        vec![
            Box::new(HeapQueue::new()),
            Box::new(BucketQueue::new()),
        ]
    }

    #[test]
    fn pops_in_priority_order() {
        for mut queue in queues() {
            queue.push("foo", 2);
            queue.push("bar", 1);
            assert_eq!(queue.top(), Some(&"bar"));
            assert_eq!(queue.pop(), Some("bar"));
            assert_eq!(queue.pop(), Some("foo"));
            assert_eq!(queue.pop(), None);
        }
    }

    #[test]
    fn duplicates_and_clear() {
        for mut queue in queues() {
            assert!(queue.is_empty());
            assert_eq!(queue.len(), 0);

            queue.push("foo", 1);
            queue.push("bar", 2);
            queue.push("foo", 3);
            queue.push("baz", 2);

            assert!(!queue.is_empty());
            assert_eq!(queue.len(), 4);

            assert_eq!(queue.top(), Some(&"foo"));
            assert_eq!(queue.min_priority(), Some(&1));

            queue.pop();
            assert_eq!(queue.len(), 3);

            // both entries with priority 2 come out before the second "foo"
            let elem = queue.pop().unwrap();
            assert!(elem == "baz" || elem == "bar");

            assert_eq!(queue.min_priority(), Some(&2));
            let other_elem = queue.pop().unwrap();
            assert!(other_elem == "baz" || other_elem == "bar");
            assert_ne!(elem, other_elem);

            assert_eq!(queue.top(), Some(&"foo"));
            assert_eq!(queue.min_priority(), Some(&3));

            queue.clear();
            assert!(queue.is_empty());
            assert_eq!(queue.len(), 0);
            assert_eq!(queue.pop(), None);
        }
    }

    #[test]
    fn cost_ordering() {
        let mut queue: HeapQueue<&str, Cost> = HeapQueue::new();
        queue.push("unreachable", Cost(f32::INFINITY));
        queue.push("far", Cost(3_000_002.0));
        queue.push("near", Cost(1_000_002.0));

        assert_eq!(queue.pop(), Some("near"));
        assert_eq!(queue.pop(), Some("far"));
        assert_eq!(queue.pop(), Some("unreachable"));
    }
}

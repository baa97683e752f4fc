/// Fixed-capacity FIFO ring.
///
/// Pushing into a full ring overwrites the oldest slot and hands the evicted
/// value back to the caller. Iteration runs oldest to newest.
#[derive(Debug, Clone)]
pub struct BoundedRing<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> BoundedRing<T> {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Append at the back. Returns the evicted front value when full.
    ///
    /// A zero-capacity ring retains nothing and returns `item` itself.
    pub fn push(&mut self, item: T) -> Option<T> {
        let cap = self.capacity();
        if cap == 0 {
            return Some(item);
        }
        if self.len == cap {
            let evicted = self.slots[self.head].replace(item);
            self.head = (self.head + 1) % cap;
            evicted
        } else {
            let idx = (self.head + self.len) % cap;
            self.slots[idx] = Some(item);
            self.len += 1;
            None
        }
    }

    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.slots[self.head].take();
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        item
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        let cap = self.capacity();
        (0..self.len).filter_map(move |i| self.slots[(self.head + i) % cap].as_ref())
    }

    /// The `n` most recent values, oldest first.
    pub fn latest(&self, n: usize) -> impl Iterator<Item = &T> + '_ {
        self.iter().skip(self.len.saturating_sub(n))
    }

    pub fn contains(&self, needle: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|item| item == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(ring: &BoundedRing<u32>) -> Vec<u32> {
        ring.iter().copied().collect()
    }

    #[test]
    fn push_below_capacity_keeps_everything() {
        let mut ring = BoundedRing::new(3);
        assert_eq!(ring.push(1), None);
        assert_eq!(ring.push(2), None);
        assert_eq!(collect(&ring), vec![1, 2]);
        assert!(!ring.is_full());
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let mut ring = BoundedRing::new(10);
        for i in 1..=10 {
            assert_eq!(ring.push(i), None);
        }
        assert_eq!(ring.push(11), Some(1));
        assert_eq!(ring.len(), 10);
        assert_eq!(ring.iter().next(), Some(&2));
        assert_eq!(ring.iter().last(), Some(&11));
    }

    #[test]
    fn pop_front_then_push_wraps() {
        let mut ring = BoundedRing::new(3);
        ring.push(1);
        ring.push(2);
        ring.push(3);
        assert_eq!(ring.pop_front(), Some(1));
        assert_eq!(ring.pop_front(), Some(2));
        ring.push(4);
        ring.push(5);
        assert_eq!(collect(&ring), vec![3, 4, 5]);
        assert_eq!(ring.push(6), Some(3));
        assert_eq!(collect(&ring), vec![4, 5, 6]);
    }

    #[test]
    fn pop_front_on_empty_is_none() {
        let mut ring: BoundedRing<u32> = BoundedRing::new(2);
        assert_eq!(ring.pop_front(), None);
    }

    #[test]
    fn latest_returns_tail_in_order() {
        let mut ring = BoundedRing::new(4);
        for i in 1..=6 {
            ring.push(i);
        }
        let tail: Vec<u32> = ring.latest(2).copied().collect();
        assert_eq!(tail, vec![5, 6]);
        let all: Vec<u32> = ring.latest(99).copied().collect();
        assert_eq!(all, vec![3, 4, 5, 6]);
    }

    #[test]
    fn zero_capacity_retains_nothing() {
        let mut ring = BoundedRing::new(0);
        assert_eq!(ring.push(7), Some(7));
        assert!(ring.is_empty());
        assert!(ring.is_full());
    }

    #[test]
    fn contains_checks_live_slots_only() {
        let mut ring = BoundedRing::new(2);
        ring.push("a".to_string());
        ring.push("b".to_string());
        ring.push("c".to_string());
        assert!(!ring.contains(&"a".to_string()));
        assert!(ring.contains(&"c".to_string()));
    }
}

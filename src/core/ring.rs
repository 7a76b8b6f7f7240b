use std::collections::VecDeque;

/// A ring of fixed length. Every slot is always occupied; inserting at the
/// front pushes the last element out.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedRing<T> {
    slots: VecDeque<T>,
    capacity: usize,
}

impl<T> FixedRing<T> {
    /// Creates a ring of `capacity` slots, each filled by `fill`.
    pub fn filled_with(capacity: usize, mut fill: impl FnMut() -> T) -> Self {
        let slots = (0..capacity).map(|_| fill()).collect();
        Self { slots, capacity }
    }

    /// Builds a ring from `items`, truncating extra items and padding missing
    /// slots with `fill`.
    pub fn from_items(
        capacity: usize,
        items: impl IntoIterator<Item = T>,
        mut fill: impl FnMut() -> T,
    ) -> Self {
        let mut slots: VecDeque<T> = items.into_iter().take(capacity).collect();
        while slots.len() < capacity {
            slots.push_back(fill());
        }
        Self { slots, capacity }
    }

    /// Shifts every element one slot toward the tail and writes `value` at
    /// the front. Returns the evicted tail element.
    pub fn push_front(&mut self, value: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(value);
        }
        let evicted = self.slots.pop_back();
        self.slots.push_front(value);
        evicted
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_front_shifts_and_evicts() {
        let mut ring = FixedRing::filled_with(3, || 0);

        assert_eq!(ring.push_front(1), Some(0));
        assert_eq!(ring.push_front(2), Some(0));
        assert_eq!(ring.push_front(3), Some(0));
        assert_eq!(ring.push_front(4), Some(1));

        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![4, 3, 2]);
        assert_eq!(ring.len(), 3);
    }

    #[test]
    fn test_from_items_pads_and_truncates() {
        let padded = FixedRing::from_items(4, vec![1, 2], || 0);
        assert_eq!(padded.iter().copied().collect::<Vec<_>>(), vec![1, 2, 0, 0]);

        let truncated = FixedRing::from_items(2, vec![1, 2, 3], || 0);
        assert_eq!(truncated.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_zero_capacity_returns_value() {
        let mut ring: FixedRing<i32> = FixedRing::filled_with(0, || 0);
        assert_eq!(ring.push_front(5), Some(5));
        assert!(ring.is_empty());
        assert_eq!(ring.get(0), None);
    }
}

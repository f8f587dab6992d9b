//! Fixed-capacity ring of recent pointer positions.

/// A position in normalized surface coordinates (`0..1`, Y up).
pub type Point = [f32; 2];

pub const CENTER: Point = [0.5, 0.5];

#[derive(Debug, Clone)]
pub struct TrailBuffer {
    slots: Vec<Point>,
    head: usize,
}

impl TrailBuffer {
    /// Capacity is clamped to at least one slot.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![CENTER; capacity.max(1)],
            head: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Advance the head and write `p` there, overwriting the oldest entry.
    pub fn push(&mut self, p: Point) {
        self.head = (self.head + 1) % self.slots.len();
        self.slots[self.head] = p;
    }

    pub fn newest(&self) -> Point {
        self.slots[self.head]
    }

    /// Entries from newest to oldest, walking backwards from the head.
    pub fn iter_newest_first(&self) -> impl Iterator<Item = Point> + '_ {
        let n = self.slots.len();
        (0..n).map(move |i| self.slots[(self.head + n - i) % n])
    }

    /// Fill `out` with the history (index 0 = newest). Reuses the allocation.
    pub fn write_history(&self, out: &mut Vec<Point>) {
        out.clear();
        out.extend(self.iter_newest_first());
    }

    pub fn history(&self) -> Vec<Point> {
        self.iter_newest_first().collect()
    }

    /// Reset every slot to the center.
    pub fn reset(&mut self) {
        self.slots.fill(CENTER);
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_is_clamped() {
        let t = TrailBuffer::new(0);
        assert_eq!(t.capacity(), 1);
        assert_eq!(t.history(), vec![CENTER]);
    }

    #[test]
    fn test_wraps_after_capacity() {
        let mut t = TrailBuffer::new(2);
        t.push([0.1, 0.1]);
        t.push([0.2, 0.2]);
        t.push([0.3, 0.3]);
        assert_eq!(t.history(), vec![[0.3, 0.3], [0.2, 0.2]]);
        assert_eq!(t.newest(), [0.3, 0.3]);
    }
}

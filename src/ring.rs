//! Write/read pointers that carry one wrap bit above the slot index, so a full
//! ring and an empty ring never compare equal.

#[inline(always)]
const fn pointer_mask(capacity: usize) -> usize {
    (capacity << 1) - 1
}

#[inline(always)]
pub(crate) const fn slot(pointer: usize, capacity: usize) -> usize {
    pointer & (capacity - 1)
}

#[inline(always)]
pub(crate) const fn advance(pointer: usize, capacity: usize) -> usize {
    pointer.wrapping_add(1) & pointer_mask(capacity)
}

/// Words between `read` and `write`, always in `0..=capacity`.
#[inline(always)]
pub(crate) const fn occupancy(write: usize, read: usize, capacity: usize) -> usize {
    write.wrapping_sub(read) & pointer_mask(capacity)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RingPointers {
    write: usize,
    read: usize,
}

impl RingPointers {
    #[inline(always)]
    pub const fn len(&self, capacity: usize) -> usize {
        occupancy(self.write, self.read, capacity)
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.write == self.read
    }

    #[inline(always)]
    pub const fn is_full(&self, capacity: usize) -> bool {
        self.len(capacity) == capacity
    }

    #[inline(always)]
    pub const fn write(&self) -> usize {
        self.write
    }

    #[inline(always)]
    pub const fn read(&self) -> usize {
        self.read
    }

    #[inline(always)]
    pub const fn masked_write(&self, capacity: usize) -> usize {
        slot(self.write, capacity)
    }

    #[inline(always)]
    pub const fn masked_read(&self, capacity: usize) -> usize {
        slot(self.read, capacity)
    }

    #[inline(always)]
    pub fn write_forward(&mut self, capacity: usize) {
        self.write = advance(self.write, capacity);
    }

    #[inline(always)]
    pub fn read_forward(&mut self, capacity: usize) {
        self.read = advance(self.read, capacity);
    }

    pub fn clear(&mut self) {
        self.write = 0;
        self.read = 0;
    }
}

//! Pointer crossing between two timing domains.
//!
//! The owning side publishes its pointer gray-coded into a single-word relay;
//! the observing side samples that relay through a chain of [`SYNC_STAGES`]
//! registers, one shift per clock edge of the observing side.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

/// Synchronizer depth: a published pointer is visible after this many edges.
pub const SYNC_STAGES: usize = 2;

#[inline]
pub const fn to_gray(binary: usize) -> usize {
    binary ^ (binary >> 1)
}

#[inline]
pub const fn from_gray(gray: usize) -> usize {
    let mut binary = gray;
    let mut shift = 1;

    while shift < usize::BITS {
        binary ^= binary >> shift;
        shift <<= 1;
    }

    binary
}

/// Single-writer/single-reader word carrying one pointer across domains.
#[derive(Debug, Default)]
pub(crate) struct PointerRelay {
    gray: CachePadded<AtomicUsize>,
}

impl PointerRelay {
    /// Called only by the side that owns the pointer, after its slot access.
    #[inline]
    pub fn publish(&self, pointer: usize) {
        self.gray.store(to_gray(pointer), Ordering::Release);
    }

    #[inline]
    pub fn sample(&self) -> usize {
        from_gray(self.gray.load(Ordering::Acquire))
    }
}

/// Register chain on the observing side.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Synchronizer {
    stages: [usize; SYNC_STAGES],
}

impl Synchronizer {
    /// One clock edge: every stage shifts and the first captures the relay.
    #[inline]
    pub fn tick(&mut self, relay: &PointerRelay) {
        self.stages.rotate_right(1);
        self.stages[0] = relay.sample();
    }

    /// The synchronized pointer, `SYNC_STAGES` edges behind the relay.
    #[inline]
    pub fn value(&self) -> usize {
        self.stages[SYNC_STAGES - 1]
    }

    pub fn clear(&mut self) {
        self.stages = [0; SYNC_STAGES];
    }
}

#[cfg(test)]
mod tests {
    use crate::two_clock::sync::*;

    #[test]
    fn gray_round_trips_full_pointer_range() {
        for p in 0..64 {
            assert_eq!(from_gray(to_gray(p)), p);
        }
        assert_eq!(from_gray(to_gray(usize::MAX)), usize::MAX);
    }

    #[test]
    fn adjacent_pointers_differ_in_one_bit() {
        // pointer range for capacity 8 with the wrap bit
        let mask = 15;
        for p in 0..=mask {
            let next = (p + 1) & mask;
            assert_eq!((to_gray(p) ^ to_gray(next)).count_ones(), 1, "{p} -> {next}");
        }
    }

    #[test]
    fn published_pointer_appears_after_sync_stages() {
        let relay = PointerRelay::default();
        let mut sync = Synchronizer::default();

        relay.publish(5);
        for _ in 0..SYNC_STAGES - 1 {
            sync.tick(&relay);
            assert_eq!(sync.value(), 0);
        }

        sync.tick(&relay);
        assert_eq!(sync.value(), 5);

        relay.publish(6);
        sync.tick(&relay);
        assert_eq!(sync.value(), 5);
        sync.tick(&relay);
        assert_eq!(sync.value(), 6);

        sync.clear();
        assert_eq!(sync.value(), 0);
    }
}

//! Split timing-domain mode.
//!
//! The [`Producer`] and [`Consumer`] each own one pointer and run without any
//! shared lock. The only shared state is the slot array and the two
//! [`PointerRelay`]s, each written by exactly one side. Each side derives its
//! status from its own pointer and a synchronized, possibly stale, copy of the
//! other side's pointer. Staleness only ever overstates occupancy on the
//! producer side and understates it on the consumer side, so the producer's
//! `full` and the consumer's `empty` may clear late but never early. The
//! opposite flags would be optimistic from a stale view: the producer's
//! `empty` and the consumer's `full` always read `None`.

mod sync;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tracing::{debug, trace};

use crate::{
    config::{FifoConfig, Geometry},
    error::{ConfigError, DomainError, FifoError},
    fifo::OutputPort,
    ring::{advance, occupancy, slot},
    status::{Status, Sticky},
};

pub use sync::{from_gray, to_gray, SYNC_STAGES};

use sync::{PointerRelay, Synchronizer};

#[derive(Debug)]
struct Shared {
    geometry: Geometry,
    slots: Box<[AtomicU64]>,
    write_relay: PointerRelay,
    read_relay: PointerRelay,
}

pub fn channel(config: &FifoConfig) -> Result<(Producer, Consumer), ConfigError> {
    let geometry = config.validate()?;

    if !config.two_clock {
        return Err(ConfigError::ModeMismatch {
            configured: config.timing(),
            requested: "two-clock",
        });
    }

    let slots = (0..geometry.capacity())
        .map(|_| AtomicU64::new(0))
        .collect::<Vec<_>>()
        .into_boxed_slice();

    let shared = Arc::new(Shared {
        geometry,
        slots,
        write_relay: PointerRelay::default(),
        read_relay: PointerRelay::default(),
    });

    debug!(
        capacity = geometry.capacity(),
        data_width = config.data_width,
        output_reg = config.output_reg,
        sync_stages = SYNC_STAGES,
        "two-clock fifo constructed"
    );

    let producer = Producer {
        shared: Arc::clone(&shared),
        write: 0,
        read_sync: Synchronizer::default(),
        overflow: false,
    };

    let consumer = Consumer {
        shared,
        read: 0,
        write_sync: Synchronizer::default(),
        underflow: false,
        output: OutputPort::new(config.output_reg),
    };

    Ok((producer, consumer))
}

/// Resets both domains together. Holding both halves mutably guarantees that
/// neither side is mid-operation.
pub fn reset(producer: &mut Producer, consumer: &mut Consumer) -> Result<(), DomainError> {
    if !Arc::ptr_eq(&producer.shared, &consumer.shared) {
        return Err(DomainError::Unpaired);
    }

    producer.write = 0;
    producer.read_sync.clear();
    producer.overflow = false;
    producer.shared.write_relay.publish(0);

    consumer.read = 0;
    consumer.write_sync.clear();
    consumer.underflow = false;
    consumer.output.reset();
    consumer.shared.read_relay.publish(0);

    debug!("two-clock fifo reset");
    Ok(())
}

/// Write-domain half.
#[derive(Debug)]
pub struct Producer {
    shared: Arc<Shared>,
    write: usize,
    read_sync: Synchronizer,
    overflow: bool,
}

impl Producer {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.geometry.capacity()
    }

    /// Advances the read-pointer synchronizer by one write-domain edge.
    pub fn tick(&mut self) {
        self.read_sync.tick(&self.shared.read_relay);
    }

    /// Occupancy as seen from the write domain; never below the true value.
    #[inline]
    pub fn occupied(&self) -> usize {
        occupancy(self.write, self.read_sync.value(), self.capacity())
    }

    pub fn is_full(&self) -> bool {
        self.occupied() == self.capacity()
    }

    pub fn status(&self) -> Status {
        let sticky = Sticky {
            overflow: self.overflow,
            underflow: false,
        };

        Status {
            empty: None,
            underflow: None,
            ..Status::derive(&self.shared.geometry, self.occupied(), sticky)
        }
    }

    /// One write-domain edge with the write enable asserted.
    pub fn try_admit(&mut self, word: u64) -> Result<(), FifoError> {
        self.tick();

        let cap = self.capacity();
        if self.is_full() {
            if !self.overflow {
                debug!(capacity = cap, "overflow latched");
            }
            self.overflow = true;
            return Err(FifoError::Overflow(word));
        }

        let index = slot(self.write, cap);
        self.shared.slots[index].store(self.shared.geometry.truncate(word), Ordering::Relaxed);

        self.write = advance(self.write, cap);
        self.shared.write_relay.publish(self.write);

        trace!(write = self.write, "admitted");
        Ok(())
    }

    pub fn acknowledge_overflow(&mut self) {
        if self.overflow {
            debug!("overflow acknowledged");
        }
        self.overflow = false;
    }
}

/// Read-domain half.
#[derive(Debug)]
pub struct Consumer {
    shared: Arc<Shared>,
    read: usize,
    write_sync: Synchronizer,
    underflow: bool,
    output: OutputPort,
}

impl Consumer {
    #[inline]
    pub fn capacity(&self) -> usize {
        self.shared.geometry.capacity()
    }

    /// Advances the write-pointer synchronizer by one read-domain edge.
    pub fn tick(&mut self) {
        self.write_sync.tick(&self.shared.write_relay);
    }

    /// Occupancy as seen from the read domain; never above the true value.
    #[inline]
    pub fn occupied(&self) -> usize {
        occupancy(self.write_sync.value(), self.read, self.capacity())
    }

    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }

    pub fn status(&self) -> Status {
        let sticky = Sticky {
            overflow: false,
            underflow: self.underflow,
        };

        Status {
            full: None,
            overflow: None,
            ..Status::derive(&self.shared.geometry, self.occupied(), sticky)
        }
    }

    pub fn data_out(&self) -> u64 {
        self.output.value(|| {
            self.shared.slots[slot(self.read, self.capacity())].load(Ordering::Relaxed)
        })
    }

    /// One read-domain edge with the read enable asserted.
    pub fn try_remove(&mut self) -> Result<u64, FifoError> {
        self.tick();

        if self.is_empty() {
            if !self.underflow {
                debug!("underflow latched");
            }
            self.underflow = true;
            return Err(FifoError::Underflow);
        }

        let cap = self.capacity();
        let word = self.shared.slots[slot(self.read, cap)].load(Ordering::Relaxed);

        self.read = advance(self.read, cap);
        self.shared.read_relay.publish(self.read);
        self.output.capture(word);

        trace!(read = self.read, "removed");
        Ok(word)
    }

    pub fn acknowledge_underflow(&mut self) {
        if self.underflow {
            debug!("underflow acknowledged");
        }
        self.underflow = false;
    }
}

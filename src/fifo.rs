use tracing::{debug, trace};

use crate::{
    config::{FifoConfig, Geometry},
    error::{ConfigError, FifoError},
    ring::RingPointers,
    shared::{self, Reader, Writer},
    status::{Status, Sticky},
};

/// The read data port, either driven straight from storage or through a
/// register that captures each read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputPort {
    Combinational,
    Registered(u64),
}

impl OutputPort {
    pub fn new(registered: bool) -> Self {
        if registered {
            Self::Registered(0)
        } else {
            Self::Combinational
        }
    }

    #[inline]
    pub fn capture(&mut self, word: u64) {
        if let Self::Registered(latch) = self {
            *latch = word;
        }
    }

    /// Current port value; `at_read_pointer` is only consulted without the register.
    #[inline]
    pub fn value(&self, at_read_pointer: impl FnOnce() -> u64) -> u64 {
        match self {
            Self::Combinational => at_read_pointer(),
            Self::Registered(latch) => *latch,
        }
    }

    pub fn reset(&mut self) {
        self.capture(0);
    }
}

/// Bounded circular buffer with status signaling, single timing domain.
///
/// Operations take `&mut self`; use [`Fifo::split`] to drive it from a
/// producer thread and a consumer thread.
#[derive(Clone, Debug)]
pub struct Fifo {
    geometry: Geometry,
    storage: Box<[u64]>,
    pointers: RingPointers,
    sticky: Sticky,
    output: OutputPort,
    write_full_en: bool,
    read_empty_en: bool,
}

impl Fifo {
    pub fn new(config: &FifoConfig) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;

        if config.two_clock {
            return Err(ConfigError::ModeMismatch {
                configured: config.timing(),
                requested: "unified",
            });
        }

        debug!(
            capacity = geometry.capacity(),
            data_width = config.data_width,
            output_reg = config.output_reg,
            write_full_en = config.write_full_en,
            read_empty_en = config.read_empty_en,
            "fifo constructed"
        );

        Ok(Self {
            geometry,
            storage: vec![0; geometry.capacity()].into_boxed_slice(),
            pointers: RingPointers::default(),
            sticky: Sticky::default(),
            output: OutputPort::new(config.output_reg),
            write_full_en: config.write_full_en,
            read_empty_en: config.read_empty_en,
        })
    }

    /// Splits into a writer and a reader sharing this buffer.
    pub fn split(self) -> (Writer, Reader) {
        shared::split(self)
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        self.geometry.capacity()
    }

    #[inline]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.pointers.len(self.capacity())
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    #[inline]
    pub const fn is_full(&self) -> bool {
        self.pointers.is_full(self.capacity())
    }

    pub fn status(&self) -> Status {
        Status::derive(&self.geometry, self.len(), self.sticky)
    }

    /// Value currently presented on the read data port.
    pub fn data_out(&self) -> u64 {
        self.output
            .value(|| self.storage[self.pointers.masked_read(self.capacity())])
    }

    pub fn try_admit(&mut self, word: u64) -> Result<(), FifoError> {
        let cap = self.capacity();

        if self.pointers.is_full(cap) {
            self.latch_overflow();

            if !self.write_full_en {
                return Err(FifoError::Overflow(word));
            }

            // the write slot aliases the oldest word; drop it by moving read along
            self.pointers.read_forward(cap);
            trace!(read = self.pointers.read(), "overwrote oldest word");
        }

        let index = self.pointers.masked_write(cap);
        self.storage[index] = self.geometry.truncate(word);
        self.pointers.write_forward(cap);

        trace!(write = self.pointers.write(), "admitted");
        Ok(())
    }

    pub fn try_remove(&mut self) -> Result<u64, FifoError> {
        let cap = self.capacity();
        let index = self.pointers.masked_read(cap);

        if self.pointers.is_empty() {
            self.latch_underflow();

            if !self.read_empty_en {
                return Err(FifoError::Underflow);
            }

            let stale = self.storage[index];
            self.output.capture(stale);
            return Ok(stale);
        }

        let word = self.storage[index];
        self.pointers.read_forward(cap);
        self.output.capture(word);

        trace!(read = self.pointers.read(), "removed");
        Ok(word)
    }

    /// Clears both pointers, the sticky flags and the output register.
    /// Storage keeps its stale contents.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.sticky = Sticky::default();
        self.output.reset();
        debug!("fifo reset");
    }

    pub fn acknowledge_overflow(&mut self) {
        if self.sticky.overflow {
            debug!("overflow acknowledged");
        }
        self.sticky.overflow = false;
    }

    pub fn acknowledge_underflow(&mut self) {
        if self.sticky.underflow {
            debug!("underflow acknowledged");
        }
        self.sticky.underflow = false;
    }

    fn latch_overflow(&mut self) {
        if !self.sticky.overflow {
            debug!(capacity = self.capacity(), "overflow latched");
        }
        self.sticky.overflow = true;
    }

    fn latch_underflow(&mut self) {
        if !self.sticky.underflow {
            debug!("underflow latched");
        }
        self.sticky.underflow = true;
    }
}

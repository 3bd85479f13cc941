use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("data width must be between 1 and 64 bits, got {0}")]
    DataWidth(u32),

    #[error("pointer width must be between 0 and {max}, got {got}")]
    PointerWidth { got: u32, max: u32 },

    #[error("capacity must be a positive power of two, got {0}")]
    CapacityNotPowerOfTwo(usize),

    #[error("{which} threshold level {level} exceeds capacity {capacity}")]
    ThresholdOutOfRange {
        which: &'static str,
        level: usize,
        capacity: usize,
    },

    #[error("two-clock mode cannot be combined with {0}")]
    IncompatibleModes(&'static str),

    #[error("configuration is for {configured} timing but was built as {requested}")]
    ModeMismatch {
        configured: &'static str,
        requested: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FifoError {
    #[error("fifo is full and the word cannot be admitted")]
    Overflow(u64),

    #[error("fifo is empty and no word can be removed")]
    Underflow,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("producer and consumer belong to different fifos")]
    Unpaired,
}

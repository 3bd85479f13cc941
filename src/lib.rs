mod fifo;
mod ring;

pub mod config;
pub mod error;
pub mod shared;
pub mod status;
pub mod two_clock;

pub use config::{FifoConfig, Geometry, SignalSet};
pub use error::{ConfigError, DomainError, FifoError};
pub use fifo::Fifo;
pub use status::Status;

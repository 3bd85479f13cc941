//! Construction-time parameters and feature toggles.
//!
//! A [`FifoConfig`] is the software analogue of the define/parameter headers a
//! synchronous FIFO is configured with before synthesis. It is validated once
//! into a [`Geometry`], which every buffer flavour carries for its lifetime.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

pub const DEFAULT_DATA_WIDTH: u32 = 8;
pub const DEFAULT_POINTER_WIDTH: u32 = 3;

/// Largest accepted pointer width (16M slots).
pub const MAX_POINTER_WIDTH: u32 = 24;

/// Which status signals a buffer exposes. A disabled signal reads as `None`
/// in every [`Status`](crate::Status) snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalSet {
    pub empty: bool,
    pub full: bool,
    pub low_threshold: bool,
    pub high_threshold: bool,
    pub overflow: bool,
    pub underflow: bool,
}

impl SignalSet {
    pub const ALL: Self = Self {
        empty: true,
        full: true,
        low_threshold: true,
        high_threshold: true,
        overflow: true,
        underflow: true,
    };

    pub const NONE: Self = Self {
        empty: false,
        full: false,
        low_threshold: false,
        high_threshold: false,
        overflow: false,
        underflow: false,
    };
}

impl Default for SignalSet {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FifoConfig {
    /// Bits per stored word.
    pub data_width: u32,

    /// Capacity is `2^pointer_width` slots.
    pub pointer_width: u32,

    /// Independently configured low watermark. `None` falls back to half the capacity.
    pub low_th_level: Option<usize>,

    /// Independently configured high watermark. `None` falls back to half the capacity.
    pub high_th_level: Option<usize>,

    pub signals: SignalSet,

    /// Register the read data port, adding one read of latency.
    pub output_reg: bool,

    /// Producer and consumer run in independent timing domains.
    pub two_clock: bool,

    /// Overwrite the oldest word instead of rejecting a write while full.
    pub write_full_en: bool,

    /// Return the stale word at the read pointer instead of rejecting a read while empty.
    pub read_empty_en: bool,
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            data_width: DEFAULT_DATA_WIDTH,
            pointer_width: DEFAULT_POINTER_WIDTH,
            low_th_level: None,
            high_th_level: None,
            signals: SignalSet::ALL,
            output_reg: false,
            two_clock: false,
            write_full_en: false,
            read_empty_en: false,
        }
    }
}

impl FifoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the defaults with the pointer width derived from `capacity`.
    pub fn for_capacity(capacity: usize) -> Result<Self, ConfigError> {
        if !capacity.is_power_of_two() {
            return Err(ConfigError::CapacityNotPowerOfTwo(capacity));
        }

        Ok(Self {
            pointer_width: capacity.trailing_zeros(),
            ..Self::default()
        })
    }

    pub fn with_data_width(mut self, data_width: u32) -> Self {
        self.data_width = data_width;
        self
    }

    pub fn with_pointer_width(mut self, pointer_width: u32) -> Self {
        self.pointer_width = pointer_width;
        self
    }

    /// Sets one level for both watermarks, like a shared `TH_LEVEL`.
    pub fn with_threshold(mut self, level: usize) -> Self {
        self.low_th_level = Some(level);
        self.high_th_level = Some(level);
        self
    }

    pub fn with_low_threshold(mut self, level: usize) -> Self {
        self.low_th_level = Some(level);
        self
    }

    pub fn with_high_threshold(mut self, level: usize) -> Self {
        self.high_th_level = Some(level);
        self
    }

    pub fn with_signals(mut self, signals: SignalSet) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_output_reg(mut self, enabled: bool) -> Self {
        self.output_reg = enabled;
        self
    }

    pub fn with_two_clock(mut self, enabled: bool) -> Self {
        self.two_clock = enabled;
        self
    }

    pub fn with_write_full(mut self, enabled: bool) -> Self {
        self.write_full_en = enabled;
        self
    }

    pub fn with_read_empty(mut self, enabled: bool) -> Self {
        self.read_empty_en = enabled;
        self
    }

    /// Checks every parameter and resolves the thresholds.
    pub fn validate(&self) -> Result<Geometry, ConfigError> {
        if self.data_width == 0 || self.data_width > u64::BITS {
            return Err(ConfigError::DataWidth(self.data_width));
        }

        if self.pointer_width > MAX_POINTER_WIDTH {
            return Err(ConfigError::PointerWidth {
                got: self.pointer_width,
                max: MAX_POINTER_WIDTH,
            });
        }

        if self.two_clock {
            if self.write_full_en {
                return Err(ConfigError::IncompatibleModes("overwrite-on-full"));
            }
            if self.read_empty_en {
                return Err(ConfigError::IncompatibleModes("read-on-empty"));
            }
        }

        let capacity = 1usize << self.pointer_width;
        let default_level = capacity / 2;

        let low_level = self.low_th_level.unwrap_or(default_level);
        let high_level = self.high_th_level.unwrap_or(default_level);

        for (which, level) in [("low", low_level), ("high", high_level)] {
            if level > capacity {
                return Err(ConfigError::ThresholdOutOfRange {
                    which,
                    level,
                    capacity,
                });
            }
        }

        if low_level > high_level {
            warn!(
                low_level,
                high_level, "low threshold is above high threshold; both flags may assert together"
            );
        }

        let data_mask = if self.data_width == u64::BITS {
            u64::MAX
        } else {
            (1u64 << self.data_width) - 1
        };

        Ok(Geometry {
            capacity,
            data_mask,
            low_level,
            high_level,
            signals: self.signals,
        })
    }

    pub(crate) fn timing(&self) -> &'static str {
        if self.two_clock {
            "two-clock"
        } else {
            "unified"
        }
    }
}

/// Validated sizing shared by every buffer flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    capacity: usize,
    data_mask: u64,
    low_level: usize,
    high_level: usize,
    signals: SignalSet,
}

impl Geometry {
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub const fn data_mask(&self) -> u64 {
        self.data_mask
    }

    #[inline]
    pub const fn low_level(&self) -> usize {
        self.low_level
    }

    #[inline]
    pub const fn high_level(&self) -> usize {
        self.high_level
    }

    #[inline]
    pub const fn signals(&self) -> SignalSet {
        self.signals
    }

    /// Drops the bits above the configured data width.
    #[inline]
    pub const fn truncate(&self, word: u64) -> u64 {
        word & self.data_mask
    }
}

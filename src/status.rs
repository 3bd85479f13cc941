use crate::config::Geometry;

/// One coherent sample of the status signals.
///
/// Every flag is `None` when its signal is disabled in the configuration; in
/// two-clock mode the sticky flag owned by the other domain is `None` too.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Status {
    pub occupied: usize,
    pub empty: Option<bool>,
    pub full: Option<bool>,
    pub low_threshold: Option<bool>,
    pub high_threshold: Option<bool>,
    pub overflow: Option<bool>,
    pub underflow: Option<bool>,
}

/// Latched overflow/underflow bits, held until acknowledged or reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Sticky {
    pub overflow: bool,
    pub underflow: bool,
}

impl Status {
    pub(crate) fn derive(geometry: &Geometry, occupied: usize, sticky: Sticky) -> Self {
        let signals = geometry.signals();

        Self {
            occupied,
            empty: signals.empty.then_some(occupied == 0),
            full: signals.full.then_some(occupied == geometry.capacity()),
            low_threshold: signals
                .low_threshold
                .then_some(occupied <= geometry.low_level()),
            high_threshold: signals
                .high_threshold
                .then_some(occupied >= geometry.high_level()),
            overflow: signals.overflow.then_some(sticky.overflow),
            underflow: signals.underflow.then_some(sticky.underflow),
        }
    }
}

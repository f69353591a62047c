//! Cache configuration

/// Default number of pre-allocated registry slots
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Default number of insertions between automatic sweeps
pub const DEFAULT_SWEEP_INTERVAL: usize = 1024;

/// Options for a [`TypeRefCache`](crate::TypeRefCache)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// Registry slots to allocate up front
    pub initial_capacity: usize,

    /// Sweep dead entries after this many insertions (`None` = only on demand)
    ///
    /// Both new entries and replacements of stale ones count as insertions.
    pub sweep_interval: Option<usize>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            sweep_interval: Some(DEFAULT_SWEEP_INTERVAL),
        }
    }
}

impl CacheOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial registry capacity
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the automatic sweep interval
    ///
    /// `Some(0)` is treated as `None`.
    pub fn with_sweep_interval(mut self, interval: Option<usize>) -> Self {
        self.sweep_interval = interval.filter(|&n| n > 0);
        self
    }
}

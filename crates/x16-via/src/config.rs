//! Construction-time configuration.

/// Configuration for an [`X16Io`](crate::X16Io).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IoConfig {
    /// Seed for the bytes returned by the system VIA's timer registers.
    /// `None` seeds from the OS, which is what a running machine wants.
    pub timer_seed: Option<u64>,
}

impl IoConfig {
    /// Reproducible timer bytes.
    #[must_use]
    pub const fn seeded(seed: u64) -> Self {
        Self {
            timer_seed: Some(seed),
        }
    }
}

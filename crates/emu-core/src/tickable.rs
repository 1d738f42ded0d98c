//! Trait for components driven by the emulation loop.

use crate::Ticks;

/// A component that advances in discrete ticks.
///
/// The host loop owns the cadence: it calls `tick` once per emulated chip
/// clock, in order. Implementations must not assume anything about wall-clock
/// time.
pub trait Tickable {
    /// Advance the component by one tick.
    fn tick(&mut self);

    /// Advance the component by `count` ticks.
    ///
    /// Must be equivalent to calling `tick()` `count` times.
    fn tick_n(&mut self, count: Ticks) {
        for _ in 0..count.get() {
            self.tick();
        }
    }
}

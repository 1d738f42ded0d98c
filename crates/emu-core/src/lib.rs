//! Core traits and types shared by the chip crates.
//!
//! Chips advance one tick at a time and expose their state for inspection.
//! Nothing here knows about a particular machine.

mod observable;
mod tickable;
mod ticks;

pub use observable::{Observable, Value};
pub use tickable::Tickable;
pub use ticks::Ticks;

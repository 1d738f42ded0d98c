//! Commander X16 VIA pair.
//!
//! The X16 has two 6522-style Versatile Interface Adapters. VIA #1
//! ([`SystemVia`]) selects the ROM and RAM banks. VIA #2 ([`PeripheralVia`])
//! carries the PS/2 keyboard and mouse and the NES-style joysticks over
//! open-collector port lines, and raises an interrupt on each falling PS/2
//! clock edge.
//!
//! # Registers ($0-$F)
//!
//! | Reg | VIA #1                   | VIA #2                          |
//! |-----|--------------------------|---------------------------------|
//! | $0  | ROM bank (low 3 bits)    | Port B data (read clears CB1)   |
//! | $1  | RAM bank                 | Port A data (read clears CA1)   |
//! | $2  | storage                  | DDRB (1 = output)               |
//! | $3  | storage                  | DDRA (1 = output)               |
//! | $4, $5, $8, $9 | random bytes  | storage                         |
//! | $D  | storage                  | IFR (writes ignored)            |
//! | $E  | storage                  | IER (bit 7 = set/clear)         |
//! | other | storage                | storage                         |
//!
//! Timers, the serial (IEC) bus and shift-register transfers are not
//! emulated.
//!
//! [`X16Io`] owns both chips and their external lines and is what a machine
//! ticks once per VIA clock.

pub mod config;
pub mod interrupts;
pub mod io;
pub mod peripheral_via;
pub mod peripherals;
pub mod pins;
pub mod ps2;
pub mod registers;
pub mod snapshot;
pub mod system_via;

pub use config::IoConfig;
pub use io::{ViaSelect, X16Io};
pub use peripheral_via::PeripheralVia;
pub use peripherals::{BankLatch, Joystick, MemoryBanks, Ps2Port};
pub use pins::PortPins;
pub use snapshot::{IoSnapshot, SnapshotError};
pub use system_via::SystemVia;

//! Register indices and raw register storage.
//!
//! Both VIAs keep a 16-byte backing store. Every write lands here first;
//! registers with side effects are handled by the owning chip on top of it.

/// Port B data.
pub const ORB: u8 = 0x00;
/// Port A data.
pub const ORA: u8 = 0x01;
/// Port B data direction (1 = output).
pub const DDRB: u8 = 0x02;
/// Port A data direction (1 = output).
pub const DDRA: u8 = 0x03;
/// Timer 1 counter low.
pub const T1CL: u8 = 0x04;
/// Timer 1 counter high.
pub const T1CH: u8 = 0x05;
/// Timer 2 counter low.
pub const T2CL: u8 = 0x08;
/// Timer 2 counter high.
pub const T2CH: u8 = 0x09;
/// Shift register. Plain storage: shift mode is not emulated.
pub const SR: u8 = 0x0A;
/// Interrupt flag register.
pub const IFR: u8 = 0x0D;
/// Interrupt enable register.
pub const IER: u8 = 0x0E;

/// Number of registers in a VIA.
pub const REGISTER_COUNT: usize = 16;

/// Fold a register number into the 16-register window.
#[must_use]
pub const fn select(reg: u8) -> u8 {
    reg & 0x0F
}

/// 16-slot byte storage backing a VIA's register window.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterFile {
    slots: [u8; REGISTER_COUNT],
}

impl RegisterFile {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [0; REGISTER_COUNT],
        }
    }

    #[must_use]
    pub fn get(&self, reg: u8) -> u8 {
        self.slots[usize::from(select(reg))]
    }

    pub fn set(&mut self, reg: u8, value: u8) {
        self.slots[usize::from(select(reg))] = value;
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; REGISTER_COUNT] {
        &self.slots
    }
}

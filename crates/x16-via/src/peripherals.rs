//! External lines and collaborators the VIAs talk to.

/// One PS/2 port as seen from the VIA.
///
/// The `*_out` lines are driven by the peripheral; the `*_in` lines are the
/// resolved bus levels the VIA hands back to it. All lines idle high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ps2Port {
    pub clk_in: bool,
    pub clk_out: bool,
    pub data_in: bool,
    pub data_out: bool,
}

impl Ps2Port {
    /// All four lines released.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            clk_in: true,
            clk_out: true,
            data_in: true,
            data_out: true,
        }
    }
}

impl Default for Ps2Port {
    fn default() -> Self {
        Self::idle()
    }
}

/// NES-style joystick pair sharing one latch and one clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Joystick {
    /// Serial data from joystick 1 and 2 (sampled by the VIA).
    pub data: [bool; 2],
    /// Latch line (driven by the VIA).
    pub latch: bool,
    /// Clock line (driven by the VIA).
    pub clock: bool,
}

impl Default for Joystick {
    fn default() -> Self {
        Self {
            data: [true; 2],
            latch: false,
            clock: false,
        }
    }
}

/// Bank selection registers of the memory subsystem.
///
/// The system VIA forwards its port writes here. ROM banks are 0-7, RAM banks
/// 0-255.
pub trait MemoryBanks {
    fn rom_bank(&self) -> u8;
    fn set_rom_bank(&mut self, bank: u8);
    fn ram_bank(&self) -> u8;
    fn set_ram_bank(&mut self, bank: u8);
}

/// Plain bank selector for machines (and tests) without a memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BankLatch {
    rom: u8,
    ram: u8,
}

impl MemoryBanks for BankLatch {
    fn rom_bank(&self) -> u8 {
        self.rom
    }

    fn set_rom_bank(&mut self, bank: u8) {
        self.rom = bank;
    }

    fn ram_bank(&self) -> u8 {
        self.ram
    }

    fn set_ram_bank(&mut self, bank: u8) {
        self.ram = bank;
    }
}

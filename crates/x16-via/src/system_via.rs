//! VIA #1: system control.
//!
//! | Reg | Use                                                   |
//! |-----|-------------------------------------------------------|
//! | $0  | PB0-2: ROM bank. PB3-7 serial bus lines (not emulated) |
//! | $1  | PA0-7: RAM bank                                       |
//! | $4, $5, $8, $9 | Timers: read as random bytes           |
//! | other | Plain storage                                       |
//!
//! The timers are not emulated. Programs read them for entropy (`RND(0)`),
//! so they return pseudo-random bytes regardless of what was written.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::config::IoConfig;
use crate::peripherals::MemoryBanks;
use crate::registers::{self, ORA, ORB, RegisterFile, T1CH, T1CL, T2CH, T2CL};

/// ROM bank field of Port B.
pub const ROM_BANK_MASK: u8 = 0x07;

/// VIA #1: ROM/RAM bank selection.
pub struct SystemVia {
    registers: RegisterFile,
    rng: SmallRng,
}

impl SystemVia {
    #[must_use]
    pub fn new(config: &IoConfig) -> Self {
        let rng = match config.timer_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            registers: RegisterFile::new(),
            rng,
        }
    }

    /// Power-on: both bank selectors start at 0.
    pub fn reset(&mut self, banks: &mut impl MemoryBanks) {
        banks.set_ram_bank(0);
        banks.set_rom_bank(0);
    }

    /// Nothing in this chip advances on its own.
    pub fn step(&mut self) {}

    /// This chip has no interrupt sources.
    #[must_use]
    pub fn irq_active(&self) -> bool {
        false
    }

    pub fn read(&mut self, reg: u8, banks: &impl MemoryBanks) -> u8 {
        match registers::select(reg) {
            ORB => banks.rom_bank(),
            ORA => banks.ram_bank(),
            T1CL | T1CH | T2CL | T2CH => (self.rng.next_u32() & 0xFF) as u8,
            other => self.registers.get(other),
        }
    }

    pub fn write(&mut self, reg: u8, value: u8, banks: &mut impl MemoryBanks) {
        self.registers.set(reg, value);
        match registers::select(reg) {
            // PB3-7 drive the serial bus, which is not emulated.
            ORB => banks.set_rom_bank(value & ROM_BANK_MASK),
            ORA => banks.set_ram_bank(value),
            _ => {}
        }
    }

    /// Raw backing store, including the last value written to the timer
    /// registers.
    #[must_use]
    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub(crate) fn restore_registers(&mut self, registers: RegisterFile) {
        self.registers = registers;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peripherals::BankLatch;
    use crate::registers::{DDRA, IFR, SR};

    fn via() -> (SystemVia, BankLatch) {
        let mut banks = BankLatch::default();
        banks.set_rom_bank(3);
        banks.set_ram_bank(9);
        let mut via = SystemVia::new(&IoConfig::seeded(1));
        via.reset(&mut banks);
        (via, banks)
    }

    #[test]
    fn reset_selects_bank_zero() {
        let (_, banks) = via();
        assert_eq!(banks.rom_bank(), 0);
        assert_eq!(banks.ram_bank(), 0);
    }

    #[test]
    fn rom_bank_write_is_masked_to_three_bits() {
        let (mut via, mut banks) = via();
        via.write(ORB, 0x05, &mut banks);
        assert_eq!(banks.rom_bank(), 5);
        via.write(ORB, 0xFD, &mut banks);
        assert_eq!(banks.rom_bank(), 5);
        assert_eq!(via.read(ORB, &banks), 5);
        // Raw store still holds the full byte.
        assert_eq!(via.registers().get(ORB), 0xFD);
    }

    #[test]
    fn ram_bank_write_is_unmasked() {
        let (mut via, mut banks) = via();
        via.write(ORA, 0xAB, &mut banks);
        assert_eq!(banks.ram_bank(), 0xAB);
        assert_eq!(via.read(ORA, &banks), 0xAB);
    }

    #[test]
    fn port_reads_follow_external_bank_changes() {
        let (mut via, mut banks) = via();
        banks.set_ram_bank(0x20);
        assert_eq!(via.read(ORA, &banks), 0x20);
    }

    #[test]
    fn timer_reads_ignore_written_value() {
        let (mut via, mut banks) = via();
        via.write(T1CL, 0x00, &mut banks);
        let samples: Vec<u8> = (0..64).map(|_| via.read(T1CL, &banks)).collect();
        assert!(samples.iter().any(|&b| b != samples[0]));
    }

    #[test]
    fn seeded_timer_reads_are_reproducible() {
        let banks = BankLatch::default();
        let mut a = SystemVia::new(&IoConfig::seeded(42));
        let mut b = SystemVia::new(&IoConfig::seeded(42));
        for reg in [T1CL, T1CH, T2CL, T2CH] {
            assert_eq!(a.read(reg, &banks), b.read(reg, &banks));
        }
    }

    #[test]
    fn other_registers_are_plain_storage() {
        let (mut via, mut banks) = via();
        for reg in [DDRA, SR, IFR, 0x0F] {
            via.write(reg, 0x5A ^ reg, &mut banks);
            assert_eq!(via.read(reg, &banks), 0x5A ^ reg);
        }
        assert!(!via.irq_active());
    }
}

//! Save/restore of the VIA pair.
//!
//! The pseudo-random source behind the system VIA's timer registers is not
//! part of a snapshot.

use thiserror::Error;

use crate::io::X16Io;
use crate::peripheral_via::PeripheralVia;
use crate::peripherals::{Joystick, MemoryBanks, Ps2Port};
use crate::registers::RegisterFile;

/// Format version written into every snapshot.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[cfg(feature = "serde")]
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Complete emulation state of an [`X16Io`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IoSnapshot {
    pub version: u32,
    pub via1_registers: RegisterFile,
    pub via2: PeripheralVia,
    pub ps2: [Ps2Port; 2],
    pub joystick: Joystick,
    pub rom_bank: u8,
    pub ram_bank: u8,
    pub ticks: u64,
}

#[cfg(feature = "serde")]
impl IoSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<B: MemoryBanks> X16Io<B> {
    #[must_use]
    pub fn snapshot(&self) -> IoSnapshot {
        IoSnapshot {
            version: SNAPSHOT_VERSION,
            via1_registers: self.via1.registers().clone(),
            via2: self.via2.clone(),
            ps2: self.ps2,
            joystick: self.joystick,
            rom_bank: self.banks.rom_bank(),
            ram_bank: self.banks.ram_bank(),
            ticks: self.ticks,
        }
    }

    /// Reinstate a snapshot. Nothing is changed if the version is rejected.
    pub fn restore(&mut self, snapshot: &IoSnapshot) -> Result<(), SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        self.via1.restore_registers(snapshot.via1_registers.clone());
        self.via2 = snapshot.via2.clone();
        self.ps2 = snapshot.ps2;
        self.joystick = snapshot.joystick;
        self.banks.set_rom_bank(snapshot.rom_bank);
        self.banks.set_ram_bank(snapshot.ram_bank);
        self.ticks = snapshot.ticks;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IoConfig;
    use crate::interrupts::{IFR_CA1, IRQ_SUMMARY};
    use crate::io::ViaSelect;
    use crate::peripherals::BankLatch;
    use crate::registers::{DDRA, IER, IFR, ORA, ORB};
    use emu_core::Tickable;

    fn busy_io() -> X16Io {
        let mut io = X16Io::new(&IoConfig::seeded(3), BankLatch::default());
        io.write(ViaSelect::System, ORB, 0x03);
        io.write(ViaSelect::System, ORA, 0x7E);
        io.write(ViaSelect::System, 0x0B, 0x11);
        io.write(ViaSelect::Peripheral, DDRA, 0x28);
        io.write(ViaSelect::Peripheral, IER, IRQ_SUMMARY | IFR_CA1);
        io.tick();
        io.ps2[0].clk_out = false;
        io.tick();
        io
    }

    #[test]
    fn restore_reproduces_register_reads() {
        let mut io = busy_io();
        let snap = io.snapshot();

        let mut other = X16Io::new(&IoConfig::seeded(99), BankLatch::default());
        other.restore(&snap).expect("restore");

        assert_eq!(other.snapshot(), snap);
        assert!(other.irq_active());
        for reg in [ORB, ORA, 0x0B] {
            assert_eq!(
                other.read(ViaSelect::System, reg),
                io.read(ViaSelect::System, reg)
            );
        }
        for reg in [IFR, IER, DDRA, ORA, ORB] {
            assert_eq!(
                other.read(ViaSelect::Peripheral, reg),
                io.read(ViaSelect::Peripheral, reg)
            );
        }
    }

    #[test]
    fn restore_keeps_edge_history() {
        let io = busy_io();
        let snap = io.snapshot();
        let mut other: X16Io = X16Io::default();
        other.restore(&snap).expect("restore");
        let _ = other.read(ViaSelect::Peripheral, ORA);
        // Clock is still low in the restored state: no new edge.
        other.tick();
        assert!(!other.irq_active());
    }

    #[test]
    fn wrong_version_is_rejected_without_side_effects() {
        let mut io = busy_io();
        let before = io.snapshot();
        let mut snap = X16Io::<BankLatch>::default().snapshot();
        snap.version = 7;
        let err = io.restore(&snap).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion {
                found: 7,
                expected: SNAPSHOT_VERSION
            }
        ));
        assert_eq!(io.snapshot(), before);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip() {
        let snap = busy_io().snapshot();
        let json = snap.to_json().expect("encode");
        assert_eq!(IoSnapshot::from_json(&json).expect("decode"), snap);
        assert!(matches!(
            IoSnapshot::from_json("{\"version\":1}"),
            Err(SnapshotError::Json(_))
        ));
    }
}

//! The VIA pair as one machine component.
//!
//! `X16Io` owns both chips and the external line state they drive. The
//! machine's address decoder picks a [`ViaSelect`] and passes the low four
//! address bits as the register number; the CPU's IRQ line follows
//! [`X16Io::irq_active`].

use emu_core::{Observable, Tickable, Value};

use crate::config::IoConfig;
use crate::peripheral_via::PeripheralVia;
use crate::peripherals::{BankLatch, Joystick, MemoryBanks, Ps2Port};
use crate::system_via::SystemVia;

/// Which VIA a register access targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViaSelect {
    /// VIA #1: bank selection.
    System,
    /// VIA #2: PS/2 and joysticks.
    Peripheral,
}

/// Both VIAs plus the lines they are wired to.
pub struct X16Io<B: MemoryBanks = BankLatch> {
    pub via1: SystemVia,
    pub via2: PeripheralVia,
    /// Port 0 is the keyboard, port 1 the mouse.
    pub ps2: [Ps2Port; 2],
    pub joystick: Joystick,
    pub(crate) banks: B,
    pub(crate) ticks: u64,
}

impl<B: MemoryBanks> X16Io<B> {
    /// Build and power on both chips. Bank selectors are reset to 0.
    pub fn new(config: &IoConfig, banks: B) -> Self {
        let mut io = Self {
            via1: SystemVia::new(config),
            via2: PeripheralVia::new(),
            ps2: [Ps2Port::idle(); 2],
            joystick: Joystick::default(),
            banks,
            ticks: 0,
        };
        io.via1.reset(&mut io.banks);
        io.via2.reset(&mut io.ps2);
        io
    }

    pub fn read(&mut self, via: ViaSelect, reg: u8) -> u8 {
        match via {
            ViaSelect::System => self.via1.read(reg, &self.banks),
            ViaSelect::Peripheral => self.via2.read(reg),
        }
    }

    pub fn write(&mut self, via: ViaSelect, reg: u8, value: u8) {
        match via {
            ViaSelect::System => self.via1.write(reg, value, &mut self.banks),
            ViaSelect::Peripheral => self.via2.write(reg, value),
        }
    }

    /// Level of the shared (active-high) IRQ output.
    #[must_use]
    pub fn irq_active(&self) -> bool {
        self.via1.irq_active() || self.via2.irq_active()
    }

    #[must_use]
    pub fn banks(&self) -> &B {
        &self.banks
    }

    pub fn banks_mut(&mut self) -> &mut B {
        &mut self.banks
    }

    /// Ticks since power-on.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for X16Io<BankLatch> {
    fn default() -> Self {
        Self::new(&IoConfig::default(), BankLatch::default())
    }
}

impl<B: MemoryBanks> Tickable for X16Io<B> {
    fn tick(&mut self) {
        self.via1.step();
        self.via2.step(&mut self.ps2, &mut self.joystick);
        self.ticks += 1;
    }
}

impl<B: MemoryBanks> Observable for X16Io<B> {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("via1.") {
            match rest {
                "rom_bank" => Some(self.banks.rom_bank().into()),
                "ram_bank" => Some(self.banks.ram_bank().into()),
                "registers" => Some(Value::from(&self.via1.registers().as_bytes()[..])),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("via2.") {
            self.via2.query(rest)
        } else if let Some(rest) = path.strip_prefix("ps2.") {
            let (index, line) = rest.split_once('.')?;
            let port = self.ps2.get(index.parse::<usize>().ok()?)?;
            match line {
                "clk_in" => Some(port.clk_in.into()),
                "clk_out" => Some(port.clk_out.into()),
                "data_in" => Some(port.data_in.into()),
                "data_out" => Some(port.data_out.into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("joy.") {
            match rest {
                "latch" => Some(self.joystick.latch.into()),
                "clock" => Some(self.joystick.clock.into()),
                "data1" => Some(self.joystick.data[0].into()),
                "data2" => Some(self.joystick.data[1].into()),
                _ => None,
            }
        } else {
            match path {
                "irq" => Some(self.irq_active().into()),
                "ticks" => Some(self.ticks.into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "via1.rom_bank",
            "via1.ram_bank",
            "via1.registers",
            "via2.<peripheral_via_paths>",
            "ps2.<n>.clk_in",
            "ps2.<n>.clk_out",
            "ps2.<n>.data_in",
            "ps2.<n>.data_out",
            "joy.latch",
            "joy.clock",
            "joy.data1",
            "joy.data2",
            "irq",
            "ticks",
        ]
    }
}

//! VIA #2: PS/2 keyboard and mouse, NES joysticks.
//!
//! | Line | Use                              |
//! |------|----------------------------------|
//! | PA0  | PS/2 port 0 (keyboard) data      |
//! | PA1  | PS/2 port 0 clock                |
//! | PA2  | LCD backlight (unconnected)      |
//! | PA3  | Joystick latch (both joysticks)  |
//! | PA4  | Joystick 1 data                  |
//! | PA5  | Joystick clock (both joysticks)  |
//! | PA6  | Joystick 2 data                  |
//! | PA7  | Unconnected                      |
//! | PB0  | PS/2 port 1 (mouse) data         |
//! | PB1  | PS/2 port 1 clock                |
//! | CA1  | PS/2 port 0 clock, falling edge  |
//! | CB1  | PS/2 port 1 clock, falling edge  |
//!
//! Every port line is open-collector, so the VIA and the peripheral jointly
//! decide each level. See [`crate::pins`].

use emu_core::{Observable, Value};
use log::{debug, trace};

use crate::interrupts::{EdgeDetector, IFR_CA1, IFR_CB1, InterruptController};
use crate::peripherals::{Joystick, Ps2Port};
use crate::pins::{self, PortPins};
use crate::registers::{self, DDRA, DDRB, IER, IFR, ORA, ORB, RegisterFile};

const PA_PS2_DATA: u8 = 0;
const PA_PS2_CLK: u8 = 1;
const PA_JOY_LATCH: u8 = 3;
const PA_JOY1_DATA: u8 = 4;
const PA_JOY_CLK: u8 = 5;
const PA_JOY2_DATA: u8 = 6;
/// PA2, PA3, PA5, PA7: nothing external pulls these.
const PA_PASSIVE: u8 = 0b1010_1100;

const PB_PS2_DATA: u8 = 0;
const PB_PS2_CLK: u8 = 1;
/// PB2-PB7 are unconnected.
const PB_PASSIVE: u8 = 0b1111_1100;

fn line(level: bool, bit: u8) -> u8 {
    u8::from(level) << bit
}

/// VIA #2: the peripheral bus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeripheralVia {
    registers: RegisterFile,
    interrupts: InterruptController,
    /// Port A data direction (1 = output).
    ddr_a: u8,
    /// Port B data direction (1 = output).
    ddr_b: u8,
    /// Port A output latch.
    out_a: u8,
    /// Port B output latch.
    out_b: u8,
    pins_a: PortPins,
    pins_b: PortPins,
    /// Keyboard clock history.
    ca1: EdgeDetector,
    /// Mouse clock history.
    cb1: EdgeDetector,
}

impl PeripheralVia {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Power-on: interrupts disabled, both ports input, PS/2 inputs released.
    ///
    /// Pending flags and output latches are left alone.
    pub fn reset(&mut self, ports: &mut [Ps2Port; 2]) {
        self.interrupts.write_enable(0x7F);
        self.ddr_a = 0;
        self.ddr_b = 0;
        for port in ports.iter_mut() {
            port.clk_in = true;
            port.data_in = true;
        }
    }

    /// True when an enabled flag is pending. Drives the CPU IRQ line.
    #[must_use]
    pub fn irq_active(&self) -> bool {
        self.interrupts.irq_active()
    }

    pub fn read(&mut self, reg: u8) -> u8 {
        match registers::select(reg) {
            ORB => {
                self.acknowledge(IFR_CB1);
                self.pins_b.readback
            }
            ORA => {
                self.acknowledge(IFR_CA1);
                self.pins_a.readback
            }
            DDRB => self.ddr_b,
            DDRA => self.ddr_a,
            IFR => self.interrupts.read_flags(),
            IER => self.interrupts.read_enable(),
            other => self.registers.get(other),
        }
    }

    pub fn write(&mut self, reg: u8, value: u8) {
        self.registers.set(reg, value);
        match registers::select(reg) {
            ORB => {
                self.out_b = value;
                self.acknowledge(IFR_CB1);
            }
            ORA => {
                self.out_a = value;
                self.acknowledge(IFR_CA1);
            }
            DDRB => self.ddr_b = value,
            DDRA => self.ddr_a = value,
            // IFR is read-only here.
            IFR => {}
            IER => self.interrupts.write_enable(value),
            _ => {}
        }
    }

    /// Advance one tick: resolve both ports against the peripherals, drive
    /// the results back out, then latch falling edges on CA1/CB1.
    pub fn step(&mut self, ports: &mut [Ps2Port; 2], joystick: &mut Joystick) {
        let [keyboard, mouse] = ports;

        let pa_in = line(keyboard.data_out, PA_PS2_DATA)
            | line(keyboard.clk_out, PA_PS2_CLK)
            | line(joystick.data[0], PA_JOY1_DATA)
            | line(joystick.data[1], PA_JOY2_DATA)
            | PA_PASSIVE;
        self.pins_a = pins::resolve(pa_in, self.out_a, self.ddr_a);

        keyboard.data_in = self.pins_a.pin(PA_PS2_DATA);
        keyboard.clk_in = self.pins_a.pin(PA_PS2_CLK);
        joystick.latch = self.pins_a.pin(PA_JOY_LATCH);
        joystick.clock = self.pins_a.pin(PA_JOY_CLK);

        let pb_in =
            line(mouse.data_out, PB_PS2_DATA) | line(mouse.clk_out, PB_PS2_CLK) | PB_PASSIVE;
        self.pins_b = pins::resolve(pb_in, self.out_b, self.ddr_b);

        mouse.data_in = self.pins_b.pin(PB_PS2_DATA);
        mouse.clk_in = self.pins_b.pin(PB_PS2_CLK);

        let ca1 = keyboard.clk_out;
        if ca1 != self.ca1.previous() && !keyboard.clk_in {
            trace!(
                "keyboard clock moved {} -> {} while the VIA holds it low",
                u8::from(self.ca1.previous()),
                u8::from(ca1)
            );
        }
        if self.ca1.falling(ca1) {
            self.raise(IFR_CA1);
        }
        if self.cb1.falling(mouse.clk_out) {
            self.raise(IFR_CB1);
        }
    }

    fn raise(&mut self, mask: u8) {
        if self.interrupts.flags() & mask == 0 {
            debug!("VIA2 IRQ source {} raised", source_name(mask));
        }
        self.interrupts.raise(mask);
    }

    fn acknowledge(&mut self, mask: u8) {
        if self.interrupts.flags() & mask != 0 {
            debug!("VIA2 IRQ source {} cleared", source_name(mask));
        }
        self.interrupts.acknowledge(mask);
    }

    /// Raw IFR (no summary bit).
    #[must_use]
    pub fn ifr(&self) -> u8 {
        self.interrupts.flags()
    }

    #[must_use]
    pub fn ier(&self) -> u8 {
        self.interrupts.enable()
    }

    #[must_use]
    pub fn ddr_a(&self) -> u8 {
        self.ddr_a
    }

    #[must_use]
    pub fn ddr_b(&self) -> u8 {
        self.ddr_b
    }

    /// Port A state as resolved on the last `step`.
    #[must_use]
    pub fn port_a(&self) -> PortPins {
        self.pins_a
    }

    /// Port B state as resolved on the last `step`.
    #[must_use]
    pub fn port_b(&self) -> PortPins {
        self.pins_b
    }

    #[must_use]
    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }
}

fn source_name(mask: u8) -> &'static str {
    match mask {
        IFR_CA1 => "CA1 (keyboard)",
        IFR_CB1 => "CB1 (mouse)",
        _ => "?",
    }
}

impl Observable for PeripheralVia {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("pa.") {
            pins_field(self.pins_a, rest)
        } else if let Some(rest) = path.strip_prefix("pb.") {
            pins_field(self.pins_b, rest)
        } else {
            match path {
                "ifr" => Some(self.ifr().into()),
                "ier" => Some(self.ier().into()),
                "ora" => Some(self.out_a.into()),
                "orb" => Some(self.out_b.into()),
                "ddra" => Some(self.ddr_a.into()),
                "ddrb" => Some(self.ddr_b.into()),
                "ca1_prev" => Some(self.ca1.previous().into()),
                "cb1_prev" => Some(self.cb1.previous().into()),
                "irq" => Some(self.irq_active().into()),
                "registers" => Some(Value::from(&self.registers.as_bytes()[..])),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "ifr",
            "ier",
            "ora",
            "orb",
            "ddra",
            "ddrb",
            "pa.driving",
            "pa.pinstate",
            "pa.readback",
            "pb.driving",
            "pb.pinstate",
            "pb.readback",
            "ca1_prev",
            "cb1_prev",
            "irq",
            "registers",
        ]
    }
}

fn pins_field(pins: PortPins, field: &str) -> Option<Value> {
    match field {
        "driving" => Some(pins.driving.into()),
        "pinstate" => Some(pins.pinstate.into()),
        "readback" => Some(pins.readback.into()),
        _ => None,
    }
}

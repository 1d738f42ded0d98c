//! PS/2 traffic through the peripheral VIA, serviced one interrupt per bit.

use emu_core::Tickable;
use x16_via::interrupts::{IFR_CA1, IFR_CB1, IRQ_SUMMARY};
use x16_via::ps2::{FRAME_BITS, FrameDecoder, Ps2Transmitter};
use x16_via::registers::{DDRA, IER, ORA, ORB};
use x16_via::{BankLatch, IoConfig, ViaSelect, X16Io};

struct Harness {
    io: X16Io,
    device: Ps2Transmitter,
    decoder: FrameDecoder,
    port: usize,
    interrupts: usize,
    received: Vec<u8>,
}

impl Harness {
    fn new(port: usize) -> Self {
        let mut io = X16Io::new(&IoConfig::seeded(1), BankLatch::default());
        let source = if port == 0 { IFR_CA1 } else { IFR_CB1 };
        io.write(ViaSelect::Peripheral, IER, IRQ_SUMMARY | source);
        Self {
            io,
            device: Ps2Transmitter::new(4),
            decoder: FrameDecoder::new(),
            port,
            interrupts: 0,
            received: Vec::new(),
        }
    }

    fn tick(&mut self) {
        self.device.tick(&mut self.io.ps2[self.port]);
        self.io.tick();
        if self.io.irq_active() {
            self.interrupts += 1;
            let reg = if self.port == 0 { ORA } else { ORB };
            let value = self.io.read(ViaSelect::Peripheral, reg);
            if let Some(Ok(byte)) = self.decoder.push(value & 0x01 != 0) {
                self.received.push(byte);
            }
            assert!(!self.io.irq_active(), "port read must acknowledge");
        }
    }

    fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }
}

#[test]
fn keyboard_bytes_arrive_one_interrupt_per_bit() {
    let mut h = Harness::new(0);
    let bytes = [0x1C, 0xF0, 0x1C, 0x00, 0xFF];
    for b in bytes {
        h.device.send(b);
    }
    h.run(1_000);
    assert_eq!(h.received, bytes);
    assert_eq!(h.interrupts, bytes.len() * usize::from(FRAME_BITS));
    assert!(h.device.is_idle());
}

#[test]
fn mouse_bytes_arrive_on_cb1() {
    let mut h = Harness::new(1);
    for b in [0x08, 0x01, 0xFF] {
        h.device.send(b);
    }
    h.run(1_000);
    assert_eq!(h.received, [0x08, 0x01, 0xFF]);
}

#[test]
fn inhibited_keyboard_holds_its_bytes() {
    let mut h = Harness::new(0);
    h.io.write(ViaSelect::Peripheral, DDRA, 0x02);
    h.io.write(ViaSelect::Peripheral, ORA, 0x00);
    h.io.tick();
    h.device.send(0x5A);
    h.run(500);
    assert!(h.received.is_empty());
    assert_eq!(h.interrupts, 0);

    h.io.write(ViaSelect::Peripheral, DDRA, 0x00);
    h.io.tick();
    h.run(500);
    assert_eq!(h.received, [0x5A]);
}

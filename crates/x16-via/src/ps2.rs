//! PS/2 framing on top of a [`Ps2Port`].
//!
//! A PS/2 device sends 11-bit frames: start (0), eight data bits LSB first,
//! odd parity, stop (1). The device sets the data line while the clock is
//! high; the host samples it on the falling clock edge. On the X16 that edge
//! is CA1/CB1, so each bit costs the host one interrupt.
//!
//! [`Ps2Transmitter`] is a minimal device model that clocks bytes out of a
//! port. [`FrameDecoder`] is the host side: feed it one data bit per
//! interrupt and it hands back bytes.

use std::collections::VecDeque;

use log::warn;
use thiserror::Error;

use crate::peripherals::Ps2Port;

/// Bits in one frame.
pub const FRAME_BITS: u8 = 11;

/// Default clock half-period in VIA ticks.
pub const DEFAULT_HALF_PERIOD: u32 = 20;

/// Pack a byte into an 11-bit frame, bit 0 first on the wire.
#[must_use]
pub fn frame(byte: u8) -> u16 {
    let parity = u16::from(byte.count_ones() % 2 == 0);
    (u16::from(byte) << 1) | (parity << 9) | (1 << 10)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing to send, or the host is inhibiting the clock.
    Idle,
    /// Data line holds bit `bit`; clock is high.
    ClockHigh { bit: u8 },
    /// Clock is low; the host samples now.
    ClockLow { bit: u8 },
}

/// Device-side PS/2 transmitter (keyboard or mouse).
pub struct Ps2Transmitter {
    state: State,
    queue: VecDeque<u8>,
    frame: u16,
    half_period: u32,
    timer: u32,
}

impl Ps2Transmitter {
    /// `half_period` is the number of ticks the clock spends high and low.
    #[must_use]
    pub fn new(half_period: u32) -> Self {
        Self {
            state: State::Idle,
            queue: VecDeque::new(),
            frame: 0,
            half_period: half_period.max(1),
            timer: 0,
        }
    }

    /// Queue a byte for transmission.
    pub fn send(&mut self, byte: u8) {
        self.queue.push_back(byte);
    }

    /// True when the queue is empty and no frame is in flight.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == State::Idle && self.queue.is_empty()
    }

    /// Drive the port's `*_out` lines for one tick.
    ///
    /// A new frame starts only while the host leaves the clock released
    /// (`clk_in` high). Pulling the clock low is how the host inhibits the
    /// device.
    pub fn tick(&mut self, port: &mut Ps2Port) {
        match self.state {
            State::Idle => {
                port.clk_out = true;
                port.data_out = true;
                if !port.clk_in {
                    return;
                }
                if let Some(byte) = self.queue.pop_front() {
                    self.frame = frame(byte);
                    self.timer = 0;
                    self.state = State::ClockHigh { bit: 0 };
                    port.data_out = self.bit(0);
                }
            }
            State::ClockHigh { bit } => {
                self.timer += 1;
                if self.timer >= self.half_period {
                    self.timer = 0;
                    port.clk_out = false;
                    self.state = State::ClockLow { bit };
                }
            }
            State::ClockLow { bit } => {
                self.timer += 1;
                if self.timer >= self.half_period {
                    self.timer = 0;
                    port.clk_out = true;
                    let next = bit + 1;
                    if next == FRAME_BITS {
                        port.data_out = true;
                        self.state = State::Idle;
                    } else {
                        port.data_out = self.bit(next);
                        self.state = State::ClockHigh { bit: next };
                    }
                }
            }
        }
    }

    fn bit(&self, index: u8) -> bool {
        self.frame & (1 << index) != 0
    }
}

impl Default for Ps2Transmitter {
    fn default() -> Self {
        Self::new(DEFAULT_HALF_PERIOD)
    }
}

/// A received frame that failed its framing checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("start bit was 1")]
    Start,
    #[error("parity mismatch on byte ${0:02X}")]
    Parity(u8),
    #[error("stop bit was 0 after byte ${0:02X}")]
    Stop(u8),
}

/// Host-side frame assembler.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder {
    shift: u16,
    count: u8,
}

impl FrameDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self { shift: 0, count: 0 }
    }

    /// Shift in one sampled data bit. Returns a result once 11 bits are in.
    pub fn push(&mut self, bit: bool) -> Option<Result<u8, FrameError>> {
        self.shift |= u16::from(bit) << self.count;
        self.count += 1;
        if self.count < FRAME_BITS {
            return None;
        }
        let raw = self.shift;
        *self = Self::new();

        let byte = (raw >> 1) as u8;
        let result = if raw & 1 != 0 {
            Err(FrameError::Start)
        } else if raw & (1 << 10) == 0 {
            Err(FrameError::Stop(byte))
        } else if frame(byte) != raw {
            Err(FrameError::Parity(byte))
        } else {
            Ok(byte)
        };
        if let Err(err) = &result {
            warn!("dropped PS/2 frame {raw:#05X}: {err}");
        }
        Some(result)
    }

    /// Bits received of the current frame.
    #[must_use]
    pub fn pending_bits(&self) -> u8 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_layout() {
        // 0x1C has three ones, so parity is 0.
        assert_eq!(frame(0x1C), 0b1_0_0001_1100_0);
        // 0x00 has no ones, so parity is 1.
        assert_eq!(frame(0x00), 0b1_1_0000_0000_0);
    }

    #[test]
    fn decoder_rejects_bad_parity() {
        let mut dec = FrameDecoder::new();
        let raw = frame(0x5A) ^ (1 << 9);
        let mut out = None;
        for i in 0..FRAME_BITS {
            out = dec.push(raw & (1 << i) != 0);
        }
        assert_eq!(out, Some(Err(FrameError::Parity(0x5A))));
        assert_eq!(dec.pending_bits(), 0);
    }

    #[test]
    fn decoder_rejects_missing_start_and_stop() {
        let mut dec = FrameDecoder::new();
        let mut out = None;
        for _ in 0..FRAME_BITS {
            out = dec.push(true);
        }
        assert_eq!(out, Some(Err(FrameError::Start)));

        let raw = frame(0x12) & !(1 << 10);
        for i in 0..FRAME_BITS {
            out = dec.push(raw & (1 << i) != 0);
        }
        assert_eq!(out, Some(Err(FrameError::Stop(0x12))));
    }

    #[test]
    fn transmitter_waits_while_host_inhibits() {
        let mut port = Ps2Port::idle();
        port.clk_in = false;
        let mut tx = Ps2Transmitter::new(2);
        tx.send(0xAA);
        for _ in 0..10 {
            tx.tick(&mut port);
        }
        assert!(port.clk_out);
        assert!(!tx.is_idle());

        port.clk_in = true;
        tx.tick(&mut port);
        assert!(!port.data_out, "start bit");
    }

    #[test]
    fn transmitter_clocks_every_bit_on_falling_edges() {
        let mut port = Ps2Port::idle();
        let mut tx = Ps2Transmitter::new(3);
        let mut dec = FrameDecoder::new();
        tx.send(0xF0);

        let mut prev_clk = port.clk_out;
        let mut edges = 0;
        let mut got = None;
        for _ in 0..200 {
            tx.tick(&mut port);
            if prev_clk && !port.clk_out {
                edges += 1;
                if let Some(r) = dec.push(port.data_out) {
                    got = Some(r);
                }
            }
            prev_clk = port.clk_out;
        }
        assert_eq!(edges, 11);
        assert_eq!(got, Some(Ok(0xF0)));
        assert!(tx.is_idle());
    }
}

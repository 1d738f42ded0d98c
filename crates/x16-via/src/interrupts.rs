//! Interrupt flag/enable registers and falling-edge detection.

/// CA2 control line.
pub const IFR_CA2: u8 = 0x01;
/// CA1 control line (PS/2 port 0 clock).
pub const IFR_CA1: u8 = 0x02;
/// Shift register.
pub const IFR_SR: u8 = 0x04;
/// CB2 control line.
pub const IFR_CB2: u8 = 0x08;
/// CB1 control line (PS/2 port 1 clock).
pub const IFR_CB1: u8 = 0x10;
/// Timer 2.
pub const IFR_T2: u8 = 0x20;
/// Timer 1.
pub const IFR_T1: u8 = 0x40;

/// Summary bit reported on IFR reads; set/clear selector on IER writes.
pub const IRQ_SUMMARY: u8 = 0x80;

const SOURCES: u8 = 0x7F;

/// IFR/IER pair driving a shared active-high IRQ output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterruptController {
    ifr: u8,
    ier: u8,
}

impl InterruptController {
    #[must_use]
    pub const fn new() -> Self {
        Self { ifr: 0, ier: 0 }
    }

    /// Latch the given source flags.
    pub fn raise(&mut self, mask: u8) {
        self.ifr |= mask & SOURCES;
    }

    /// Clear the given source flags.
    pub fn acknowledge(&mut self, mask: u8) {
        self.ifr &= !mask;
    }

    /// CPU view of IFR: bit 7 set whenever any flag is pending.
    #[must_use]
    pub fn read_flags(&self) -> u8 {
        if self.ifr != 0 {
            self.ifr | IRQ_SUMMARY
        } else {
            0
        }
    }

    /// CPU view of IER.
    #[must_use]
    pub fn read_enable(&self) -> u8 {
        self.ier
    }

    /// IER write. Bit 7 set enables the sources in bits 0-6, clear disables
    /// them. Bit 7 itself is not stored.
    pub fn write_enable(&mut self, value: u8) {
        if value & IRQ_SUMMARY != 0 {
            self.ier |= value & SOURCES;
        } else {
            self.ier &= !(value & SOURCES);
        }
    }

    /// True when any enabled source is pending.
    #[must_use]
    pub fn irq_active(&self) -> bool {
        self.ifr & self.ier != 0
    }

    #[must_use]
    pub fn flags(&self) -> u8 {
        self.ifr
    }

    #[must_use]
    pub fn enable(&self) -> u8 {
        self.ier
    }
}

/// Remembers the previous level of a control line to spot high-to-low edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeDetector {
    previous: bool,
}

impl EdgeDetector {
    /// Starts with the line considered low.
    #[must_use]
    pub const fn new() -> Self {
        Self { previous: false }
    }

    /// Sample the line. Returns true on a falling edge.
    pub fn falling(&mut self, level: bool) -> bool {
        let fell = self.previous && !level;
        self.previous = level;
        fell
    }

    #[must_use]
    pub fn previous(&self) -> bool {
        self.previous
    }
}

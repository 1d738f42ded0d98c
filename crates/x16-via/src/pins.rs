//! Open-collector pin resolution.
//!
//! Each port is eight independent open-collector lines. Either side may pull
//! a line low; a line is high only when both the VIA and the peripheral leave
//! it passive (wired-AND). Levels are active-low: a 0 output bit pulls.

/// Resolved state of one 8-bit port for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortPins {
    /// What the VIA puts on each line (0 = pulled low, 1 = passive).
    pub driving: u8,
    /// Electrical level of each line after arbitration.
    pub pinstate: u8,
    /// What a CPU read of the port register returns.
    pub readback: u8,
}

impl PortPins {
    /// Level of a single line.
    #[must_use]
    pub const fn pin(self, bit: u8) -> bool {
        self.pinstate & (1 << bit) != 0
    }
}

/// Resolve a port from the peripheral's levels, the VIA's output latch and
/// the direction register.
///
/// Input-configured bits never pull. Output-configured bits pull only when
/// their latch bit is 0. Output bits read back the VIA's own level, input bits
/// read back the bus.
#[must_use]
pub const fn resolve(input: u8, output: u8, ddr: u8) -> PortPins {
    let driving = (ddr & output) | !ddr;
    let pinstate = !(!input | !driving);
    let readback = (ddr & driving) | (!ddr & pinstate);
    PortPins {
        driving,
        pinstate,
        readback,
    }
}

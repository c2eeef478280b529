//! Baud rate divider selection

use crate::regs::reg::CFG1_MBR_MAX;

/// Pick the CFG1_MBR exponent for a bit clock of at most `rate` Hz
///
/// The bit clock is `pclk >> (div + 1)`. Returns the smallest `div` whose
/// bit clock does not exceed `rate`, saturating at 7 (pclk / 256) when no
/// divider is slow enough.
pub fn clock_divider(pclk: u32, rate: u32) -> u8 {
    let mut div = 0;
    while (pclk >> (div + 1)) > rate && div < CFG1_MBR_MAX {
        div += 1;
    }
    div
}

/// Bit clock produced by `div` from `pclk`
///
/// `div` is clamped to the 3-bit field range.
pub fn bit_rate(pclk: u32, div: u8) -> u32 {
    pclk >> (div.min(CFG1_MBR_MAX) + 1)
}

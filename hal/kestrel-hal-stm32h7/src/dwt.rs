//! Monotonic timer on the Cortex-M7 cycle counter

use cortex_m::peripheral::{DCB, DWT};
use kestrel_hal::Monotonic;

/// [`Monotonic`] backed by the DWT cycle counter
///
/// One tick per core clock cycle; wraps after 2^32 cycles (about 8.9 s at
/// 480 MHz), well beyond any settle delay.
pub struct DwtMonotonic {
    ticks_per_us: u32,
}

impl DwtMonotonic {
    /// Start the cycle counter for a core running at `sysclk_hz`
    pub fn new(dcb: &mut DCB, dwt: &mut DWT, sysclk_hz: u32) -> Self {
        dcb.enable_trace();
        dwt.enable_cycle_counter();
        Self::from_frequency(sysclk_hz)
    }

    /// Use an already running cycle counter
    pub fn from_frequency(sysclk_hz: u32) -> Self {
        Self {
            ticks_per_us: sysclk_hz.div_ceil(1_000_000).max(1),
        }
    }
}

impl Monotonic for DwtMonotonic {
    fn now(&self) -> u32 {
        DWT::cycle_count()
    }

    fn ticks_from_us(&self, us: u32) -> u32 {
        us.wrapping_mul(self.ticks_per_us)
    }
}

//! Monotonic timer abstraction
//!
//! A free-running 32-bit tick counter. Comparisons are wraparound-safe as
//! long as the two instants are less than 2^31 ticks apart.

/// Free-running monotonic tick counter
pub trait Monotonic {
    /// Current tick count
    fn now(&self) -> u32;

    /// Number of ticks in `us` microseconds
    fn ticks_from_us(&self, us: u32) -> u32;

    /// Wraparound-safe `a < b`
    fn is_before(&self, a: u32, b: u32) -> bool {
        (a.wrapping_sub(b) as i32) < 0
    }

    /// Spin until at least `us` microseconds have elapsed
    fn delay_us(&self, us: u32) {
        let end = self.now().wrapping_add(self.ticks_from_us(us));
        while self.is_before(self.now(), end) {}
    }
}

//! Peripheral clock abstractions
//!
//! Provides the clock gating and frequency services a peripheral driver
//! needs before it can program baud-rate dividers.

/// Peripheral clock gate and frequency service
///
/// `P` identifies a peripheral instance; chip HALs use their own
/// peripheral enum. The gate state is process-wide.
pub trait PeripheralClocks<P> {
    /// Check whether the peripheral's clock gate is open
    fn is_enabled(&self, peripheral: P) -> bool;

    /// Open the peripheral's clock gate
    fn enable(&mut self, peripheral: P);

    /// Kernel clock frequency feeding the peripheral, in Hz
    fn frequency(&self, peripheral: P) -> u32;
}

//! STM32H7 SPI master driver
//!
//! Blocking, byte-oriented SPI master for the STM32H7 SPI peripheral
//! (the FIFO-based block with TSIZE/CSTART/EOT). Buses are selected by
//! a small integer id into [`bus::BUSES`], whose entries depend on the
//! chip features enabled:
//!
//! - `stm32h743` - SPI1-SPI6 and port I pins (default)
//! - `stm32h723` - SPI1-SPI6, no port I
//! - `spi3`, `spi4`, `spi5`, `spi6`, `gpioi` - individual variants
//! - `defmt` - Enable debug formatting and logging
//!
//! # Usage
//!
//! ```ignore
//! let mut spi = SpiMaster::new(unsafe { Mmio::new() }, pins, clocks, timer, shutdown);
//! let config = spi.configure(bus, Mode::Mode3, 4_000_000);
//! spi.load(config);
//! spi.transfer(config, true, &mut buf);
//! ```
//!
//! Clock gating, pin routing and the fatal error path come from the
//! `kestrel-hal` traits; [`dwt::DwtMonotonic`] supplies the timer on
//! target.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod bus_handle;
pub mod divider;
pub mod dwt;
pub mod master;
pub mod regs;

#[cfg(test)]
mod sim;

pub use bus::{find_bus, BusDescriptor, Peripheral, BUSES};
pub use bus_handle::SpiBusHandle;
pub use master::{SpiConfig, SpiMaster, MAX_FIFO};
pub use regs::{Mmio, RegisterBank, SpiRegisters};

// Re-export shared types from kestrel-hal
pub use kestrel_hal::Mode;

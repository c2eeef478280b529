//! Kestrel Hardware Abstraction Layer
//!
//! This crate defines the services a chip-specific SPI master driver
//! consumes from the rest of the firmware. The driver itself never touches
//! GPIO, clock or timer hardware directly; it goes through these traits so
//! the same driver code runs against real hardware or host-side mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (sensor drivers, etc.)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kestrel-hal-stm32h7 (SPI master)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  kestrel-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::PinMux`] - Alternate-function pin routing
//! - [`clock::PeripheralClocks`] - Clock gating and frequency queries
//! - [`timer::Monotonic`] - Free-running tick counter
//! - [`shutdown::Shutdown`] - Fatal error sink

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod shutdown;
pub mod spi;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use clock::PeripheralClocks;
pub use gpio::{Pin, PinMux, PinParseError};
pub use shutdown::Shutdown;
pub use spi::{InvalidMode, Mode, Phase, Polarity};
pub use timer::Monotonic;

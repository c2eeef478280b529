//! SPI bus table
//!
//! Each entry pairs an SPI instance with one set of pins it can be routed
//! to. Which entries exist depends on the chip variant, selected through
//! Cargo features; bus ids are the dense indices of the resulting table.

use kestrel_hal::Pin;

/// SPI peripheral instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    Spi1,
    Spi2,
    Spi3,
    Spi4,
    Spi5,
    Spi6,
}

impl Peripheral {
    /// Number of SPI instances on the family
    pub const COUNT: usize = 6;

    /// Every instance, in index order
    pub const ALL: [Peripheral; Self::COUNT] = [
        Peripheral::Spi1,
        Peripheral::Spi2,
        Peripheral::Spi3,
        Peripheral::Spi4,
        Peripheral::Spi5,
        Peripheral::Spi6,
    ];

    /// Zero-based instance index (`Spi1` = 0)
    pub fn index(self) -> usize {
        match self {
            Peripheral::Spi1 => 0,
            Peripheral::Spi2 => 1,
            Peripheral::Spi3 => 2,
            Peripheral::Spi4 => 3,
            Peripheral::Spi5 => 4,
            Peripheral::Spi6 => 5,
        }
    }

    /// Register block base address
    pub fn base_address(self) -> usize {
        match self {
            Peripheral::Spi1 => 0x4001_3000,
            Peripheral::Spi2 => 0x4000_3800,
            Peripheral::Spi3 => 0x4000_3C00,
            Peripheral::Spi4 => 0x4001_3400,
            Peripheral::Spi5 => 0x4001_5000,
            Peripheral::Spi6 => 0x5800_1400,
        }
    }
}

/// One physical SPI wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusDescriptor {
    /// Bus name as used in configuration files (`"spi1a"`)
    pub name: &'static str,
    /// SPI instance driving the bus
    pub peripheral: Peripheral,
    pub miso: Pin,
    pub mosi: Pin,
    pub sck: Pin,
    /// GPIO alternate function number routing the pins to `peripheral`
    pub function: u8,
}

const fn bus(
    name: &'static str,
    peripheral: Peripheral,
    miso: Pin,
    mosi: Pin,
    sck: Pin,
    function: u8,
) -> BusDescriptor {
    BusDescriptor {
        name,
        peripheral,
        miso,
        mosi,
        sck,
        function,
    }
}

const fn pin(port: char, number: u8) -> Pin {
    Pin::new(port, number)
}

/// Buses available on the selected chip, indexed by bus id
pub static BUSES: &[BusDescriptor] = &[
    bus("spi2", Peripheral::Spi2, pin('B', 14), pin('B', 15), pin('B', 13), 5),
    bus("spi1", Peripheral::Spi1, pin('A', 6), pin('A', 7), pin('A', 5), 5),
    bus("spi1a", Peripheral::Spi1, pin('B', 4), pin('B', 5), pin('B', 3), 5),
    bus("spi2a", Peripheral::Spi2, pin('C', 2), pin('C', 3), pin('B', 10), 5),
    #[cfg(feature = "spi3")]
    bus("spi3a", Peripheral::Spi3, pin('C', 11), pin('C', 12), pin('C', 10), 6),
    #[cfg(feature = "spi4")]
    bus("spi4", Peripheral::Spi4, pin('E', 13), pin('E', 14), pin('E', 12), 5),
    #[cfg(feature = "gpioi")]
    bus("spi2b", Peripheral::Spi2, pin('I', 2), pin('I', 3), pin('I', 1), 5),
    #[cfg(feature = "spi5")]
    bus("spi5", Peripheral::Spi5, pin('F', 8), pin('F', 9), pin('F', 7), 5),
    #[cfg(feature = "spi5")]
    bus("spi5a", Peripheral::Spi5, pin('H', 7), pin('F', 11), pin('H', 6), 5),
    #[cfg(feature = "spi6")]
    bus("spi6", Peripheral::Spi6, pin('G', 12), pin('G', 14), pin('G', 13), 5),
];

/// Look up a bus id by name
pub fn find_bus(name: &str) -> Option<u32> {
    BUSES
        .iter()
        .position(|b| b.name.eq_ignore_ascii_case(name))
        .map(|id| id as u32)
}

/// MISO, MOSI and SCK pins of a bus
pub fn bus_pins(bus: u32) -> Option<[Pin; 3]> {
    BUSES
        .get(bus as usize)
        .map(|b| [b.miso, b.mosi, b.sck])
}

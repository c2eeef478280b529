//! SPI register access
//!
//! The driver only needs a handful of register fields. They are exposed
//! through [`SpiRegisters`] so the transfer logic can run against the real
//! peripheral ([`Mmio`]) or a simulated one in tests.

use crate::bus::Peripheral;

/// Register bit definitions (RM0433 SPI/I2S chapter)
pub mod reg {
    /// CR1: serial peripheral enable
    pub const CR1_SPE: u32 = 1 << 0;
    /// CR1: master transfer start
    pub const CR1_CSTART: u32 = 1 << 9;
    /// CR1: internal slave select level
    pub const CR1_SSI: u32 = 1 << 12;

    /// CR2: number of data frames in the transfer
    pub const CR2_TSIZE_POS: u32 = 0;
    /// Largest value the TSIZE field holds
    pub const CR2_TSIZE_MAX: usize = 0xFFFF;

    /// CFG1: frame size minus one
    pub const CFG1_DSIZE_POS: u32 = 0;
    /// CFG1: master baud rate divider exponent
    pub const CFG1_MBR_POS: u32 = 28;
    /// CFG1_MBR is three bits wide
    pub const CFG1_MBR_MAX: u8 = 7;

    /// CFG2: master mode
    pub const CFG2_MASTER: u32 = 1 << 22;
    /// CFG2: clock phase
    pub const CFG2_CPHA_POS: u32 = 24;
    /// CFG2: clock polarity
    pub const CFG2_CPOL: u32 = 1 << 25;
    /// CFG2: software slave management
    pub const CFG2_SSM: u32 = 1 << 26;
    /// CFG2: slave select output enable
    pub const CFG2_SSOE: u32 = 1 << 29;
    /// CFG2: keep alternate-function pins driven while disabled
    pub const CFG2_AFCNTR: u32 = 1 << 31;

    /// SR: RX FIFO holds data
    pub const SR_RXP: u32 = 1 << 0;
    /// SR: TX FIFO has room
    pub const SR_TXP: u32 = 1 << 1;
    /// SR: end of transfer
    pub const SR_EOT: u32 = 1 << 3;

    /// IFCR: clear every flag
    pub const IFCR_ALL: u32 = 0xFFFF_FFFF;
}

/// Field-level access to one SPI instance
///
/// Methods take `&self`: the registers are hardware state, not Rust-owned
/// memory, and the driver is the only thread of control touching them.
pub trait SpiRegisters {
    /// Write CR1 (enable, start, internal slave select)
    fn write_cr1(&self, value: u32);

    /// Write CR2 (transfer size)
    fn write_cr2(&self, value: u32);

    /// Write CFG1 (frame size, baud divider)
    fn write_cfg1(&self, value: u32);

    /// Read CFG2 (mode, master, slave select management)
    fn read_cfg2(&self) -> u32;

    /// Write CFG2
    fn write_cfg2(&self, value: u32);

    /// Read the status register
    fn read_sr(&self) -> u32;

    /// Write the interrupt/status flag clear register
    fn write_ifcr(&self, value: u32);

    /// Push one byte into the TX FIFO (8-bit access)
    fn write_txdr(&self, byte: u8);

    /// Pop one byte from the RX FIFO (8-bit access)
    fn read_rxdr(&self) -> u8;
}

/// Maps each SPI instance to its register block
pub trait RegisterBank {
    /// Register block type
    type Regs: SpiRegisters;

    /// Registers of `peripheral`
    fn regs(&self, peripheral: Peripheral) -> &Self::Regs;
}

const CR1: usize = 0x00;
const CR2: usize = 0x04;
const CFG1: usize = 0x08;
const CFG2: usize = 0x0C;
const SR: usize = 0x14;
const IFCR: usize = 0x18;
const TXDR: usize = 0x20;
const RXDR: usize = 0x30;

/// Memory-mapped SPI register block at a fixed base address
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MmioRegs {
    base: usize,
}

impl MmioRegs {
    fn read(&self, offset: usize) -> u32 {
        // SAFETY: `base` is one of the SPI base addresses from
        // `Peripheral::base_address`, offsets are inside the block.
        unsafe { core::ptr::read_volatile((self.base + offset) as *const u32) }
    }

    fn write(&self, offset: usize, value: u32) {
        // SAFETY: see `read`.
        unsafe { core::ptr::write_volatile((self.base + offset) as *mut u32, value) }
    }
}

impl SpiRegisters for MmioRegs {
    fn write_cr1(&self, value: u32) {
        self.write(CR1, value);
    }

    fn write_cr2(&self, value: u32) {
        self.write(CR2, value);
    }

    fn write_cfg1(&self, value: u32) {
        self.write(CFG1, value);
    }

    fn read_cfg2(&self) -> u32 {
        self.read(CFG2)
    }

    fn write_cfg2(&self, value: u32) {
        self.write(CFG2, value);
    }

    fn read_sr(&self) -> u32 {
        self.read(SR)
    }

    fn write_ifcr(&self, value: u32) {
        self.write(IFCR, value);
    }

    fn write_txdr(&self, byte: u8) {
        // A byte-wide store packs exactly one frame into the FIFO
        // SAFETY: see `MmioRegs::read`.
        unsafe { core::ptr::write_volatile((self.base + TXDR) as *mut u8, byte) }
    }

    fn read_rxdr(&self) -> u8 {
        // SAFETY: see `MmioRegs::read`.
        unsafe { core::ptr::read_volatile((self.base + RXDR) as *const u8) }
    }
}

/// The STM32H7 SPI instances at their datasheet addresses
pub struct Mmio {
    blocks: [MmioRegs; Peripheral::COUNT],
}

impl Mmio {
    /// Take the memory-mapped SPI register blocks
    ///
    /// # Safety
    ///
    /// Must only be called on an STM32H7 target, at most once, and nothing
    /// else may access the SPI registers afterwards.
    pub unsafe fn new() -> Self {
        Self {
            blocks: Peripheral::ALL.map(|p| MmioRegs {
                base: p.base_address(),
            }),
        }
    }
}

impl RegisterBank for Mmio {
    type Regs = MmioRegs;

    fn regs(&self, peripheral: Peripheral) -> &MmioRegs {
        &self.blocks[peripheral.index()]
    }
}

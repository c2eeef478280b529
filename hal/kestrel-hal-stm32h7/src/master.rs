//! Blocking SPI master
//!
//! [`SpiMaster::configure`] resolves a bus id to an [`SpiConfig`], enabling
//! the peripheral on first use. [`SpiMaster::load`] programs frame size,
//! divider and mode. [`SpiMaster::transfer`] exchanges a buffer in place.
//!
//! Transfers busy-wait on status flags with no timeout. A bus that never
//! completes a frame hangs the caller; the peripheral offers no error flag
//! that would distinguish a missing device.

use core::cell::Cell;

use heapless::Vec;
use kestrel_hal::{Mode, Monotonic, PeripheralClocks, PinMux, Shutdown};

use crate::bus::{Peripheral, BUSES};
use crate::divider::clock_divider;
use crate::regs::reg::*;
use crate::regs::{RegisterBank, SpiRegisters};

/// Bytes allowed in flight ahead of the receive cursor
///
/// Keeps the TX FIFO from running far enough ahead to overrun the RX FIFO.
pub const MAX_FIFO: usize = 8;

/// Settle time after a clock polarity change
const CPOL_SETTLE_US: u32 = 1;

/// Divider and mode chosen for one bus
///
/// Cheap to copy; pass it to every [`SpiMaster::load`] and
/// [`SpiMaster::transfer`] on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    peripheral: Peripheral,
    div: u8,
    mode: Mode,
}

impl SpiConfig {
    /// SPI instance the config applies to
    pub fn peripheral(&self) -> Peripheral {
        self.peripheral
    }

    /// Baud rate divider exponent (0-7)
    pub fn div(&self) -> u8 {
        self.div
    }

    /// Clock polarity and phase
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// CFG1 value: 8-bit frames at this config's divider
    pub fn cfg1(&self) -> u32 {
        ((self.div as u32) << CFG1_MBR_POS) | (7 << CFG1_DSIZE_POS)
    }

    /// CFG2 value: master with software slave management in this mode
    pub fn cfg2(&self) -> u32 {
        ((self.mode.bits() as u32) << CFG2_CPHA_POS)
            | CFG2_MASTER
            | CFG2_SSM
            | CFG2_AFCNTR
            | CFG2_SSOE
    }
}

/// SPI master driver for every bus in [`BUSES`]
///
/// Owns the services it depends on and tracks which SPI instances it has
/// already clocked and routed.
pub struct SpiMaster<B, M, C, T, S> {
    bank: B,
    pins: M,
    clocks: C,
    timer: T,
    shutdown: S,
    enabled: Vec<Peripheral, { Peripheral::COUNT }>,
    loaded: [Cell<Option<SpiConfig>>; Peripheral::COUNT],
}

impl<B, M, C, T, S> SpiMaster<B, M, C, T, S>
where
    B: RegisterBank,
    M: PinMux,
    C: PeripheralClocks<Peripheral>,
    T: Monotonic,
    S: Shutdown,
{
    /// Create a driver; no hardware is touched until [`Self::configure`]
    pub fn new(bank: B, pins: M, clocks: C, timer: T, shutdown: S) -> Self {
        Self {
            bank,
            pins,
            clocks,
            timer,
            shutdown,
            enabled: Vec::new(),
            loaded: Default::default(),
        }
    }

    /// Resolve `bus` into a config running at no more than `rate` Hz
    ///
    /// The first call for an SPI instance opens its clock gate and routes
    /// the bus pins, unless the clock was already running. A rate below
    /// what the slowest divider reaches silently yields divider 7.
    ///
    /// An unknown bus id halts the firmware through [`Shutdown::halt`].
    pub fn configure(&mut self, bus: u32, mode: Mode, rate: u32) -> SpiConfig {
        let Some(desc) = BUSES.get(bus as usize) else {
            #[cfg(feature = "defmt")]
            defmt::error!("spi: bus {} out of range ({} buses)", bus, BUSES.len());
            self.shutdown.halt("Invalid spi bus");
        };

        let peripheral = desc.peripheral;
        if !self.enabled.contains(&peripheral) {
            if !self.clocks.is_enabled(peripheral) {
                self.clocks.enable(peripheral);
                self.pins.set_function(desc.miso, desc.function, true);
                self.pins.set_function(desc.mosi, desc.function, false);
                self.pins.set_function(desc.sck, desc.function, false);
                #[cfg(feature = "defmt")]
                defmt::debug!("spi: enabled {} on {}", peripheral, desc.name);
            }
            // Capacity covers every instance, so this cannot fail
            let _ = self.enabled.push(peripheral);
        }

        let pclk = self.clocks.frequency(peripheral);
        let div = clock_divider(pclk, rate);
        #[cfg(feature = "defmt")]
        defmt::debug!("spi: {} rate {} pclk {} div {}", desc.name, rate, pclk, div);

        SpiConfig {
            peripheral,
            div,
            mode,
        }
    }

    /// Program frame size, divider and mode
    ///
    /// Safe to repeat. When the clock polarity changes this waits at least
    /// 1 µs before returning so the idle level settles.
    pub fn load(&self, config: SpiConfig) {
        let regs = self.bank.regs(config.peripheral);

        regs.write_cfg1(config.cfg1());

        let cfg2 = config.cfg2();
        let diff = regs.read_cfg2() ^ cfg2;
        regs.write_cfg2(cfg2);
        if diff & CFG2_CPOL != 0 {
            self.timer.delay_us(CPOL_SETTLE_US);
        }

        self.loaded[config.peripheral.index()].set(Some(config));
    }

    /// [`Self::load`] unless `config` is already loaded on its instance
    pub fn load_if_changed(&self, config: SpiConfig) {
        if self.loaded[config.peripheral.index()].get() != Some(config) {
            self.load(config);
        }
    }

    /// Exchange `data` in place
    ///
    /// Every byte of `data` is sent. When `receive_data` is set, each byte
    /// is replaced by the byte received in its slot, otherwise received
    /// bytes are dropped and `data` is left untouched. Blocks until all
    /// bytes have been received and the peripheral reports end of transfer.
    ///
    /// `data` must not exceed 65535 bytes. An empty buffer returns without
    /// touching the peripheral.
    pub fn transfer(&self, config: SpiConfig, receive_data: bool, data: &mut [u8]) {
        let len = data.len();
        if len == 0 {
            return;
        }
        debug_assert!(len <= CR2_TSIZE_MAX);

        let regs = self.bank.regs(config.peripheral);

        regs.write_cr2((len as u32) << CR2_TSIZE_POS);
        // Enable and start MUST be separate writes, in this order
        regs.write_cr1(CR1_SSI | CR1_SPE);
        regs.write_cr1(CR1_SSI | CR1_CSTART | CR1_SPE);

        let mut wpos = 0;
        let mut rpos = 0;
        while rpos < len {
            let sr = regs.read_sr() & (SR_TXP | SR_RXP);
            if sr == SR_TXP && wpos < len && wpos < rpos + MAX_FIFO {
                regs.write_txdr(data[wpos]);
                wpos += 1;
            }
            if sr & SR_RXP == 0 {
                continue;
            }
            let byte = regs.read_rxdr();
            if receive_data {
                data[rpos] = byte;
            }
            rpos += 1;
        }

        while regs.read_sr() & SR_EOT == 0 {}

        // Clear flags and disable
        regs.write_ifcr(IFCR_ALL);
        regs.write_cr1(CR1_SSI);
    }

    /// Register bank the driver operates on
    pub fn bank(&self) -> &B {
        &self.bank
    }

    /// Timer used for settle delays
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Release the owned services
    pub fn free(self) -> (B, M, C, T, S) {
        (self.bank, self.pins, self.clocks, self.timer, self.shutdown)
    }
}

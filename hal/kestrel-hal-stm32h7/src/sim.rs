//! Simulated SPI peripheral and services for host tests
//!
//! `SimRegs` models one SPI instance with MISO looped back to MOSI through
//! a configurable `responder`. It shifts one frame from the 16-byte TX
//! FIFO to the 8-byte RX FIFO every `shift_every` status reads and records
//! overruns, register writes and the largest TX lead seen.

use core::cell::{Cell, RefCell};
use std::vec::Vec;

use heapless::Deque;
use kestrel_hal::{Monotonic, PeripheralClocks, Pin, PinMux, Shutdown};

use crate::bus::Peripheral;
use crate::master::SpiMaster;
use crate::regs::reg::*;
use crate::regs::{RegisterBank, SpiRegisters};

pub type SimMaster = SpiMaster<SimBank, SimPins, SimClocks, SimTimer, SimShutdown>;

/// Control register write, in the order issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Cr1(u32),
    Cr2(u32),
    Ifcr(u32),
}

pub struct SimRegs {
    pub cr1: Cell<u32>,
    pub cr2: Cell<u32>,
    pub cfg1: Cell<u32>,
    pub cfg2: Cell<u32>,
    pub cfg_writes: Cell<u32>,
    pub log: RefCell<Vec<Write>>,
    pub sent: RefCell<Vec<u8>>,
    pub pushed: Cell<usize>,
    pub popped: Cell<usize>,
    pub max_lead: Cell<usize>,
    pub overrun: Cell<bool>,
    pub pushed_with_rx_pending: Cell<bool>,
    pub sr_both_ready: Cell<u32>,
    pub sr_reads: Cell<u32>,
    pub reads_after_done: Cell<u32>,
    pub shift_every: u32,
    pub eot_delay: u32,
    pub responder: fn(u8) -> u8,
    tx: RefCell<Deque<u8, 16>>,
    rx: RefCell<Deque<u8, 8>>,
    shifted: Cell<usize>,
    eot_countdown: Cell<u32>,
}

impl Default for SimRegs {
    fn default() -> Self {
        Self {
            cr1: Cell::new(0),
            cr2: Cell::new(0),
            cfg1: Cell::new(0),
            cfg2: Cell::new(0),
            cfg_writes: Cell::new(0),
            log: RefCell::new(Vec::new()),
            sent: RefCell::new(Vec::new()),
            pushed: Cell::new(0),
            popped: Cell::new(0),
            max_lead: Cell::new(0),
            overrun: Cell::new(false),
            pushed_with_rx_pending: Cell::new(false),
            sr_both_ready: Cell::new(0),
            sr_reads: Cell::new(0),
            reads_after_done: Cell::new(0),
            shift_every: 1,
            eot_delay: 0,
            responder: |b| b,
            tx: RefCell::new(Deque::new()),
            rx: RefCell::new(Deque::new()),
            shifted: Cell::new(0),
            eot_countdown: Cell::new(0),
        }
    }
}

impl SimRegs {
    fn running(&self) -> bool {
        self.cr1.get() & (CR1_SPE | CR1_CSTART) == (CR1_SPE | CR1_CSTART)
    }

    fn tsize(&self) -> usize {
        (self.cr2.get() & 0xFFFF) as usize
    }

    fn shift(&self) {
        let Some(byte) = self.tx.borrow_mut().pop_front() else {
            return;
        };
        if self.rx.borrow_mut().push_back((self.responder)(byte)).is_err() {
            self.overrun.set(true);
        }
        let shifted = self.shifted.get() + 1;
        self.shifted.set(shifted);
        if shifted == self.tsize() {
            self.eot_countdown.set(self.eot_delay);
        }
    }
}

impl SpiRegisters for SimRegs {
    fn write_cr1(&self, value: u32) {
        self.log.borrow_mut().push(Write::Cr1(value));
        self.cr1.set(value);
        if value & CR1_SPE == 0 {
            self.tx.borrow_mut().clear();
            self.rx.borrow_mut().clear();
        } else if value & CR1_CSTART != 0 {
            self.shifted.set(0);
        }
    }

    fn write_cr2(&self, value: u32) {
        self.log.borrow_mut().push(Write::Cr2(value));
        self.cr2.set(value);
    }

    fn write_cfg1(&self, value: u32) {
        self.cfg_writes.set(self.cfg_writes.get() + 1);
        self.cfg1.set(value);
    }

    fn read_cfg2(&self) -> u32 {
        self.cfg2.get()
    }

    fn write_cfg2(&self, value: u32) {
        self.cfg_writes.set(self.cfg_writes.get() + 1);
        self.cfg2.set(value);
    }

    fn read_sr(&self) -> u32 {
        let reads = self.sr_reads.get() + 1;
        self.sr_reads.set(reads);

        let running = self.running();
        if running && self.shifted.get() < self.tsize() && reads % self.shift_every == 0 {
            self.shift();
        }

        let mut sr = 0;
        if !self.tx.borrow().is_full() {
            sr |= SR_TXP;
        }
        if !self.rx.borrow().is_empty() {
            sr |= SR_RXP;
        }
        if sr == SR_TXP | SR_RXP {
            self.sr_both_ready.set(self.sr_both_ready.get() + 1);
        }
        if running && self.shifted.get() == self.tsize() {
            self.reads_after_done.set(self.reads_after_done.get() + 1);
            match self.eot_countdown.get() {
                0 => sr |= SR_EOT,
                n => self.eot_countdown.set(n - 1),
            }
        }
        sr
    }

    fn write_ifcr(&self, value: u32) {
        self.log.borrow_mut().push(Write::Ifcr(value));
    }

    fn write_txdr(&self, byte: u8) {
        if !self.rx.borrow().is_empty() {
            self.pushed_with_rx_pending.set(true);
        }
        if self.tx.borrow_mut().push_back(byte).is_err() {
            self.overrun.set(true);
        }
        self.sent.borrow_mut().push(byte);
        let pushed = self.pushed.get() + 1;
        self.pushed.set(pushed);
        let lead = pushed - self.popped.get();
        if lead > self.max_lead.get() {
            self.max_lead.set(lead);
        }
    }

    fn read_rxdr(&self) -> u8 {
        self.popped.set(self.popped.get() + 1);
        self.rx.borrow_mut().pop_front().unwrap_or(0)
    }
}

#[derive(Default)]
pub struct SimBank {
    regs: [SimRegs; Peripheral::COUNT],
}

impl SimBank {
    pub fn regs_mut(&mut self, peripheral: Peripheral) -> &mut SimRegs {
        &mut self.regs[peripheral.index()]
    }
}

impl RegisterBank for SimBank {
    type Regs = SimRegs;

    fn regs(&self, peripheral: Peripheral) -> &SimRegs {
        &self.regs[peripheral.index()]
    }
}

#[derive(Default)]
pub struct SimPins {
    pub calls: Vec<(Pin, u8, bool)>,
}

impl PinMux for SimPins {
    fn set_function(&mut self, pin: Pin, function: u8, input: bool) {
        self.calls.push((pin, function, input));
    }
}

pub struct SimClocks {
    pub enabled: [bool; Peripheral::COUNT],
    pub enable_calls: u32,
    pub pclk: u32,
}

impl SimClocks {
    pub fn new(pclk: u32) -> Self {
        Self {
            enabled: [false; Peripheral::COUNT],
            enable_calls: 0,
            pclk,
        }
    }
}

impl PeripheralClocks<Peripheral> for SimClocks {
    fn is_enabled(&self, peripheral: Peripheral) -> bool {
        self.enabled[peripheral.index()]
    }

    fn enable(&mut self, peripheral: Peripheral) {
        self.enable_calls += 1;
        self.enabled[peripheral.index()] = true;
    }

    fn frequency(&self, _peripheral: Peripheral) -> u32 {
        self.pclk
    }
}

/// Advances one tick per read, 10 ticks per microsecond
#[derive(Default)]
pub struct SimTimer {
    pub ticks: Cell<u32>,
}

impl SimTimer {
    /// Ticks consumed while running `f`
    pub fn elapsed(&self, f: impl FnOnce()) -> u32 {
        let start = self.ticks.get();
        f();
        self.ticks.get().wrapping_sub(start)
    }
}

impl Monotonic for SimTimer {
    fn now(&self) -> u32 {
        let t = self.ticks.get();
        self.ticks.set(t.wrapping_add(1));
        t
    }

    fn ticks_from_us(&self, us: u32) -> u32 {
        us * 10
    }
}

#[derive(Default)]
pub struct SimShutdown {
    pub calls: Cell<u32>,
}

impl Shutdown for SimShutdown {
    fn halt(&self, reason: &'static str) -> ! {
        self.calls.set(self.calls.get() + 1);
        panic!("{}", reason);
    }
}

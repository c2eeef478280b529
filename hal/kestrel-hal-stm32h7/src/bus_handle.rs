//! `embedded-hal` bus adapter
//!
//! Lets device drivers written against [`embedded_hal::spi::SpiBus`] use a
//! configured bus. The mode and divider are reloaded only when another
//! config was loaded on the same SPI instance in between.

use core::convert::Infallible;

use embedded_hal::spi::{ErrorType, SpiBus};
use kestrel_hal::{Monotonic, PeripheralClocks, PinMux, Shutdown};

use crate::bus::Peripheral;
use crate::master::{SpiConfig, SpiMaster};
use crate::regs::reg::CR2_TSIZE_MAX;
use crate::regs::RegisterBank;

/// Staging buffer for `write`/`transfer`, which take immutable input
const SCRATCH_LEN: usize = 64;

/// One configured bus on an [`SpiMaster`]
pub struct SpiBusHandle<'a, B, M, C, T, S> {
    master: &'a SpiMaster<B, M, C, T, S>,
    config: SpiConfig,
}

impl<B, M, C, T, S> SpiMaster<B, M, C, T, S>
where
    B: RegisterBank,
    M: PinMux,
    C: PeripheralClocks<Peripheral>,
    T: Monotonic,
    S: Shutdown,
{
    /// Bind `config` into an `embedded-hal` bus
    pub fn bus(&self, config: SpiConfig) -> SpiBusHandle<'_, B, M, C, T, S> {
        SpiBusHandle {
            master: self,
            config,
        }
    }
}

impl<B, M, C, T, S> SpiBusHandle<'_, B, M, C, T, S>
where
    B: RegisterBank,
    M: PinMux,
    C: PeripheralClocks<Peripheral>,
    T: Monotonic,
    S: Shutdown,
{
    /// Config this handle transfers with
    pub fn config(&self) -> SpiConfig {
        self.config
    }

    fn exchange(&self, data: &mut [u8], receive_data: bool) {
        self.master.load_if_changed(self.config);
        for chunk in data.chunks_mut(CR2_TSIZE_MAX) {
            self.master.transfer(self.config, receive_data, chunk);
        }
    }
}

impl<B, M, C, T, S> ErrorType for SpiBusHandle<'_, B, M, C, T, S> {
    type Error = Infallible;
}

impl<B, M, C, T, S> SpiBus<u8> for SpiBusHandle<'_, B, M, C, T, S>
where
    B: RegisterBank,
    M: PinMux,
    C: PeripheralClocks<Peripheral>,
    T: Monotonic,
    S: Shutdown,
{
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        self.exchange(words, true);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut scratch = [0u8; SCRATCH_LEN];
        for chunk in words.chunks(SCRATCH_LEN) {
            let buf = &mut scratch[..chunk.len()];
            buf.copy_from_slice(chunk);
            self.exchange(buf, false);
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        let len = read.len().max(write.len());
        let mut scratch = [0u8; SCRATCH_LEN];
        let mut offset = 0;
        while offset < len {
            let n = SCRATCH_LEN.min(len - offset);
            let buf = &mut scratch[..n];
            for (i, byte) in buf.iter_mut().enumerate() {
                *byte = write.get(offset + i).copied().unwrap_or(0);
            }
            let receive_data = offset < read.len();
            self.exchange(buf, receive_data);
            if receive_data {
                let end = read.len().min(offset + n);
                read[offset..end].copy_from_slice(&buf[..end - offset]);
            }
            offset += n;
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.exchange(words, true);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // Every transfer waits for end of transfer before returning
        Ok(())
    }
}

// Licensed under the Apache-2.0 license

//! Command layer for the serial NOR flash holding the boot image.

use crate::flash::hil::FlashStorage;
use crate::spi::{CsWindow, SpiTransport};
use krz_config::MAX_CHUNK_SIZE;
use krz_error::BootError;
use krz_flash_image::FLASH_ADDRESS_LIMIT;
use krz_romtime::{GpioPort, SpiPort};
use num_enum::IntoPrimitive;

#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoPrimitive)]
#[repr(u8)]
pub enum FlashOpcode {
    Read = 0x03,
    ReleasePowerDown = 0xab,
    PowerDown = 0xb9,
}

/// A byte address in the 24-bit space reachable by the read command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FlashAddress(u32);

impl FlashAddress {
    pub fn new(address: u32) -> Result<Self, BootError> {
        if address >= FLASH_ADDRESS_LIMIT {
            return Err(BootError::FlashAddressOutOfRange);
        }
        Ok(FlashAddress(address))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Address bytes as they go on the wire, most significant first.
    pub fn to_be_bytes(self) -> [u8; 3] {
        let [_, hi, mid, lo] = self.0.to_be_bytes();
        [hi, mid, lo]
    }
}

const IDLE: [u8; MAX_CHUNK_SIZE] = [0; MAX_CHUNK_SIZE];

pub struct SpiFlash<'a, G: GpioPort, S: SpiPort> {
    spi: SpiTransport<'a, G, S>,
}

impl<'a, G: GpioPort, S: SpiPort> SpiFlash<'a, G, S> {
    pub fn new(spi: SpiTransport<'a, G, S>) -> Self {
        SpiFlash { spi }
    }

    pub fn transport_mut(&mut self) -> &mut SpiTransport<'a, G, S> {
        &mut self.spi
    }

    /// Releases the device from deep power-down. Must precede any read.
    pub fn wake(&mut self) -> Result<(), BootError> {
        self.command(FlashOpcode::ReleasePowerDown)
    }

    pub fn power_down(&mut self) -> Result<(), BootError> {
        self.command(FlashOpcode::PowerDown)
    }

    /// Reads `buf.len()` bytes starting at `address` in a single chip select window.
    pub fn read_at(&mut self, address: FlashAddress, buf: &mut [u8]) -> Result<(), BootError> {
        let end = address.get() as u64 + buf.len() as u64;
        if end > FLASH_ADDRESS_LIMIT as u64 {
            return Err(BootError::FlashAddressOutOfRange);
        }

        let piece_size = self.spi.fifo_depth().min(MAX_CHUNK_SIZE);
        if piece_size == 0 {
            return Err(BootError::TransferTooLong);
        }

        let [a2, a1, a0] = address.to_be_bytes();
        let frame = [FlashOpcode::Read.into(), a2, a1, a0];
        let mut echo = [0u8; 4];
        let window = if buf.is_empty() {
            CsWindow::SINGLE
        } else {
            CsWindow::BEGIN
        };
        self.spi.transfer(&frame, &mut echo, window)?;

        let pieces = buf.len().div_ceil(piece_size);
        for (i, piece) in buf.chunks_mut(piece_size).enumerate() {
            let window = if i + 1 == pieces {
                CsWindow::END
            } else {
                CsWindow::CONTINUE
            };
            self.spi.transfer(&IDLE[..piece.len()], piece, window)?;
        }
        Ok(())
    }

    fn command(&mut self, opcode: FlashOpcode) -> Result<(), BootError> {
        let mut echo = [0u8; 1];
        self.spi.transfer(&[opcode.into()], &mut echo, CsWindow::SINGLE)
    }
}

impl<G: GpioPort, S: SpiPort> FlashStorage for SpiFlash<'_, G, S> {
    fn read(&mut self, buffer: &mut [u8], address: u32) -> Result<(), BootError> {
        self.read_at(FlashAddress::new(address)?, buffer)
    }

    fn capacity(&self) -> u32 {
        FLASH_ADDRESS_LIMIT
    }
}

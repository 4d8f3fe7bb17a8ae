// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "riscv32", no_std)]

use krz_error::BootError;

/// Largest chunk the streaming copier moves per flash read. Sizes the ROM's scratch
/// buffer, so `BootConfig::chunk_size` can never exceed it.
pub const MAX_CHUNK_SIZE: usize = 128;

/// Default RAM region the image is copied to and launched from.
pub const RAM_BASE_ADDR: u32 = 0x0001_0000;

/// Max program size is 128KB
pub const MAX_PROG_SIZE: u32 = 128 * 1024;

/// GPIO pin assignments on the KRZ board.
pub const GPIO_LEDR: u32 = 0;
pub const GPIO_LEDG: u32 = 1;
pub const GPIO_FLASH_CS: u32 = 2;

/// Configures the memory map for the KRZ SoC.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KrzMemoryMap {
    pub gpreg_offset: u32,
    pub uart_offset: u32,
    pub spim_offset: u32,
    pub ram_offset: u32,
    pub ram_size: u32,
}

impl Default for KrzMemoryMap {
    fn default() -> Self {
        KrzMemoryMap {
            gpreg_offset: 0x0080_0000,
            uart_offset: 0x0080_0100,
            spim_offset: 0x0080_0200,
            ram_offset: RAM_BASE_ADDR,
            ram_size: MAX_PROG_SIZE,
        }
    }
}

/// How chatty the ROM is on the UART.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagLevel {
    Off = 0,
    /// Program size, outcome and errors
    #[default]
    Summary = 1,
    /// Everything above plus an address/data dump per chunk
    Verbose = 2,
}

/// Boot parameters. The firmware uses `Default`; the host tools override fields from
/// the command line.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootConfig {
    pub ram_base: u32,
    pub max_prog_size: u32,
    pub chunk_size: usize,
    pub spi_fifo_depth: usize,
    /// Status polls before a transfer is declared dead
    pub spi_poll_limit: u32,
    /// Status polls per byte before UART output is dropped
    pub uart_poll_limit: u32,
    pub uart_fifo_depth: u32,
    /// Flash offset used when the boot vector register reads zero
    pub default_boot_vector: u32,
    pub diagnostics: DiagLevel,
}

impl Default for BootConfig {
    fn default() -> Self {
        BootConfig {
            ram_base: RAM_BASE_ADDR,
            max_prog_size: MAX_PROG_SIZE,
            chunk_size: MAX_CHUNK_SIZE,
            spi_fifo_depth: 128,
            spi_poll_limit: 0x10_0000,
            uart_poll_limit: 0x1_0000,
            uart_fifo_depth: 128,
            default_boot_vector: 0,
            diagnostics: DiagLevel::Summary,
        }
    }
}

impl BootConfig {
    /// Rejects configurations the transport or the copier cannot honor.
    pub fn check(&self) -> Result<(), BootError> {
        if self.spi_fifo_depth == 0 || self.spi_poll_limit == 0 {
            return Err(BootError::InvalidConfig);
        }
        if self.chunk_size == 0
            || self.chunk_size > MAX_CHUNK_SIZE
            || self.chunk_size > self.spi_fifo_depth
        {
            return Err(BootError::InvalidConfig);
        }
        if self.max_prog_size == 0 || self.max_prog_size & 0x3 != 0 {
            return Err(BootError::InvalidConfig);
        }
        if self.ram_base.checked_add(self.max_prog_size).is_none() {
            return Err(BootError::InvalidConfig);
        }
        Ok(())
    }
}

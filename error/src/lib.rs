/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Fatal error codes reported by the KRZ boot ROM.

--*/

#![cfg_attr(target_arch = "riscv32", no_std)]

use core::fmt;

/// Every failure the boot ROM can hit. All of them are terminal: the ROM powers the
/// flash down and parks with the code below.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootError {
    /// Image header reports a zero length
    ImageEmpty = 0xb007_0001,
    /// Image header reports more bytes than the destination RAM region holds
    ImageTooLarge = 0xb007_0002,
    /// Image length is not a whole number of 32-bit words
    ImageMisaligned = 0xb007_0003,
    /// SPI master never reported the expected number of received bytes
    TransportTimeout = 0xb007_0101,
    /// A single transfer was larger than the SPI master queues
    TransferTooLong = 0xb007_0102,
    /// Boot vector or image tail does not fit the 24-bit flash address space
    FlashAddressOutOfRange = 0xb007_0201,
    /// A chunk would land outside of the destination RAM region
    DestinationOverflow = 0xb007_0202,
    /// Boot configuration cannot be used (chunk size, queue depth, poll bound)
    InvalidConfig = 0xb007_0301,
}

impl BootError {
    pub const fn code(self) -> u32 {
        self as u32
    }
}

impl From<BootError> for u32 {
    fn from(err: BootError) -> u32 {
        err.code()
    }
}

impl fmt::Display for BootError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            BootError::ImageEmpty => "image is empty",
            BootError::ImageTooLarge => "image is too large",
            BootError::ImageMisaligned => "image is not word-aligned",
            BootError::TransportTimeout => "spi transfer timed out",
            BootError::TransferTooLong => "spi transfer exceeds queue depth",
            BootError::FlashAddressOutOfRange => "flash address out of range",
            BootError::DestinationOverflow => "destination overflows ram region",
            BootError::InvalidConfig => "invalid boot configuration",
        };
        f.write_str(msg)
    }
}

// Licensed under the Apache-2.0 license
#![no_std]

//! On-flash layout of a bootable KRZ image: a little-endian length word followed by
//! the raw program bytes that get copied verbatim to RAM.

use krz_error::BootError;
use zerocopy::{byteorder::LittleEndian, byteorder::U32, FromBytes, Immutable, IntoBytes};
use zerocopy::{KnownLayout, Unaligned};

pub const IMAGE_HEADER_SIZE: u32 = core::mem::size_of::<ImageHeader>() as u32;

/// Flash commands carry 24-bit addresses.
pub const FLASH_ADDRESS_LIMIT: u32 = 1 << 24;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct ImageHeader {
    pub length: U32<LittleEndian>,
}

impl ImageHeader {
    pub fn new(length: u32) -> Self {
        ImageHeader {
            length: U32::new(length),
        }
    }

    pub fn length(&self) -> u32 {
        self.length.get()
    }

    /// Checks the header against a destination region of `max_size` bytes.
    pub fn verify(&self, max_size: u32) -> Result<(), BootError> {
        validate(self.length(), max_size)
    }
}

/// Length rules every image must satisfy before a single byte is copied.
pub fn validate(length: u32, max_size: u32) -> Result<(), BootError> {
    if length == 0 {
        return Err(BootError::ImageEmpty);
    }
    if length > max_size {
        return Err(BootError::ImageTooLarge);
    }
    if length & 0x3 != 0 {
        return Err(BootError::ImageMisaligned);
    }
    Ok(())
}

/// Returns the flash offset of the first program byte for an image whose header sits
/// at `boot_vector`, after checking that header and payload both fit the 24-bit
/// address space.
pub fn payload_span(boot_vector: u32, length: u32) -> Result<u32, BootError> {
    let start = boot_vector
        .checked_add(IMAGE_HEADER_SIZE)
        .ok_or(BootError::FlashAddressOutOfRange)?;
    let end = start
        .checked_add(length)
        .ok_or(BootError::FlashAddressOutOfRange)?;
    if end > FLASH_ADDRESS_LIMIT {
        return Err(BootError::FlashAddressOutOfRange);
    }
    Ok(start)
}

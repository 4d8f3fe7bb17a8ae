// Licensed under the Apache-2.0 license

//! Generic interface for flash storage access.

use krz_error::BootError;

/// Read-only view of a flash device. The ROM never programs or erases flash, so that
/// is all a driver has to provide.
pub trait FlashStorage {
    /// Read from the flash storage, filling the provided buffer with data
    fn read(&mut self, buffer: &mut [u8], address: u32) -> Result<(), BootError>;

    /// Returns the size of the addressable flash in bytes.
    fn capacity(&self) -> u32;
}

// Licensed under the Apache-2.0 license

use crate::flash::hil::FlashStorage;
use krz_error::BootError;

/// A bounded window into the underlying flash.
///
/// Reads are relative to `base_offset` and rejected with
/// [`BootError::FlashAddressOutOfRange`] when they would leave the window, before the
/// driver is touched.
pub struct FlashPartition<'a, F: FlashStorage> {
    driver: &'a mut F,
    base_offset: u32,
    length: u32,
}

impl<'a, F: FlashStorage> FlashPartition<'a, F> {
    /// Fails if the window does not fit inside the device.
    pub fn new(
        driver: &'a mut F,
        base_offset: u32,
        length: u32,
    ) -> Result<Self, BootError> {
        let end = base_offset
            .checked_add(length)
            .ok_or(BootError::FlashAddressOutOfRange)?;
        if end > driver.capacity() {
            return Err(BootError::FlashAddressOutOfRange);
        }
        Ok(FlashPartition {
            driver,
            base_offset,
            length,
        })
    }

    pub fn read(&mut self, partition_offset: u32, buf: &mut [u8]) -> Result<(), BootError> {
        let end = partition_offset
            .checked_add(buf.len() as u32)
            .ok_or(BootError::FlashAddressOutOfRange)?;
        if end > self.length {
            return Err(BootError::FlashAddressOutOfRange);
        }
        self.driver.read(buf, self.base_offset + partition_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MemFlash {
        data: Vec<u8>,
        reads: Vec<(u32, usize)>,
    }

    impl FlashStorage for MemFlash {
        fn read(&mut self, buffer: &mut [u8], address: u32) -> Result<(), BootError> {
            self.reads.push((address, buffer.len()));
            let start = address as usize;
            buffer.copy_from_slice(&self.data[start..start + buffer.len()]);
            Ok(())
        }

        fn capacity(&self) -> u32 {
            self.data.len() as u32
        }
    }

    fn mem_flash() -> MemFlash {
        MemFlash {
            data: (0..=255u8).collect(),
            reads: vec![],
        }
    }

    #[test]
    fn test_partition_must_fit_device() {
        let mut flash = mem_flash();
        assert!(FlashPartition::new(&mut flash, 0x80, 0x80).is_ok());
        assert_eq!(
            FlashPartition::new(&mut flash, 0x80, 0x81).err(),
            Some(BootError::FlashAddressOutOfRange)
        );
        assert_eq!(
            FlashPartition::new(&mut flash, u32::MAX, 2).err(),
            Some(BootError::FlashAddressOutOfRange)
        );
    }

    #[test]
    fn test_partition_reads_are_relative_and_bounded() {
        let mut flash = mem_flash();
        {
            let mut partition = FlashPartition::new(&mut flash, 0x10, 0x20).unwrap();
            let mut buf = [0u8; 4];
            partition.read(0x1c, &mut buf).unwrap();
            assert_eq!(buf, [0x2c, 0x2d, 0x2e, 0x2f]);

            assert_eq!(
                partition.read(0x1d, &mut buf),
                Err(BootError::FlashAddressOutOfRange)
            );
        }
        // The rejected read never reached the driver.
        assert_eq!(flash.reads, vec![(0x2c, 4)]);
    }
}

// Licensed under the Apache-2.0 license

//! Fetches the image header, validates it and streams the program into RAM.

use crate::flash::{FlashPartition, FlashStorage};
use krz_config::{BootConfig, MAX_CHUNK_SIZE};
use krz_error::BootError;
use krz_flash_image::{payload_span, ImageHeader, IMAGE_HEADER_SIZE};
use zerocopy::{FromZeros, IntoBytes};

/// The RAM the image is copied into and launched from.
pub struct RamRegion<'a> {
    base: u32,
    mem: &'a mut [u8],
}

impl<'a> RamRegion<'a> {
    pub fn new(base: u32, mem: &'a mut [u8]) -> Self {
        RamRegion { base, mem }
    }

    /// # Safety
    ///
    /// `base .. base + size` must be RAM that nothing else references for the
    /// lifetime of the program.
    pub unsafe fn from_raw(base: u32, size: u32) -> RamRegion<'static> {
        RamRegion {
            base,
            mem: core::slice::from_raw_parts_mut(base as *mut u8, size as usize),
        }
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn as_slice(&self) -> &[u8] {
        self.mem
    }

    /// Checks that `len` bytes at absolute address `addr` fall inside the region.
    pub fn check(&self, addr: u32, len: usize) -> Result<usize, BootError> {
        let offset = addr
            .checked_sub(self.base)
            .ok_or(BootError::DestinationOverflow)? as usize;
        match offset.checked_add(len) {
            Some(end) if end <= self.mem.len() => Ok(offset),
            _ => Err(BootError::DestinationOverflow),
        }
    }

    pub fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), BootError> {
        let offset = self.check(addr, data.len())?;
        self.mem[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}

/// Source, destination and bytes still to move for one streaming copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferWindow {
    pub src: u32,
    pub dst: u32,
    pub remaining: u32,
}

impl TransferWindow {
    /// Size of the next chunk, or `None` once the copy is complete.
    pub fn next_chunk(&self, chunk_size: usize) -> Option<usize> {
        match self.remaining {
            0 => None,
            remaining => Some((remaining as usize).min(chunk_size)),
        }
    }

    /// Moves past `len` copied bytes; never steps beyond the end of the window.
    pub fn advance(&mut self, len: usize) {
        let len = (len as u32).min(self.remaining);
        self.src += len;
        self.dst += len;
        self.remaining -= len;
    }
}

/// Sees every chunk right after it lands in RAM.
pub trait CopyObserver {
    fn chunk_copied(&mut self, src: u32, dst: u32, data: &[u8]);
}

impl CopyObserver for () {
    fn chunk_copied(&mut self, _src: u32, _dst: u32, _data: &[u8]) {}
}

pub struct ImageLoader<'a, F: FlashStorage> {
    flash: &'a mut F,
    max_prog_size: u32,
    chunk_size: usize,
}

impl<'a, F: FlashStorage> ImageLoader<'a, F> {
    pub fn new(flash: &'a mut F, config: &BootConfig) -> Self {
        ImageLoader {
            flash,
            max_prog_size: config.max_prog_size,
            chunk_size: config.chunk_size.min(MAX_CHUNK_SIZE),
        }
    }

    /// Flash window holding the header and the largest payload that may follow it.
    fn image_partition(&mut self, boot_addr: u32) -> Result<FlashPartition<'_, F>, BootError> {
        let capacity = self.flash.capacity();
        if boot_addr >= capacity {
            return Err(BootError::FlashAddressOutOfRange);
        }
        let length = IMAGE_HEADER_SIZE
            .saturating_add(self.max_prog_size)
            .min(capacity - boot_addr);
        FlashPartition::new(&mut *self.flash, boot_addr, length)
    }

    pub fn read_length(&mut self, boot_addr: u32) -> Result<u32, BootError> {
        let mut header = ImageHeader::new_zeroed();
        self.image_partition(boot_addr)?
            .read(0, header.as_mut_bytes())?;
        Ok(header.length())
    }

    pub fn validate(&self, length: u32) -> Result<(), BootError> {
        krz_flash_image::validate(length, self.max_prog_size)
    }

    /// Copies `length` payload bytes following the header at `boot_addr` to the
    /// start of `ram`, one chunk per flash read.
    pub fn stream_copy(
        &mut self,
        boot_addr: u32,
        length: u32,
        ram: &mut RamRegion,
        observer: &mut impl CopyObserver,
    ) -> Result<(), BootError> {
        payload_span(boot_addr, length)?;
        let chunk_size = self.chunk_size;
        if chunk_size == 0 {
            return Err(BootError::InvalidConfig);
        }
        let mut window = TransferWindow {
            src: IMAGE_HEADER_SIZE,
            dst: ram.base(),
            remaining: length,
        };
        let mut partition = self.image_partition(boot_addr)?;

        while let Some(chunk) = window.next_chunk(chunk_size) {
            ram.check(window.dst, chunk)?;

            let mut buf = [0u8; MAX_CHUNK_SIZE];
            let data = &mut buf[..chunk];
            partition.read(window.src, data)?;
            ram.write(window.dst, data)?;
            observer.chunk_copied(boot_addr + window.src, window.dst, data);

            window.advance(chunk);
        }
        Ok(())
    }
}

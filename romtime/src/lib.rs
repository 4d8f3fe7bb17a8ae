// Licensed under the Apache-2.0 license

#![cfg_attr(target_arch = "riscv32", no_std)]

mod mmio;
pub use mmio::*;
mod port;
pub use port::*;
mod static_ref;
pub use static_ref::*;

use core::fmt::{Display, Write};
use krz_registers::gpreg::bits::QueueStatus;
use tock_registers::LocalRegisterCopy;

// Helpers to format diagnostics and push them out of the UART.

pub struct HexBytes<'a>(pub &'a [u8]);
impl Display for HexBytes<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // Rust can't prove the indexes are correct in a format macro.
        for &x in self.0.iter() {
            for c in [x >> 4, x & 0xf] {
                if c < 10 {
                    f.write_char((c + b'0') as char)?;
                } else {
                    f.write_char((c - 10 + b'A') as char)?;
                }
            }
        }
        Ok(())
    }
}

pub struct HexWord(pub u32);
impl Display for HexWord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        HexBytes(&self.0.to_be_bytes()).fmt(f)
    }
}

/// `core::fmt::Write` over the UART transmit queue.
///
/// Waits for room in the queue at most `poll_limit` status reads per byte; once that
/// runs out the rest of the output is dropped. Output is best effort and never fails.
pub struct UartWriter<'a, U: UartPort> {
    uart: &'a mut U,
    fifo_depth: u32,
    poll_limit: u32,
    dropped: bool,
}

impl<'a, U: UartPort> UartWriter<'a, U> {
    pub fn new(uart: &'a mut U, fifo_depth: u32, poll_limit: u32) -> Self {
        UartWriter {
            uart,
            fifo_depth,
            poll_limit,
            dropped: false,
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.dropped || !self.wait_for_space() {
                self.dropped = true;
                return;
            }
            self.uart.write_data(b);
        }
    }

    /// True once output had to be discarded.
    pub fn dropped(&self) -> bool {
        self.dropped
    }

    fn wait_for_space(&mut self) -> bool {
        for _ in 0..self.poll_limit {
            let status: LocalRegisterCopy<u32, QueueStatus::Register> =
                LocalRegisterCopy::new(self.uart.status());
            if status.read(QueueStatus::TXQ) < self.fifo_depth {
                return true;
            }
        }
        false
    }
}

impl<U: UartPort> Write for UartWriter<'_, U> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

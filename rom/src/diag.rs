// Licensed under the Apache-2.0 license

use crate::loader::CopyObserver;
use core::fmt::{Debug, Write};
use krz_config::{BootConfig, DiagLevel};
use krz_error::BootError;
use krz_romtime::{HexBytes, HexWord, UartPort, UartWriter};

/// Boot progress lines on the UART, filtered by [`DiagLevel`].
pub struct Diagnostics<'a, U: UartPort> {
    out: UartWriter<'a, U>,
    level: DiagLevel,
}

impl<'a, U: UartPort> Diagnostics<'a, U> {
    pub fn new(uart: &'a mut U, config: &BootConfig) -> Self {
        Diagnostics {
            out: UartWriter::new(uart, config.uart_fifo_depth, config.uart_poll_limit),
            level: config.diagnostics,
        }
    }

    fn enabled(&self, level: DiagLevel) -> bool {
        self.level != DiagLevel::Off && self.level >= level
    }

    pub fn banner(&mut self) {
        if self.enabled(DiagLevel::Summary) {
            let _ = writeln!(self.out, "[krz-rom] KRZ flash boot");
        }
    }

    pub fn transition<S: Debug>(&mut self, from: S, to: S) {
        if self.enabled(DiagLevel::Verbose) {
            let _ = writeln!(self.out, "[krz-rom] {:?} -> {:?}", from, to);
        }
    }

    pub fn boot_vector(&mut self, vector: u32) {
        if self.enabled(DiagLevel::Summary) {
            let _ = writeln!(self.out, "[krz-rom] Boot vector: 0x{}", HexWord(vector));
        }
    }

    pub fn program_size(&mut self, length: u32) {
        if self.enabled(DiagLevel::Summary) {
            let _ = writeln!(self.out, "[krz-rom] Program size: 0x{}", HexWord(length));
        }
    }

    pub fn error(&mut self, err: BootError) {
        if self.enabled(DiagLevel::Summary) {
            let _ = writeln!(
                self.out,
                "[krz-rom] ERROR: {} (0x{})",
                err,
                HexWord(err.code())
            );
        }
    }

    pub fn launch(&mut self, entry: u32) {
        if self.enabled(DiagLevel::Summary) {
            let _ = writeln!(self.out, "[krz-rom] Jumping to 0x{}", HexWord(entry));
        }
    }
}

impl<U: UartPort> CopyObserver for Diagnostics<'_, U> {
    fn chunk_copied(&mut self, src: u32, dst: u32, data: &[u8]) {
        if self.enabled(DiagLevel::Verbose) {
            let _ = writeln!(
                self.out,
                "[krz-rom] 0x{} -> 0x{}: {}",
                HexWord(src),
                HexWord(dst),
                HexBytes(data)
            );
        }
    }
}

/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Flash boot ROM for the KRZ SoC: copies a length-prefixed image from SPI NOR
    flash into RAM and hands back where to jump.

--*/

#![cfg_attr(target_arch = "riscv32", no_std)]

pub mod boot;
pub use boot::{BootOutcome, BootSequencer};
mod diag;
pub use diag::Diagnostics;
pub mod flash;
pub mod loader;
pub use loader::{CopyObserver, ImageLoader, RamRegion, TransferWindow};
pub mod spi;
pub use spi::{CsWindow, SpiTransport};

/// Parks the core forever. `code` is kept live so it can be inspected from a debugger.
#[inline(never)]
pub fn fatal_error(code: u32) -> ! {
    loop {
        core::hint::black_box(code);
        #[cfg(target_arch = "riscv32")]
        unsafe {
            core::arch::asm!("wfi");
        }
    }
}

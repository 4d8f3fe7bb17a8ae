/*++

Licensed under the Apache-2.0 license.

File Name:

    riscv.rs

Abstract:

    RISC-V entry point for the KRZ boot ROM

--*/

use krz_config::{BootConfig, KrzMemoryMap};
use krz_rom::{fatal_error, BootOutcome, BootSequencer, RamRegion};
use krz_romtime::KrzMmio;

core::arch::global_asm!(include_str!("start.s"));

pub fn rom_entry() -> ! {
    let map = KrzMemoryMap::default();
    let config = BootConfig {
        ram_base: map.ram_offset,
        max_prog_size: map.ram_size,
        ..Default::default()
    };

    // Safety: the memory map describes this SoC and the ROM is the only code running.
    let mut port = unsafe { KrzMmio::new(&map) };
    // Safety: the destination region is plain RAM the ROM itself never uses.
    let ram = unsafe { RamRegion::from_raw(config.ram_base, config.max_prog_size) };

    match BootSequencer::new(&mut port, ram, config).run() {
        BootOutcome::Launch(entry) => unsafe {
            // The image was written through the data side; sync the instruction side
            // before running it.
            core::arch::asm!(
                // fence.i, encoded so the base ISA assembler accepts it
                ".insn i 0x0f, 1, x0, x0, 0",
                "jr {0}",
                in(reg) entry,
                options(noreturn)
            );
        },
        BootOutcome::Halt(err) => fatal_error(err.code()),
    }
}

// Licensed under the Apache-2.0 license

use anyhow::{anyhow, bail, Result};
use krz_config::{BootConfig, DiagLevel};
use krz_emulator_periph::{SimPort, SpiFlash};
use krz_flash_image::{ImageHeader, IMAGE_HEADER_SIZE};
use krz_rom::{BootOutcome, BootSequencer, RamRegion};
use std::path::Path;
use zerocopy::FromBytes;

pub(crate) struct BootArgs<'a> {
    pub flash: &'a Path,
    pub boot_vector: u32,
    pub chunk_size: usize,
    pub ram_dump: Option<&'a Path>,
    pub verbose: bool,
}

/// What the ROM left behind: its verdict, the RAM region and the UART transcript.
pub struct EmulatedBoot {
    pub outcome: BootOutcome,
    pub ram: Vec<u8>,
    pub uart: String,
}

pub fn run(flash: Vec<u8>, boot_vector: u32, config: BootConfig) -> EmulatedBoot {
    let mut port = SimPort::new(SpiFlash::new(flash));
    port.set_boot_vector(boot_vector);
    let mut ram = vec![0u8; config.max_prog_size as usize];
    let outcome =
        BootSequencer::new(&mut port, RamRegion::new(config.ram_base, &mut ram), config).run();
    EmulatedBoot {
        outcome,
        ram,
        uart: port.uart_text(),
    }
}

/// Length of the program the ROM copied, taken from the image header.
fn loaded_length(flash: &[u8], boot_vector: u32) -> Option<usize> {
    let start = boot_vector as usize;
    let end = start + IMAGE_HEADER_SIZE as usize;
    let header = ImageHeader::read_from_bytes(flash.get(start..end)?).ok()?;
    Some(header.length() as usize)
}

pub(crate) fn boot(args: &BootArgs) -> Result<()> {
    let flash = std::fs::read(args.flash)
        .map_err(|e| anyhow!("Cannot read file '{}': {}", args.flash.display(), e))?;
    let config = BootConfig {
        chunk_size: args.chunk_size,
        diagnostics: if args.verbose {
            DiagLevel::Verbose
        } else {
            DiagLevel::Summary
        },
        ..Default::default()
    };
    let vector = match args.boot_vector {
        0 => config.default_boot_vector,
        vector => vector,
    };

    let result = run(flash.clone(), args.boot_vector, config);
    match result.outcome {
        BootOutcome::Launch(entry) => {
            println!("Boot succeeded, jumping to {:#010x}", entry);
            if let Some(path) = args.ram_dump {
                let length = loaded_length(&flash, vector)
                    .unwrap_or(result.ram.len())
                    .min(result.ram.len());
                std::fs::write(path, &result.ram[..length])
                    .map_err(|e| anyhow!("Unable to create file {}: {}", path.display(), e))?;
                println!("RAM dump: {} ({} bytes)", path.display(), length);
            }
            Ok(())
        }
        BootOutcome::Halt(err) => bail!(
            "Boot halted: {} (code {:#010x})",
            err,
            u32::from(err)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash_image::build_image;
    use krz_error::BootError;
    use tempfile::TempDir;

    #[test]
    fn test_run_loads_image() {
        let program: Vec<u8> = (0..64u8).collect();
        let flash = build_image(&program, false).unwrap();
        let result = run(flash, 0, BootConfig::default());
        assert_eq!(result.outcome, BootOutcome::Launch(0x1_0000));
        assert_eq!(&result.ram[..64], &program[..]);
        assert!(result.uart.contains("Program size: 0x00000040"));
    }

    #[test]
    fn test_boot_reports_halt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("flash.bin");
        std::fs::write(&path, [3u8, 0, 0, 0, 1, 2, 3]).unwrap();
        let err = boot(&BootArgs {
            flash: &path,
            boot_vector: 0,
            chunk_size: 128,
            ram_dump: None,
            verbose: false,
        })
        .unwrap_err();
        assert!(err.to_string().contains(&BootError::ImageMisaligned.to_string()));
    }

    #[test]
    fn test_boot_dumps_ram() {
        let dir = TempDir::new().unwrap();
        let flash_path = dir.path().join("flash.bin");
        let dump_path = dir.path().join("ram.bin");
        let mut flash = vec![0xff; 0x100];
        flash.extend(build_image(&[0xaa; 12], false).unwrap());
        std::fs::write(&flash_path, &flash).unwrap();

        boot(&BootArgs {
            flash: &flash_path,
            boot_vector: 0x100,
            chunk_size: 8,
            ram_dump: Some(&dump_path),
            verbose: true,
        })
        .unwrap();
        assert_eq!(std::fs::read(&dump_path).unwrap(), vec![0xaa; 12]);
    }
}

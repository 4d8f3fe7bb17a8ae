// Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand};
use clap_num::maybe_hex;
use std::path::PathBuf;

mod emulated_boot;
mod flash_image;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Xtask {
    #[command(subcommand)]
    xtask: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wrap a raw program binary into a bootable flash image
    Image {
        /// Path to the program binary
        #[arg(long, value_name = "BIN")]
        bin: PathBuf,

        /// Output image; defaults to <BIN>.krz.bin
        #[arg(long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Zero-pad the program to a word boundary instead of rejecting it
        #[arg(long, default_value_t = false)]
        pad: bool,
    },
    /// Convert a binary into a memory initialization file, one 32-bit word per line
    Mem {
        /// Path to the binary
        #[arg(long, value_name = "BIN")]
        bin: PathBuf,

        /// Output file; defaults to <BIN>.mem
        #[arg(long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },
    /// Verify an existing flash image
    Verify {
        /// Path to the flash image file
        #[arg(long, value_name = "IMAGE")]
        image: PathBuf,

        /// Offset of the image in the file
        #[arg(long, value_parser=maybe_hex::<u32>, default_value_t = 0)]
        offset: u32,
    },
    /// Run the boot ROM against an emulated flash holding the given contents
    Boot {
        /// Raw flash contents, starting at flash offset 0
        #[arg(long, value_name = "FLASH")]
        flash: PathBuf,

        /// Value of the boot vector register
        #[arg(long, value_parser=maybe_hex::<u32>, default_value_t = 0)]
        boot_vector: u32,

        /// Bytes moved per flash read
        #[arg(long, value_parser=maybe_hex::<usize>, default_value_t = krz_config::MAX_CHUNK_SIZE)]
        chunk_size: usize,

        /// Write the loaded program to this file after a successful boot
        #[arg(long, value_name = "RAM_DUMP")]
        ram_dump: Option<PathBuf>,

        /// Dump every chunk and state transition on the UART
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
}

fn main() {
    let cli = Xtask::parse();
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init();
    let result = match &cli.xtask {
        Commands::Image { bin, output, pad } => {
            flash_image::image_create(bin, output.as_deref(), *pad)
        }
        Commands::Mem { bin, output } => flash_image::mem_create(bin, output.as_deref()),
        Commands::Verify { image, offset } => flash_image::image_verify(image, *offset),
        Commands::Boot {
            flash,
            boot_vector,
            chunk_size,
            ram_dump,
            verbose,
        } => emulated_boot::boot(&emulated_boot::BootArgs {
            flash,
            boot_vector: *boot_vector,
            chunk_size: *chunk_size,
            ram_dump: ram_dump.as_deref(),
            verbose: *verbose,
        }),
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
}

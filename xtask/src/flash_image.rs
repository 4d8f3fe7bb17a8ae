// Licensed under the Apache-2.0 license

use anyhow::{anyhow, bail, Result};
use krz_config::MAX_PROG_SIZE;
use krz_flash_image::{ImageHeader, IMAGE_HEADER_SIZE};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zerocopy::{FromBytes, IntoBytes};

const HEADER_SIZE: usize = IMAGE_HEADER_SIZE as usize;

fn load_file(path: &Path) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut file = File::open(path)
        .map_err(|e| anyhow!("Cannot open file '{}': {}", path.display(), e))?;
    file.read_to_end(&mut buffer)
        .map_err(|e| anyhow!("Cannot read file '{}': {}", path.display(), e))?;
    Ok(buffer)
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    let mut file = File::create(path)
        .map_err(|e| anyhow!("Unable to create file {}: {}", path.display(), e))?;
    file.write_all(data)?;
    Ok(())
}

/// `prog.bin` becomes `prog.<suffix>`.
fn derived_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}.{}", stem, suffix))
}

/// Prepends the length header to `program`.
pub fn build_image(program: &[u8], pad: bool) -> Result<Vec<u8>> {
    let mut program = program.to_vec();
    if program.len() % 4 != 0 {
        if !pad {
            bail!(
                "Program is {} bytes, which is not word-aligned (use --pad)",
                program.len()
            );
        }
        program.resize(program.len().next_multiple_of(4), 0);
    }
    let length = u32::try_from(program.len()).map_err(|_| anyhow!("Program is too large"))?;
    let header = ImageHeader::new(length);
    header
        .verify(MAX_PROG_SIZE)
        .map_err(|e| anyhow!("Invalid program: {} (max program size = {})", e, MAX_PROG_SIZE))?;

    let mut image = Vec::with_capacity(HEADER_SIZE + program.len());
    image.extend_from_slice(header.as_bytes());
    image.extend_from_slice(&program);
    Ok(image)
}

/// One little-endian word per line in upper case hex. A trailing partial word is
/// zero-filled.
pub fn to_mem(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() / 4 * 9 + 9);
    for chunk in data.chunks(4) {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        out.push_str(&format!("{:08X}\n", u32::from_le_bytes(word)));
    }
    out
}

/// Parses the header at `offset` and returns the program it describes.
pub fn verify_image(data: &[u8], offset: usize) -> Result<&[u8]> {
    let image = data
        .get(offset..)
        .ok_or_else(|| anyhow!("Offset {:#x} is past the end of the file", offset))?;
    if image.len() < HEADER_SIZE {
        bail!("Image too small to contain the header.");
    }
    let (header, payload) = ImageHeader::read_from_prefix(image)
        .map_err(|_| anyhow!("Failed to parse header: invalid format or size"))?;
    header
        .verify(MAX_PROG_SIZE)
        .map_err(|e| anyhow!("Invalid header: {}", e))?;
    let length = header.length() as usize;
    if payload.len() < length {
        bail!(
            "Image is truncated: header says {} bytes, file holds {}",
            length,
            payload.len()
        );
    }
    Ok(&payload[..length])
}

pub(crate) fn image_create(bin: &Path, output: Option<&Path>, pad: bool) -> Result<()> {
    let program = load_file(bin)?;
    log::info!("processing {} ({} bytes)", bin.display(), program.len());

    let image = build_image(&program, pad)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| derived_path(bin, "krz.bin"));
    write_file(&output, &image)?;

    let mem = output.with_extension("mem");
    write_file(&mem, to_mem(&image).as_bytes())?;

    println!("Ready to flash: {}", output.display());
    println!("Memory file: {}", mem.display());
    Ok(())
}

pub(crate) fn mem_create(bin: &Path, output: Option<&Path>) -> Result<()> {
    let data = load_file(bin)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| derived_path(bin, "mem"));
    write_file(&output, to_mem(&data).as_bytes())?;
    println!("Memory file: {}", output.display());
    Ok(())
}

pub(crate) fn image_verify(path: &Path, offset: u32) -> Result<()> {
    let data = load_file(path)?;
    let program = verify_image(&data, offset as usize)?;
    println!("Image is valid! Program size: {:#x} bytes", program.len());
    Ok(())
}

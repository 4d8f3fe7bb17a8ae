// Licensed under the Apache-2.0 license

mod test_boot_scenarios;
mod test_failure_paths;
mod test_round_trip;

#[cfg(test)]
mod test {
    use krz_config::BootConfig;
    use krz_emulator_periph::{SimPort, SpiFlash};
    use krz_flash_image::ImageHeader;
    use krz_rom::{BootOutcome, BootSequencer, RamRegion};
    use log::LevelFilter;
    use simple_logger::SimpleLogger;
    use zerocopy::IntoBytes;

    pub fn init_logger() {
        let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
    }

    /// Flash contents with an image header for `length` at `offset`, then `payload`.
    pub fn flash_with_header(offset: usize, length: u32, payload: &[u8]) -> Vec<u8> {
        let mut flash = vec![0xff; offset];
        flash.extend_from_slice(ImageHeader::new(length).as_bytes());
        flash.extend_from_slice(payload);
        flash
    }

    pub fn flash_with_image(offset: usize, payload: &[u8]) -> Vec<u8> {
        flash_with_header(offset, payload.len() as u32, payload)
    }

    pub struct Booted {
        pub outcome: BootOutcome,
        pub port: SimPort,
        pub ram: Vec<u8>,
    }

    pub fn boot_with(flash: Vec<u8>, boot_vector: u32, config: BootConfig) -> Booted {
        init_logger();
        let mut port = SimPort::new(SpiFlash::new(flash));
        port.set_boot_vector(boot_vector);
        // Sentinel fill so untouched RAM is recognizable.
        let mut ram = vec![0xa5; config.max_prog_size as usize];
        let outcome = BootSequencer::new(
            &mut port,
            RamRegion::new(config.ram_base, &mut ram),
            config,
        )
        .run();
        Booted { outcome, port, ram }
    }

    pub fn boot(flash: Vec<u8>) -> Booted {
        boot_with(flash, 0, BootConfig::default())
    }
}

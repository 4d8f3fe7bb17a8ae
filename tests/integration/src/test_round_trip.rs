// Licensed under the Apache-2.0 license

#[cfg(test)]
mod test {
    use crate::test::{boot_with, flash_with_image};
    use krz_config::{BootConfig, RAM_BASE_ADDR};
    use krz_emulator_periph::FlashEvent;
    use krz_rom::BootOutcome;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_random_images_every_chunk_size() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0x6b72_7a00);
        for chunk_size in [1, 3, 4, 16, 17, 64, 127, 128] {
            let words = rng.gen_range(1..=1024usize);
            let mut payload = vec![0u8; words * 4];
            rng.fill(&mut payload[..]);
            let vector = rng.gen_range(0..0x1000u32) & !0x3;

            let config = BootConfig {
                chunk_size,
                ..Default::default()
            };
            let booted = boot_with(flash_with_image(vector as usize, &payload), vector, config);

            assert_eq!(
                booted.outcome,
                BootOutcome::Launch(RAM_BASE_ADDR),
                "chunk size {chunk_size}"
            );
            assert_eq!(&booted.ram[..payload.len()], &payload[..]);

            // Chunks come out in strictly increasing, contiguous address order.
            let reads: Vec<(u32, usize)> = booted
                .port
                .flash()
                .events()
                .iter()
                .filter_map(|e| match e {
                    FlashEvent::Read { address, len } => Some((*address, *len)),
                    _ => None,
                })
                .collect();
            assert_eq!(reads[0], (vector, 4));
            let mut next = vector + 4;
            for &(address, len) in &reads[1..] {
                assert_eq!(address, next);
                assert!(len <= chunk_size);
                next += len as u32;
            }
            assert_eq!(next, vector + 4 + payload.len() as u32);
        }
    }

    #[test]
    fn test_round_trip_with_slow_spi() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut payload = vec![0u8; 1000];
        rng.fill(&mut payload[..]);

        let config = BootConfig::default();
        let mut port = krz_emulator_periph::SimPort::new(krz_emulator_periph::SpiFlash::new(
            flash_with_image(0, &payload),
        ));
        port.set_spi_latency(50);
        let mut ram = vec![0u8; config.max_prog_size as usize];
        let outcome = krz_rom::BootSequencer::new(
            &mut port,
            krz_rom::RamRegion::new(config.ram_base, &mut ram),
            config,
        )
        .run();
        assert_eq!(outcome, BootOutcome::Launch(RAM_BASE_ADDR));
        assert_eq!(&ram[..1000], &payload[..]);
    }
}

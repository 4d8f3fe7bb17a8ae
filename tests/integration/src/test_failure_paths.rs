// Licensed under the Apache-2.0 license

#[cfg(test)]
mod test {
    use crate::test::{boot_with, flash_with_header, flash_with_image, init_logger};
    use krz_config::{BootConfig, DiagLevel};
    use krz_emulator_periph::{FlashEvent, SimPort, SpiFlash};
    use krz_error::BootError;
    use krz_rom::{BootOutcome, BootSequencer, RamRegion};

    #[test]
    fn test_boot_after_power_down_wakes_flash() {
        // A flash left in deep power-down by a previous boot still boots.
        init_logger();
        let mut flash = SpiFlash::new(flash_with_image(0, &[1, 2, 3, 4]));
        flash.set_powered_down(true);
        let mut port = SimPort::new(flash);
        let config = BootConfig::default();
        let mut ram = vec![0u8; 16];

        for _ in 0..2 {
            let outcome =
                BootSequencer::new(&mut port, RamRegion::new(config.ram_base, &mut ram), config)
                    .run();
            assert_eq!(outcome, BootOutcome::Launch(config.ram_base));
            assert_eq!(&ram[..4], &[1, 2, 3, 4]);
            ram.fill(0);
        }
        assert!(port.flash().is_powered_down());
        assert!(!port
            .flash()
            .events()
            .iter()
            .any(|e| matches!(e, FlashEvent::Ignored(_))));
    }

    #[test]
    fn test_stuck_spi_master_halts() {
        init_logger();
        let mut port = SimPort::new(SpiFlash::new(flash_with_image(0, &[1, 2, 3, 4])));
        port.set_spi_stuck(true);
        let config = BootConfig {
            spi_poll_limit: 1000,
            ..Default::default()
        };
        let mut ram = vec![0u8; 16];
        let outcome =
            BootSequencer::new(&mut port, RamRegion::new(config.ram_base, &mut ram), config).run();
        assert_eq!(outcome, BootOutcome::Halt(BootError::TransportTimeout));
        assert!(!port.flash().is_selected());
        assert!(port.uart_text().contains("ERROR"));
    }

    #[test]
    fn test_image_tail_beyond_24_bits() {
        // Header fits below the 16 MiB line, the 8 byte payload does not.
        let vector = 0xff_fff8;
        let flash = flash_with_header(vector as usize, 8, &[0u8; 4]);
        let booted = boot_with(flash, vector, BootConfig::default());
        assert_eq!(
            booted.outcome,
            BootOutcome::Halt(BootError::FlashAddressOutOfRange)
        );
        assert_eq!(booted.port.flash().read_count(), 1);
    }

    #[test]
    fn test_vector_beyond_24_bits() {
        let booted = boot_with(
            flash_with_image(0, &[0u8; 4]),
            0x0100_0000,
            BootConfig::default(),
        );
        assert_eq!(
            booted.outcome,
            BootOutcome::Halt(BootError::FlashAddressOutOfRange)
        );
        assert_eq!(booted.port.flash().read_count(), 0);
        assert!(booted.port.flash().is_powered_down());
    }

    #[test]
    fn test_silent_uart_does_not_block_boot() {
        init_logger();
        let mut port = SimPort::new(SpiFlash::new(flash_with_image(0, &[9; 8])));
        port.set_uart_stuck(true);
        let config = BootConfig {
            uart_poll_limit: 4,
            diagnostics: DiagLevel::Verbose,
            ..Default::default()
        };
        let mut ram = vec![0u8; 16];
        let outcome =
            BootSequencer::new(&mut port, RamRegion::new(config.ram_base, &mut ram), config).run();
        assert_eq!(outcome, BootOutcome::Launch(config.ram_base));
        assert!(port.uart_output().is_empty());
    }

    #[test]
    fn test_diagnostics_off() {
        let config = BootConfig {
            diagnostics: DiagLevel::Off,
            ..Default::default()
        };
        let booted = boot_with(flash_with_image(0, &[]), 0, config);
        assert_eq!(booted.outcome, BootOutcome::Halt(BootError::ImageEmpty));
        assert!(booted.port.uart_text().is_empty());
    }
}

// Licensed under the Apache-2.0 license

#[cfg(test)]
mod test {
    use crate::test::{boot, flash_with_header, flash_with_image};
    use krz_config::{MAX_PROG_SIZE, RAM_BASE_ADDR};
    use krz_emulator_periph::FlashEvent;
    use krz_error::BootError;
    use krz_rom::BootOutcome;

    #[test]
    fn test_eight_byte_image_launches() {
        let payload = [0xde, 0xad, 0xbe, 0xef, 0xca, 0xfe, 0xba, 0xbe];
        let booted = boot(flash_with_image(0, &payload));

        assert_eq!(booted.outcome, BootOutcome::Launch(RAM_BASE_ADDR));
        assert_eq!(&booted.ram[..8], &payload);
        assert!(booted.ram[8..].iter().all(|&b| b == 0xa5));

        let flash = booted.port.flash();
        assert_eq!(
            flash.events(),
            &[
                FlashEvent::ReleasePowerDown,
                FlashEvent::Read { address: 0, len: 4 },
                FlashEvent::Read { address: 4, len: 8 },
                FlashEvent::PowerDown,
            ]
        );
        assert!(flash.is_powered_down());
        assert!(!flash.is_selected());

        let uart = booted.port.uart_text();
        assert!(uart.contains("Program size: 0x00000008"));
        assert!(!uart.contains("ERROR"));
    }

    #[test]
    fn test_empty_image_halts_after_length_fetch() {
        let booted = boot(flash_with_header(0, 0, &[0x11; 16]));

        assert_eq!(booted.outcome, BootOutcome::Halt(BootError::ImageEmpty));
        let flash = booted.port.flash();
        assert_eq!(flash.read_count(), 1);
        assert_eq!(flash.events().last(), Some(&FlashEvent::PowerDown));
        assert!(booted.port.uart_text().contains("ERROR"));
        assert_eq!(booted.port.scratch(), BootError::ImageEmpty.code());
    }

    #[test]
    fn test_oversized_image_leaves_ram_untouched() {
        let booted = boot(flash_with_header(0, 0x0002_0004, &[0x22; 64]));

        assert_eq!(booted.outcome, BootOutcome::Halt(BootError::ImageTooLarge));
        assert!(booted.ram.iter().all(|&b| b == 0xa5));
        assert_eq!(booted.port.flash().read_count(), 1);
        assert!(booted.port.flash().is_powered_down());
    }

    #[test]
    fn test_misaligned_image_halts() {
        let booted = boot(flash_with_header(0, 6, &[0x33; 8]));
        assert_eq!(
            booted.outcome,
            BootOutcome::Halt(BootError::ImageMisaligned)
        );
        assert!(booted.ram.iter().all(|&b| b == 0xa5));
    }

    #[test]
    fn test_max_size_boundary() {
        let payload: Vec<u8> = (0..MAX_PROG_SIZE).map(|i| (i ^ (i >> 8)) as u8).collect();
        let booted = boot(flash_with_image(0, &payload));
        assert_eq!(booted.outcome, BootOutcome::Launch(RAM_BASE_ADDR));
        assert_eq!(booted.ram, payload);

        let booted = boot(flash_with_header(0, MAX_PROG_SIZE + 4, &payload));
        assert_eq!(booted.outcome, BootOutcome::Halt(BootError::ImageTooLarge));
    }
}

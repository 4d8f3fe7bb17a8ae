// Licensed under the Apache-2.0 license

//! Polled, full-duplex byte transfers over the KRZ SPI master with the flash chip
//! select driven from GPIO.

use krz_config::BootConfig;
use krz_error::BootError;
use krz_registers::gpreg::bits::{Gpio, QueueStatus, SpimCtrl};
use krz_romtime::{GpioPort, SpiPort};
use tock_registers::LocalRegisterCopy;

/// Which end of a chip select window a transfer covers. A flash transaction that is
/// longer than the FIFO is split into a `BEGIN`, zero or more `CONTINUE` and one `END`
/// transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CsWindow {
    pub assert: bool,
    pub release: bool,
}

impl CsWindow {
    pub const SINGLE: CsWindow = CsWindow {
        assert: true,
        release: true,
    };
    pub const BEGIN: CsWindow = CsWindow {
        assert: true,
        release: false,
    };
    pub const CONTINUE: CsWindow = CsWindow {
        assert: false,
        release: false,
    };
    pub const END: CsWindow = CsWindow {
        assert: false,
        release: true,
    };
}

pub struct SpiTransport<'a, G: GpioPort, S: SpiPort> {
    gpio: &'a mut G,
    spi: &'a mut S,
    fifo_depth: usize,
    poll_limit: u32,
}

impl<'a, G: GpioPort, S: SpiPort> SpiTransport<'a, G, S> {
    pub fn new(gpio: &'a mut G, spi: &'a mut S, config: &BootConfig) -> Self {
        SpiTransport {
            gpio,
            spi,
            fifo_depth: config.spi_fifo_depth,
            poll_limit: config.spi_poll_limit,
        }
    }

    /// Drives the flash chip select and both status LEDs as outputs, all inactive
    /// (high), and puts the SPI master in mode 0 at full speed.
    pub fn init(&mut self) {
        let pins = Gpio::LEDR::SET + Gpio::LEDG::SET + Gpio::FLASH_CS::SET;

        let mut output: LocalRegisterCopy<u32, Gpio::Register> =
            LocalRegisterCopy::new(self.gpio.output());
        output.modify(pins);
        self.gpio.set_output(output.get());

        let mut direction: LocalRegisterCopy<u32, Gpio::Register> =
            LocalRegisterCopy::new(self.gpio.direction());
        direction.modify(pins);
        self.gpio.set_direction(direction.get());

        self.spi.set_control(0);
    }

    pub fn fifo_depth(&self) -> usize {
        self.fifo_depth
    }

    pub fn select(&mut self) {
        self.write_cs(false);
    }

    pub fn deselect(&mut self) {
        self.write_cs(true);
    }

    /// Lights (or clears) the red status LED. The LEDs are active low.
    pub fn set_error_led(&mut self, on: bool) {
        let mut output: LocalRegisterCopy<u32, Gpio::Register> =
            LocalRegisterCopy::new(self.gpio.output());
        output.modify(if on {
            Gpio::LEDR::CLEAR
        } else {
            Gpio::LEDR::SET
        });
        self.gpio.set_output(output.get());
    }

    /// Clocks `tx` out and stores the bytes clocked in into `rx[..tx.len()]`.
    ///
    /// On timeout the chip select is released and both queues are flushed, so the
    /// flash is left outside of any transaction.
    pub fn transfer(
        &mut self,
        tx: &[u8],
        rx: &mut [u8],
        window: CsWindow,
    ) -> Result<(), BootError> {
        let len = tx.len();
        if len > self.fifo_depth || rx.len() < len {
            return Err(BootError::TransferTooLong);
        }

        if window.assert {
            self.select();
        }

        for &byte in tx {
            self.spi.write_data(byte);
        }

        if let Err(err) = self.wait_rx(len) {
            self.deselect();
            self.clear_queues();
            return Err(err);
        }

        if window.release {
            self.deselect();
        }

        for slot in rx[..len].iter_mut() {
            *slot = self.spi.read_data();
        }
        self.clear_queues();
        Ok(())
    }

    fn wait_rx(&mut self, len: usize) -> Result<(), BootError> {
        for _ in 0..self.poll_limit {
            let status: LocalRegisterCopy<u32, QueueStatus::Register> =
                LocalRegisterCopy::new(self.spi.status());
            if status.read(QueueStatus::RXQ) as usize >= len {
                return Ok(());
            }
        }
        Err(BootError::TransportTimeout)
    }

    fn clear_queues(&mut self) {
        let mut ctrl: LocalRegisterCopy<u32, SpimCtrl::Register> =
            LocalRegisterCopy::new(self.spi.control());
        ctrl.modify(SpimCtrl::CLEAR_TXQ::SET + SpimCtrl::CLEAR_RXQ::SET);
        self.spi.set_control(ctrl.get());
    }

    fn write_cs(&mut self, high: bool) {
        let mut output: LocalRegisterCopy<u32, Gpio::Register> =
            LocalRegisterCopy::new(self.gpio.output());
        output.modify(if high {
            Gpio::FLASH_CS::SET
        } else {
            Gpio::FLASH_CS::CLEAR
        });
        self.gpio.set_output(output.get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krz_emulator_periph::{SimPort, SpiFlash as FlashModel};
    use krz_romtime::{HardwarePort, PortParts};

    fn port() -> SimPort {
        SimPort::new(FlashModel::new((0..=255u8).cycle().take(4096).collect()))
    }

    #[test]
    fn test_init_configures_pins() {
        let mut port = port();
        {
            let PortParts { gpio, spi, .. } = port.parts();
            let mut transport = SpiTransport::new(gpio, spi, &BootConfig::default());
            transport.init();
        }
        assert_eq!(port.gpio_direction() & 0x7, 0x7);
        assert_eq!(port.gpio_output() & 0x7, 0x7);
        assert!(!port.flash().is_selected());
    }

    #[test]
    fn test_transfer_rejects_oversized_frame() {
        let mut port = port();
        let PortParts { gpio, spi, .. } = port.parts();
        let config = BootConfig {
            spi_fifo_depth: 16,
            chunk_size: 16,
            ..Default::default()
        };
        let mut transport = SpiTransport::new(gpio, spi, &config);
        transport.init();
        let tx = [0u8; 17];
        let mut rx = [0u8; 17];
        assert_eq!(
            transport.transfer(&tx, &mut rx, CsWindow::SINGLE),
            Err(BootError::TransferTooLong)
        );
        assert_eq!(
            transport.transfer(&tx[..4], &mut rx[..3], CsWindow::SINGLE),
            Err(BootError::TransferTooLong)
        );
    }

    #[test]
    fn test_transfer_holds_cs_across_window() {
        let mut port = port();
        {
            let PortParts { gpio, spi, .. } = port.parts();
            let mut transport = SpiTransport::new(gpio, spi, &BootConfig::default());
            transport.init();

            let mut rx = [0u8; 4];
            transport
                .transfer(&[0x03, 0x00, 0x00, 0x10], &mut rx, CsWindow::BEGIN)
                .unwrap();
            let mut data = [0u8; 2];
            transport
                .transfer(&[0, 0], &mut data, CsWindow::CONTINUE)
                .unwrap();
            assert_eq!(data, [0x10, 0x11]);
            transport
                .transfer(&[0, 0], &mut data, CsWindow::END)
                .unwrap();
            assert_eq!(data, [0x12, 0x13]);
        }
        assert!(!port.flash().is_selected());
    }

    #[test]
    fn test_transfer_times_out_and_releases_cs() {
        let mut port = port();
        port.set_spi_stuck(true);
        {
            let PortParts { gpio, spi, .. } = port.parts();
            let config = BootConfig {
                spi_poll_limit: 32,
                ..Default::default()
            };
            let mut transport = SpiTransport::new(gpio, spi, &config);
            transport.init();
            let mut rx = [0u8; 1];
            assert_eq!(
                transport.transfer(&[0xab], &mut rx, CsWindow::BEGIN),
                Err(BootError::TransportTimeout)
            );
        }
        assert!(!port.flash().is_selected());
        assert_eq!(port.spi_queued(), (0, 0));
    }

    #[test]
    fn test_transfer_tolerates_latency() {
        let mut port = port();
        port.set_spi_latency(20);
        let PortParts { gpio, spi, .. } = port.parts();
        let mut transport = SpiTransport::new(gpio, spi, &BootConfig::default());
        transport.init();
        let mut rx = [0u8; 5];
        transport
            .transfer(&[0x03, 0, 0, 0x40, 0], &mut rx, CsWindow::SINGLE)
            .unwrap();
        assert_eq!(rx[4], 0x40);
    }
}

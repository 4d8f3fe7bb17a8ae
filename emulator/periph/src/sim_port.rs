/*++

Licensed under the Apache-2.0 license.

File Name:

    sim_port.rs

Abstract:

    File contains the simulated KRZ register file the boot ROM runs against on
    the host.

--*/

use crate::gpreg::{SimGpio, SimSys};
use crate::spi_flash::SpiFlash;
use crate::spim::SimSpim;
use crate::uart::SimUart;
use krz_romtime::{GpioPort, HardwarePort, PortParts, SysRegs};
use std::cell::{Ref, RefCell};
use std::rc::Rc;

pub struct SimPort {
    sys: SimSys,
    gpio: SimGpio,
    spim: SimSpim,
    uart: SimUart,
    flash: Rc<RefCell<SpiFlash>>,
    uart_output: Rc<RefCell<Vec<u8>>>,
}

impl SimPort {
    pub fn new(flash: SpiFlash) -> Self {
        let flash = Rc::new(RefCell::new(flash));
        let uart_output = Rc::new(RefCell::new(vec![]));
        Self {
            sys: SimSys::default(),
            gpio: SimGpio::new(flash.clone()),
            spim: SimSpim::new(flash.clone()),
            uart: SimUart::new(uart_output.clone()),
            flash,
            uart_output,
        }
    }

    pub fn set_boot_vector(&mut self, vector: u32) {
        self.sys.set_boot_vector(vector);
    }

    pub fn scratch(&self) -> u32 {
        self.sys.scratch()
    }

    pub fn set_spi_latency(&mut self, polls: u32) {
        self.spim.set_latency(polls);
    }

    pub fn set_spi_stuck(&mut self, stuck: bool) {
        self.spim.set_stuck(stuck);
    }

    pub fn set_uart_stuck(&mut self, stuck: bool) {
        self.uart.set_stuck(stuck);
    }

    /// Bytes still sitting in the SPI master's (TX, RX) queues.
    pub fn spi_queued(&self) -> (usize, usize) {
        self.spim.queued()
    }

    pub fn gpio_direction(&self) -> u32 {
        self.gpio.direction()
    }

    pub fn gpio_output(&self) -> u32 {
        self.gpio.output()
    }

    pub fn flash(&self) -> Ref<'_, SpiFlash> {
        self.flash.borrow()
    }

    pub fn uart_output(&self) -> Vec<u8> {
        self.uart_output.borrow().clone()
    }

    pub fn uart_text(&self) -> String {
        String::from_utf8_lossy(&self.uart_output.borrow()).into_owned()
    }
}

impl HardwarePort for SimPort {
    type Sys = SimSys;
    type Gpio = SimGpio;
    type Spi = SimSpim;
    type Uart = SimUart;

    fn parts(&mut self) -> PortParts<'_, SimSys, SimGpio, SimSpim, SimUart> {
        PortParts {
            sys: &mut self.sys,
            gpio: &mut self.gpio,
            spi: &mut self.spim,
            uart: &mut self.uart,
        }
    }
}

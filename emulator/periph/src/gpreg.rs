/*++

Licensed under the Apache-2.0 license.

File Name:

    gpreg.rs

Abstract:

    File contains the scratch, boot vector and GPIO registers.

--*/

use crate::spi_flash::SpiFlash;
use bitfield::Bit;
use krz_config::GPIO_FLASH_CS;
use krz_romtime::{GpioPort, SysRegs};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
pub struct SimSys {
    scratch: u32,
    boot_vector: u32,
}

impl SimSys {
    pub fn set_boot_vector(&mut self, vector: u32) {
        self.boot_vector = vector;
    }
}

impl SysRegs for SimSys {
    fn scratch(&self) -> u32 {
        self.scratch
    }

    fn set_scratch(&mut self, value: u32) {
        self.scratch = value;
    }

    fn boot_vector(&self) -> u32 {
        self.boot_vector
    }
}

/// GPIO block. Pin 2 is wired to the flash chip select.
pub struct SimGpio {
    direction: u32,
    output: u32,
    flash: Rc<RefCell<SpiFlash>>,
}

impl SimGpio {
    pub fn new(flash: Rc<RefCell<SpiFlash>>) -> Self {
        Self {
            direction: 0,
            output: 0,
            flash,
        }
    }

    /// An input pin floats high through the pull-up.
    fn pin_level(&self, pin: usize) -> bool {
        !self.direction.bit(pin) || self.output.bit(pin)
    }

    fn update_cs(&mut self) {
        let active = !self.pin_level(GPIO_FLASH_CS as usize);
        let mut flash = self.flash.borrow_mut();
        if flash.is_selected() != active {
            log::trace!("gpio: flash cs {}", if active { "low" } else { "high" });
            flash.chip_select(active);
        }
    }
}

impl GpioPort for SimGpio {
    fn direction(&self) -> u32 {
        self.direction
    }

    fn set_direction(&mut self, mask: u32) {
        self.direction = mask;
        self.update_cs();
    }

    fn output(&self) -> u32 {
        self.output
    }

    fn set_output(&mut self, value: u32) {
        self.output = value;
        self.update_cs();
    }

    fn input(&self) -> u32 {
        (0..32).fold(0, |acc, pin| {
            if self.pin_level(pin) {
                acc | (1 << pin)
            } else {
                acc
            }
        })
    }
}

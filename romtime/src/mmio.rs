// Licensed under the Apache-2.0 license

use crate::port::{GpioPort, HardwarePort, PortParts, SpiPort, SysRegs, UartPort};
use crate::static_ref::StaticRef;
use krz_config::KrzMemoryMap;
use krz_registers::gpreg::regs::GpReg;
use krz_registers::spim::regs::SpimData;
use krz_registers::uart::regs::UartData;
use tock_registers::interfaces::{Readable, Writeable};

pub struct MmioSys {
    registers: StaticRef<GpReg>,
}

impl SysRegs for MmioSys {
    fn scratch(&self) -> u32 {
        self.registers.scratch.get()
    }

    fn set_scratch(&mut self, value: u32) {
        self.registers.scratch.set(value);
    }

    fn boot_vector(&self) -> u32 {
        self.registers.bootvec.get()
    }
}

pub struct MmioGpio {
    registers: StaticRef<GpReg>,
}

impl GpioPort for MmioGpio {
    fn direction(&self) -> u32 {
        self.registers.gpio_dir.get()
    }

    fn set_direction(&mut self, mask: u32) {
        self.registers.gpio_dir.set(mask);
    }

    fn output(&self) -> u32 {
        self.registers.gpio_write.get()
    }

    fn set_output(&mut self, value: u32) {
        self.registers.gpio_write.set(value);
    }

    fn input(&self) -> u32 {
        self.registers.gpio_read.get()
    }
}

pub struct MmioSpim {
    registers: StaticRef<GpReg>,
    data: StaticRef<SpimData>,
}

impl SpiPort for MmioSpim {
    fn control(&self) -> u32 {
        self.registers.spim_ctrl.get()
    }

    fn set_control(&mut self, value: u32) {
        self.registers.spim_ctrl.set(value);
    }

    fn status(&mut self) -> u32 {
        self.registers.spim_status.get()
    }

    fn write_data(&mut self, byte: u8) {
        self.data.data.set(byte);
    }

    fn read_data(&mut self) -> u8 {
        self.data.data.get()
    }
}

pub struct MmioUart {
    registers: StaticRef<GpReg>,
    data: StaticRef<UartData>,
}

impl UartPort for MmioUart {
    fn control(&self) -> u32 {
        self.registers.uart_ctrl.get()
    }

    fn set_control(&mut self, value: u32) {
        self.registers.uart_ctrl.set(value);
    }

    fn status(&mut self) -> u32 {
        self.registers.uart_status.get()
    }

    fn write_data(&mut self, byte: u8) {
        self.data.data.set(byte);
    }
}

/// The KRZ register file as seen from the core.
pub struct KrzMmio {
    sys: MmioSys,
    gpio: MmioGpio,
    spim: MmioSpim,
    uart: MmioUart,
}

impl KrzMmio {
    /// # Safety
    ///
    /// `map` must describe the register blocks of the SoC this code runs on, and no
    /// other code may drive those registers while the returned value is alive.
    pub unsafe fn new(map: &KrzMemoryMap) -> Self {
        let gpreg: StaticRef<GpReg> = StaticRef::new(map.gpreg_offset as *const GpReg);
        let spim_data: StaticRef<SpimData> = StaticRef::new(map.spim_offset as *const SpimData);
        let uart_data: StaticRef<UartData> = StaticRef::new(map.uart_offset as *const UartData);
        KrzMmio {
            sys: MmioSys { registers: gpreg },
            gpio: MmioGpio { registers: gpreg },
            spim: MmioSpim {
                registers: gpreg,
                data: spim_data,
            },
            uart: MmioUart {
                registers: gpreg,
                data: uart_data,
            },
        }
    }
}

impl HardwarePort for KrzMmio {
    type Sys = MmioSys;
    type Gpio = MmioGpio;
    type Spi = MmioSpim;
    type Uart = MmioUart;

    fn parts(&mut self) -> PortParts<'_, MmioSys, MmioGpio, MmioSpim, MmioUart> {
        PortParts {
            sys: &mut self.sys,
            gpio: &mut self.gpio,
            spi: &mut self.spim,
            uart: &mut self.uart,
        }
    }
}

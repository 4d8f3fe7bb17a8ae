// Licensed under the Apache-2.0 license

//! Capabilities the ROM needs from the SoC, one trait per register group.
//!
//! The firmware talks to the real registers through [`crate::KrzMmio`]; host tests
//! plug in a simulated port implementing the same traits.

/// Scratch and boot vector registers.
pub trait SysRegs {
    fn scratch(&self) -> u32;
    fn set_scratch(&mut self, value: u32);
    fn boot_vector(&self) -> u32;
}

pub trait GpioPort {
    fn direction(&self) -> u32;
    /// A set bit makes the pin an output.
    fn set_direction(&mut self, mask: u32);
    /// Last value written to the output register.
    fn output(&self) -> u32;
    fn set_output(&mut self, value: u32);
    fn input(&self) -> u32;
}

/// Byte-oriented SPI master with separate TX and RX queues.
pub trait SpiPort {
    fn control(&self) -> u32;
    fn set_control(&mut self, value: u32);
    /// Queue status; see `krz_registers::gpreg::bits::QueueStatus`.
    fn status(&mut self) -> u32;
    /// Queue one byte for transmission.
    fn write_data(&mut self, byte: u8);
    /// Pop one received byte.
    fn read_data(&mut self) -> u8;
}

pub trait UartPort {
    fn control(&self) -> u32;
    fn set_control(&mut self, value: u32);
    /// Queue status; see `krz_registers::gpreg::bits::QueueStatus`.
    fn status(&mut self) -> u32;
    fn write_data(&mut self, byte: u8);
}

/// Disjoint mutable views of every register group, so the SPI transport and the
/// diagnostics sink can be held at the same time.
pub struct PortParts<'a, Y, G, S, U> {
    pub sys: &'a mut Y,
    pub gpio: &'a mut G,
    pub spi: &'a mut S,
    pub uart: &'a mut U,
}

pub trait HardwarePort {
    type Sys: SysRegs;
    type Gpio: GpioPort;
    type Spi: SpiPort;
    type Uart: UartPort;

    fn parts(&mut self) -> PortParts<'_, Self::Sys, Self::Gpio, Self::Spi, Self::Uart>;
}

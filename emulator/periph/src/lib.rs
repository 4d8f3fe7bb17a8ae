/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the KRZ peripheral models.

--*/

mod gpreg;
mod sim_port;
mod spi_flash;
mod spim;
mod uart;

pub use gpreg::{SimGpio, SimSys};
pub use sim_port::SimPort;
pub use spi_flash::{
    FlashEvent, JedecSpiFlashCmd, SpiFlash, DEFAULT_CAPACITY, ELECTRONIC_SIGNATURE, JEDEC_ID,
};
pub use spim::{SimSpim, SPIM_QUEUE_DEPTH};
pub use uart::SimUart;

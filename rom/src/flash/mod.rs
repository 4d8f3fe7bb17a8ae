// Licensed under the Apache-2.0 license

pub mod flash_partition;
pub mod hil;
pub mod spi_flash;

pub use flash_partition::FlashPartition;
pub use hil::FlashStorage;
pub use spi_flash::{FlashAddress, FlashOpcode, SpiFlash};

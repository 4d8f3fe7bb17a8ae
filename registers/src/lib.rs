/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    Register definitions for the KRZ general purpose register block, the UART and
    the SPI master data ports.

--*/

#![cfg_attr(target_arch = "riscv32", no_std)]

pub mod gpreg {
    pub mod regs {
        use tock_registers::register_structs;
        use tock_registers::registers::{ReadOnly, ReadWrite};

        register_structs! {
            pub GpReg {
                (0x00 => pub scratch: ReadWrite<u32>),
                (0x04 => pub bootvec: ReadOnly<u32>),
                (0x08 => pub gpio_dir: ReadWrite<u32, super::bits::Gpio::Register>),
                (0x0c => pub gpio_write: ReadWrite<u32, super::bits::Gpio::Register>),
                (0x10 => pub gpio_read: ReadOnly<u32, super::bits::Gpio::Register>),
                (0x14 => pub uart_ctrl: ReadWrite<u32, super::bits::UartCtrl::Register>),
                (0x18 => pub uart_status: ReadOnly<u32, super::bits::QueueStatus::Register>),
                (0x1c => pub spim_ctrl: ReadWrite<u32, super::bits::SpimCtrl::Register>),
                (0x20 => pub spim_status: ReadOnly<u32, super::bits::QueueStatus::Register>),
                (0x24 => @END),
            }
        }
    }

    pub mod bits {
        use tock_registers::register_bitfields;

        register_bitfields! [
            u32,

            /// GPIO direction, output and input registers share the pin layout
            pub Gpio [
                LEDR OFFSET(0) NUMBITS(1) [],
                LEDG OFFSET(1) NUMBITS(1) [],
                FLASH_CS OFFSET(2) NUMBITS(1) [],
            ],

            pub UartCtrl [
                PRESCALER OFFSET(0) NUMBITS(16) [],
            ],

            pub SpimCtrl [
                PRESCALER OFFSET(0) NUMBITS(8) [],
                CPOL OFFSET(8) NUMBITS(1) [],
                CPHA OFFSET(9) NUMBITS(1) [],
                CLEAR_TXQ OFFSET(10) NUMBITS(1) [],
                CLEAR_RXQ OFFSET(11) NUMBITS(1) [],
            ],

            /// Queued byte counts, used by both the UART and the SPI master
            pub QueueStatus [
                TXQ OFFSET(0) NUMBITS(8) [],
                RXQ OFFSET(8) NUMBITS(8) [],
            ],
        ];
    }
}

pub mod uart {
    pub mod regs {
        use tock_registers::register_structs;
        use tock_registers::registers::ReadWrite;

        register_structs! {
            pub UartData {
                (0x00 => pub data: ReadWrite<u8>),
                (0x01 => @END),
            }
        }
    }
}

pub mod spim {
    pub mod regs {
        use tock_registers::register_structs;
        use tock_registers::registers::ReadWrite;

        register_structs! {
            pub SpimData {
                (0x00 => pub data: ReadWrite<u8>),
                (0x01 => @END),
            }
        }
    }
}

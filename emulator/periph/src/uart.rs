/*++

Licensed under the Apache-2.0 license.

File Name:

    uart.rs

Abstract:

    File contains the transmit side of the KRZ UART.

--*/

use krz_romtime::UartPort;
use std::cell::RefCell;
use std::rc::Rc;

const UART_TXQ_FULL: u32 = 128;

pub struct SimUart {
    control: u32,
    output: Rc<RefCell<Vec<u8>>>,
    line: Vec<u8>,
    stuck: bool,
}

impl SimUart {
    pub fn new(output: Rc<RefCell<Vec<u8>>>) -> Self {
        Self {
            control: 0,
            output,
            line: vec![],
            stuck: false,
        }
    }

    /// A stuck UART reports a permanently full TX queue.
    pub fn set_stuck(&mut self, stuck: bool) {
        self.stuck = stuck;
    }
}

impl UartPort for SimUart {
    fn control(&self) -> u32 {
        self.control
    }

    fn set_control(&mut self, value: u32) {
        self.control = value;
    }

    fn status(&mut self) -> u32 {
        if self.stuck {
            UART_TXQ_FULL
        } else {
            0
        }
    }

    fn write_data(&mut self, byte: u8) {
        self.output.borrow_mut().push(byte);
        if byte == b'\n' {
            log::info!("uart: {}", String::from_utf8_lossy(&self.line));
            self.line.clear();
        } else {
            self.line.push(byte);
        }
    }
}

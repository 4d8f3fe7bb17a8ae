/*++

Licensed under the Apache-2.0 license.

File Name:

    spim.rs

Abstract:

    File contains the SPI master with its TX and RX queues.

--*/

use crate::spi_flash::SpiFlash;
use krz_registers::gpreg::bits::{QueueStatus, SpimCtrl};
use krz_romtime::SpiPort;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tock_registers::LocalRegisterCopy;

pub const SPIM_QUEUE_DEPTH: usize = 128;

pub struct SimSpim {
    control: u32,
    txq: VecDeque<u8>,
    rxq: VecDeque<u8>,
    flash: Rc<RefCell<SpiFlash>>,
    /// Status polls a queued frame waits before it is clocked out
    latency: u32,
    countdown: u32,
    stuck: bool,
}

impl SimSpim {
    pub fn new(flash: Rc<RefCell<SpiFlash>>) -> Self {
        Self {
            control: 0,
            txq: VecDeque::new(),
            rxq: VecDeque::new(),
            flash,
            latency: 0,
            countdown: 0,
            stuck: false,
        }
    }

    pub fn set_latency(&mut self, polls: u32) {
        self.latency = polls;
    }

    /// A stuck master accepts bytes but never shifts them out.
    pub fn set_stuck(&mut self, stuck: bool) {
        self.stuck = stuck;
    }

    pub fn queued(&self) -> (usize, usize) {
        (self.txq.len(), self.rxq.len())
    }

    fn clock(&mut self) {
        if self.stuck {
            return;
        }
        if self.countdown > 0 {
            self.countdown -= 1;
            return;
        }
        let mut flash = self.flash.borrow_mut();
        while let Some(mosi) = self.txq.pop_front() {
            let miso = flash.exchange(mosi);
            log::trace!("spim: {:02x} -> {:02x}", mosi, miso);
            self.rxq.push_back(miso);
        }
    }
}

impl SpiPort for SimSpim {
    fn control(&self) -> u32 {
        self.control
    }

    fn set_control(&mut self, value: u32) {
        let mut ctrl: LocalRegisterCopy<u32, SpimCtrl::Register> = LocalRegisterCopy::new(value);
        if ctrl.is_set(SpimCtrl::CLEAR_TXQ) {
            self.txq.clear();
        }
        if ctrl.is_set(SpimCtrl::CLEAR_RXQ) {
            self.rxq.clear();
        }
        // The clear bits are self-clearing strobes.
        ctrl.modify(SpimCtrl::CLEAR_TXQ::CLEAR + SpimCtrl::CLEAR_RXQ::CLEAR);
        self.control = ctrl.get();
    }

    fn status(&mut self) -> u32 {
        self.clock();
        let mut status: LocalRegisterCopy<u32, QueueStatus::Register> = LocalRegisterCopy::new(0);
        status.modify(
            QueueStatus::TXQ.val(self.txq.len() as u32)
                + QueueStatus::RXQ.val(self.rxq.len() as u32),
        );
        status.get()
    }

    fn write_data(&mut self, byte: u8) {
        if self.txq.len() >= SPIM_QUEUE_DEPTH {
            log::warn!("spim: TX queue overflow, dropping {:02x}", byte);
            return;
        }
        self.txq.push_back(byte);
        self.countdown = self.latency;
    }

    fn read_data(&mut self) -> u8 {
        self.rxq.pop_front().unwrap_or(0)
    }
}

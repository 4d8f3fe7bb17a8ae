/*++

Licensed under the Apache-2.0 license.

File Name:

    spi_flash.rs

Abstract:

    File contains a behavioral model of a single-IO SPI NOR flash with deep
    power-down support.

--*/

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// W25Q128: 16 MiB, the whole 24-bit address space.
pub const DEFAULT_CAPACITY: u32 = 1 << 24;
pub const JEDEC_ID: [u8; 3] = [0xef, 0x40, 0x18];
/// Returned by release-power-down after its three dummy bytes.
pub const ELECTRONIC_SIGNATURE: u8 = 0x17;

/// Value driven on MISO when the flash has nothing to say.
const IDLE_BYTE: u8 = 0xff;

#[derive(Debug, Default, IntoPrimitive, TryFromPrimitive, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum JedecSpiFlashCmd {
    #[default]
    Noop = 0x00,
    Read = 0x03,
    Rdsr1 = 0x05,
    Rdid = 0x9f,
    ReleasePowerDown = 0xab,
    PowerDown = 0xb9,
}

/// One completed chip select window, as seen by the flash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlashEvent {
    ReleasePowerDown,
    PowerDown,
    Read { address: u32, len: usize },
    ReadId,
    ReadStatus,
    /// Dropped because the device was in deep power-down.
    Ignored(u8),
    Unsupported(u8),
}

#[derive(Default)]
struct Transaction {
    opcode: Option<u8>,
    cmd: JedecSpiFlashCmd,
    ignored: bool,
    bytes: usize,
    address: u32,
}

impl Transaction {
    /// Command and address bytes before data starts flowing.
    const HEADER_LEN: usize = 4;

    fn data_len(&self) -> usize {
        self.bytes.saturating_sub(Self::HEADER_LEN)
    }
}

pub struct SpiFlash {
    data: Vec<u8>,
    capacity: u32,
    powered_down: bool,
    selected: bool,
    txn: Transaction,
    events: Vec<FlashEvent>,
}

impl SpiFlash {
    /// A 16 MiB device holding `contents` at offset 0 and erased bytes after it.
    pub fn new(contents: Vec<u8>) -> Self {
        Self::with_capacity(contents, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(mut contents: Vec<u8>, capacity: u32) -> Self {
        contents.truncate(capacity as usize);
        Self {
            data: contents,
            capacity,
            powered_down: false,
            selected: false,
            txn: Transaction::default(),
            events: vec![],
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_powered_down(&self) -> bool {
        self.powered_down
    }

    pub fn set_powered_down(&mut self, powered_down: bool) {
        self.powered_down = powered_down;
    }

    pub fn events(&self) -> &[FlashEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Number of read commands completed so far.
    pub fn read_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, FlashEvent::Read { .. }))
            .count()
    }

    /// Drives chip select; `true` is the active (low) level on the wire.
    pub fn chip_select(&mut self, active: bool) {
        if active == self.selected {
            return;
        }
        self.selected = active;
        if active {
            self.txn = Transaction::default();
        } else {
            self.finish();
        }
    }

    /// Shifts one byte in on MOSI and returns the byte shifted out on MISO.
    pub fn exchange(&mut self, mosi: u8) -> u8 {
        if !self.selected {
            return IDLE_BYTE;
        }
        let index = self.txn.bytes;
        self.txn.bytes += 1;

        if index == 0 {
            self.start(mosi);
            return IDLE_BYTE;
        }
        if self.txn.ignored {
            return IDLE_BYTE;
        }

        match self.txn.cmd {
            JedecSpiFlashCmd::Read if index < Transaction::HEADER_LEN => {
                self.txn.address = (self.txn.address << 8) | mosi as u32;
                IDLE_BYTE
            }
            JedecSpiFlashCmd::Read => {
                let offset = (index - Transaction::HEADER_LEN) as u32;
                self.byte_at(self.txn.address.wrapping_add(offset))
            }
            JedecSpiFlashCmd::ReleasePowerDown if index < Transaction::HEADER_LEN => IDLE_BYTE,
            JedecSpiFlashCmd::ReleasePowerDown => ELECTRONIC_SIGNATURE,
            JedecSpiFlashCmd::Rdid => JEDEC_ID[(index - 1) % JEDEC_ID.len()],
            // Never busy: reads and power transitions complete instantly.
            JedecSpiFlashCmd::Rdsr1 => 0x00,
            JedecSpiFlashCmd::PowerDown | JedecSpiFlashCmd::Noop => IDLE_BYTE,
        }
    }

    fn start(&mut self, opcode: u8) {
        self.txn.opcode = Some(opcode);
        if self.powered_down && opcode != u8::from(JedecSpiFlashCmd::ReleasePowerDown) {
            self.txn.ignored = true;
            return;
        }
        match JedecSpiFlashCmd::try_from(opcode) {
            Ok(cmd) => self.txn.cmd = cmd,
            Err(_) => self.txn.ignored = true,
        }
    }

    fn finish(&mut self) {
        let Some(opcode) = self.txn.opcode else {
            return;
        };
        let event = if self.txn.ignored && self.powered_down {
            FlashEvent::Ignored(opcode)
        } else if self.txn.ignored {
            FlashEvent::Unsupported(opcode)
        } else {
            match self.txn.cmd {
                JedecSpiFlashCmd::Read => FlashEvent::Read {
                    address: self.txn.address % self.capacity.max(1),
                    len: self.txn.data_len(),
                },
                JedecSpiFlashCmd::ReleasePowerDown => {
                    self.powered_down = false;
                    FlashEvent::ReleasePowerDown
                }
                JedecSpiFlashCmd::PowerDown => {
                    self.powered_down = true;
                    FlashEvent::PowerDown
                }
                JedecSpiFlashCmd::Rdid => FlashEvent::ReadId,
                JedecSpiFlashCmd::Rdsr1 => FlashEvent::ReadStatus,
                JedecSpiFlashCmd::Noop => FlashEvent::Unsupported(opcode),
            }
        };
        log::debug!("spi flash: {:x?}", event);
        self.events.push(event);
    }

    fn byte_at(&self, address: u32) -> u8 {
        let address = address % self.capacity.max(1);
        self.data
            .get(address as usize)
            .copied()
            .unwrap_or(IDLE_BYTE)
    }
}

impl Default for SpiFlash {
    fn default() -> Self {
        Self::new(vec![])
    }
}

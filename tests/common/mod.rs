#![allow(dead_code)]

//! Simulated RADIO peripheral and board collaborators.
//!
//! Everything shares one [`Sim`] so a test can keep a handle on the hardware
//! after the radio has taken ownership of the fakes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use sleepsync_radio::{
    CrystalClock, EndOfTransaction, InterruptController, PacketBuffer, PowerSupply, Radio,
    RadioBus, PAYLOAD_LEN,
};

pub const TXEN: u16 = 0x000;
pub const RXEN: u16 = 0x004;
pub const DISABLE: u16 = 0x010;
pub const EVENTS_READY: u16 = 0x100;
pub const EVENTS_ADDRESS: u16 = 0x104;
pub const EVENTS_END: u16 = 0x10C;
pub const EVENTS_DISABLED: u16 = 0x110;
pub const SHORTS: u16 = 0x200;
pub const INTENSET: u16 = 0x304;
pub const INTENCLR: u16 = 0x308;
pub const CRCSTATUS: u16 = 0x400;
pub const RXMATCH: u16 = 0x408;
pub const PACKETPTR: u16 = 0x504;
pub const FREQUENCY: u16 = 0x508;
pub const TXPOWER: u16 = 0x50C;
pub const MODE: u16 = 0x510;
pub const PCNF0: u16 = 0x514;
pub const PCNF1: u16 = 0x518;
pub const BASE0: u16 = 0x51C;
pub const PREFIX0: u16 = 0x524;
pub const TXADDRESS: u16 = 0x52C;
pub const RXADDRESSES: u16 = 0x530;
pub const CRCCNF: u16 = 0x534;
pub const CRCPOLY: u16 = 0x538;
pub const CRCINIT: u16 = 0x53C;
pub const STATE: u16 = 0x550;
pub const DATAWHITEIV: u16 = 0x554;
pub const MODECNF0: u16 = 0x650;
pub const POWER: u16 = 0xFFC;

pub const STATE_DISABLED: u32 = 0;
pub const STATE_RX: u32 = 3;
pub const STATE_RX_DISABLE: u32 = 4;
pub const STATE_TX: u32 = 11;
pub const STATE_TX_DISABLE: u32 = 12;

/// Interrupt enable bits
pub const INT_END: u32 = 1 << 3;
pub const INT_DISABLED: u32 = 1 << 4;

pub const PACKET_ADDRESS: u32 = 0x2000_0100;

#[derive(Debug, Default)]
pub struct Sim {
    pub powered: bool,
    pub state: u32,
    pub regs: HashMap<u16, u32>,
    pub ready: bool,
    pub address: bool,
    pub end: bool,
    pub disabled: bool,
    pub inten: u32,
    pub crc_ok: bool,
    pub rxmatch: u32,

    /// Register reads a transmission takes; `None` never finishes
    pub tx_polls: Option<u32>,
    /// Register reads a DISABLE task takes; `None` never finishes
    pub disable_polls: Option<u32>,
    tx_countdown: Option<u32>,
    disable_countdown: Option<u32>,

    /// Payloads put on air by TXEN
    pub sent: Vec<[u8; PAYLOAD_LEN]>,
    /// Payload the DMA engine has yet to write into the buffer
    dma_pending: Option<[u8; PAYLOAD_LEN]>,
    /// Protocol errors the hardware would have suffered
    pub violations: Vec<String>,

    pub clock_configured: bool,
    pub clock_started: bool,
    /// `is_running` calls before the crystal runs; `None` never runs
    pub clock_polls: Option<u32>,
    pub clock_running: bool,

    pub dcdc: bool,
    pub irq_enabled: bool,
    pub elapsed_ns: u64,
}

pub type SimHandle = Rc<RefCell<Sim>>;

impl Sim {
    pub fn new() -> SimHandle {
        Rc::new(RefCell::new(Sim {
            tx_polls: Some(3),
            disable_polls: Some(1),
            clock_polls: Some(2),
            ..Default::default()
        }))
    }

    pub fn reg(&self, offset: u16) -> u32 {
        self.regs.get(&offset).copied().unwrap_or(0)
    }

    pub fn elapsed_us(&self) -> u64 {
        self.elapsed_ns / 1_000
    }

    /// A packet arrives over the air. Completes with END, then DISABLED
    /// through the END→DISABLE shortcut. Ignored unless listening.
    pub fn deliver(&mut self, payload: [u8; PAYLOAD_LEN], crc_ok: bool) -> bool {
        if !self.powered || self.state != STATE_RX {
            return false;
        }
        self.dma_pending = Some(payload);
        self.crc_ok = crc_ok;
        self.rxmatch = 0;
        self.address = true;
        self.end = true;
        self.disabled = true;
        self.state = STATE_DISABLED;
        true
    }

    /// A packet address has matched but the payload is still coming in.
    pub fn begin_delivery(&mut self) {
        if self.powered && self.state == STATE_RX {
            self.address = true;
        }
    }

    /// Whether the radio interrupt line would fire.
    pub fn irq_pending(&self) -> bool {
        let mut raised = 0;
        if self.end {
            raised |= INT_END;
        }
        if self.disabled {
            raised |= INT_DISABLED;
        }
        self.powered && self.irq_enabled && raised & self.inten != 0
    }

    fn tick(&mut self) {
        if let Some(left) = self.tx_countdown {
            if left <= 1 {
                self.tx_countdown = None;
                self.end = true;
                self.disabled = true;
                self.state = STATE_DISABLED;
            } else {
                self.tx_countdown = Some(left - 1);
            }
        }
        if let Some(left) = self.disable_countdown {
            if left <= 1 {
                self.disable_countdown = None;
                self.disabled = true;
                self.state = STATE_DISABLED;
            } else {
                self.disable_countdown = Some(left - 1);
            }
        }
    }

    fn read(&mut self, offset: u16) -> u32 {
        self.tick();
        match offset {
            EVENTS_READY => self.ready as u32,
            EVENTS_ADDRESS => self.address as u32,
            EVENTS_END => self.end as u32,
            EVENTS_DISABLED => self.disabled as u32,
            INTENSET | INTENCLR => self.inten,
            CRCSTATUS => self.crc_ok as u32,
            RXMATCH => self.rxmatch,
            STATE => self.state,
            POWER => self.powered as u32,
            _ => self.reg(offset),
        }
    }

    fn write(&mut self, offset: u16, value: u32, buffer: &PacketBuffer) {
        if offset == POWER {
            self.set_power(value & 1 != 0);
            return;
        }
        if !self.powered {
            self.violations.push(format!("write {offset:#05x} while unpowered"));
            return;
        }

        match offset {
            TXEN => {
                if self.state != STATE_DISABLED {
                    self.violations.push(format!("TXEN in state {}", self.state));
                }
                self.sent.push(buffer.to_array());
                self.state = STATE_TX;
                self.tx_countdown = self.tx_polls;
            }
            RXEN => {
                if self.state != STATE_DISABLED {
                    self.violations.push(format!("RXEN in state {}", self.state));
                }
                self.state = STATE_RX;
            }
            DISABLE => {
                self.tx_countdown = None;
                match self.state {
                    STATE_DISABLED => self.disabled = true,
                    STATE_TX => self.state = STATE_TX_DISABLE,
                    _ => self.state = STATE_RX_DISABLE,
                }
                if self.state != STATE_DISABLED {
                    self.disable_countdown = self.disable_polls;
                }
            }
            EVENTS_READY => self.ready = value != 0,
            EVENTS_ADDRESS => self.address = value != 0,
            EVENTS_END => self.end = value != 0,
            EVENTS_DISABLED => self.disabled = value != 0,
            INTENSET => self.inten |= value,
            INTENCLR => self.inten &= !value,
            _ => {
                if offset >= PACKETPTR && self.state != STATE_DISABLED {
                    self.violations
                        .push(format!("configured {offset:#05x} in state {}", self.state));
                }
                self.regs.insert(offset, value);
            }
        }
    }

    fn set_power(&mut self, on: bool) {
        // Power cycling resets the peripheral
        self.regs.clear();
        self.state = STATE_DISABLED;
        self.ready = false;
        self.address = false;
        self.end = false;
        self.disabled = false;
        self.inten = 0;
        self.tx_countdown = None;
        self.disable_countdown = None;
        self.powered = on;
    }
}

pub struct FakeBus {
    sim: SimHandle,
    buffer: PacketBuffer,
}

impl FakeBus {
    fn apply_dma(&mut self) {
        if let Some(payload) = self.sim.borrow_mut().dma_pending.take() {
            self.buffer = PacketBuffer::from(payload);
        }
    }
}

impl RadioBus for FakeBus {
    type Error = ();

    fn read(&mut self, offset: u16, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.apply_dma();
        let raw = self.sim.borrow_mut().read(offset).to_le_bytes();
        let len = bytes.len().min(4);
        bytes[..len].copy_from_slice(&raw[..len]);
        Ok(())
    }

    fn write(&mut self, offset: u16, bytes: &[u8]) -> Result<(), Self::Error> {
        self.apply_dma();
        let mut raw = [0u8; 4];
        let len = bytes.len().min(4);
        raw[..len].copy_from_slice(&bytes[..len]);
        self.sim
            .borrow_mut()
            .write(offset, u32::from_le_bytes(raw), &self.buffer);
        Ok(())
    }

    fn packet_buffer(&self) -> &PacketBuffer {
        &self.buffer
    }

    fn packet_buffer_mut(&mut self) -> &mut PacketBuffer {
        &mut self.buffer
    }

    fn packet_address(&self) -> u32 {
        PACKET_ADDRESS
    }
}

pub struct FakeDelay(SimHandle);

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().elapsed_ns += ns as u64;
    }
}

pub struct FakeNvic(SimHandle);

impl InterruptController for FakeNvic {
    fn enable_radio_irq(&mut self) {
        self.0.borrow_mut().irq_enabled = true;
    }

    fn disable_radio_irq(&mut self) {
        self.0.borrow_mut().irq_enabled = false;
    }
}

pub struct FakeSupply(SimHandle);

impl PowerSupply for FakeSupply {
    fn is_dcdc_mode(&self) -> bool {
        self.0.borrow().dcdc
    }

    fn set_dcdc_mode(&mut self, enabled: bool) {
        self.0.borrow_mut().dcdc = enabled;
    }
}

pub struct FakeClock(SimHandle);

impl CrystalClock for FakeClock {
    fn configure_source(&mut self) {
        self.0.borrow_mut().clock_configured = true;
    }

    fn start(&mut self) {
        let mut sim = self.0.borrow_mut();
        assert!(sim.clock_configured, "crystal started before source selected");
        sim.clock_started = true;
    }

    fn is_running(&self) -> bool {
        let mut sim = self.0.borrow_mut();
        if sim.clock_running || !sim.clock_started {
            return sim.clock_running;
        }
        match sim.clock_polls {
            Some(0) | Some(1) => {
                sim.clock_running = true;
                sim.clock_polls = Some(0);
            }
            Some(left) => sim.clock_polls = Some(left - 1),
            None => {}
        }
        sim.clock_running
    }
}

pub type TestRadio<E> = Radio<FakeBus, FakeDelay, FakeNvic, FakeSupply, FakeClock, E>;

/// A radio wired to a fresh simulated peripheral.
pub fn radio_with<E: EndOfTransaction>(sim: &SimHandle) -> TestRadio<E> {
    let bus = FakeBus {
        sim: sim.clone(),
        buffer: PacketBuffer::new(),
    };
    Radio::init(
        bus,
        FakeDelay(sim.clone()),
        FakeNvic(sim.clone()),
        FakeSupply(sim.clone()),
        FakeClock(sim.clone()),
    )
}

/// The radio interrupt: runs the handler if the line would fire.
pub fn service_irq<E: EndOfTransaction>(radio: &mut TestRadio<E>, sim: &SimHandle) -> bool {
    let pending = sim.borrow().irq_pending();
    if pending {
        radio.received_event_handler().unwrap();
    }
    pending
}

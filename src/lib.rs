#![cfg_attr(not(test), no_std)]
//! nRF52 Radio Driver for energy harvesting sensor nodes
//!
//! This crate drives the 2.4 GHz RADIO peripheral of nRF52 parts for a node
//! that runs from a solar charged capacitor. It sends and receives short,
//! fixed length packets on a single shared channel and address, and it keeps
//! the radio powered only for the duration of a burst.
//!
//! # Features
//! - Fixed 11 byte payload, no length field
//! - One frequency, one network address, no per-peer addressing
//! - 8 or 16 bit CRC, data whitening
//! - 1 or 2 Mbit/s Nordic proprietary modes
//! - Synchronous transmit, interrupt completed receive
//! - Every hardware wait bounded by a timeout
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: capability layer over the peripheral
//!   - Typed register reads and writes, task triggers, event flags
//!   - Piecewise configuration with no protocol knowledge
//!
//! - [`registers`]: Register definitions for direct hardware access
//!   - RF registers (frequency, power, mode)
//!   - Packet format, address and CRC registers
//!   - Shortcuts, interrupts and the hardware state
//!   - Event registers
//!
//! - [`radio`]: the half-duplex state machine applications use
//!
//! - [`power`]: supply voltage bands, consulted before bursting the radio
//!
//! - [`mailbox`]: single-slot handoff for received payloads
//!
//! # Usage
//! Wire a [`Radio`] to a [`RadioBus`] (normally [`MemoryMappedBus`]), a
//! delay, and the board's [`InterruptController`], [`PowerSupply`] and
//! [`CrystalClock`]. Then, per burst:
//!
//! 1. [`Radio::power_on_and_configure`]
//! 2. Any number of transmits and receives
//! 3. [`Radio::power_off`]
//!
//! The radio interrupt handler must call [`Radio::received_event_handler`].
//!
//! # Important Notes
//! - Configuration is only accepted while the radio is `Disabled`
//! - After a receive wakes for any reason other than a received message,
//!   [`Radio::stop_receive`] must run before the next operation
//! - A received packet's buffer and CRC result are valid until the next
//!   transmit, receive or power off
//! - The end-of-transaction interrupt source is chosen at build time with the
//!   `eot-disabled-event` feature
//!
//! # Example
//! ```no_run
//! use sleepsync_radio::{Radio, RadioBus, RadioError, InterruptController, PowerSupply, CrystalClock};
//! use embedded_hal::delay::DelayNs;
//!
//! fn beacon<B, D, N, P, C>(radio: &mut Radio<B, D, N, P, C>) -> Result<(), RadioError>
//! where
//!     B: RadioBus,
//!     D: DelayNs,
//!     N: InterruptController,
//!     P: PowerSupply,
//!     C: CrystalClock,
//! {
//!     radio.power_on_and_configure()?;
//!     radio.buffer_mut()?.copy_from_slice(&[0x42; 11]);
//!     radio.transmit_static_synchronously()?;
//!     radio.power_off()
//! }
//! ```

pub use regiface::errors::Error;
use regiface::*;

pub(crate) mod fmt;

pub mod bus;
pub mod config;
pub mod device;
pub mod eot;
pub mod error;
pub mod mailbox;
pub mod peripherals;
pub mod power;
pub mod radio;
pub mod registers;
pub mod tasks;

pub use bus::{MemoryMappedBus, PacketBuffer, RadioBus, PAYLOAD_LEN, RADIO_BASE};
pub use config::{ConfigError, CrcMode, ProtocolConfig, Timeouts};
pub use device::{AddressLength, Device};
pub use eot::{DefaultEndOfTransaction, DisabledEvent, EndOfTransaction, PacketDone};
pub use error::{Operation, RadioError, Wait};
pub use mailbox::Mailbox;
pub use peripherals::{CrystalClock, InterruptController, PowerSupply};
pub use power::{PowerComparator, PowerManager, Threshold, VoltageBand};
pub use radio::{Radio, RadioState, ReceivedPacket, WakeReason};
pub use registers::{Bitrate, DeviceState, TxPower};

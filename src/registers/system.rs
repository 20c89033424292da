//! System-related registers
//!
//! This module contains registers for peripheral-level control including:
//! - Shortcuts between events and tasks
//! - Interrupt enable/disable
//! - The hardware state machine
//!
//! INTENSET and INTENCLR are write-one-to-act: writing zero bits leaves the
//! corresponding interrupts untouched. Both read back the current enable mask.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

bitflags! {
    /// Event to task shortcuts
    ///
    /// A set shortcut makes the hardware fire the task as soon as the event
    /// is generated, without CPU involvement.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Shortcuts: u32 {
        /// READY event starts the packet (START task)
        const READY_START = 1 << 0;
        /// END event disables the radio (DISABLE task)
        const END_DISABLE = 1 << 1;
        /// DISABLED event restarts the transmitter (TXEN task)
        const DISABLED_TXEN = 1 << 2;
        /// DISABLED event restarts the receiver (RXEN task)
        const DISABLED_RXEN = 1 << 3;
        /// ADDRESS event starts RSSI sampling
        const ADDRESS_RSSISTART = 1 << 4;
        /// END event starts the next packet
        const END_START = 1 << 5;
        /// ADDRESS event starts the bit counter
        const ADDRESS_BCSTART = 1 << 6;
        /// DISABLED event stops RSSI sampling
        const DISABLED_RSSISTOP = 1 << 8;
    }
}

bitflags! {
    /// Radio interrupt sources
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Interrupts: u32 {
        /// Ramp-up complete, ready to start
        const READY = 1 << 0;
        /// Address sent or matched
        const ADDRESS = 1 << 1;
        /// Payload sent or received
        const PAYLOAD = 1 << 2;
        /// Packet sent or received (packet done)
        const END = 1 << 3;
        /// Radio has reached the DISABLED state
        const DISABLED = 1 << 4;
        /// Device address match
        const DEVMATCH = 1 << 5;
        /// Device address miss
        const DEVMISS = 1 << 6;
        /// RSSI sample complete
        const RSSIEND = 1 << 7;
        /// Bit counter reached its compare value
        const BCMATCH = 1 << 10;
        /// Packet received with valid CRC
        const CRCOK = 1 << 12;
        /// Packet received with invalid CRC
        const CRCERROR = 1 << 13;
    }
}

/// Shortcut register (address: 0x200)
#[register(0x0200u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct ShortcutConfig {
    /// Enabled shortcuts
    pub shortcuts: Shortcuts,
}

/// Interrupt enable set register (address: 0x304)
#[register(0x0304u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct InterruptEnableSet {
    /// Interrupts to enable; reads back the enabled mask
    pub interrupts: Interrupts,
}

/// Interrupt enable clear register (address: 0x308)
#[register(0x0308u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct InterruptEnableClear {
    /// Interrupts to disable; reads back the enabled mask
    pub interrupts: Interrupts,
}

/// Error type for device state conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidDeviceState(pub u8);

/// Hardware state register (address: 0x550)
///
/// This is the silicon's own state machine, not the protocol state kept by
/// [`Radio`](crate::Radio). The DISABLED state persists after the DISABLED
/// event has been cleared, until the next task is triggered.
#[register(0x0550u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Idle, safe to reconfigure
    Disabled,
    /// Receiver ramping up
    RxRu,
    /// Receiver ready, waiting for START
    RxIdle,
    /// Receiving
    Rx,
    /// Receiver shutting down
    RxDisable,
    /// Transmitter ramping up
    TxRu,
    /// Transmitter ready, waiting for START
    TxIdle,
    /// Transmitting
    Tx,
    /// Transmitter shutting down
    TxDisable,
}

impl DeviceState {
    /// Convert a raw register byte to a state
    pub fn from_byte(value: u8) -> Result<Self, InvalidDeviceState> {
        match value {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::RxRu),
            2 => Ok(Self::RxIdle),
            3 => Ok(Self::Rx),
            4 => Ok(Self::RxDisable),
            9 => Ok(Self::TxRu),
            10 => Ok(Self::TxIdle),
            11 => Ok(Self::Tx),
            12 => Ok(Self::TxDisable),
            invalid => Err(InvalidDeviceState(invalid)),
        }
    }

    /// Convert the state to its raw register byte
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Disabled => 0,
            Self::RxRu => 1,
            Self::RxIdle => 2,
            Self::Rx => 3,
            Self::RxDisable => 4,
            Self::TxRu => 9,
            Self::TxIdle => 10,
            Self::Tx => 11,
            Self::TxDisable => 12,
        }
    }
}

impl FromByteArray for ShortcutConfig {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            shortcuts: Shortcuts::from_bits_truncate(u32::from_le_bytes(bytes)),
        })
    }
}

impl ToByteArray for ShortcutConfig {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.shortcuts.bits().to_le_bytes())
    }
}

impl FromByteArray for InterruptEnableSet {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            interrupts: Interrupts::from_bits_truncate(u32::from_le_bytes(bytes)),
        })
    }
}

impl ToByteArray for InterruptEnableSet {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.interrupts.bits().to_le_bytes())
    }
}

impl FromByteArray for InterruptEnableClear {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            interrupts: Interrupts::from_bits_truncate(u32::from_le_bytes(bytes)),
        })
    }
}

impl ToByteArray for InterruptEnableClear {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.interrupts.bits().to_le_bytes())
    }
}

impl FromByteArray for DeviceState {
    type Error = InvalidDeviceState;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Self::from_byte(bytes[0] & 0x0F)
    }
}

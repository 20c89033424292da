//! nRF52 RADIO Device Interface
//!
//! This module provides the low-level capability layer for the RADIO
//! peripheral. It knows registers, tasks and events, and nothing about any
//! wireless protocol.
//!
//! The interface is built around the `Device<B>` struct which wraps a
//! [`RadioBus`] and provides methods for:
//! - Reading and writing typed registers
//! - Triggering tasks
//! - Querying and clearing events
//! - Configuring the physical layer piece by piece
//!
//! Nothing here blocks and nothing checks ordering. Calls such as
//! [`Device::configure_whitening_on`] only make sense after
//! [`Device::configure_static_packet_format`], and configuration only makes
//! sense in the DISABLED state; keeping to that is the caller's job.
//!
//! # Example
//! ```no_run
//! use sleepsync_radio::{Device, MemoryMappedBus, PacketBuffer, TxPower, RADIO_BASE};
//!
//! static mut BUFFER: PacketBuffer = PacketBuffer::new();
//!
//! let bus = unsafe { MemoryMappedBus::new(RADIO_BASE, &mut *core::ptr::addr_of_mut!(BUFFER)) };
//! let mut device = Device::new(bus);
//! device.configure_fixed_frequency(80)?;
//! device.configure_xmit_power(TxPower::ZerodBm)?;
//! # Ok::<(), sleepsync_radio::Error>(())
//! ```

use core::convert::Infallible;

use regiface::{
    errors::Error as RegifaceError, ByteArray, Command, FromByteArray, NoParameters,
    ReadableRegister, ToByteArray, WritableRegister,
};

use crate::bus::{PacketBuffer, RadioBus};
use crate::registers::*;
use crate::tasks::{Disable, RxEnable, TxEnable};

/// Base address shared by every unit of the network
pub const NETWORK_BASE_ADDRESS: u32 = 0xE7E7_E7E7;
/// Prefix byte of logical address 0
pub const NETWORK_ADDRESS_PREFIX: u8 = 0xE7;

/// Length class of the on-air address.
///
/// The address is one prefix byte plus a base of one to three bytes. It is
/// not part of the payload buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressLength {
    /// 1 byte prefix, 1 byte base
    Short,
    /// 1 byte prefix, 2 bytes base
    Medium,
    /// 1 byte prefix, 3 bytes base
    Long,
}

impl AddressLength {
    /// Total on-air address length in bytes
    pub fn bytes(self) -> u8 {
        match self {
            Self::Short => 2,
            Self::Medium => 3,
            Self::Long => 4,
        }
    }

    fn base_bytes(self) -> u8 {
        self.bytes() - 1
    }
}

/// Main device interface for the RADIO peripheral.
///
/// This struct wraps a register bus and exposes the peripheral's tasks,
/// events and configuration registers without protocol meaning.
pub struct Device<B> {
    bus: B,
}

impl<B> Device<B> {
    /// Creates a new Device instance wrapping the provided bus.
    ///
    /// # Arguments
    /// * `bus` - Access to the register block and its DMA buffer
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Releases the underlying bus.
    ///
    /// This method consumes the Device instance and returns the wrapped bus.
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B> Device<B>
where
    B: RadioBus,
{
    /// Reads a register value from the device.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing ReadableRegister with u16 ID
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - Bus transfer failed
    /// * `RegifaceError::DeserializationError` - Failed to parse register value
    pub fn read_register<R>(&mut self) -> Result<R, RegifaceError>
    where
        R: ReadableRegister<IdType = u16>,
    {
        let mut raw_value = R::Array::new();

        self.bus
            .read(R::id(), raw_value.as_mut())
            .map_err(|_| RegifaceError::BusError)?;

        R::from_bytes(raw_value).map_err(|_| RegifaceError::DeserializationError)
    }

    /// Writes a value to a device register.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing WritableRegister with u16 ID
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - Bus transfer failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), RegifaceError>
    where
        R: WritableRegister<IdType = u16, Error = Infallible>,
    {
        let raw_value = match register.to_bytes() {
            Ok(raw) => raw,
            Err(never) => match never {},
        };

        self.bus
            .write(R::id(), raw_value.as_ref())
            .map_err(|_| RegifaceError::BusError)
    }

    /// Triggers a task on the device.
    ///
    /// Tasks are fire-and-forget: this returns as soon as the trigger has
    /// been written.
    ///
    /// # Errors
    /// * `RegifaceError::BusError` - Bus transfer failed
    pub fn execute_command<C>(&mut self, command: C) -> Result<(), RegifaceError>
    where
        C: Command<IdType = u16, ResponseParameters = NoParameters>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
    {
        let request = match command.invoking_parameters().to_bytes() {
            Ok(raw) => raw,
            Err(never) => match never {},
        };

        self.bus
            .write(C::id(), request.as_ref())
            .map_err(|_| RegifaceError::BusError)
    }

    /// The DMA packet buffer.
    pub fn buffer(&self) -> &PacketBuffer {
        self.bus.packet_buffer()
    }

    /// The DMA packet buffer, mutably.
    pub fn buffer_mut(&mut self) -> &mut PacketBuffer {
        self.bus.packet_buffer_mut()
    }

    // Configuration

    /// Tunes to `2400 + index` MHz.
    pub fn configure_fixed_frequency(&mut self, index: u8) -> Result<(), RegifaceError> {
        self.write_register(Frequency {
            index,
            low_map: false,
        })
    }

    /// Carrier frequency currently configured, in MHz.
    pub fn frequency(&mut self) -> Result<u32, RegifaceError> {
        Ok(self.read_register::<Frequency>()?.mhz())
    }

    /// Programs the shared network address into logical address 0 and
    /// receives only on it.
    pub fn configure_network_address_pool(&mut self) -> Result<(), RegifaceError> {
        self.write_register(BaseAddress0 {
            address: NETWORK_BASE_ADDRESS,
        })?;
        self.write_register(Prefix0 {
            prefixes: [NETWORK_ADDRESS_PREFIX, 0, 0, 0],
        })?;
        self.write_register(RxAddresses { enabled: 0x01 })
    }

    /// Transmits on logical address 0.
    pub fn configure_fixed_logical_address(&mut self) -> Result<(), RegifaceError> {
        self.write_register(TxAddress { logical_address: 0 })
    }

    /// One byte CRC, x^8 + x^2 + x + 1, suited to short payloads.
    pub fn configure_short_crc(&mut self) -> Result<(), RegifaceError> {
        self.write_register(CrcConfig {
            length: CrcLength::One,
            skip_address: false,
        })?;
        self.write_register(CrcInitialValue { value: 0xFF })?;
        self.write_register(CrcPolynomial { value: 0x107 })
    }

    /// Two byte CRC-16-CCITT.
    pub fn configure_medium_crc(&mut self) -> Result<(), RegifaceError> {
        self.write_register(CrcConfig {
            length: CrcLength::Two,
            skip_address: false,
        })?;
        self.write_register(CrcInitialValue { value: 0xFFFF })?;
        self.write_register(CrcPolynomial { value: 0x1_1021 })
    }

    /// Static layout: no S0, LENGTH or S1 field, `payload_len` bytes of
    /// payload, big-endian on air.
    ///
    /// Rewrites PCNF1 as a whole, which switches whitening off.
    pub fn configure_static_packet_format(
        &mut self,
        payload_len: u8,
        address_length: AddressLength,
    ) -> Result<(), RegifaceError> {
        self.write_register(PacketConfig0::default())?;
        self.write_register(PacketConfig1 {
            max_len: payload_len,
            static_len: payload_len,
            base_address_len: address_length.base_bytes(),
            big_endian: true,
            whitening: false,
        })
    }

    /// Enables whitening, keeping the rest of PCNF1.
    ///
    /// Must follow [`Device::configure_static_packet_format`].
    pub fn configure_whitening_on(&mut self) -> Result<(), RegifaceError> {
        let pcnf1 = self.read_register::<PacketConfig1>()?;
        self.write_register(PacketConfig1 {
            whitening: true,
            ..pcnf1
        })
    }

    /// Seeds the whitening LFSR. Only the low six bits are used.
    pub fn configure_whitening_seed(&mut self, seed: u8) -> Result<(), RegifaceError> {
        self.write_register(WhiteningInitialValue { seed })
    }

    pub fn configure_xmit_power(&mut self, power: TxPower) -> Result<(), RegifaceError> {
        self.write_register(power)
    }

    pub fn configure_mega_bitrate(&mut self, bitrate: Bitrate) -> Result<(), RegifaceError> {
        self.write_register(bitrate)
    }

    pub fn configure_fast_ramp_up(&mut self) -> Result<(), RegifaceError> {
        self.write_register(ModeConfig { fast_ramp_up: true })
    }

    pub fn configure_shortcuts(&mut self, shortcuts: Shortcuts) -> Result<(), RegifaceError> {
        self.write_register(ShortcutConfig { shortcuts })
    }

    /// Points the DMA engine at the packet buffer.
    pub fn configure_packet_address(&mut self) -> Result<(), RegifaceError> {
        let address = self.bus.packet_address();
        self.write_register(PacketPointer { address })
    }

    // Reception results, only meaningful right after a completed receive

    pub fn is_crc_valid(&mut self) -> Result<bool, RegifaceError> {
        Ok(self.read_register::<CrcStatus>()?.ok)
    }

    pub fn received_logical_address(&mut self) -> Result<u8, RegifaceError> {
        Ok(self.read_register::<RxMatch>()?.logical_address)
    }

    // Tasks

    pub fn start_rx_task(&mut self) -> Result<(), RegifaceError> {
        self.execute_command(RxEnable)
    }

    pub fn start_tx_task(&mut self) -> Result<(), RegifaceError> {
        self.execute_command(TxEnable)
    }

    pub fn start_disabling_task(&mut self) -> Result<(), RegifaceError> {
        self.execute_command(Disable)
    }

    // Events and state

    /// Hardware state machine position.
    pub fn device_state(&mut self) -> Result<DeviceState, RegifaceError> {
        self.read_register::<DeviceState>()
    }

    /// True while the hardware sits in DISABLED, whether or not the DISABLED
    /// event has been cleared.
    pub fn is_disabled_state(&mut self) -> Result<bool, RegifaceError> {
        Ok(self.device_state()? == DeviceState::Disabled)
    }

    pub fn is_disabled_event_set(&mut self) -> Result<bool, RegifaceError> {
        Ok(self.read_register::<EventDisabled>()?.generated)
    }

    pub fn clear_disabled_event(&mut self) -> Result<(), RegifaceError> {
        self.write_register(EventDisabled::CLEAR)
    }

    /// Address matched: a packet is being clocked in.
    pub fn is_receive_in_progress_event(&mut self) -> Result<bool, RegifaceError> {
        Ok(self.read_register::<EventAddress>()?.generated)
    }

    pub fn clear_receive_in_progress_event(&mut self) -> Result<(), RegifaceError> {
        self.write_register(EventAddress::CLEAR)
    }

    pub fn is_packet_done(&mut self) -> Result<bool, RegifaceError> {
        Ok(self.read_register::<EventEnd>()?.generated)
    }

    pub fn clear_packet_done_event(&mut self) -> Result<(), RegifaceError> {
        self.write_register(EventEnd::CLEAR)
    }

    // Interrupts

    pub fn enable_interrupts(&mut self, interrupts: Interrupts) -> Result<(), RegifaceError> {
        self.write_register(InterruptEnableSet { interrupts })
    }

    pub fn disable_interrupts(&mut self, interrupts: Interrupts) -> Result<(), RegifaceError> {
        self.write_register(InterruptEnableClear { interrupts })
    }

    pub fn enabled_interrupts(&mut self) -> Result<Interrupts, RegifaceError> {
        Ok(self.read_register::<InterruptEnableSet>()?.interrupts)
    }

    // Power

    /// Powers the peripheral on or off. Powering off resets every register.
    pub fn set_radio_powered(&mut self, enabled: bool) -> Result<(), RegifaceError> {
        self.write_register(Power { enabled })
    }

    pub fn is_power_on(&mut self) -> Result<bool, RegifaceError> {
        Ok(self.read_register::<Power>()?.enabled)
    }
}

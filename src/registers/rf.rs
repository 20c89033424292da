//! RF-related registers
//!
//! This module contains registers related to RF configuration and operation including:
//! - Carrier frequency selection
//! - Transmit power
//! - On-air bitrate
//! - Ramp-up timing
//! - Peripheral power
//!
//! All RADIO registers are 32 bits wide and little-endian on the bus.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Lowest carrier the default frequency map can reach, in MHz.
pub const BASE_FREQUENCY_MHZ: u32 = 2400;
/// Lowest carrier the low frequency map can reach, in MHz.
pub const LOW_BASE_FREQUENCY_MHZ: u32 = 2360;
/// Largest offset accepted by the FREQUENCY register.
pub const MAX_FREQUENCY_INDEX: u8 = 100;

/// Frequency register (address: 0x508)
///
/// Selects the carrier as an offset in 1 MHz steps above the band base.
///
/// # Important Notes
/// - Must only be written while the radio is in the DISABLED state
/// - Offsets above 100 are not supported by the synthesizer
#[register(0x0508u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct Frequency {
    /// Offset from the band base in MHz, range 0..=100
    pub index: u8,
    /// Use the 2360 MHz base instead of 2400 MHz
    pub low_map: bool,
}

impl Frequency {
    /// Carrier frequency in MHz
    pub fn mhz(&self) -> u32 {
        let base = if self.low_map {
            LOW_BASE_FREQUENCY_MHZ
        } else {
            BASE_FREQUENCY_MHZ
        };
        base + self.index as u32
    }
}

/// Error type for TX power conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidTxPower(pub u8);

/// TX power register (address: 0x50C)
///
/// Output power in dBm. The register holds a two's complement value and only
/// the listed steps are valid.
#[register(0x050Cu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxPower {
    /// +4 dBm
    Pos4dBm,
    /// +3 dBm
    Pos3dBm,
    /// 0 dBm
    ZerodBm,
    /// -4 dBm
    Neg4dBm,
    /// -8 dBm
    Neg8dBm,
    /// -12 dBm
    Neg12dBm,
    /// -16 dBm
    Neg16dBm,
    /// -20 dBm
    Neg20dBm,
    /// -40 dBm
    Neg40dBm,
}

impl Default for TxPower {
    fn default() -> Self {
        Self::ZerodBm
    }
}

impl TxPower {
    /// Output power in dBm
    pub fn dbm(self) -> i8 {
        match self {
            Self::Pos4dBm => 4,
            Self::Pos3dBm => 3,
            Self::ZerodBm => 0,
            Self::Neg4dBm => -4,
            Self::Neg8dBm => -8,
            Self::Neg12dBm => -12,
            Self::Neg16dBm => -16,
            Self::Neg20dBm => -20,
            Self::Neg40dBm => -40,
        }
    }

    /// Convert a raw register byte to a power step
    pub fn from_byte(value: u8) -> Result<Self, InvalidTxPower> {
        match value as i8 {
            4 => Ok(Self::Pos4dBm),
            3 => Ok(Self::Pos3dBm),
            0 => Ok(Self::ZerodBm),
            -4 => Ok(Self::Neg4dBm),
            -8 => Ok(Self::Neg8dBm),
            -12 => Ok(Self::Neg12dBm),
            -16 => Ok(Self::Neg16dBm),
            -20 => Ok(Self::Neg20dBm),
            -40 => Ok(Self::Neg40dBm),
            _ => Err(InvalidTxPower(value)),
        }
    }

    /// Convert the power step to its raw register byte
    pub fn to_byte(self) -> u8 {
        self.dbm() as u8
    }
}

/// Error type for bitrate conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidBitrate(pub u8);

/// Mode register (address: 0x510)
///
/// Selects the on-air data rate and modulation. Only the proprietary
/// Nordic modes are used here.
#[register(0x0510u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bitrate {
    /// 1 Mbit/s Nordic proprietary
    Nrf1Mbit,
    /// 2 Mbit/s Nordic proprietary
    Nrf2Mbit,
}

impl Default for Bitrate {
    fn default() -> Self {
        Self::Nrf2Mbit
    }
}

impl Bitrate {
    /// Map a rate in megabits per second to a mode
    pub fn from_megabits(megabits: u8) -> Option<Self> {
        match megabits {
            1 => Some(Self::Nrf1Mbit),
            2 => Some(Self::Nrf2Mbit),
            _ => None,
        }
    }

    /// Rate in megabits per second
    pub fn megabits(self) -> u8 {
        match self {
            Self::Nrf1Mbit => 1,
            Self::Nrf2Mbit => 2,
        }
    }
}

/// Mode configuration register (address: 0x650)
///
/// Fast ramp-up cuts the TXEN/RXEN to READY time from ~140µs to ~40µs at the
/// cost of the slower mode's frequency accuracy margin.
#[register(0x0650u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct ModeConfig {
    /// Use fast ramp-up
    pub fast_ramp_up: bool,
}

/// Peripheral power register (address: 0xFFC)
///
/// Writing false resets every register of the peripheral to its
/// power-on default.
#[register(0x0FFCu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Power {
    /// Peripheral is powered
    pub enabled: bool,
}

impl Default for Power {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl FromByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let raw = u32::from_le_bytes(bytes);
        Ok(Self {
            index: (raw & 0x7F) as u8,
            low_map: raw & (1 << 8) != 0,
        })
    }
}

impl ToByteArray for Frequency {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let raw = (self.index as u32 & 0x7F) | ((self.low_map as u32) << 8);
        Ok(raw.to_le_bytes())
    }
}

impl FromByteArray for TxPower {
    type Error = InvalidTxPower;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Self::from_byte(bytes[0])
    }
}

impl ToByteArray for TxPower {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        // Sign-extended so the register reads back the same as hardware does
        Ok((self.dbm() as i32 as u32).to_le_bytes())
    }
}

impl FromByteArray for Bitrate {
    type Error = InvalidBitrate;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        match bytes[0] & 0x0F {
            0 => Ok(Self::Nrf1Mbit),
            1 => Ok(Self::Nrf2Mbit),
            invalid => Err(InvalidBitrate(invalid)),
        }
    }
}

impl ToByteArray for Bitrate {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let raw: u32 = match self {
            Self::Nrf1Mbit => 0,
            Self::Nrf2Mbit => 1,
        };
        Ok(raw.to_le_bytes())
    }
}

impl FromByteArray for ModeConfig {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            fast_ramp_up: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for ModeConfig {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.fast_ramp_up as u32).to_le_bytes())
    }
}

impl FromByteArray for Power {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            enabled: bytes[0] & 0x01 != 0,
        })
    }
}

impl ToByteArray for Power {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.enabled as u32).to_le_bytes())
    }
}

//! Packet handling related registers
//!
//! This module contains registers for configuring packet handling features including:
//! - On-air packet layout (S0, LENGTH, S1 fields and payload length)
//! - Data whitening configuration
//! - CRC calculation settings
//! - Address matching
//! - The DMA packet pointer
//!
//! The static packet layout used by this crate carries no S0, LENGTH or S1
//! field; both ends agree on the payload length out of band.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Packet configuration register 0 (address: 0x514)
///
/// Sizes of the header fields that precede the payload in RAM and on air.
/// All zero for a static layout.
#[register(0x0514u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct PacketConfig0 {
    /// Length of the LENGTH field in bits (0..=15)
    pub length_bits: u8,
    /// Length of the S0 field in bytes (0 or 1)
    pub s0_bytes: u8,
    /// Length of the S1 field in bits (0..=15)
    pub s1_bits: u8,
}

/// Packet configuration register 1 (address: 0x518)
///
/// # Important Notes
/// - `static_len` bytes are always sent/received in addition to any LENGTH field
/// - Whitening lives in this register, so any write of the whole register must
///   be followed by re-enabling whitening
#[register(0x0518u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct PacketConfig1 {
    /// Maximum payload length in bytes
    pub max_len: u8,
    /// Static payload length in bytes
    pub static_len: u8,
    /// Base address length in bytes, not counting the prefix byte
    pub base_address_len: u8,
    /// Transmit payload most significant bit first
    pub big_endian: bool,
    /// Data whitening enabled
    pub whitening: bool,
}

/// Base address 0 register (address: 0x51C)
#[register(0x051Cu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct BaseAddress0 {
    /// Base address shared by logical addresses 0
    pub address: u32,
}

/// Prefixes register 0 (address: 0x524)
///
/// One prefix byte for each of logical addresses 0..=3.
#[register(0x0524u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct Prefix0 {
    /// Address prefix bytes, indexed by logical address
    pub prefixes: [u8; 4],
}

/// Transmit address register (address: 0x52C)
#[register(0x052Cu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct TxAddress {
    /// Logical address used when transmitting (0..=7)
    pub logical_address: u8,
}

/// Receive addresses register (address: 0x530)
#[register(0x0530u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct RxAddresses {
    /// One bit per logical address accepted when receiving
    pub enabled: u8,
}

/// CRC field length in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcLength {
    /// No CRC
    Disabled = 0,
    /// One byte
    One = 1,
    /// Two bytes
    Two = 2,
    /// Three bytes
    Three = 3,
}

impl Default for CrcLength {
    fn default() -> Self {
        Self::Disabled
    }
}

/// CRC configuration register (address: 0x534)
#[register(0x0534u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct CrcConfig {
    /// CRC length
    pub length: CrcLength,
    /// Exclude the address field from the CRC calculation
    pub skip_address: bool,
}

/// CRC polynomial register (address: 0x538)
///
/// Each set bit `n` stands for the term x^n. The x^0 term is implicit.
///
/// # Examples
/// - CRC-8 x^8 + x^2 + x + 1: 0x107
/// - CRC-16-CCITT x^16 + x^12 + x^5 + 1: 0x11021
#[register(0x0538u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct CrcPolynomial {
    /// Polynomial, 24 bits used
    pub value: u32,
}

/// CRC initial value register (address: 0x53C)
#[register(0x053Cu16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct CrcInitialValue {
    /// Initial CRC value, 24 bits used
    pub value: u32,
}

/// Whitening initial value register (address: 0x554)
///
/// Seeds the 7-bit whitening LFSR. Bit 6 is hardwired to one, so only the
/// lower six bits are configurable.
#[register(0x0554u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct WhiteningInitialValue {
    /// LFSR seed, range 0..=0x3F
    pub seed: u8,
}

impl Default for WhiteningInitialValue {
    fn default() -> Self {
        Self { seed: 0x3F }
    }
}

/// Packet pointer register (address: 0x504)
///
/// RAM address the EasyDMA reads the payload from on transmit and writes it to
/// on receive. Must be word aligned and in data RAM.
#[register(0x0504u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
pub struct PacketPointer {
    /// Buffer address
    pub address: u32,
}

/// CRC status register (address: 0x400)
///
/// Only meaningful right after a packet has been received.
#[register(0x0400u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct CrcStatus {
    /// Last received packet had a valid CRC
    pub ok: bool,
}

/// Received address register (address: 0x408)
///
/// Only meaningful right after a packet has been received.
#[register(0x0408u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RxMatch {
    /// Logical address the last packet was received on
    pub logical_address: u8,
}

impl FromByteArray for PacketConfig0 {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            length_bits: bytes[0] & 0x0F,
            s0_bytes: bytes[1] & 0x01,
            s1_bits: bytes[2] & 0x0F,
        })
    }
}

impl ToByteArray for PacketConfig0 {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([
            self.length_bits & 0x0F,
            self.s0_bytes & 0x01,
            self.s1_bits & 0x0F,
            0,
        ])
    }
}

impl FromByteArray for PacketConfig1 {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            max_len: bytes[0],
            static_len: bytes[1],
            base_address_len: bytes[2] & 0x07,
            big_endian: bytes[3] & 0x01 != 0,
            whitening: bytes[3] & 0x02 != 0,
        })
    }
}

impl ToByteArray for PacketConfig1 {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([
            self.max_len,
            self.static_len,
            self.base_address_len & 0x07,
            (self.big_endian as u8) | ((self.whitening as u8) << 1),
        ])
    }
}

impl FromByteArray for BaseAddress0 {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            address: u32::from_le_bytes(bytes),
        })
    }
}

impl ToByteArray for BaseAddress0 {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.address.to_le_bytes())
    }
}

impl FromByteArray for Prefix0 {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { prefixes: bytes })
    }
}

impl ToByteArray for Prefix0 {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.prefixes)
    }
}

impl FromByteArray for TxAddress {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            logical_address: bytes[0] & 0x07,
        })
    }
}

impl ToByteArray for TxAddress {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.logical_address & 0x07, 0, 0, 0])
    }
}

impl FromByteArray for RxAddresses {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { enabled: bytes[0] })
    }
}

impl ToByteArray for RxAddresses {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.enabled, 0, 0, 0])
    }
}

impl FromByteArray for CrcConfig {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        let length = match bytes[0] & 0x03 {
            0 => CrcLength::Disabled,
            1 => CrcLength::One,
            2 => CrcLength::Two,
            _ => CrcLength::Three,
        };
        Ok(Self {
            length,
            skip_address: bytes[1] & 0x01 != 0,
        })
    }
}

impl ToByteArray for CrcConfig {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.length as u8, self.skip_address as u8, 0, 0])
    }
}

impl FromByteArray for CrcPolynomial {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u32::from_le_bytes(bytes) & 0x00FF_FFFF,
        })
    }
}

impl ToByteArray for CrcPolynomial {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.value & 0x00FF_FFFF).to_le_bytes())
    }
}

impl FromByteArray for CrcInitialValue {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            value: u32::from_le_bytes(bytes) & 0x00FF_FFFF,
        })
    }
}

impl ToByteArray for CrcInitialValue {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.value & 0x00FF_FFFF).to_le_bytes())
    }
}

impl FromByteArray for WhiteningInitialValue {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            seed: bytes[0] & 0x3F,
        })
    }
}

impl ToByteArray for WhiteningInitialValue {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([(self.seed & 0x3F) | 0x40, 0, 0, 0])
    }
}

impl FromByteArray for PacketPointer {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            address: u32::from_le_bytes(bytes),
        })
    }
}

impl ToByteArray for PacketPointer {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.address.to_le_bytes())
    }
}

impl FromByteArray for CrcStatus {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            ok: bytes[0] & 0x01 != 0,
        })
    }
}

impl FromByteArray for RxMatch {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            logical_address: bytes[0] & 0x07,
        })
    }
}

//! Physical protocol parameters and hardware wait bounds
//!
//! Every unit of the network must agree on the whole [`ProtocolConfig`]:
//! there is no negotiation and no per-peer addressing. The defaults are the
//! protocol; overriding them is for bench work.

use crate::bus::PAYLOAD_LEN;
use crate::device::AddressLength;
use crate::registers::{Bitrate, TxPower, MAX_FREQUENCY_INDEX};

/// Channel 80, 2480 MHz. Above the busy part of the Wi-Fi band.
pub const FREQUENCY_INDEX: u8 = 80;
/// Default whitening seed
pub const WHITENING_SEED: u8 = 0x25;

/// CRC strength
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcMode {
    /// 8 bit
    Short,
    /// 16 bit
    Medium,
}

/// Rejected configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Frequency index above 100
    FrequencyIndex(u8),
    /// Whitening seed wider than six bits
    WhiteningSeed(u8),
    /// A timeout of zero or a zero poll interval
    ZeroTimeout,
}

/// Physical layer configuration, applied once per power cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolConfig {
    /// Carrier is `2400 + frequency_index` MHz
    pub frequency_index: u8,
    pub address_length: AddressLength,
    pub crc: CrcMode,
    pub whitening_seed: u8,
    pub bitrate: Bitrate,
    pub tx_power: TxPower,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            frequency_index: FREQUENCY_INDEX,
            address_length: AddressLength::Medium,
            crc: CrcMode::Short,
            whitening_seed: WHITENING_SEED,
            bitrate: Bitrate::Nrf2Mbit,
            tx_power: TxPower::ZerodBm,
        }
    }
}

impl ProtocolConfig {
    /// Payload bytes per packet. Fixed by the buffer size.
    pub const PAYLOAD_LEN: u8 = PAYLOAD_LEN as u8;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frequency_index > MAX_FREQUENCY_INDEX {
            return Err(ConfigError::FrequencyIndex(self.frequency_index));
        }
        if self.whitening_seed > 0x3F {
            return Err(ConfigError::WhiteningSeed(self.whitening_seed));
        }
        Ok(())
    }
}

/// Upper bounds, in microseconds, on each hardware wait.
///
/// Waits poll every `poll_interval_us`; the defaults allow several times the
/// datasheet figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timeouts {
    /// Crystal start-up to stable
    pub clock_stable_us: u32,
    /// DISABLE task to DISABLED state
    pub disable_us: u32,
    /// TXEN to end of transmission, ramp-up included
    pub transmit_us: u32,
    /// Delay between polls
    pub poll_interval_us: u32,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            clock_stable_us: 1_500,
            disable_us: 200,
            transmit_us: 2_000,
            poll_interval_us: 1,
        }
    }
}

impl Timeouts {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock_stable_us == 0
            || self.disable_us == 0
            || self.transmit_us == 0
            || self.poll_interval_us == 0
        {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_protocol() {
        let config = ProtocolConfig::default();
        assert_eq!(config.frequency_index, 80);
        assert_eq!(config.bitrate.megabits(), 2);
        assert_eq!(ProtocolConfig::PAYLOAD_LEN, 11);
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(Timeouts::default().validate(), Ok(()));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = ProtocolConfig {
            frequency_index: 101,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::FrequencyIndex(101)));

        let config = ProtocolConfig {
            whitening_seed: 0x40,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WhiteningSeed(0x40)));

        let timeouts = Timeouts {
            disable_us: 0,
            ..Default::default()
        };
        assert_eq!(timeouts.validate(), Err(ConfigError::ZeroTimeout));
    }
}

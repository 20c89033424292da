use core::fmt;

use regiface::errors::Error as RegifaceError;

use crate::config::ConfigError;
use crate::radio::RadioState;

/// Driver operation, as named in [`RadioError::InvalidState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operation {
    PowerOnAndConfigure,
    Configure,
    Transmit,
    Receive,
    StopReceive,
    WriteBuffer,
}

/// Hardware condition that was waited on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wait {
    /// Crystal running
    ClockStart,
    /// Radio reaching DISABLED
    Disable,
    /// End of transmission
    Transmit,
}

/// Radio driver error.
#[derive(Debug)]
pub enum RadioError {
    /// Register access failed.
    Device(RegifaceError),
    /// Operation not legal in the current state. Nothing was changed.
    InvalidState {
        operation: Operation,
        state: RadioState,
    },
    /// Hardware did not reach the expected condition in time.
    Timeout(Wait),
    /// No completed, unread reception.
    NoPacket,
    /// Configuration rejected.
    InvalidConfig(ConfigError),
}

impl From<RegifaceError> for RadioError {
    fn from(value: RegifaceError) -> Self {
        Self::Device(value)
    }
}

impl From<ConfigError> for RadioError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(e) => write!(f, "register access error: {:?}", e),
            Self::InvalidState { operation, state } => {
                write!(f, "{:?} not allowed while {:?}", operation, state)
            }
            Self::Timeout(wait) => write!(f, "timed out waiting for {:?}", wait),
            Self::NoPacket => write!(f, "no received packet"),
            Self::InvalidConfig(e) => write!(f, "invalid configuration: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RadioError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Device(_) => defmt::write!(fmt, "register access error"),
            Self::InvalidState { operation, state } => {
                defmt::write!(fmt, "{} not allowed while {}", operation, state)
            }
            Self::Timeout(wait) => defmt::write!(fmt, "timed out waiting for {}", wait),
            Self::NoPacket => defmt::write!(fmt, "no received packet"),
            Self::InvalidConfig(e) => defmt::write!(fmt, "invalid configuration: {}", e),
        }
    }
}

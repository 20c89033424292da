//! Radio task triggers
//!
//! Tasks are the peripheral's commands. Writing `1` to a task register starts
//! the corresponding hardware sequence and returns immediately; completion is
//! reported later through the event registers.
//!
//! # Task Sequencing
//! - TXEN and RXEN are only valid from the DISABLED state
//! - DISABLE is valid from any state and always ends in DISABLED
//! - With the READY→START shortcut, TXEN/RXEN also start the packet
//! - With the END→DISABLE shortcut, a finished packet disables the radio
//!
//! None of the tasks check the current state. Triggering one out of sequence
//! leaves the peripheral in an undefined condition, so ordering is enforced
//! by [`Radio`](crate::Radio).

use core::convert::Infallible;

use crate::{Command, NoParameters, ToByteArray};

/// Task trigger value
///
/// The only value with an effect when written to a task register.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trigger;

impl ToByteArray for Trigger {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(1u32.to_le_bytes())
    }
}

/// TXEN task (0x000)
///
/// Ramps up the transmitter.
///
/// # Important Notes
/// - Takes ~40µs with fast ramp-up, ~140µs otherwise
/// - Payload is read from the packet pointer once the packet starts
/// - Buffer must not be touched until the END event
#[derive(Debug, Clone, Default)]
pub struct TxEnable;

impl Command for TxEnable {
    type IdType = u16;
    type CommandParameters = Trigger;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0000
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        Trigger
    }
}

/// RXEN task (0x004)
///
/// Ramps up the receiver.
///
/// # Important Notes
/// - Receiver listens until a packet matching an enabled address arrives
///   or DISABLE is triggered
/// - Payload is written to the packet pointer as it is clocked in
#[derive(Debug, Clone, Default)]
pub struct RxEnable;

impl Command for RxEnable {
    type IdType = u16;
    type CommandParameters = Trigger;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0004
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        Trigger
    }
}

/// DISABLE task (0x010)
///
/// Shuts the transmitter or receiver down.
///
/// # Important Notes
/// - Generates the DISABLED event once the DISABLED state is reached
/// - Takes a few microseconds from RX, longer from TX while a packet is on air
#[derive(Debug, Clone, Default)]
pub struct Disable;

impl Command for Disable {
    type IdType = u16;
    type CommandParameters = Trigger;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x0010
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        Trigger
    }
}

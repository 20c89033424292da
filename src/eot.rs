//! End-of-transaction signal selection
//!
//! A receive completes on one interrupt source. Parts with a usable packet
//! done event use END; otherwise the DISABLED event, which the END→DISABLE
//! shortcut raises right after END, stands in for it. The choice is made once
//! per build through the `eot-disabled-event` feature, which sets
//! [`DefaultEndOfTransaction`].

use regiface::errors::Error as RegifaceError;

use crate::bus::RadioBus;
use crate::device::Device;
use crate::registers::Interrupts;

/// Source of the end-of-transaction interrupt.
pub trait EndOfTransaction {
    /// Interrupt enable bit of the source
    const INTERRUPT: Interrupts;

    /// Whether the source event has been generated.
    fn is_event_set<B: RadioBus>(device: &mut Device<B>) -> Result<bool, RegifaceError>;

    /// Clears the source event.
    fn clear_event<B: RadioBus>(device: &mut Device<B>) -> Result<(), RegifaceError>;

    fn enable_interrupt<B: RadioBus>(device: &mut Device<B>) -> Result<(), RegifaceError> {
        device.enable_interrupts(Self::INTERRUPT)
    }

    fn disable_interrupt<B: RadioBus>(device: &mut Device<B>) -> Result<(), RegifaceError> {
        device.disable_interrupts(Self::INTERRUPT)
    }

    fn is_interrupt_enabled<B: RadioBus>(device: &mut Device<B>) -> Result<bool, RegifaceError> {
        Ok(device.enabled_interrupts()?.contains(Self::INTERRUPT))
    }
}

/// END event: the packet has been sent or received.
///
/// The hardware is still on its way to DISABLED when this fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketDone;

impl EndOfTransaction for PacketDone {
    const INTERRUPT: Interrupts = Interrupts::END;

    fn is_event_set<B: RadioBus>(device: &mut Device<B>) -> Result<bool, RegifaceError> {
        device.is_packet_done()
    }

    fn clear_event<B: RadioBus>(device: &mut Device<B>) -> Result<(), RegifaceError> {
        device.clear_packet_done_event()
    }
}

/// DISABLED event reused as end-of-transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEvent;

impl EndOfTransaction for DisabledEvent {
    const INTERRUPT: Interrupts = Interrupts::DISABLED;

    fn is_event_set<B: RadioBus>(device: &mut Device<B>) -> Result<bool, RegifaceError> {
        device.is_disabled_event_set()
    }

    fn clear_event<B: RadioBus>(device: &mut Device<B>) -> Result<(), RegifaceError> {
        device.clear_disabled_event()
    }
}

/// End-of-transaction source selected for this build.
#[cfg(not(feature = "eot-disabled-event"))]
pub type DefaultEndOfTransaction = PacketDone;

/// End-of-transaction source selected for this build.
#[cfg(feature = "eot-disabled-event")]
pub type DefaultEndOfTransaction = DisabledEvent;

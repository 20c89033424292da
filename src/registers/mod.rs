//! Register definitions for the nRF52 RADIO peripheral
//! Offsets are relative to the peripheral base address (0x4000_1000).

mod events;
mod packet;
mod rf;
mod system;

pub use events::*;
pub use packet::*;
pub use rf::*;
pub use system::*;

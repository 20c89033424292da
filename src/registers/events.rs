//! Event registers
//!
//! Each event register reads non-zero once the hardware has generated the
//! event and stays that way until software writes zero to it. Events are
//! one-shot signals: the DISABLED event is not the same thing as the DISABLED
//! state reported by [`DeviceState`](super::DeviceState).

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

macro_rules! event_registers {
    (
        $(
            $(#[$docs:meta])*
            ($name:ident, $addr:literal);
        )+
    ) => {
        $(
            $(#[$docs])*
            #[register($addr)]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ReadableRegister, WritableRegister)]
            pub struct $name {
                /// Event has been generated since it was last cleared
                pub generated: bool,
            }

            impl $name {
                /// Value that clears the event when written
                pub const CLEAR: Self = Self { generated: false };
            }

            impl FromByteArray for $name {
                type Error = Infallible;
                type Array = [u8; 4];

                fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                    Ok(Self {
                        generated: u32::from_le_bytes(bytes) != 0,
                    })
                }
            }

            impl ToByteArray for $name {
                type Error = Infallible;
                type Array = [u8; 4];

                fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                    Ok((self.generated as u32).to_le_bytes())
                }
            }
        )+
    };
}

event_registers! {
    /// READY event register (address: 0x100)
    ///
    /// Ramp-up finished and the radio is ready to start.
    (EventReady, 0x0100u16);
    /// ADDRESS event register (address: 0x104)
    ///
    /// Address sent or matched: on receive, a packet is being clocked in.
    (EventAddress, 0x0104u16);
    /// END event register (address: 0x10C)
    ///
    /// Packet sent or received. This is the dedicated packet-done signal.
    (EventEnd, 0x010Cu16);
    /// DISABLED event register (address: 0x110)
    ///
    /// The radio has entered the DISABLED state.
    (EventDisabled, 0x0110u16);
}

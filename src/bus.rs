//! Register bus and DMA packet memory
//!
//! The RADIO peripheral is memory mapped and moves payloads by EasyDMA, so a
//! bus here is two things: a way to move the bytes of a 32-bit register, and
//! the one RAM buffer the DMA engine reads from and writes to.
//!
//! [`MemoryMappedBus`] is the on-target implementation. Anything else that
//! behaves like the peripheral (a simulator, a logic-analyser replay) can
//! implement [`RadioBus`] and drive the same [`Device`](crate::Device).

use core::convert::Infallible;
use core::ops::{Deref, DerefMut};

/// Payload bytes carried by every packet
pub const PAYLOAD_LEN: usize = 11;

/// Fixed-size payload buffer shared by the DMA engine, the driver and the
/// application.
///
/// Word aligned, as EasyDMA requires. Never queued: each transmit reads it
/// and each receive overwrites it in place.
#[repr(C, align(4))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PacketBuffer([u8; PAYLOAD_LEN]);

impl PacketBuffer {
    /// Create a zeroed buffer
    pub const fn new() -> Self {
        Self([0; PAYLOAD_LEN])
    }

    /// Copy of the payload bytes
    pub fn to_array(&self) -> [u8; PAYLOAD_LEN] {
        self.0
    }
}

impl From<[u8; PAYLOAD_LEN]> for PacketBuffer {
    fn from(bytes: [u8; PAYLOAD_LEN]) -> Self {
        Self(bytes)
    }
}

impl Deref for PacketBuffer {
    type Target = [u8; PAYLOAD_LEN];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PacketBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Access to the RADIO register block and its DMA buffer.
///
/// Offsets are byte offsets from the peripheral base. Register transfers are
/// at most four bytes, little-endian, starting at the register's lowest byte.
pub trait RadioBus {
    /// Error raised by a failed transfer
    type Error;

    /// Read `bytes.len()` bytes of the register at `offset`
    fn read(&mut self, offset: u16, bytes: &mut [u8]) -> Result<(), Self::Error>;

    /// Write `bytes` to the register at `offset`
    fn write(&mut self, offset: u16, bytes: &[u8]) -> Result<(), Self::Error>;

    /// The DMA packet buffer
    fn packet_buffer(&self) -> &PacketBuffer;

    /// The DMA packet buffer, mutably
    fn packet_buffer_mut(&mut self) -> &mut PacketBuffer;

    /// Address the DMA engine must be pointed at to reach the packet buffer
    fn packet_address(&self) -> u32;
}

/// Base address of the RADIO peripheral on nRF52 parts
pub const RADIO_BASE: usize = 0x4000_1000;

/// Volatile access to the on-chip RADIO peripheral.
pub struct MemoryMappedBus {
    base: usize,
    buffer: &'static mut PacketBuffer,
}

impl MemoryMappedBus {
    /// Creates a bus over the register block at `base`.
    ///
    /// # Safety
    /// `base` must be the address of a RADIO register block and nothing else
    /// may access that block for the lifetime of the bus. `buffer` must live
    /// in RAM reachable by EasyDMA.
    pub unsafe fn new(base: usize, buffer: &'static mut PacketBuffer) -> Self {
        Self { base, buffer }
    }

    /// Releases the packet buffer.
    pub fn release(self) -> &'static mut PacketBuffer {
        self.buffer
    }

    fn word(&self, offset: u16) -> *mut u32 {
        (self.base + (offset as usize & !0x3)) as *mut u32
    }
}

impl RadioBus for MemoryMappedBus {
    type Error = Infallible;

    fn read(&mut self, offset: u16, bytes: &mut [u8]) -> Result<(), Self::Error> {
        // SAFETY: the constructor's contract makes `word` a valid register
        let raw = unsafe { core::ptr::read_volatile(self.word(offset)) }.to_le_bytes();
        let len = bytes.len().min(raw.len());
        bytes[..len].copy_from_slice(&raw[..len]);
        Ok(())
    }

    fn write(&mut self, offset: u16, bytes: &[u8]) -> Result<(), Self::Error> {
        let mut raw = [0u8; 4];
        let len = bytes.len().min(raw.len());
        raw[..len].copy_from_slice(&bytes[..len]);
        // SAFETY: the constructor's contract makes `word` a valid register
        unsafe { core::ptr::write_volatile(self.word(offset), u32::from_le_bytes(raw)) };
        Ok(())
    }

    fn packet_buffer(&self) -> &PacketBuffer {
        &*self.buffer
    }

    fn packet_buffer_mut(&mut self) -> &mut PacketBuffer {
        &mut *self.buffer
    }

    fn packet_address(&self) -> u32 {
        self.buffer.0.as_ptr() as usize as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_word_aligned() {
        assert_eq!(core::mem::align_of::<PacketBuffer>(), 4);
        let buffer = PacketBuffer::new();
        assert_eq!(buffer.as_ptr() as usize % 4, 0);
    }

    #[test]
    fn buffer_derefs_to_payload() {
        let mut buffer = PacketBuffer::from([7; PAYLOAD_LEN]);
        buffer[0] = 1;
        assert_eq!(buffer.len(), PAYLOAD_LEN);
        assert_eq!(buffer.to_array()[..2], [1, 7]);
    }
}

//! Half-duplex radio driver
//!
//! Sits on top of [`Device`] and turns its tasks and events into a small set
//! of legal call sequences:
//!
//! ```text
//! PowerOff  --power_on_and_configure-->        Disabled
//! Disabled  --receive_static-->                Receiving
//! Receiving --(end-of-transaction interrupt)-> Disabled
//! Receiving --stop_receive-->                  Disabled
//! Disabled  --transmit_static_synchronously--> Disabled   (Transmitting while it spins)
//! any       --power_off-->                     PowerOff
//! ```
//!
//! Anything else is refused with [`RadioError::InvalidState`] and leaves the
//! state as it was.
//!
//! Transmit spins until the packet is out; it is short and bounded, so the
//! interrupt round trip is not worth paying. Receive arms the interrupt and
//! returns; the caller sleeps by whatever means it has and, on waking for any
//! reason other than a received message, must call
//! [`Radio::stop_receive`] before the next operation.
//!
//! # Example
//! ```no_run
//! # use sleepsync_radio::*;
//! # fn sleep_until_event_with_timeout() -> WakeReason { WakeReason::Timeout }
//! # fn run<B: RadioBus, D: embedded_hal::delay::DelayNs, N: InterruptController, P: PowerSupply, C: CrystalClock>(
//! #     radio: &mut Radio<B, D, N, P, C>,
//! # ) -> Result<(), RadioError> {
//! radio.power_on_and_configure()?;
//!
//! radio.buffer_mut()?.copy_from_slice(b"hello world");
//! radio.transmit_static_synchronously()?;
//!
//! radio.receive_static()?;
//! let reason = sleep_until_event_with_timeout();
//! radio.conclude_receive(reason)?;
//! if let Ok(packet) = radio.take_received() {
//!     if packet.crc_valid {
//!         // use packet.payload
//!     }
//! }
//!
//! radio.power_off()?;
//! # Ok(())
//! # }
//! ```

use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use regiface::errors::Error as RegifaceError;

use crate::bus::{PacketBuffer, RadioBus, PAYLOAD_LEN};
use crate::config::{CrcMode, ProtocolConfig, Timeouts};
use crate::device::Device;
use crate::eot::{DefaultEndOfTransaction, EndOfTransaction};
use crate::error::{Operation, RadioError, Wait};
use crate::peripherals::{CrystalClock, InterruptController, PowerSupply};
use crate::registers::{Shortcuts, TxPower, BASE_FREQUENCY_MHZ};

/// Protocol state of the radio.
///
/// Distinct from the silicon's [`DeviceState`](crate::DeviceState): the
/// protocol may already be `Disabled` while the hardware is still shutting
/// its receiver down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RadioState {
    PowerOff,
    Disabled,
    Receiving,
    Transmitting,
}

/// Why a sleeping caller woke up after [`Radio::receive_static`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeReason {
    MsgReceived,
    Timeout,
    Other,
}

impl WakeReason {
    /// Whether the receive is still outstanding and must be stopped.
    pub fn requires_stop(self) -> bool {
        self != Self::MsgReceived
    }
}

/// A completed reception, handed out once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceivedPacket {
    pub payload: [u8; PAYLOAD_LEN],
    /// CRC matched. A matching CRC does not rule out corruption beyond what
    /// the CRC can detect.
    pub crc_valid: bool,
    /// Logical address the packet arrived on
    pub logical_address: u8,
}

#[derive(Debug, Clone, Copy)]
struct Reception {
    crc_valid: bool,
    logical_address: u8,
}

/// Polls `done` every `poll_us` until it holds or `timeout_us` has passed.
fn spin_until<D, F>(
    delay: &mut D,
    timeout_us: u32,
    poll_us: u32,
    mut done: F,
) -> Result<bool, RegifaceError>
where
    D: DelayNs,
    F: FnMut() -> Result<bool, RegifaceError>,
{
    let mut waited = 0u32;
    loop {
        if done()? {
            return Ok(true);
        }
        if waited >= timeout_us {
            return Ok(false);
        }
        delay.delay_us(poll_us);
        waited = waited.saturating_add(poll_us);
    }
}

/// High level driver for the radio.
///
/// Owns the device and the collaborators it sequences: the interrupt line,
/// the supply regulator and the crystal clock. `E` selects the
/// end-of-transaction interrupt source.
pub struct Radio<B, D, N, P, C, E = DefaultEndOfTransaction> {
    device: Device<B>,
    delay: D,
    nvic: N,
    power_supply: P,
    clock: C,
    config: ProtocolConfig,
    timeouts: Timeouts,
    state: RadioState,
    reception: Option<Reception>,
    message_received: AtomicBool,
    callback: Option<fn()>,
    _eot: PhantomData<E>,
}

impl<B, D, N, P, C, E> Radio<B, D, N, P, C, E>
where
    B: RadioBus,
    D: DelayNs,
    N: InterruptController,
    P: PowerSupply,
    C: CrystalClock,
    E: EndOfTransaction,
{
    /// Wires the radio to the devices it uses. The radio starts powered off.
    ///
    /// Call once after reset, before anything else.
    pub fn init(bus: B, delay: D, nvic: N, power_supply: P, clock: C) -> Self {
        Self {
            device: Device::new(bus),
            delay,
            nvic,
            power_supply,
            clock,
            config: ProtocolConfig::default(),
            timeouts: Timeouts::default(),
            state: RadioState::PowerOff,
            reception: None,
            message_received: AtomicBool::new(false),
            callback: None,
            _eot: PhantomData,
        }
    }

    /// Replaces the protocol configuration. Only while powered off.
    pub fn with_config(mut self, config: ProtocolConfig) -> Result<Self, RadioError> {
        self.require(Operation::Configure, RadioState::PowerOff)?;
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Replaces the hardware wait bounds.
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Result<Self, RadioError> {
        timeouts.validate()?;
        self.timeouts = timeouts;
        Ok(self)
    }

    /// Gives the wired devices back.
    pub fn release(self) -> (B, D, N, P, C) {
        (
            self.device.release(),
            self.delay,
            self.nvic,
            self.power_supply,
            self.clock,
        )
    }

    pub fn state(&self) -> RadioState {
        self.state
    }

    pub fn is_power_on(&self) -> bool {
        self.state != RadioState::PowerOff
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    /// Configured carrier in MHz.
    pub fn frequency(&self) -> u32 {
        BASE_FREQUENCY_MHZ + self.config.frequency_index as u32
    }

    /// Sets the function called from interrupt context for every received
    /// packet.
    pub fn set_msg_received_callback(&mut self, callback: fn()) {
        self.callback = Some(callback);
    }

    fn require(&self, operation: Operation, state: RadioState) -> Result<(), RadioError> {
        if self.state == state {
            Ok(())
        } else {
            Err(RadioError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    // Power

    /// Starts the crystal if needed, powers the radio and applies the
    /// protocol configuration. Leaves the radio `Disabled`.
    pub fn power_on_and_configure(&mut self) -> Result<(), RadioError> {
        self.require(Operation::PowerOnAndConfigure, RadioState::PowerOff)?;

        self.start_crystal()?;

        if !self.power_supply.is_dcdc_mode() {
            self.power_supply.set_dcdc_mode(true);
        }

        if let Err(e) = self.power_on_device() {
            // Best effort: don't leave a half configured radio drawing current
            let _ = self.device.set_radio_powered(false);
            self.power_supply.set_dcdc_mode(false);
            return Err(e);
        }

        self.state = RadioState::Disabled;
        info!("radio on, {} MHz", self.frequency());
        Ok(())
    }

    fn start_crystal(&mut self) -> Result<(), RadioError> {
        if self.clock.is_running() {
            return Ok(());
        }

        debug!("starting crystal");
        self.clock.configure_source();
        self.clock.start();

        let clock = &self.clock;
        let running = spin_until(
            &mut self.delay,
            self.timeouts.clock_stable_us,
            self.timeouts.poll_interval_us,
            || Ok(clock.is_running()),
        )?;

        if running {
            Ok(())
        } else {
            error!("crystal not running after {} us", self.timeouts.clock_stable_us);
            Err(RadioError::Timeout(Wait::ClockStart))
        }
    }

    fn power_on_device(&mut self) -> Result<(), RadioError> {
        self.device.set_radio_powered(true)?;
        self.configure_physical_protocol()?;
        self.wait_device_disabled()
    }

    /// Applies [`ProtocolConfig`]. The hardware must be DISABLED.
    fn configure_physical_protocol(&mut self) -> Result<(), RegifaceError> {
        let config = self.config;
        let device = &mut self.device;

        device.configure_fixed_frequency(config.frequency_index)?;
        device.configure_network_address_pool()?;
        device.configure_fixed_logical_address()?;
        match config.crc {
            CrcMode::Short => device.configure_short_crc()?,
            CrcMode::Medium => device.configure_medium_crc()?,
        }
        device.configure_static_packet_format(ProtocolConfig::PAYLOAD_LEN, config.address_length)?;
        // PCNF1 was just rewritten, so whitening goes after it
        device.configure_whitening_on()?;
        device.configure_whitening_seed(config.whitening_seed)?;
        device.configure_xmit_power(config.tx_power)?;
        device.configure_mega_bitrate(config.bitrate)?;
        device.configure_fast_ramp_up()?;
        device.configure_shortcuts(Shortcuts::READY_START | Shortcuts::END_DISABLE)?;
        device.configure_packet_address()
    }

    /// Changes transmit power. Only while `Disabled`.
    pub fn configure_xmit_power(&mut self, power: TxPower) -> Result<(), RadioError> {
        self.require(Operation::Configure, RadioState::Disabled)?;
        self.wait_device_disabled()?;
        self.device.configure_xmit_power(power)?;
        self.config.tx_power = power;
        Ok(())
    }

    /// Un-powers the radio from any state. Register contents and any unread
    /// reception are lost.
    pub fn power_off(&mut self) -> Result<(), RadioError> {
        if self.state == RadioState::PowerOff {
            return Ok(());
        }

        self.nvic.disable_radio_irq();
        E::disable_interrupt(&mut self.device)?;
        self.device.set_radio_powered(false)?;
        self.power_supply.set_dcdc_mode(false);
        self.invalidate_reception();

        info!("radio off (was {:?})", self.state);
        self.state = RadioState::PowerOff;
        Ok(())
    }

    // Buffer

    /// The packet buffer. Holds the last received payload until the next
    /// operation starts.
    pub fn buffer(&self) -> &PacketBuffer {
        self.device.buffer()
    }

    /// The packet buffer, to fill before a transmit.
    ///
    /// Refused while a receive is outstanding, since the DMA engine may be
    /// writing to it.
    pub fn buffer_mut(&mut self) -> Result<&mut PacketBuffer, RadioError> {
        if self.state == RadioState::Receiving {
            return Err(RadioError::InvalidState {
                operation: Operation::WriteBuffer,
                state: self.state,
            });
        }
        Ok(self.device.buffer_mut())
    }

    fn invalidate_reception(&mut self) {
        self.reception = None;
        self.message_received.store(false, Ordering::Release);
    }

    // Transmit

    /// Sends the buffer and spins until it is out.
    ///
    /// On return the radio is `Disabled`. If the end of transmission is not
    /// seen in time the radio is forced off the air; should that fail too it
    /// stays `Transmitting` and only [`Radio::power_off`] recovers it.
    pub fn transmit_static_synchronously(&mut self) -> Result<(), RadioError> {
        self.require(Operation::Transmit, RadioState::Disabled)?;
        self.wait_device_disabled()?;

        self.invalidate_reception();
        self.device.clear_disabled_event()?;
        self.device.clear_packet_done_event()?;

        self.device.start_tx_task()?;
        self.state = RadioState::Transmitting;
        trace!("transmit started");

        // END→DISABLE makes the DISABLED event the end of transmission
        let device = &mut self.device;
        let sent = spin_until(
            &mut self.delay,
            self.timeouts.transmit_us,
            self.timeouts.poll_interval_us,
            || device.is_disabled_event_set(),
        )?;

        if !sent {
            error!("no end of transmission after {} us", self.timeouts.transmit_us);
            self.abort_transmit()?;
            return Err(RadioError::Timeout(Wait::Transmit));
        }

        self.device.clear_disabled_event()?;
        self.device.clear_packet_done_event()?;
        self.state = RadioState::Disabled;
        Ok(())
    }

    fn abort_transmit(&mut self) -> Result<(), RadioError> {
        self.device.start_disabling_task()?;
        let device = &mut self.device;
        let disabled = spin_until(
            &mut self.delay,
            self.timeouts.disable_us,
            self.timeouts.poll_interval_us,
            || device.is_disabled_state(),
        )?;

        if disabled {
            self.device.clear_disabled_event()?;
            self.state = RadioState::Disabled;
        } else {
            error!("transmitter stuck, power cycle required");
        }
        Ok(())
    }

    // Receive

    /// Starts listening and returns at once; the radio is `Receiving`.
    ///
    /// Completion arrives through [`Radio::received_event_handler`], which
    /// must be called from the radio interrupt.
    pub fn receive_static(&mut self) -> Result<(), RadioError> {
        self.require(Operation::Receive, RadioState::Disabled)?;
        self.wait_device_disabled()?;

        self.invalidate_reception();
        E::clear_event(&mut self.device)?;
        self.device.clear_disabled_event()?;
        self.device.clear_packet_done_event()?;
        self.device.clear_receive_in_progress_event()?;

        E::enable_interrupt(&mut self.device)?;
        self.nvic.enable_radio_irq();

        // State first: the interrupt may fire as soon as the task is triggered
        self.state = RadioState::Receiving;
        if let Err(e) = self.device.start_rx_task() {
            self.state = RadioState::Disabled;
            return Err(e.into());
        }
        trace!("receive started");
        Ok(())
    }

    /// Abandons an outstanding receive. The radio is `Disabled` on success.
    ///
    /// Required after any wake other than [`WakeReason::MsgReceived`]. A
    /// no-op if the receive already completed. A packet that completed but
    /// whose interrupt has not yet been handled is discarded.
    pub fn stop_receive(&mut self) -> Result<(), RadioError> {
        match self.state {
            RadioState::Receiving => {}
            RadioState::Disabled => return Ok(()),
            state => {
                return Err(RadioError::InvalidState {
                    operation: Operation::StopReceive,
                    state,
                })
            }
        }

        E::disable_interrupt(&mut self.device)?;
        self.nvic.disable_radio_irq();

        if !self.device.is_disabled_state()? {
            self.device.clear_disabled_event()?;
            self.device.start_disabling_task()?;

            let device = &mut self.device;
            let disabled = spin_until(
                &mut self.delay,
                self.timeouts.disable_us,
                self.timeouts.poll_interval_us,
                || device.is_disabled_event_set(),
            )?;
            if !disabled {
                error!("receiver not disabled after {} us", self.timeouts.disable_us);
                return Err(RadioError::Timeout(Wait::Disable));
            }
        }

        self.device.clear_disabled_event()?;
        E::clear_event(&mut self.device)?;
        self.state = RadioState::Disabled;
        trace!("receive stopped");
        Ok(())
    }

    /// Finishes a receive after the caller wakes, stopping it unless a
    /// message arrived.
    pub fn conclude_receive(&mut self, reason: WakeReason) -> Result<(), RadioError> {
        if reason.requires_stop() {
            self.stop_receive()
        } else {
            Ok(())
        }
    }

    /// Radio interrupt handler body.
    ///
    /// Clears the end-of-transaction event, records the reception and calls
    /// the message received callback. Does not wait on the hardware: the
    /// receiver may still be shutting down when this returns.
    pub fn received_event_handler(&mut self) -> Result<(), RadioError> {
        if !E::is_event_set(&mut self.device)? {
            trace!("spurious radio interrupt");
            return Ok(());
        }
        E::clear_event(&mut self.device)?;
        E::disable_interrupt(&mut self.device)?;

        if self.state != RadioState::Receiving {
            warn!("end of transaction while {:?}", self.state);
            return Ok(());
        }

        let crc_valid = self.device.is_crc_valid()?;
        let logical_address = self.device.received_logical_address()?;
        self.reception = Some(Reception {
            crc_valid,
            logical_address,
        });
        self.state = RadioState::Disabled;
        self.message_received.store(true, Ordering::Release);
        debug!("packet received, crc ok: {}", crc_valid);

        if let Some(callback) = self.callback {
            callback();
        }
        Ok(())
    }

    /// Whether a reception has completed and not yet been taken.
    pub fn is_message_received(&self) -> bool {
        self.message_received.load(Ordering::Acquire)
    }

    /// Whether a packet is being clocked in right now.
    pub fn is_receive_in_progress(&mut self) -> Result<bool, RadioError> {
        if self.state != RadioState::Receiving {
            return Ok(false);
        }
        Ok(self.device.is_receive_in_progress_event()?)
    }

    pub fn clear_receive_in_progress(&mut self) -> Result<(), RadioError> {
        Ok(self.device.clear_receive_in_progress_event()?)
    }

    /// CRC result of the last completed, unread reception.
    pub fn is_packet_crc_valid(&self) -> Result<bool, RadioError> {
        self.reception
            .map(|reception| reception.crc_valid)
            .ok_or(RadioError::NoPacket)
    }

    /// Takes the last completed reception. Succeeds once per reception.
    pub fn take_received(&mut self) -> Result<ReceivedPacket, RadioError> {
        let reception = self.reception.take().ok_or(RadioError::NoPacket)?;
        self.message_received.store(false, Ordering::Release);
        Ok(ReceivedPacket {
            payload: self.device.buffer().to_array(),
            crc_valid: reception.crc_valid,
            logical_address: reception.logical_address,
        })
    }

    /// Bounded wait for the silicon to report DISABLED.
    fn wait_device_disabled(&mut self) -> Result<(), RadioError> {
        let device = &mut self.device;
        let disabled = spin_until(
            &mut self.delay,
            self.timeouts.disable_us,
            self.timeouts.poll_interval_us,
            || device.is_disabled_state(),
        )?;

        if disabled {
            Ok(())
        } else {
            error!("radio not disabled after {} us", self.timeouts.disable_us);
            Err(RadioError::Timeout(Wait::Disable))
        }
    }
}

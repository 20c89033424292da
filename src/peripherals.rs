//! Collaborating devices the radio depends on
//!
//! The radio needs three other parts of the chip to behave: the interrupt
//! controller line it completes on, the high-frequency crystal that clocks the
//! synthesizer, and the supply regulator. Each is a small trait so boards and
//! tests can provide their own.

/// Interrupt controller line of the RADIO peripheral.
///
/// Only the radio's own line is managed here.
pub trait InterruptController {
    /// Clears any pending radio interrupt and enables the line.
    fn enable_radio_irq(&mut self);

    /// Clears any pending radio interrupt and disables the line.
    fn disable_radio_irq(&mut self);
}

/// High-frequency crystal oscillator.
///
/// The synthesizer needs the crystal, not the internal RC oscillator, so it
/// must be running and stable before any RF operation. A started crystal is
/// not necessarily a running one; callers poll [`CrystalClock::is_running`].
pub trait CrystalClock {
    /// Selects the crystal as source. Must precede [`CrystalClock::start`].
    fn configure_source(&mut self);

    /// Requests the crystal. Does not wait for it to stabilise.
    fn start(&mut self);

    /// Whether the crystal is running and stable.
    fn is_running(&self) -> bool;
}

/// Supply regulator mode.
///
/// The radio draws its burst current far more efficiently through the DC/DC
/// converter than through the LDO.
pub trait PowerSupply {
    /// Whether the DC/DC converter is in use.
    fn is_dcdc_mode(&self) -> bool;

    /// Switches between the DC/DC converter and the LDO.
    fn set_dcdc_mode(&mut self, enabled: bool);
}

//! Supply voltage classification
//!
//! The node runs from a storage capacitor charged by a solar cell. Whether
//! there is enough charge to burst the radio, or to do work, is decided from
//! where Vdd sits relative to four comparator thresholds. The radio driver
//! itself never consults this; the application does before it powers the
//! radio on.
//!
//! | Band     | Vdd             | Meaning                                   |
//! |----------|-----------------|-------------------------------------------|
//! | Excess   | > 2.7 V         | charge to spare                           |
//! | High     | 2.5 V ..= 2.7 V | enough to work                            |
//! | Medium   | 2.3 V ..= 2.5 V | enough to burst the radio                 |
//! | Low      | 2.1 V ..= 2.3 V | reserve, radio could brown the mcu out    |
//! | UltraLow | <= 2.1 V        | near brownout                             |
//!
//! The comparator tests "greater than", so a reading exactly on a threshold
//! falls in the lower band.

/// Comparator threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Threshold {
    /// 2.1 V
    V2_1,
    /// 2.3 V
    V2_3,
    /// 2.5 V
    V2_5,
    /// 2.7 V
    V2_7,
}

impl Threshold {
    /// Threshold voltage in millivolts
    pub fn millivolts(self) -> u16 {
        match self {
            Self::V2_1 => 2100,
            Self::V2_3 => 2300,
            Self::V2_5 => 2500,
            Self::V2_7 => 2700,
        }
    }
}

/// Supply voltage band, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VoltageBand {
    UltraLow,
    Low,
    Medium,
    High,
    Excess,
}

impl VoltageBand {
    /// Classifies a supply reading.
    pub fn from_millivolts(millivolts: u16) -> Self {
        if millivolts > Threshold::V2_7.millivolts() {
            Self::Excess
        } else if millivolts > Threshold::V2_5.millivolts() {
            Self::High
        } else if millivolts > Threshold::V2_3.millivolts() {
            Self::Medium
        } else if millivolts > Threshold::V2_1.millivolts() {
            Self::Low
        } else {
            Self::UltraLow
        }
    }
}

/// Vdd comparator.
pub trait PowerComparator {
    /// Whether Vdd is above `threshold`.
    fn is_vdd_greater_than(&mut self, threshold: Threshold) -> bool;
}

/// Answers "is there power for X" questions from a comparator.
pub struct PowerManager<C> {
    comparator: C,
}

impl<C> PowerManager<C>
where
    C: PowerComparator,
{
    pub fn new(comparator: C) -> Self {
        Self { comparator }
    }

    pub fn release(self) -> C {
        self.comparator
    }

    pub fn is_power_excess(&mut self) -> bool {
        self.comparator.is_vdd_greater_than(Threshold::V2_7)
    }

    pub fn is_power_for_work(&mut self) -> bool {
        self.comparator.is_vdd_greater_than(Threshold::V2_5)
    }

    pub fn is_power_for_radio(&mut self) -> bool {
        self.comparator.is_vdd_greater_than(Threshold::V2_3)
    }

    pub fn is_power_for_reserve(&mut self) -> bool {
        self.comparator.is_vdd_greater_than(Threshold::V2_1)
    }

    /// Current band, testing thresholds from the top down.
    pub fn voltage_band(&mut self) -> VoltageBand {
        if self.is_power_excess() {
            VoltageBand::Excess
        } else if self.is_power_for_work() {
            VoltageBand::High
        } else if self.is_power_for_radio() {
            VoltageBand::Medium
        } else if self.is_power_for_reserve() {
            VoltageBand::Low
        } else {
            VoltageBand::UltraLow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct FixedSupply(u16);

    impl PowerComparator for FixedSupply {
        fn is_vdd_greater_than(&mut self, threshold: Threshold) -> bool {
            self.0 > threshold.millivolts()
        }
    }

    #[test]
    fn comparator_readings_map_to_bands() {
        let cases = [
            (2800, VoltageBand::Excess),
            (2600, VoltageBand::High),
            (2400, VoltageBand::Medium),
            (2200, VoltageBand::Low),
            (1900, VoltageBand::UltraLow),
        ];
        for (millivolts, band) in cases {
            assert_eq!(PowerManager::new(FixedSupply(millivolts)).voltage_band(), band);
            assert_eq!(VoltageBand::from_millivolts(millivolts), band);
        }
    }

    #[test]
    fn threshold_reading_falls_in_lower_band() {
        assert_eq!(VoltageBand::from_millivolts(2700), VoltageBand::High);
        assert_eq!(VoltageBand::from_millivolts(2100), VoltageBand::UltraLow);
    }

    #[test]
    fn radio_needs_medium_or_better() {
        let mut manager = PowerManager::new(FixedSupply(2400));
        assert!(manager.is_power_for_radio());
        assert!(!manager.is_power_for_work());

        let mut manager = PowerManager::new(FixedSupply(2250));
        assert!(!manager.is_power_for_radio());
        assert!(manager.is_power_for_reserve());
    }

    proptest! {
        #[test]
        fn classification_is_monotonic(a in 0u16..4000, b in 0u16..4000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(VoltageBand::from_millivolts(low) <= VoltageBand::from_millivolts(high));
        }

        #[test]
        fn manager_agrees_with_classifier(millivolts in 0u16..4000) {
            let band = PowerManager::new(FixedSupply(millivolts)).voltage_band();
            prop_assert_eq!(band, VoltageBand::from_millivolts(millivolts));
        }
    }
}

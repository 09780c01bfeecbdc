//! Loop timing and analog front-end configuration.

/// Tunables for the control loop and the CV inputs.
///
/// [`SynthConfig::default()`] matches the hardware: a 3.3 V ADC reference
/// and a gate threshold of 50 mV (about 1.5 % of full scale).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SynthConfig {
    /// Delay after each loop iteration, in milliseconds. Default: 10.
    pub tick_period_ms: u64,
    /// Voltage corresponding to a normalized reading of 1.0. Default: 3.3.
    pub reference_volts: f32,
    /// Inputs below this voltage close the gate. Default: 0.05.
    pub gate_threshold_volts: f32,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 10,
            reference_volts: 3.3,
            gate_threshold_volts: 0.05,
        }
    }
}

impl SynthConfig {
    /// Convert a normalized ADC reading (`0.0..=1.0`) to volts.
    pub fn to_volts(&self, normalized: f32) -> f32 {
        normalized * self.reference_volts
    }

    /// Returns `true` if `volts` is high enough to hold the gate open.
    pub fn gate_open(&self, volts: f32) -> bool {
        volts >= self.gate_threshold_volts
    }
}

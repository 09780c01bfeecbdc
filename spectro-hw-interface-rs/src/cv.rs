//! ADC-backed CV inputs.

use defmt::warn;
use embassy_rp::adc::{Adc, Blocking, Channel};
use spectro::io::ControlVoltages;
use spectro::CHANNEL_COUNT;

/// Full-scale reading of the 12-bit ADC.
const ADC_FULL_SCALE: f32 = 4095.0;

/// The three CV jacks on GP26..GP28.
pub struct CvInputs {
    adc: Adc<'static, Blocking>,
    channels: [Channel<'static>; CHANNEL_COUNT],
}

impl CvInputs {
    pub fn new(adc: Adc<'static, Blocking>, channels: [Channel<'static>; CHANNEL_COUNT]) -> Self {
        Self { adc, channels }
    }
}

impl ControlVoltages for CvInputs {
    /// A failed conversion reads as 0 V, which closes the gate.
    fn read_normalized(&mut self, channel: usize) -> f32 {
        let Some(ch) = self.channels.get_mut(channel) else {
            return 0.0;
        };
        match self.adc.blocking_read(ch) {
            Ok(raw) => (raw as f32 / ADC_FULL_SCALE).min(1.0),
            Err(e) => {
                warn!("ADC read on channel {} failed: {}", channel, e);
                0.0
            }
        }
    }
}

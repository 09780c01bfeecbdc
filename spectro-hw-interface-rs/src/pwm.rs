//! RP2350 PWM slice channel as a synth output.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use spectro::io::PwmOutput;

/// Which output of the slice the pin is wired to.
#[derive(Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum SliceOutput {
    A,
    B,
}

/// Largest value of the slice counter.
const MAX_TOP: u32 = u16::MAX as u32;

/// One PWM pin driven at a variable frequency and duty.
///
/// The slice counter period (`top`) and integer clock divider are derived
/// from the requested frequency; the compare level is rescaled from the
/// 16-bit duty on every change so the duty fraction survives a frequency
/// change.
pub struct PwmChannel {
    pwm: Pwm<'static>,
    output: SliceOutput,
    config: Config,
    frequency: Option<u32>,
    duty: u16,
}

impl PwmChannel {
    /// Take over a slice configured with one output pin. Starts silent.
    pub fn new(pwm: Pwm<'static>, output: SliceOutput) -> Self {
        let mut channel = Self {
            pwm,
            output,
            config: Config::default(),
            frequency: None,
            duty: 0,
        };
        channel.apply();
        channel
    }

    /// Clock divider and counter top for `hz` at system clock `clk_hz`.
    ///
    /// Frequencies too low for the slowest divider are clamped to it.
    fn timing(clk_hz: u32, hz: u32) -> (u8, u16) {
        let hz = hz.max(1);
        let divider = (clk_hz / hz / (MAX_TOP + 1) + 1).clamp(1, u8::MAX as u32);
        let top = (clk_hz / (divider * hz)).saturating_sub(1).min(MAX_TOP);
        (divider as u8, top as u16)
    }

    fn compare(&self) -> u16 {
        let period = self.config.top as u32 + 1;
        ((self.duty as u32 * period) >> 16) as u16
    }

    fn apply(&mut self) {
        let compare = self.compare();
        match self.output {
            SliceOutput::A => self.config.compare_a = compare,
            SliceOutput::B => self.config.compare_b = compare,
        }
        self.pwm.set_config(&self.config);
    }
}

impl PwmOutput for PwmChannel {
    fn set_frequency(&mut self, hz: u32) {
        if self.frequency == Some(hz) {
            return;
        }
        self.frequency = Some(hz);

        let (divider, top) = Self::timing(clk_sys_freq(), hz);
        self.config.divider = divider.into();
        self.config.top = top;
        self.apply();
    }

    fn set_duty_cycle(&mut self, duty: u16) {
        if self.duty == duty {
            return;
        }
        self.duty = duty;
        self.apply();
    }
}

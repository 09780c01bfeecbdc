//! Per-channel gate tracking and the three-channel runtime.

use super::envelope::{self, FULL_SCALE};
use super::params::{EngineConfig, EngineParams};
use super::pitch;
use super::tables::{CalibrationTable, CHANNEL_CALIBRATION};
use crate::config::SynthConfig;
use crate::io::{ControlVoltages, PwmOutput};
use crate::CHANNEL_COUNT;

/// Gate transition produced by [`GateState::update()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateEvent {
    NoteOn,
    NoteOff,
}

/// Gate level plus the timestamp of its last transition.
///
/// At most one of `note_on` / `note_off` is set; both are unset until the
/// first transition after startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GateState {
    pub gate_open: bool,
    pub note_on: Option<u64>,
    pub note_off: Option<u64>,
}

impl GateState {
    /// Track the gate level; only transitions touch the timestamps.
    pub fn update(&mut self, open: bool, now_ms: u64) -> Option<GateEvent> {
        match (self.gate_open, open) {
            (false, true) => {
                self.gate_open = true;
                self.note_on = Some(now_ms);
                self.note_off = None;
                Some(GateEvent::NoteOn)
            }
            (true, false) => {
                self.gate_open = false;
                self.note_off = Some(now_ms);
                self.note_on = None;
                Some(GateEvent::NoteOff)
            }
            _ => None,
        }
    }
}

/// What one channel wrote to its output during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelFrame {
    pub gate_open: bool,
    /// Frequency written this tick; `None` while the gate is closed.
    pub frequency: Option<u32>,
    pub duty: u16,
}

/// One CV input driving one PWM output.
pub struct Channel<P> {
    output: P,
    calibration: &'static CalibrationTable,
    state: GateState,
}

impl<P: PwmOutput> Channel<P> {
    pub fn new(output: P, calibration: &'static CalibrationTable) -> Self {
        Self {
            output,
            calibration,
            state: GateState::default(),
        }
    }

    /// Run one tick from an input already converted to volts.
    pub fn tick(
        &mut self,
        volts: f32,
        now_ms: u64,
        params: &EngineParams,
        config: &SynthConfig,
    ) -> ChannelFrame {
        let open = config.gate_open(volts);

        let _event = self.state.update(open, now_ms);

        #[cfg(feature = "defmt")]
        match _event {
            Some(GateEvent::NoteOn) => defmt::debug!("Note on at {} ms ({} V)", now_ms, volts),
            Some(GateEvent::NoteOff) => defmt::debug!("Note off at {} ms", now_ms),
            None => {}
        }

        let frequency = if open {
            let hz = pitch::map(volts, self.calibration, params.slide_mode) as u32;
            self.output.set_frequency(hz);
            Some(hz)
        } else {
            None
        };

        let amplitude = envelope::level(self.state.note_on, self.state.note_off, params, now_ms);
        let duty = (amplitude as f32 * params.duty_cycle).clamp(0.0, FULL_SCALE) as u16;
        self.output.set_duty_cycle(duty);

        ChannelFrame {
            gate_open: open,
            frequency,
            duty,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn output(&self) -> &P {
        &self.output
    }
}

/// The three channels, ticked together against one [`EngineConfig`].
pub struct ChannelRuntime<P> {
    channels: [Channel<P>; CHANNEL_COUNT],
    config: SynthConfig,
}

impl<P: PwmOutput> ChannelRuntime<P> {
    /// Pair each output with its channel's calibration table.
    pub fn new(outputs: [P; CHANNEL_COUNT], config: SynthConfig) -> Self {
        let mut index = 0;
        let channels = outputs.map(|output| {
            let channel = Channel::new(output, CHANNEL_CALIBRATION[index]);
            index += 1;
            channel
        });
        Self { channels, config }
    }

    /// Sample every input and update every output.
    ///
    /// The engine parameters are read once, so all three channels see the
    /// same parameter set for the whole tick.
    pub fn tick<C: ControlVoltages>(
        &mut self,
        now_ms: u64,
        cv: &mut C,
        engine: &EngineConfig,
    ) -> [ChannelFrame; CHANNEL_COUNT] {
        let params = engine.params();
        let mut frames = [ChannelFrame::default(); CHANNEL_COUNT];
        for (i, (channel, frame)) in self.channels.iter_mut().zip(frames.iter_mut()).enumerate() {
            let volts = self.config.to_volts(cv.read_normalized(i));
            *frame = channel.tick(volts, now_ms, params, &self.config);
        }
        frames
    }

    pub fn channel(&self, index: usize) -> Option<&Channel<P>> {
        self.channels.get(index)
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tables::{CALIBRATION_1, CALIBRATION_2, NOTES};
    use crate::patch::{Patch, SlideMode};
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PwmCall {
        Frequency(u32),
        Duty(u16),
    }

    #[derive(Default)]
    struct RecordingPwm {
        calls: Vec<PwmCall, 64>,
    }

    impl RecordingPwm {
        fn last_frequency(&self) -> Option<u32> {
            self.calls.iter().rev().find_map(|c| match c {
                PwmCall::Frequency(hz) => Some(*hz),
                _ => None,
            })
        }

        fn last_duty(&self) -> Option<u16> {
            self.calls.iter().rev().find_map(|c| match c {
                PwmCall::Duty(d) => Some(*d),
                _ => None,
            })
        }
    }

    impl PwmOutput for RecordingPwm {
        fn set_frequency(&mut self, hz: u32) {
            let _ = self.calls.push(PwmCall::Frequency(hz));
        }

        fn set_duty_cycle(&mut self, duty: u16) {
            let _ = self.calls.push(PwmCall::Duty(duty));
        }
    }

    /// Fixed voltages, given directly in volts.
    struct Voltages([f32; CHANNEL_COUNT]);

    impl ControlVoltages for Voltages {
        fn read_normalized(&mut self, channel: usize) -> f32 {
            self.0[channel] / 3.3
        }
    }

    fn params() -> EngineParams {
        EngineParams::from_patch(&Patch::DEFAULT)
    }

    fn channel() -> Channel<RecordingPwm> {
        Channel::new(RecordingPwm::default(), &CALIBRATION_1)
    }

    // ── GateState ────────────────────────────────────────────────────────

    #[test]
    fn gate_state_records_transitions_only() {
        let mut g = GateState::default();
        assert_eq!(g.update(false, 0), None);
        assert_eq!(g.note_off, None);

        assert_eq!(g.update(true, 10), Some(GateEvent::NoteOn));
        assert_eq!(g.note_on, Some(10));
        assert_eq!(g.update(true, 20), None);
        assert_eq!(g.note_on, Some(10));

        assert_eq!(g.update(false, 30), Some(GateEvent::NoteOff));
        assert_eq!(g.note_on, None);
        assert_eq!(g.note_off, Some(30));
        assert_eq!(g.update(false, 40), None);
        assert_eq!(g.note_off, Some(30));
    }

    // ── Channel ──────────────────────────────────────────────────────────

    #[test]
    fn closed_gate_sets_duty_only() {
        let mut ch = channel();
        let frame = ch.tick(0.0, 0, &params(), &SynthConfig::default());
        assert!(!frame.gate_open);
        assert_eq!(frame.frequency, None);
        assert_eq!(frame.duty, 0);
        assert_eq!(ch.output().calls.as_slice(), &[PwmCall::Duty(0)]);
    }

    #[test]
    fn gate_threshold_boundary() {
        let cfg = SynthConfig::default();
        let mut ch = channel();
        assert!(!ch.tick(0.049, 0, &params(), &cfg).gate_open);
        assert!(ch.tick(0.05, 10, &params(), &cfg).gate_open);
        assert_eq!(ch.state().note_on, Some(10));
    }

    #[test]
    fn open_gate_sets_truncated_frequency() {
        let mut ch = channel();
        let frame = ch.tick(CALIBRATION_1[9], 0, &params(), &SynthConfig::default());
        assert_eq!(frame.frequency, Some(440));
        assert_eq!(ch.output().last_frequency(), Some(440));
        // Nearest step is C4 = 261.63 Hz, truncated.
        ch.tick(0.06, 10, &params(), &SynthConfig::default());
        assert_eq!(ch.output().last_frequency(), Some(261));
    }

    #[test]
    fn lowest_calibrated_step_is_below_the_gate() {
        let mut ch = channel();
        let frame = ch.tick(CALIBRATION_1[0], 0, &params(), &SynthConfig::default());
        assert!(!frame.gate_open);
        assert_eq!(frame.frequency, None);
        assert_eq!(ch.output().last_frequency(), None);
    }

    #[test]
    fn duty_is_envelope_times_duty_cycle() {
        let mut ch = channel();
        let cfg = SynthConfig::default();
        let p = params();
        ch.tick(1.0, 0, &p, &cfg);
        let frame = ch.tick(1.0, 1_000, &p, &cfg);
        let sustain = envelope::level(Some(0), None, &p, 1_000);
        assert_eq!(sustain, 13107);
        assert_eq!(frame.duty, (sustain as f32 * 0.3) as u16);
        assert_eq!(ch.output().last_duty(), Some(frame.duty));
    }

    #[test]
    fn duty_is_clamped_to_full_scale() {
        let mut ch = channel();
        let cfg = SynthConfig::default();
        let p = EngineParams::from_patch(&Patch {
            sustain: 1.0,
            duty_cycle: 10.0,
            ..Patch::DEFAULT
        });
        ch.tick(1.0, 0, &p, &cfg);
        assert_eq!(ch.tick(1.0, 1_000, &p, &cfg).duty, u16::MAX);
    }

    #[test]
    fn release_keeps_driving_duty_after_gate_closes() {
        let mut ch = channel();
        let cfg = SynthConfig::default();
        let p = params();
        ch.tick(1.0, 0, &p, &cfg);
        ch.tick(1.0, 1_000, &p, &cfg);
        let frame = ch.tick(0.0, 1_000, &p, &cfg);
        assert!(!frame.gate_open);
        assert!(frame.duty > 0);
        assert_eq!(ch.tick(0.0, 1_400, &p, &cfg).duty, 0);
    }

    #[test]
    fn slide_mode_is_read_every_tick() {
        let mut ch = channel();
        let cfg = SynthConfig::default();
        let quantized = params();
        let gliding = EngineParams::from_patch(&Patch {
            slide_mode: SlideMode::Interpolated,
            ..Patch::DEFAULT
        });
        assert_eq!(ch.tick(0.95, 0, &quantized, &cfg).frequency, Some(440));
        let glide = ch.tick(0.95, 10, &gliding, &cfg).frequency;
        assert_eq!(glide, Some(442));
    }

    // ── ChannelRuntime ───────────────────────────────────────────────────

    #[test]
    fn runtime_uses_per_channel_calibration() {
        let mut rt = ChannelRuntime::new(
            [RecordingPwm::default(), RecordingPwm::default(), RecordingPwm::default()],
            SynthConfig::default(),
        );
        // 1.10 V is A#4 on table 2 but nearest to B4 on table 1.
        let mut cv = Voltages([CALIBRATION_2[10]; CHANNEL_COUNT]);
        let engine = EngineConfig::default();
        let frames = rt.tick(0, &mut cv, &engine);

        assert_eq!(frames[0].frequency, Some(NOTES[11] as u32));
        assert_eq!(frames[1].frequency, Some(NOTES[10] as u32));
        assert_eq!(frames[2].frequency, Some(NOTES[10] as u32));
    }

    #[test]
    fn runtime_channels_are_independent() {
        let mut rt = ChannelRuntime::new(
            [RecordingPwm::default(), RecordingPwm::default(), RecordingPwm::default()],
            SynthConfig::default(),
        );
        let engine = EngineConfig::default();
        let mut cv = Voltages([1.0, 0.0, 0.0]);
        rt.tick(0, &mut cv, &engine);

        let open = rt.channel(0).map(|c| *c.state());
        let closed = rt.channel(1).map(|c| *c.state());
        assert_eq!(open.map(|s| s.note_on), Some(Some(0)));
        assert_eq!(closed, Some(GateState::default()));
        assert!(rt.channel(1).map_or(false, |c| c.output().last_frequency().is_none()));
        assert!(rt.channel(3).is_none());
    }
}

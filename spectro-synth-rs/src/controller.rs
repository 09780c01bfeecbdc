//! Top-level state machine tying the engine, menu and patch store together.

use crate::config::SynthConfig;
use crate::engine::{ChannelRuntime, EngineConfig};
use crate::io::{ControlVoltages, Key, Presses, PwmOutput};
use crate::menu::{NavEvent, Navigator, Screen};
use crate::patch::{PatchStore, RecordStore};
use crate::CHANNEL_COUNT;

/// What the buttons currently control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// The menu owns the buttons.
    #[default]
    Configuring,
    /// The notice screen is shown; only Confirm does anything.
    Performing,
}

/// The whole synth: patch store, live engine parameters, the three channels
/// and the menu.
///
/// # Examples
///
/// ```
/// use spectro::io::{ControlVoltages, Key, Presses, PwmOutput};
/// use spectro::menu::Screen;
/// use spectro::patch::MemoryStore;
/// use spectro::{Mode, Synth, SynthConfig};
///
/// struct Silent;
/// impl PwmOutput for Silent {
///     fn set_frequency(&mut self, _hz: u32) {}
///     fn set_duty_cycle(&mut self, _duty: u16) {}
/// }
///
/// struct Grounded;
/// impl ControlVoltages for Grounded {
///     fn read_normalized(&mut self, _channel: usize) -> f32 {
///         0.0
///     }
/// }
///
/// let outputs = [Silent, Silent, Silent];
/// let mut synth = Synth::new(MemoryStore::new(), outputs, SynthConfig::default());
/// let screen = synth.tick(0, &mut Grounded, Presses::from(Key::Cancel));
/// assert_eq!(screen, Some(Screen::Notice));
/// assert_eq!(synth.mode(), Mode::Performing);
/// ```
pub struct Synth<S, P> {
    patches: PatchStore<S>,
    engine: EngineConfig,
    runtime: ChannelRuntime<P>,
    navigator: Navigator,
    mode: Mode,
}

impl<S, P> Synth<S, P>
where
    S: RecordStore,
    P: PwmOutput,
{
    /// Initialise the store and start configuring with voice 1 active.
    ///
    /// A store that cannot be initialised is logged; the synth still runs
    /// on default patches.
    pub fn new(store: S, outputs: [P; CHANNEL_COUNT], config: SynthConfig) -> Self {
        let mut patches = PatchStore::new(store);
        if let Err(_e) = patches.init() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Patch store init failed, running on defaults");
        }

        let navigator = Navigator::new();
        let engine = EngineConfig::new(&patches.load(navigator.active_voice()));

        #[cfg(feature = "defmt")]
        defmt::info!("Synth ready: {}", config);

        Self {
            patches,
            engine,
            runtime: ChannelRuntime::new(outputs, config),
            navigator,
            mode: Mode::Configuring,
        }
    }

    /// Run one control-loop iteration.
    ///
    /// The channels are ticked first, in either mode. Presses are then
    /// handled in [`Key::ALL`] order; a switch of mode drops any presses
    /// left in this tick. Returns the new screen if it changed.
    pub fn tick<C: ControlVoltages>(
        &mut self,
        now_ms: u64,
        cv: &mut C,
        presses: Presses,
    ) -> Option<Screen> {
        self.runtime.tick(now_ms, cv, &self.engine);

        let mut redraw = false;
        for key in presses.iter() {
            match self.mode {
                Mode::Performing => {
                    if key == Key::Confirm {
                        self.navigator.return_to_root();
                        self.mode = Mode::Configuring;
                        redraw = true;

                        #[cfg(feature = "defmt")]
                        defmt::info!("Configuring");
                        break;
                    }
                }
                Mode::Configuring => {
                    match self.navigator.handle(key, &mut self.patches, &mut self.engine) {
                        NavEvent::Unchanged => {}
                        NavEvent::Redraw => redraw = true,
                        NavEvent::EnterPerformance => {
                            self.mode = Mode::Performing;
                            redraw = true;

                            #[cfg(feature = "defmt")]
                            defmt::info!("Performing");
                            break;
                        }
                    }
                }
            }
        }

        if redraw {
            Some(self.screen())
        } else {
            None
        }
    }

    /// The screen for the current mode and menu state.
    pub fn screen(&mut self) -> Screen {
        match self.mode {
            Mode::Performing => Screen::Notice,
            Mode::Configuring => self.navigator.screen(&mut self.patches),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn patches(&mut self) -> &mut PatchStore<S> {
        &mut self.patches
    }

    pub fn runtime(&self) -> &ChannelRuntime<P> {
        &self.runtime
    }

    /// Whether channel `index` currently has its gate open.
    pub fn channel_open(&self, index: usize) -> Option<bool> {
        self.runtime.channel(index).map(|c| c.state().gate_open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuId;
    use crate::patch::{MemoryStore, Patch, SlideMode};

    #[derive(Default)]
    struct Pwm {
        frequency: Option<u32>,
        duty: u16,
    }

    impl PwmOutput for Pwm {
        fn set_frequency(&mut self, hz: u32) {
            self.frequency = Some(hz);
        }

        fn set_duty_cycle(&mut self, duty: u16) {
            self.duty = duty;
        }
    }

    struct Cv([f32; CHANNEL_COUNT]);

    impl ControlVoltages for Cv {
        fn read_normalized(&mut self, channel: usize) -> f32 {
            self.0[channel]
        }
    }

    fn synth(store: MemoryStore) -> Synth<MemoryStore, Pwm> {
        Synth::new(
            store,
            [Pwm::default(), Pwm::default(), Pwm::default()],
            SynthConfig::default(),
        )
    }

    fn press(key: Key) -> Presses {
        Presses::from(key)
    }

    #[test]
    fn new_initialises_store_and_loads_voice_one() {
        let mut store = MemoryStore::new();
        store.save("voice1", br#"{"sustain":0.9}"#).unwrap();

        let mut s = synth(store);
        assert_eq!(s.mode(), Mode::Configuring);
        assert_eq!(s.engine().params().sustain, 0.9);
        assert_eq!(s.patches().store().len(), 4);
    }

    #[test]
    fn new_survives_a_broken_store() {
        let mut store = MemoryStore::new();
        store.fail_writes(true);
        let s = synth(store);
        assert_eq!(s.engine().params().sustain, Patch::DEFAULT.sustain);
    }

    #[test]
    fn tick_without_presses_does_not_redraw() {
        let mut s = synth(MemoryStore::new());
        assert_eq!(s.tick(0, &mut Cv([0.0; 3]), Presses::NONE), None);
    }

    #[test]
    fn cancel_at_root_then_confirm_round_trip() {
        let mut s = synth(MemoryStore::new());
        let mut cv = Cv([0.0; 3]);

        // Enter the fourth voice, then back out to the root.
        s.tick(0, &mut cv, press(Key::Down));
        s.tick(10, &mut cv, press(Key::Confirm));
        s.tick(20, &mut cv, press(Key::Cancel));
        assert_eq!(s.navigator().active_voice(), 3);

        assert_eq!(s.tick(30, &mut cv, press(Key::Cancel)), Some(Screen::Notice));
        assert_eq!(s.mode(), Mode::Performing);

        // Up / Down / Cancel are ignored while performing.
        for key in [Key::Up, Key::Down, Key::Cancel] {
            assert_eq!(s.tick(40, &mut cv, press(key)), None);
        }
        assert_eq!(s.mode(), Mode::Performing);

        let screen = s.tick(50, &mut cv, press(Key::Confirm));
        assert_eq!(s.mode(), Mode::Configuring);
        assert_eq!(s.navigator().current(), MenuId::Root);
        assert_eq!(s.navigator().selected(), 3);
        match screen {
            Some(Screen::Menu(view)) => {
                assert_eq!(view.selected, 3);
                assert!(view.items[3].marked);
            }
            other => panic!("expected the root menu, got {:?}", other),
        }
    }

    #[test]
    fn presses_after_a_mode_switch_are_dropped() {
        let mut s = synth(MemoryStore::new());
        let mut cv = Cv([0.0; 3]);
        s.tick(0, &mut cv, press(Key::Cancel));
        assert_eq!(s.mode(), Mode::Performing);

        // Confirm leaves performance; the Cancel in the same tick is dropped.
        let both = Presses::NONE.with(Key::Confirm).with(Key::Cancel);
        s.tick(10, &mut cv, both);
        assert_eq!(s.mode(), Mode::Configuring);
    }

    #[test]
    fn engine_runs_in_both_modes() {
        let mut s = synth(MemoryStore::new());
        let mut cv = Cv([0.5, 0.0, 0.0]);

        s.tick(0, &mut cv, press(Key::Cancel));
        assert_eq!(s.mode(), Mode::Performing);
        assert_eq!(s.channel_open(0), Some(true));
        assert!(s.runtime().channel(0).map_or(false, |c| c.output().frequency.is_some()));

        s.tick(1_000, &mut cv, Presses::NONE);
        let duty = s.runtime().channel(0).map(|c| c.output().duty);
        assert_eq!(duty, Some((13107.0f32 * 0.3) as u16));

        s.tick(1_010, &mut cv, press(Key::Confirm));
        assert_eq!(s.mode(), Mode::Configuring);
        assert_eq!(s.channel_open(0), Some(true));
    }

    #[test]
    fn slide_toggle_changes_pitch_on_the_next_tick() {
        let mut s = synth(MemoryStore::new());
        // 0.95 V, between A4 and A#4 on the first calibration table.
        let mut cv = Cv([0.95 / 3.3, 0.0, 0.0]);
        s.tick(0, &mut cv, Presses::NONE);
        let quantized = s.runtime().channel(0).and_then(|c| c.output().frequency);
        assert_eq!(quantized, Some(440));

        // Voix 1 → Slide → noQ.
        for key in [Key::Confirm, Key::Down, Key::Confirm, Key::Up, Key::Confirm] {
            s.tick(10, &mut cv, press(key));
        }
        assert_eq!(s.engine().params().slide_mode, SlideMode::Interpolated);

        s.tick(20, &mut cv, Presses::NONE);
        let glide = s.runtime().channel(0).and_then(|c| c.output().frequency);
        assert_eq!(glide, Some(442));
    }
}

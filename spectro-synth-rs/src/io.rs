//! Hardware seams and button edge detection.
//!
//! The firmware implements [`ControlVoltages`], [`PwmOutput`] and [`Button`]
//! on top of the RP2350 peripherals; tests implement them with plain
//! structs. [`Keypad`] turns four level-sampled buttons into per-tick
//! [`Presses`].

// ── Traits ───────────────────────────────────────────────────────────────

/// Source of the three CV inputs.
pub trait ControlVoltages {
    /// Sample `channel` and return the reading normalized to `0.0..=1.0`.
    fn read_normalized(&mut self, channel: usize) -> f32;
}

/// One PWM output pin.
pub trait PwmOutput {
    /// Set the carrier frequency in Hz.
    fn set_frequency(&mut self, hz: u32);
    /// Set the duty cycle, `0` = always low, `65535` = always high.
    fn set_duty_cycle(&mut self, duty: u16);
}

/// A momentary push button.
pub trait Button {
    /// Returns `true` while the button is held down.
    fn is_pressed(&mut self) -> bool;
}

// ── Keys ─────────────────────────────────────────────────────────────────

/// The four front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Up,
    Down,
    Confirm,
    Cancel,
}

impl Key {
    /// Every key, in the order presses are handled within one tick.
    pub const ALL: [Key; 4] = [Key::Up, Key::Down, Key::Confirm, Key::Cancel];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Keys that went from released to pressed during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Presses(u8);

impl Presses {
    /// No presses.
    pub const NONE: Presses = Presses(0);

    /// `self` plus `key`.
    pub const fn with(self, key: Key) -> Self {
        Presses(self.0 | 1 << key as u8)
    }

    pub fn contains(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Pressed keys in [`Key::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = Key> {
        Key::ALL.into_iter().filter(move |&k| self.contains(k))
    }
}

impl From<Key> for Presses {
    fn from(key: Key) -> Self {
        Presses::NONE.with(key)
    }
}

// ── Edge detection ───────────────────────────────────────────────────────

/// Reports a key once per press, on the released → pressed transition.
///
/// Holding a key produces no further presses until it is released, which
/// replaces the usual blocking wait-for-release loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    held: [bool; 4],
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { held: [false; 4] }
    }

    /// Feed the current level of each key, indexed like [`Key::ALL`].
    pub fn update(&mut self, levels: [bool; 4]) -> Presses {
        let mut presses = Presses::NONE;
        for (i, key) in Key::ALL.into_iter().enumerate() {
            if levels[i] && !self.held[i] {
                presses = presses.with(key);
            }
        }
        self.held = levels;
        presses
    }
}

/// The four buttons plus their edge detector.
pub struct Keypad<B> {
    buttons: [B; 4],
    edges: EdgeDetector,
}

impl<B: Button> Keypad<B> {
    pub fn new(up: B, down: B, confirm: B, cancel: B) -> Self {
        Self {
            buttons: [up, down, confirm, cancel],
            edges: EdgeDetector::new(),
        }
    }

    /// Sample every button once and return the new presses.
    pub fn poll(&mut self) -> Presses {
        let levels = [
            self.buttons[0].is_pressed(),
            self.buttons[1].is_pressed(),
            self.buttons[2].is_pressed(),
            self.buttons[3].is_pressed(),
        ];
        let presses = self.edges.update(levels);

        #[cfg(feature = "defmt")]
        if !presses.is_empty() {
            defmt::trace!("Presses: {}", presses);
        }

        presses
    }
}

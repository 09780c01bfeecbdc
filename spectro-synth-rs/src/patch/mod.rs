//! Per-voice patches and their persistence.
//!
//! A [`Patch`] holds everything one voice needs: envelope times and levels,
//! the PWM duty scaling and the pitch [`SlideMode`]. Four patches exist, one
//! per voice, and each lives in its own record of a [`RecordStore`] under the
//! key from [`VOICE_KEYS`].
//!
//! # Record format
//!
//! Records are flat JSON objects:
//!
//! ```text
//! {"maxlevel":0.3,"dutycycle":0.3,"slidemode":"Q","attack":0.0,
//!  "decay":0.4,"sustain":0.2,"release":0.4}
//! ```
//!
//! `slidemode` is `"Q"` (quantized) or `"noQ"` (interpolated). Keys missing
//! from a stored record are filled from [`Patch::DEFAULT`] on load; a record
//! that cannot be read or parsed at all is replaced by the default wholesale.

mod error;
mod memory;
mod record;
mod store;

pub use error::PatchStoreError;
pub use memory::{MemoryStore, MemoryStoreError, MEMORY_STORE_SLOTS};
pub use record::{decode, encode, framed_len, ERASED_BYTE, RECORD_CAPACITY};
pub use store::{PatchStore, RecordStore};

use serde::{Deserialize, Serialize};

use crate::VOICE_COUNT;

/// Store keys for the voice records, indexed by voice.
pub const VOICE_KEYS: [&str; VOICE_COUNT] = ["voice1", "voice2", "voice3", "voice4"];

/// How control voltages are turned into pitch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlideMode {
    /// Snap to the nearest calibrated note.
    #[default]
    #[serde(rename = "Q")]
    Quantized,
    /// Glide linearly between neighbouring calibrated notes.
    #[serde(rename = "noQ")]
    Interpolated,
}

impl SlideMode {
    /// The token used in stored records and menu labels.
    pub fn token(self) -> &'static str {
        match self {
            SlideMode::Quantized => "Q",
            SlideMode::Interpolated => "noQ",
        }
    }
}

/// The numeric fields of a [`Patch`] that the menu can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatchField {
    MaxLevel,
    DutyCycle,
    Attack,
    Decay,
    Sustain,
    Release,
}

impl PatchField {
    /// Record key of this field.
    pub fn key(self) -> &'static str {
        match self {
            PatchField::MaxLevel => "maxlevel",
            PatchField::DutyCycle => "dutycycle",
            PatchField::Attack => "attack",
            PatchField::Decay => "decay",
            PatchField::Sustain => "sustain",
            PatchField::Release => "release",
        }
    }
}

/// Stored configuration of one voice.
///
/// Times are in seconds, levels are fractions of full scale. The ranges
/// are not enforced here; the engine clamps what it needs to when the patch
/// is applied (see [`EngineParams::from_patch()`](crate::EngineParams::from_patch)).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Patch {
    /// Peak level reached at the end of the attack.
    #[serde(rename = "maxlevel")]
    pub max_level: f32,
    /// Scaling applied to the envelope before it becomes the PWM duty.
    #[serde(rename = "dutycycle")]
    pub duty_cycle: f32,
    #[serde(rename = "slidemode")]
    pub slide_mode: SlideMode,
    pub attack: f32,
    pub decay: f32,
    /// Level held while the gate stays open after the decay.
    pub sustain: f32,
    pub release: f32,
}

impl Patch {
    /// Factory values written for every voice on first boot.
    pub const DEFAULT: Patch = Patch {
        max_level: 0.3,
        duty_cycle: 0.3,
        slide_mode: SlideMode::Quantized,
        attack: 0.0,
        decay: 0.4,
        sustain: 0.2,
        release: 0.4,
    };

    /// Read a numeric field.
    pub fn get(&self, field: PatchField) -> f32 {
        match field {
            PatchField::MaxLevel => self.max_level,
            PatchField::DutyCycle => self.duty_cycle,
            PatchField::Attack => self.attack,
            PatchField::Decay => self.decay,
            PatchField::Sustain => self.sustain,
            PatchField::Release => self.release,
        }
    }

    /// Overwrite a numeric field.
    pub fn set(&mut self, field: PatchField, value: f32) {
        let slot = match field {
            PatchField::MaxLevel => &mut self.max_level,
            PatchField::DutyCycle => &mut self.duty_cycle,
            PatchField::Attack => &mut self.attack,
            PatchField::Decay => &mut self.decay,
            PatchField::Sustain => &mut self.sustain,
            PatchField::Release => &mut self.release,
        };
        *slot = value;
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_patch_values() {
        let p = Patch::default();
        assert_eq!(p.max_level, 0.3);
        assert_eq!(p.duty_cycle, 0.3);
        assert_eq!(p.slide_mode, SlideMode::Quantized);
        assert_eq!(p.attack, 0.0);
        assert_eq!(p.decay, 0.4);
        assert_eq!(p.sustain, 0.2);
        assert_eq!(p.release, 0.4);
    }

    #[test]
    fn get_and_set_address_the_same_field() {
        let fields = [
            PatchField::MaxLevel,
            PatchField::DutyCycle,
            PatchField::Attack,
            PatchField::Decay,
            PatchField::Sustain,
            PatchField::Release,
        ];
        for (i, &field) in fields.iter().enumerate() {
            let mut p = Patch::default();
            let value = 5.0 + i as f32;
            p.set(field, value);
            assert_eq!(p.get(field), value, "{:?}", field);
            // No other field moved.
            for &other in fields.iter().filter(|&&f| f != field) {
                assert_eq!(p.get(other), Patch::DEFAULT.get(other));
            }
        }
    }

    #[test]
    fn slide_mode_tokens() {
        assert_eq!(SlideMode::Quantized.token(), "Q");
        assert_eq!(SlideMode::Interpolated.token(), "noQ");
    }

    #[test]
    fn voice_keys_are_distinct() {
        for (i, a) in VOICE_KEYS.iter().enumerate() {
            for b in &VOICE_KEYS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

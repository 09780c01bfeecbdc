//! Engine-ready parameters derived from the active voice's patch.

use crate::patch::{Patch, SlideMode};

/// Shortest attack, decay or release the engine will use, in seconds.
///
/// Zero-length segments would divide by zero in the envelope.
pub const MIN_SEGMENT_SECONDS: f32 = 0.001;

/// Clamped copy of a [`Patch`] read by the envelope and pitch mapper.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineParams {
    pub max_level: f32,
    pub duty_cycle: f32,
    pub slide_mode: SlideMode,
    /// Always `>= MIN_SEGMENT_SECONDS`.
    pub attack: f32,
    /// Always `>= MIN_SEGMENT_SECONDS`.
    pub decay: f32,
    pub sustain: f32,
    /// Always `>= MIN_SEGMENT_SECONDS`.
    pub release: f32,
}

impl EngineParams {
    /// Derive engine parameters from a patch.
    ///
    /// Attack, decay and release are raised to [`MIN_SEGMENT_SECONDS`];
    /// everything else is copied unchanged.
    pub fn from_patch(patch: &Patch) -> Self {
        Self {
            max_level: patch.max_level,
            duty_cycle: patch.duty_cycle,
            slide_mode: patch.slide_mode,
            attack: min_segment(patch.attack),
            decay: min_segment(patch.decay),
            sustain: patch.sustain,
            release: min_segment(patch.release),
        }
    }
}

fn min_segment(seconds: f32) -> f32 {
    if seconds > 0.0 {
        seconds
    } else {
        MIN_SEGMENT_SECONDS
    }
}

/// The single live parameter set shared by all channels.
///
/// The only way to change it is [`apply()`](Self::apply), which replaces
/// the whole parameter struct at once and bumps [`version()`](Self::version).
/// Channels receive it by shared reference once per tick, so a tick never
/// observes a half-applied patch.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    params: EngineParams,
    version: u32,
}

impl EngineConfig {
    /// Start from `patch` at version 0.
    pub fn new(patch: &Patch) -> Self {
        Self {
            params: EngineParams::from_patch(patch),
            version: 0,
        }
    }

    /// Replace the live parameters with ones derived from `patch`.
    pub fn apply(&mut self, patch: &Patch) {
        *self = Self {
            params: EngineParams::from_patch(patch),
            version: self.version.wrapping_add(1),
        };

        #[cfg(feature = "defmt")]
        defmt::debug!("Engine parameters v{}: {}", self.version, self.params);
    }

    /// The live parameters.
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Number of times [`apply()`](Self::apply) has run.
    pub fn version(&self) -> u32 {
        self.version
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(&Patch::DEFAULT)
    }
}

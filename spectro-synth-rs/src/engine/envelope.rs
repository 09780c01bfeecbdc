//! Timestamp-driven ADSR envelope.
//!
//! The envelope holds no state of its own: the phase and level are a pure
//! function of the channel's note-on / note-off timestamps, the current
//! [`EngineParams`] and the time now. Editing a patch mid-note therefore
//! takes effect on the very next tick.
//!
//! ```text
//! level
//!   max ┤   /\
//!       │  /  \
//!   sus ┤ /    \__________
//!       │/                \
//!     0 ┼──────────────────\────▶ t
//!        A   D      S     R
//! ```

use super::params::EngineParams;

/// Full-scale envelope level.
pub const FULL_SCALE: f32 = 65535.0;

/// Envelope phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnvelopePhase {
    /// No note sounding; level 0.
    #[default]
    Idle,
    /// Rising from 0 to `max_level`.
    Attack,
    /// Falling from `max_level` to `sustain`.
    Decay,
    /// Holding `sustain` while the gate stays open.
    Sustain,
    /// Falling from `sustain` to 0 after the gate closed.
    Release,
}

/// Seconds elapsed between two millisecond timestamps.
fn elapsed_seconds(since_ms: u64, now_ms: u64) -> f32 {
    now_ms.saturating_sub(since_ms) as f32 / 1000.0
}

/// Phase plus the time spent since the governing timestamp.
fn locate(
    note_on: Option<u64>,
    note_off: Option<u64>,
    params: &EngineParams,
    now_ms: u64,
) -> (EnvelopePhase, f32) {
    if let Some(on) = note_on {
        let t = elapsed_seconds(on, now_ms);
        let phase = if t < params.attack {
            EnvelopePhase::Attack
        } else if t < params.attack + params.decay {
            EnvelopePhase::Decay
        } else {
            EnvelopePhase::Sustain
        };
        return (phase, t);
    }

    if let Some(off) = note_off {
        let t = elapsed_seconds(off, now_ms);
        if t < params.release {
            return (EnvelopePhase::Release, t);
        }
    }

    (EnvelopePhase::Idle, 0.0)
}

/// Scale a level fraction to full scale, truncating and clamping into `u16`.
fn to_level(fraction: f32) -> u16 {
    (fraction * FULL_SCALE).clamp(0.0, FULL_SCALE) as u16
}

/// Current envelope phase.
pub fn phase(
    note_on: Option<u64>,
    note_off: Option<u64>,
    params: &EngineParams,
    now_ms: u64,
) -> EnvelopePhase {
    locate(note_on, note_off, params, now_ms).0
}

/// Current envelope level in `0..=65535`.
///
/// A set `note_on` takes precedence over `note_off`.
///
/// # Examples
///
/// ```
/// use spectro::engine::{envelope, EngineParams};
/// use spectro::Patch;
///
/// let params = EngineParams::from_patch(&Patch::DEFAULT);
/// // Long after note-on the envelope holds the sustain level.
/// assert_eq!(envelope::level(Some(0), None, &params, 5_000), 13107);
/// // Long after note-off it is silent.
/// assert_eq!(envelope::level(None, Some(0), &params, 5_000), 0);
/// ```
pub fn level(
    note_on: Option<u64>,
    note_off: Option<u64>,
    params: &EngineParams,
    now_ms: u64,
) -> u16 {
    let (phase, t) = locate(note_on, note_off, params, now_ms);
    match phase {
        EnvelopePhase::Idle => 0,
        EnvelopePhase::Attack => to_level(t / params.attack * params.max_level),
        EnvelopePhase::Decay => {
            let d = ((t - params.attack) / params.decay).clamp(0.0, 1.0);
            to_level(params.max_level + (params.sustain - params.max_level) * d)
        }
        EnvelopePhase::Sustain => to_level(params.sustain),
        EnvelopePhase::Release => {
            let start = to_level(params.sustain) as f32;
            (start * (1.0 - t / params.release)).clamp(0.0, FULL_SCALE) as u16
        }
    }
}

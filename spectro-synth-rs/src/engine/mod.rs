//! Sound engine: pitch mapping, ADSR envelope and the per-channel runtime.
//!
//! Every tick, each channel reads its CV input, opens or closes its gate,
//! sets the PWM frequency from the calibrated pitch and the PWM duty from
//! the envelope. All channels read the single live [`EngineConfig`].

mod channel;
pub mod envelope;
mod params;
pub mod pitch;
mod tables;

pub use channel::{Channel, ChannelFrame, ChannelRuntime, GateEvent, GateState};
pub use envelope::EnvelopePhase;
pub use params::{EngineConfig, EngineParams, MIN_SEGMENT_SECONDS};
pub use tables::{
    CalibrationTable, CALIBRATION_1, CALIBRATION_2, CHANNEL_CALIBRATION, NOTES, NOTE_COUNT,
};

//! Calibration and note tables.
//!
//! Each calibration table lists, for one CV input, the voltage measured at
//! each of the 24 chromatic steps of the controller. The note table gives
//! the frequency of each step, C4 up to B5.

use crate::CHANNEL_COUNT;

/// Number of calibrated steps per table.
pub const NOTE_COUNT: usize = 24;

/// Measured input voltage per chromatic step, ascending.
pub type CalibrationTable = [f32; NOTE_COUNT];

/// Frequencies (Hz) of C4..B5, shared by all channels.
pub const NOTES: [f32; NOTE_COUNT] = [
    261.63, 277.18, 293.66, 311.13, 329.63, 349.23, //
    369.99, 392.00, 415.30, 440.00, 466.16, 493.88, //
    523.25, 554.37, 587.33, 622.25, 659.25, 698.46, //
    739.99, 783.99, 830.61, 880.00, 932.33, 987.77,
];

/// Calibration of the first CV input.
pub const CALIBRATION_1: CalibrationTable = [
    0.02, 0.13, 0.25, 0.37, 0.46, 0.56, 0.65, 0.75, //
    0.84, 0.94, 1.04, 1.14, 1.24, 1.35, 1.46, 1.58, //
    1.73, 1.88, 2.05, 2.25, 2.45, 2.68, 2.99, 3.25,
];

/// Calibration of the second CV input, also used by the third.
pub const CALIBRATION_2: CalibrationTable = [
    0.02, 0.16, 0.28, 0.40, 0.49, 0.59, 0.69, 0.79, //
    0.89, 0.99, 1.10, 1.20, 1.30, 1.41, 1.53, 1.65, //
    1.78, 1.93, 2.09, 2.27, 2.47, 2.69, 2.94, 3.25,
];

/// Calibration table used by each physical channel.
pub static CHANNEL_CALIBRATION: [&CalibrationTable; CHANNEL_COUNT] =
    [&CALIBRATION_1, &CALIBRATION_2, &CALIBRATION_2];

//! Control voltage to frequency mapping.

use libm::fabsf;

use super::tables::{CalibrationTable, NOTES};
use crate::patch::SlideMode;

/// Index of the calibration entry closest to `volts`.
///
/// Linear scan; on a tie the lower index wins.
pub fn nearest_index(volts: f32, table: &CalibrationTable) -> usize {
    let mut best = 0;
    let mut best_diff = fabsf(volts - table[0]);
    for (i, &v) in table.iter().enumerate().skip(1) {
        let diff = fabsf(volts - v);
        if diff < best_diff {
            best_diff = diff;
            best = i;
        }
    }
    best
}

/// Frequency of the nearest calibrated note.
pub fn quantized(volts: f32, table: &CalibrationTable) -> f32 {
    NOTES[nearest_index(volts, table)]
}

/// Frequency glided linearly between the nearest note and its neighbour on
/// the side `volts` falls toward.
///
/// The first and last notes are returned as-is; there is no extrapolation
/// past the ends of the table. The interpolation position is not clamped.
pub fn interpolated(volts: f32, table: &CalibrationTable) -> f32 {
    let idx = nearest_index(volts, table);
    if idx == 0 || idx == table.len() - 1 {
        return NOTES[idx];
    }

    let neighbour = if volts > table[idx] { idx + 1 } else { idx - 1 };
    let position = (volts - table[idx]) / (table[neighbour] - table[idx]);
    NOTES[idx] + position * (NOTES[neighbour] - NOTES[idx])
}

/// Map `volts` to a frequency in Hz using `mode`.
///
/// # Examples
///
/// ```
/// use spectro::engine::{pitch, CALIBRATION_1, NOTES};
/// use spectro::SlideMode;
///
/// let f = pitch::map(CALIBRATION_1[9], &CALIBRATION_1, SlideMode::Quantized);
/// assert_eq!(f, NOTES[9]);
/// ```
pub fn map(volts: f32, table: &CalibrationTable, mode: SlideMode) -> f32 {
    match mode {
        SlideMode::Quantized => quantized(volts, table),
        SlideMode::Interpolated => interpolated(volts, table),
    }
}

//! JSON encoding of patch records.

use serde::Deserialize;

use super::{Patch, SlideMode};

/// Upper bound on the encoded size of one record, in bytes.
///
/// A full record with shortest-representation floats is well under 200
/// bytes; stores may size their buffers from this constant.
pub const RECORD_CAPACITY: usize = 256;

/// A stored record as it was found, with every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialRecord {
    #[serde(rename = "maxlevel")]
    max_level: Option<f32>,
    #[serde(rename = "dutycycle")]
    duty_cycle: Option<f32>,
    #[serde(rename = "slidemode")]
    slide_mode: Option<SlideMode>,
    attack: Option<f32>,
    decay: Option<f32>,
    sustain: Option<f32>,
    release: Option<f32>,
}

impl PartialRecord {
    /// Fill every absent key from [`Patch::DEFAULT`].
    fn merge_defaults(self) -> Patch {
        let d = Patch::DEFAULT;
        Patch {
            max_level: self.max_level.unwrap_or(d.max_level),
            duty_cycle: self.duty_cycle.unwrap_or(d.duty_cycle),
            slide_mode: self.slide_mode.unwrap_or(d.slide_mode),
            attack: self.attack.unwrap_or(d.attack),
            decay: self.decay.unwrap_or(d.decay),
            sustain: self.sustain.unwrap_or(d.sustain),
            release: self.release.unwrap_or(d.release),
        }
    }
}

/// Serialize `patch` into `buf`, returning the number of bytes written.
pub fn encode(patch: &Patch, buf: &mut [u8]) -> Result<usize, serde_json_core::ser::Error> {
    serde_json_core::to_slice(patch, buf)
}

/// Parse a stored record, filling absent keys from the defaults.
///
/// # Examples
///
/// ```
/// use spectro::patch::decode;
/// use spectro::{Patch, SlideMode};
///
/// let patch = decode(br#"{"slidemode":"noQ","attack":1.5}"#).unwrap();
/// assert_eq!(patch.slide_mode, SlideMode::Interpolated);
/// assert_eq!(patch.attack, 1.5);
/// assert_eq!(patch.decay, Patch::DEFAULT.decay);
/// ```
pub fn decode(bytes: &[u8]) -> Result<Patch, serde_json_core::de::Error> {
    let (record, _) = serde_json_core::from_slice::<PartialRecord>(bytes)?;
    Ok(record.merge_defaults())
}

/// Value of an erased flash byte.
pub const ERASED_BYTE: u8 = 0xFF;

/// Length of a record stored at the start of an erasable region.
///
/// The record runs up to the first erased byte, or to the end of `region`.
/// Returns `None` when the region starts erased, i.e. holds no record.
/// JSON text never contains `0xFF`, so the first erased byte always ends it.
pub fn framed_len(region: &[u8]) -> Option<usize> {
    match region.iter().position(|&b| b == ERASED_BYTE) {
        Some(0) => None,
        Some(len) => Some(len),
        None if region.is_empty() => None,
        None => Some(region.len()),
    }
}

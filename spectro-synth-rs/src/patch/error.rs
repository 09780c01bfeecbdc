//! Error types for the patch store.

use core::fmt;

/// Errors that can occur when persisting patches.
///
/// Loading never fails (unreadable records fall back to defaults), so only
/// [`PatchStore::init()`](super::PatchStore::init) and
/// [`PatchStore::save()`](super::PatchStore::save) return this type.
#[derive(Debug)]
pub enum PatchStoreError<E> {
    /// Underlying record store error.
    Storage(E),
    /// The patch could not be encoded into a record buffer.
    Encode,
    /// Voice index out of range (must be < [`VOICE_COUNT`](crate::VOICE_COUNT)).
    InvalidVoice,
}

// Allow ergonomic `?` propagation from raw store errors.
impl<E> From<E> for PatchStoreError<E> {
    fn from(error: E) -> Self {
        PatchStoreError::Storage(error)
    }
}

impl<E: fmt::Debug> fmt::Display for PatchStoreError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PatchStoreError::Storage(e) => write!(f, "record store error: {:?}", e),
            PatchStoreError::Encode => write!(f, "patch does not fit in a record"),
            PatchStoreError::InvalidVoice => write!(f, "invalid voice index"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for PatchStoreError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PatchStoreError::Storage(e) => defmt::write!(f, "Record store error: {}", e),
            PatchStoreError::Encode => defmt::write!(f, "Patch encode failed"),
            PatchStoreError::InvalidVoice => defmt::write!(f, "Invalid voice index"),
        }
    }
}

//! Load, merge and save of the four voice patches.

use super::error::PatchStoreError;
use super::record::{decode, encode, RECORD_CAPACITY};
use super::{Patch, VOICE_KEYS};

/// Key-value persistence consumed by [`PatchStore`].
///
/// Implementations map a short ASCII key to one opaque byte record. The
/// firmware backs this with one flash sector per key; tests and host
/// simulations use [`MemoryStore`](super::MemoryStore).
pub trait RecordStore {
    /// Backend-specific failure.
    type Error;

    /// Returns `true` if a record exists for `key`.
    fn exists(&mut self, key: &str) -> Result<bool, Self::Error>;

    /// Copy the record for `key` into `buf`, returning its length.
    ///
    /// Fails if there is no record or it does not fit in `buf`.
    fn load(&mut self, key: &str, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Replace the record for `key` with `bytes`.
    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Owner of the voice patches.
///
/// Every access goes through the underlying [`RecordStore`]; nothing is
/// cached, so the store is always the single source of truth.
///
/// # Examples
///
/// ```
/// use spectro::patch::{MemoryStore, PatchStore};
/// use spectro::Patch;
///
/// let mut patches = PatchStore::new(MemoryStore::new());
/// patches.init().unwrap();
///
/// let mut patch = patches.load(2);
/// assert_eq!(patch, Patch::DEFAULT);
///
/// patch.release = 1.2;
/// patches.save(2, &patch).unwrap();
/// assert_eq!(patches.load(2).release, 1.2);
/// ```
pub struct PatchStore<S> {
    store: S,
}

impl<S> PatchStore<S>
where
    S: RecordStore,
{
    /// Wrap a record store. No I/O happens until [`init()`](Self::init).
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Write a default record for every voice that has none yet.
    ///
    /// Existing records are never touched, so calling this on every boot
    /// is safe.
    pub fn init(&mut self) -> Result<(), PatchStoreError<S::Error>> {
        for (voice, key) in VOICE_KEYS.iter().enumerate() {
            if !self.store.exists(key)? {
                #[cfg(feature = "defmt")]
                defmt::info!("Creating default patch for voice {}", voice);
                self.save(voice, &Patch::DEFAULT)?;
            }
        }
        Ok(())
    }

    /// Load the patch for `voice`.
    ///
    /// A record that cannot be read or parsed is replaced by
    /// [`Patch::DEFAULT`]; keys missing from a readable record are filled
    /// from the default. The returned patch is therefore always complete.
    pub fn load(&mut self, voice: usize) -> Patch {
        let Some(key) = VOICE_KEYS.get(voice) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("load: voice {} out of range", voice);
            return Patch::DEFAULT;
        };

        let mut buf = [0u8; RECORD_CAPACITY];
        let len = match self.store.load(key, &mut buf) {
            Ok(len) => len.min(buf.len()),
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Voice {} record unreadable, using defaults", voice);
                return Patch::DEFAULT;
            }
        };

        match decode(&buf[..len]) {
            Ok(patch) => patch,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Voice {} record corrupt, using defaults", voice);
                Patch::DEFAULT
            }
        }
    }

    /// Persist `patch` as the record for `voice`.
    ///
    /// There is no retry; a store failure is returned as
    /// [`PatchStoreError::Storage`].
    pub fn save(&mut self, voice: usize, patch: &Patch) -> Result<(), PatchStoreError<S::Error>> {
        let Some(key) = VOICE_KEYS.get(voice) else {
            return Err(PatchStoreError::InvalidVoice);
        };

        let mut buf = [0u8; RECORD_CAPACITY];
        let Ok(len) = encode(patch, &mut buf) else {
            return Err(PatchStoreError::Encode);
        };
        self.store.save(key, &buf[..len])?;
        Ok(())
    }

    /// Borrow the underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the underlying record store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

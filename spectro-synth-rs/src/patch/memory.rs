//! RAM-backed [`RecordStore`] for host simulation and tests.

use heapless::{String, Vec};

use super::record::RECORD_CAPACITY;
use super::store::RecordStore;

/// Maximum number of distinct keys a [`MemoryStore`] can hold.
pub const MEMORY_STORE_SLOTS: usize = 8;

/// Errors returned by [`MemoryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryStoreError {
    /// No record exists for the key.
    NotFound,
    /// Key or record larger than the fixed slot size, or destination buffer too small.
    TooLarge,
    /// All slots are taken by other keys.
    Full,
    /// Injected read failure.
    ReadFailed,
    /// Injected write failure.
    WriteFailed,
}

/// Fixed-capacity in-memory record store.
///
/// Holds up to [`MEMORY_STORE_SLOTS`] records of at most
/// [`RECORD_CAPACITY`] bytes. Read and write failures can be switched on to
/// exercise the fallback paths of [`PatchStore`](super::PatchStore).
#[derive(Default)]
pub struct MemoryStore {
    records: Vec<(String<16>, Vec<u8, RECORD_CAPACITY>), MEMORY_STORE_SLOTS>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `load` fail with [`MemoryStoreError::ReadFailed`].
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent `save` fail with [`MemoryStoreError::WriteFailed`].
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw bytes currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<&[u8]> {
        self.records
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    type Error = MemoryStoreError;

    fn exists(&mut self, key: &str) -> Result<bool, Self::Error> {
        Ok(self.raw(key).is_some())
    }

    fn load(&mut self, key: &str, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_reads {
            return Err(MemoryStoreError::ReadFailed);
        }
        let bytes = self.raw(key).ok_or(MemoryStoreError::NotFound)?;
        let dest = buf
            .get_mut(..bytes.len())
            .ok_or(MemoryStoreError::TooLarge)?;
        dest.copy_from_slice(bytes);
        Ok(bytes.len())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(MemoryStoreError::WriteFailed);
        }
        let record = Vec::from_slice(bytes).map_err(|_| MemoryStoreError::TooLarge)?;

        if let Some((_, existing)) = self.records.iter_mut().find(|(k, _)| k.as_str() == key) {
            *existing = record;
            return Ok(());
        }

        let key = String::try_from(key).map_err(|_| MemoryStoreError::TooLarge)?;
        self.records
            .push((key, record))
            .map_err(|_| MemoryStoreError::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::new();
        store.save("a", b"hello").unwrap();

        let mut buf = [0u8; 16];
        let len = store.load("a", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"hello");
        assert!(store.exists("a").unwrap());
        assert!(!store.exists("b").unwrap());
    }

    #[test]
    fn save_overwrites_in_place() {
        let mut store = MemoryStore::new();
        store.save("a", b"one").unwrap();
        store.save("a", b"two!").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.raw("a"), Some(&b"two!"[..]));
    }

    #[test]
    fn load_missing_key() {
        let mut store = MemoryStore::new();
        let mut buf = [0u8; 4];
        assert_eq!(store.load("x", &mut buf), Err(MemoryStoreError::NotFound));
    }

    #[test]
    fn load_into_short_buffer() {
        let mut store = MemoryStore::new();
        store.save("a", b"too long").unwrap();
        let mut buf = [0u8; 3];
        assert_eq!(store.load("a", &mut buf), Err(MemoryStoreError::TooLarge));
    }

    #[test]
    fn full_store_rejects_new_keys() {
        let mut store = MemoryStore::new();
        let keys = ["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7"];
        for key in keys {
            store.save(key, b"x").unwrap();
        }
        assert_eq!(store.save("k8", b"x"), Err(MemoryStoreError::Full));
        // Existing keys can still be rewritten.
        assert!(store.save("k3", b"y").is_ok());
    }

    #[test]
    fn injected_failures() {
        let mut store = MemoryStore::new();
        store.save("a", b"1").unwrap();

        store.fail_reads(true);
        let mut buf = [0u8; 4];
        assert_eq!(store.load("a", &mut buf), Err(MemoryStoreError::ReadFailed));

        store.fail_writes(true);
        assert_eq!(store.save("a", b"2"), Err(MemoryStoreError::WriteFailed));

        store.fail_reads(false);
        assert_eq!(store.load("a", &mut buf), Ok(1));
        assert_eq!(buf[0], b'1');
    }
}

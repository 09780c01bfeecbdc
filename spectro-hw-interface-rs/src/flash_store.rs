//! Patch records in the last sectors of the on-board flash.
//!
//! Each voice owns one erase sector at the end of flash. A record is the
//! raw JSON bytes from offset 0 of its sector; the rest of the sector stays
//! erased (`0xFF`), which also marks where the record ends. A sector whose
//! first byte is erased holds no record.

use core::fmt;

use embassy_rp::flash::{self, Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use spectro::patch::{framed_len, RecordStore, ERASED_BYTE, RECORD_CAPACITY, VOICE_KEYS};
use spectro::VOICE_COUNT;

/// Size of the Pico 2 flash chip.
pub const FLASH_SIZE: usize = 4 * 1024 * 1024;

/// Offset of the first record sector.
pub const RECORDS_OFFSET: u32 = (FLASH_SIZE - VOICE_COUNT * ERASE_SIZE) as u32;

/// Errors from [`FlashStore`].
#[derive(Debug)]
pub enum FlashStoreError {
    /// The flash driver reported a failure.
    Flash(flash::Error),
    /// The key does not name a voice record.
    UnknownKey,
    /// The sector for the key is erased.
    Empty,
    /// The record does not fit in a sector buffer or the caller's buffer.
    RecordTooLarge,
}

impl From<flash::Error> for FlashStoreError {
    fn from(e: flash::Error) -> Self {
        FlashStoreError::Flash(e)
    }
}

impl fmt::Display for FlashStoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FlashStoreError::Flash(e) => write!(f, "flash error: {:?}", e),
            FlashStoreError::UnknownKey => write!(f, "unknown record key"),
            FlashStoreError::Empty => write!(f, "no record"),
            FlashStoreError::RecordTooLarge => write!(f, "record too large"),
        }
    }
}

impl defmt::Format for FlashStoreError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            FlashStoreError::Flash(e) => defmt::write!(f, "Flash error: {}", e),
            FlashStoreError::UnknownKey => defmt::write!(f, "Unknown record key"),
            FlashStoreError::Empty => defmt::write!(f, "No record"),
            FlashStoreError::RecordTooLarge => defmt::write!(f, "Record too large"),
        }
    }
}

/// [`RecordStore`] over the RP2350's QSPI flash.
pub struct FlashStore {
    flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>,
}

impl FlashStore {
    pub fn new(flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>) -> Self {
        Self { flash }
    }

    fn sector(key: &str) -> Result<u32, FlashStoreError> {
        let index = VOICE_KEYS
            .iter()
            .position(|&k| k == key)
            .ok_or(FlashStoreError::UnknownKey)?;
        Ok(RECORDS_OFFSET + (index * ERASE_SIZE) as u32)
    }
}

impl RecordStore for FlashStore {
    type Error = FlashStoreError;

    fn exists(&mut self, key: &str) -> Result<bool, Self::Error> {
        let offset = Self::sector(key)?;
        let mut first = [0u8; 1];
        self.flash.blocking_read(offset, &mut first)?;
        Ok(first[0] != ERASED_BYTE)
    }

    fn load(&mut self, key: &str, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let offset = Self::sector(key)?;
        let mut record = [ERASED_BYTE; RECORD_CAPACITY];
        self.flash.blocking_read(offset, &mut record)?;

        let len = framed_len(&record).ok_or(FlashStoreError::Empty)?;
        let dest = buf.get_mut(..len).ok_or(FlashStoreError::RecordTooLarge)?;
        dest.copy_from_slice(&record[..len]);
        Ok(len)
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        let offset = Self::sector(key)?;
        if bytes.len() > RECORD_CAPACITY {
            return Err(FlashStoreError::RecordTooLarge);
        }

        self.flash.blocking_erase(offset, offset + ERASE_SIZE as u32)?;
        self.flash.blocking_write(offset, bytes)?;

        defmt::debug!("Wrote {} bytes for {}", bytes.len(), key);
        Ok(())
    }
}

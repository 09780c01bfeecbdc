//! Display error type.

use core::fmt;

use display_interface::DisplayError;

/// Errors from [`OledDriver`](crate::OledDriver).
///
/// `ssd1306` folds every bus error into [`DisplayError`], so this type is
/// not generic over the I2C implementation.
#[derive(Debug)]
pub enum OledError {
    /// Bus-level failure while talking to the panel.
    Display(DisplayError),
    /// The panel did not accept the initialisation sequence.
    InitializationFailed,
    /// A flush was attempted before [`OledDriver::init()`](crate::OledDriver::init).
    NotInitialized,
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        OledError::Display(e)
    }
}

impl fmt::Display for OledError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OledError::Display(e) => write!(f, "display interface error: {:?}", e),
            OledError::InitializationFailed => write!(f, "display initialisation failed"),
            OledError::NotInitialized => write!(f, "display not initialised"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Display(_e) => defmt::write!(f, "Display interface error"),
            OledError::InitializationFailed => defmt::write!(f, "Initialization failed"),
            OledError::NotInitialized => defmt::write!(f, "Not initialized"),
        }
    }
}

//! SSD1306 driver in async buffered graphics mode, mounted on its side.
//!
//! The panel is fitted rotated, so [`OledDriver`] sets up the controller
//! with [`DisplayRotation::Rotate270`]. Drawing code therefore sees a
//! 64 × 128 portrait canvas: each menu item is a horizontal line of text
//! on that canvas, which reads as a vertical column on the panel.

use display_interface_i2c::I2CInterface;
use embedded_hal_async::i2c::I2c;
use ssd1306::{
    mode::BufferedGraphicsModeAsync, prelude::*, I2CDisplayInterface, Ssd1306Async,
};

use crate::error::OledError;

/// Standard SSD1306 I2C address.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Concrete display type used internally by [`OledDriver`].
pub type Display<I2C> = Ssd1306Async<
    I2CInterface<I2C>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// Async driver for the rotated SSD1306 128×64 panel over I2C.
///
/// # Lifecycle
///
/// 1. [`OledDriver::new()`] builds the driver without any I2C traffic.
/// 2. [`OledDriver::init()`] sends the SSD1306 initialisation sequence.
/// 3. Draw into the frame buffer via [`OledDriver::display_mut()`].
/// 4. [`OledDriver::flush()`] transfers the frame buffer to the panel.
///
/// # Example
///
/// ```no_run
/// use spectro_oled_display_rs::{OledDriver, DEFAULT_ADDRESS};
///
/// # async fn example(i2c: impl embedded_hal_async::i2c::I2c) {
/// let mut oled = OledDriver::new(i2c, DEFAULT_ADDRESS);
/// oled.init().await.unwrap();
/// oled.clear_buffer();
/// oled.flush().await.unwrap();
/// # }
/// ```
pub struct OledDriver<I2C> {
    display: Display<I2C>,
    initialized: bool,
}

impl<I2C> OledDriver<I2C>
where
    I2C: I2c,
{
    /// Construct an uninitialised driver.
    ///
    /// * `i2c`: the bus, owned exclusively by the display.
    /// * `address`: 7-bit device address, usually [`DEFAULT_ADDRESS`].
    pub fn new(i2c: I2C, address: u8) -> Self {
        let interface = I2CDisplayInterface::new_custom_address(i2c, address);
        let display = Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate270)
            .into_buffered_graphics_mode();

        Self {
            display,
            initialized: false,
        }
    }

    /// Send the initialisation sequence. Call once before drawing.
    ///
    /// # Errors
    ///
    /// [`OledError::InitializationFailed`] if the panel does not respond.
    pub async fn init(&mut self) -> Result<(), OledError> {
        self.display
            .init()
            .await
            .map_err(|_| OledError::InitializationFailed)?;
        self.initialized = true;
        Ok(())
    }

    /// Clear the frame buffer. No I2C traffic.
    pub fn clear_buffer(&mut self) {
        self.display.clear_buffer();
    }

    /// Transfer the frame buffer to the panel (about 20 ms at 400 kHz).
    ///
    /// # Errors
    ///
    /// [`OledError::NotInitialized`] before [`init()`](Self::init),
    /// [`OledError::Display`] on a bus failure.
    pub async fn flush(&mut self) -> Result<(), OledError> {
        if !self.initialized {
            return Err(OledError::NotInitialized);
        }
        self.display.flush().await?;
        Ok(())
    }

    /// The frame buffer as an `embedded-graphics` [`DrawTarget`], or `None`
    /// before [`init()`](Self::init).
    ///
    /// [`DrawTarget`]: embedded_graphics::draw_target::DrawTarget
    pub fn display_mut(&mut self) -> Option<&mut Display<I2C>> {
        if self.initialized {
            Some(&mut self.display)
        } else {
            None
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

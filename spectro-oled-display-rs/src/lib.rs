//! Async OLED menu display for the Spectro synth controller.
//!
//! This crate provides [`OledDriver`], a wrapper around the [`ssd1306`]
//! crate in async buffered-graphics mode with the panel rotated on its side,
//! [`render_screen`], which draws a menu [`Screen`] onto any binary-colour
//! `embedded-graphics` target, and [`display_update_task`], a periodic
//! update loop that redraws whenever the published screen changes.
//!
//! # Quick Start
//!
//! ```ignore
//! use spectro_oled_display_rs::{display_update_task, DisplayConfig, OledDriver, DEFAULT_ADDRESS};
//!
//! // In your Embassy main:
//! let oled = OledDriver::new(i2c, DEFAULT_ADDRESS);
//! spawner.spawn(oled_task(oled, screen, DisplayConfig::default())).unwrap();
//!
//! // Thin task wrapper (Embassy tasks cannot be generic):
//! #[embassy_executor::task]
//! async fn oled_task(
//!     driver: OledDriver<MyI2cType>,
//!     screen: &'static Mutex<CriticalSectionRawMutex, Screen>,
//!     config: DisplayConfig,
//! ) {
//!     display_update_task(driver, screen, config).await;
//! }
//! ```
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`].
//! - **`task`**: the Embassy [`display_update_task`].
//!
//! [`Screen`]: spectro::menu::Screen
//! [`display_update_task`]: crate::display_task::display_update_task

#![no_std]

#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod layout;

// ── Re-exports for convenience ───────────────────────────────────────────

#[cfg(feature = "task")]
pub use display_task::display_update_task;
pub use driver::{OledDriver, DEFAULT_ADDRESS};
pub use error::OledError;
pub use layout::{item_text, render_screen, DisplayConfig};

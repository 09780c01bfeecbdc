//! Periodic display update loop.
//!
//! The control loop publishes the latest [`Screen`] into a mutex; this task
//! polls it at [`DisplayConfig::update_frequency_hz`] and only renders and
//! flushes when it differs from the last frame drawn. The I2C flush happens
//! with the mutex released, so the control loop never waits on the panel.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::i2c::I2c;
use spectro::menu::Screen;

use crate::driver::OledDriver;
use crate::layout::{render_screen, DisplayConfig};

// ── Display update task ──────────────────────────────────────────────────

/// Periodic display update loop.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`. Callers
/// create a thin, concrete task wrapper, since Embassy tasks cannot be
/// generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(
///     driver: OledDriver<MyConcreteI2cType>,
///     screen: &'static Mutex<CriticalSectionRawMutex, Screen>,
///     config: DisplayConfig,
/// ) {
///     display_update_task(driver, screen, config).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialise the display hardware.
/// 2. Loop at `config.update_frequency_hz`:
///    - Lock `screen`, clone it, release the mutex.
///    - Skip if it matches the last frame drawn.
///    - Clear the buffer and render (no I2C, no mutex).
///    - Flush the buffer to the panel (~20 ms I2C).
///
/// # Errors
///
/// * Initialisation failure: logs the error and **returns** (task exits).
/// * Render / flush failure: logs the error and retries next cycle.
#[allow(clippy::needless_pass_by_value)] // config is small and consumed
pub async fn display_update_task<I2C>(
    mut driver: OledDriver<I2C>,
    screen: &'static Mutex<CriticalSectionRawMutex, Screen>,
    config: DisplayConfig,
) where
    I2C: I2c,
{
    if let Err(_e) = driver.init().await {
        #[cfg(feature = "defmt")]
        defmt::error!("OLED init failed: {}", _e);
        return;
    }

    #[cfg(feature = "defmt")]
    defmt::info!("OLED initialised");

    let period = embassy_time::Duration::from_millis(config.update_period_ms());
    let mut last_drawn: Option<Screen> = None;

    loop {
        let current = screen.lock().await.clone();

        if last_drawn.as_ref() != Some(&current) {
            driver.clear_buffer();
            let rendered = match driver.display_mut() {
                Some(display) => render_screen(display, &current, &config).is_ok(),
                None => false,
            };

            if !rendered {
                #[cfg(feature = "defmt")]
                defmt::error!("Render failed");
            } else if let Err(_e) = driver.flush().await {
                #[cfg(feature = "defmt")]
                defmt::error!("Flush failed: {}", _e);
            } else {
                last_drawn = Some(current);
            }
        }

        embassy_time::Timer::after(period).await;
    }
}

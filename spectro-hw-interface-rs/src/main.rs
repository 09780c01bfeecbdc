//! spectro-hw-interface
//!
//! Firmware for the Spectro synth controller on the Raspberry Pi Pico 2.
//! Wires the library crates into two Embassy tasks:
//!
//! 1. The control task runs every 10 ms: it samples the three CV inputs,
//!    updates the three PWM outputs, polls the four buttons and feeds the
//!    presses to the menu. When the menu changes, it publishes the new
//!    [`Screen`] into a shared mutex.
//! 2. The OLED task wakes on its 30 Hz timer, compares the published screen
//!    with the last one drawn, and renders and flushes it if it changed.
//!
//! Patches live in the last four sectors of flash.

#![no_std]
#![no_main]

mod buttons;
mod cv;
mod flash_store;
mod pwm;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::block::ImageDef;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use spectro::io::Keypad;
use spectro::menu::Screen;
use spectro::{Synth, SynthConfig};
use spectro_oled_display_rs::{display_update_task, DisplayConfig, OledDriver, DEFAULT_ADDRESS};

use buttons::PanelButton;
use cv::CvInputs;
use flash_store::{FlashStore, FLASH_SIZE};
use pwm::{PwmChannel, SliceOutput};

// ---------------------------------------------------------------------------
// Boot block and interrupt binding
// ---------------------------------------------------------------------------

/// Tell the RP2350 Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = embassy_rp::block::ImageDef::secure_exe();

// Wire the I2C0 peripheral interrupt to Embassy's async handler.
bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
});

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// Latest screen: written by the control task, read by the OLED task.
static SCREEN: StaticCell<Mutex<CriticalSectionRawMutex, Screen>> = StaticCell::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

/// The OLED is the only device on I2C0.
type OledI2c = I2c<'static, I2C0, i2c::Async>;

type SpectroSynth = Synth<FlashStore, PwmChannel>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `display_update_task` so it can
/// be spawned as a concrete Embassy task.
#[embassy_executor::task]
async fn oled_task(
    driver: OledDriver<OledI2c>,
    screen: &'static Mutex<CriticalSectionRawMutex, Screen>,
    config: DisplayConfig,
) {
    display_update_task(driver, screen, config).await;
}

/// Fixed-period control loop.
///
/// The screen mutex is held only to store a new screen; rendering and the
/// I2C flush happen in the OLED task.
#[embassy_executor::task]
async fn control_task(
    mut synth: SpectroSynth,
    mut cv: CvInputs,
    mut keypad: Keypad<PanelButton>,
    screen: &'static Mutex<CriticalSectionRawMutex, Screen>,
    period: Duration,
) {
    info!("Control task started");

    loop {
        let now_ms = Instant::now().as_millis();
        let presses = keypad.poll();

        if let Some(next) = synth.tick(now_ms, &mut cv, presses) {
            *screen.lock().await = next;
        }

        Timer::after(period).await;
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("spectro-hw-interface starting");

    // —— Pin assignments ————————————————————————————————————————————————————
    // I2C_SDA    → GP0   (p.PIN_0)   OLED, 400 kHz
    // I2C_SCL    → GP1   (p.PIN_1)
    // BTN_UP     → GP2   (p.PIN_2)   active-low, pull-up enabled
    // BTN_DOWN   → GP3   (p.PIN_3)   active-low, pull-up enabled
    // BTN_OK     → GP4   (p.PIN_4)   active-low, pull-up enabled
    // BTN_CANCEL → GP5   (p.PIN_5)   active-low, pull-up enabled
    // PWM_1      → GP10  (p.PIN_10)  slice 5, output A
    // PWM_2      → GP15  (p.PIN_15)  slice 7, output B
    // PWM_3      → GP20  (p.PIN_20)  slice 2, output A
    // CV_1       → GP26  (p.PIN_26)  ADC0
    // CV_2       → GP27  (p.PIN_27)  ADC1
    // CV_3       → GP28  (p.PIN_28)  ADC2
    // ———————————————————————————————————————————————————————————————————————

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let i2c = I2c::new_async(
        p.I2C0,
        p.PIN_1, // SCL
        p.PIN_0, // SDA
        Irqs,
        i2c_config,
    );
    let oled_driver = OledDriver::new(i2c, DEFAULT_ADDRESS);

    let keypad = Keypad::new(
        PanelButton::new(Input::new(p.PIN_2, Pull::Up)),
        PanelButton::new(Input::new(p.PIN_3, Pull::Up)),
        PanelButton::new(Input::new(p.PIN_4, Pull::Up)),
        PanelButton::new(Input::new(p.PIN_5, Pull::Up)),
    );

    let cv = CvInputs::new(
        Adc::new_blocking(p.ADC, adc::Config::default()),
        [
            Channel::new_pin(p.PIN_26, Pull::None),
            Channel::new_pin(p.PIN_27, Pull::None),
            Channel::new_pin(p.PIN_28, Pull::None),
        ],
    );

    let outputs = [
        PwmChannel::new(
            Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, PwmConfig::default()),
            SliceOutput::A,
        ),
        PwmChannel::new(
            Pwm::new_output_b(p.PWM_SLICE7, p.PIN_15, PwmConfig::default()),
            SliceOutput::B,
        ),
        PwmChannel::new(
            Pwm::new_output_a(p.PWM_SLICE2, p.PIN_20, PwmConfig::default()),
            SliceOutput::A,
        ),
    ];

    // —— Patch store and synth ——————————————————————————————————————————————

    let store = FlashStore::new(Flash::<_, _, FLASH_SIZE>::new_blocking(p.FLASH));
    let synth_config = SynthConfig::default();
    let period = Duration::from_millis(synth_config.tick_period_ms);
    let mut synth = Synth::new(store, outputs, synth_config);

    let screen = SCREEN.init(Mutex::new(synth.screen()));

    // —— Spawn tasks ————————————————————————————————————————————————————————

    let display_config = DisplayConfig::default(); // 30 Hz refresh rate

    spawner.spawn(oled_task(oled_driver, screen, display_config)).unwrap();
    spawner
        .spawn(control_task(synth, cv, keypad, screen, period))
        .unwrap();
}

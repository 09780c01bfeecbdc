//! Display configuration and screen rendering.
//!
//! [`render_screen`] draws a [`Screen`] onto any `embedded-graphics`
//! binary-colour target. Coordinates are in the rotated 64 × 128 canvas the
//! [`OledDriver`](crate::OledDriver) exposes: `x` runs along a column of
//! text, `y` picks the column.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{ascii::FONT_5X8, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};
use heapless::String;
use spectro::menu::{EditView, MenuItemView, MenuView, Screen, LABEL_CAPACITY};

/// Capacity of a rendered item: marker plus label.
pub const ITEM_CAPACITY: usize = LABEL_CAPACITY + 4;

// ── DisplayConfig ────────────────────────────────────────────────────────

/// Configuration for the display layout and update task.
///
/// All layout geometry lives here; there are no module-level layout
/// constants. [`DisplayConfig::default()`] matches the front panel: menu
/// columns 30 px apart starting 10 px in, a 28 px highlight, refreshed at
/// 30 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Display refresh rate in Hz. Default: 30. Max: 60.
    pub update_frequency_hz: u32,

    // ── Layout geometry ──────────────────────────────────────────────
    /// Canvas width after rotation. Default: 64.
    pub display_width: u32,
    /// Canvas height after rotation. Default: 128.
    pub display_height: u32,
    /// Position of the first menu column. Default: 10.
    pub first_column: i32,
    /// Distance between menu columns. Default: 30.
    pub column_pitch: i32,
    /// Thickness of the selection highlight. Default: 28.
    pub highlight_width: u32,
    /// How far the highlight starts before its column. Default: 2.
    pub highlight_margin: i32,
    /// Edit screen: column of the field name. Default: 0.
    pub edit_name_column: i32,
    /// Edit screen: column of the `"Value"` caption. Default: 20.
    pub edit_caption_column: i32,
    /// Edit screen: column of the pending value. Default: 40.
    pub edit_value_column: i32,
    /// Notice screen text and the column of each line.
    pub notice: [(&'static str, i32); 4],
    /// Prefix drawn before marked items. Default: `"*"`.
    pub marker: &'static str,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            update_frequency_hz: 30,
            display_width: 64,
            display_height: 128,
            first_column: 10,
            column_pitch: 30,
            highlight_width: 28,
            highlight_margin: 2,
            edit_name_column: 0,
            edit_caption_column: 20,
            edit_value_column: 40,
            notice: [
                ("Notice :", 100),
                ("bit.ly/", 70),
                ("Spectro", 40),
                ("Synth", 10),
            ],
            marker: "*",
        }
    }
}

impl DisplayConfig {
    /// Convert the configured frequency to a timer period in milliseconds.
    ///
    /// Formula: `1000 / update_frequency_hz`.
    pub fn update_period_ms(&self) -> u64 {
        1000 / self.update_frequency_hz as u64
    }

    /// Column of menu item `index`.
    pub fn column(&self, index: usize) -> i32 {
        self.first_column + index as i32 * self.column_pitch
    }

    /// Number of menu columns whose highlight fits inside `display_height`.
    pub fn visible_items(&self) -> usize {
        let first_end = self.first_column - self.highlight_margin + self.highlight_width as i32;
        let room = self.display_height as i32 - first_end;
        if room < 0 || self.column_pitch <= 0 {
            return 0;
        }
        (room / self.column_pitch) as usize + 1
    }
}

// ── Item text ────────────────────────────────────────────────────────────

/// Text drawn for one menu item: the marker, if marked, then the label.
pub fn item_text(item: &MenuItemView, config: &DisplayConfig) -> String<ITEM_CAPACITY> {
    let mut text = String::new();
    if item.marked {
        let _ = text.push_str(config.marker);
    }
    let _ = write!(text, "{}", item.label);
    text
}

// ── Rendering ────────────────────────────────────────────────────────────

/// Render `screen` into `display`.
///
/// The caller clears the frame buffer first.
///
/// # Layout
///
/// ```text
///          y
///   0 ┌──────────┐
///  10 │ Voix 1   │  ← column 0
///  38 │▓Voix 2▓▓▓│  ← selected: highlight, inverted text
///  70 │ Voix 3   │
/// 100 │ *Voix 4  │  ← marked
///     └──────────┘
///      x → 64
/// ```
pub fn render_screen<D>(
    display: &mut D,
    screen: &Screen,
    config: &DisplayConfig,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    match screen {
        Screen::Menu(view) => render_menu(display, view, config),
        Screen::Edit(view) => render_edit(display, view, config),
        Screen::Notice => {
            for (line, column) in config.notice {
                draw_line(display, line, column, BinaryColor::On)?;
            }
            Ok(())
        }
    }
}

fn render_menu<D>(display: &mut D, view: &MenuView, config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    for (i, item) in view.items.iter().enumerate().take(config.visible_items()) {
        let column = config.column(i);
        let color = if i == view.selected {
            Rectangle::new(
                Point::new(0, column - config.highlight_margin),
                Size::new(config.display_width, config.highlight_width),
            )
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(display)?;
            BinaryColor::Off
        } else {
            BinaryColor::On
        };

        draw_line(display, &item_text(item, config), column, color)?;
    }
    Ok(())
}

fn render_edit<D>(display: &mut D, view: &EditView, config: &DisplayConfig) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    draw_line(display, view.name, config.edit_name_column, BinaryColor::On)?;
    draw_line(display, "Value", config.edit_caption_column, BinaryColor::On)?;
    draw_line(display, &view.value, config.edit_value_column, BinaryColor::On)
}

fn draw_line<D>(
    display: &mut D,
    text: &str,
    column: i32,
    color: BinaryColor,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_5X8, color);
    Text::with_baseline(text, Point::new(0, column), style, Baseline::Top).draw(display)?;
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────

//! Renderer-independent description of what the display shows.
//!
//! The navigator produces a [`Screen`]; the display crate turns it into
//! pixels. Screens are plain values so the display task can compare the
//! latest one with what it last drew and skip identical frames.

use core::fmt::Write;

use heapless::{String, Vec};

use super::MAX_ENTRIES;

/// Capacity of a single display label, in bytes.
pub const LABEL_CAPACITY: usize = 16;

/// Fixed-capacity label text.
pub type Label = String<LABEL_CAPACITY>;

/// Copy `text` into a [`Label`], truncating at the capacity.
pub fn label(text: &str) -> Label {
    let mut out = Label::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// `"<text> <value to 1 decimal>"`, e.g. `"Attack 0.4"`.
pub fn value_label(text: &str, value: f32) -> Label {
    let mut out = label(text);
    let _ = write!(out, " {:.1}", value);
    out
}

/// `value` rounded to 1 decimal, e.g. `"0.4"`.
pub fn value_text(value: f32) -> Label {
    let mut out = Label::new();
    let _ = write!(out, "{:.1}", value);
    out
}

/// One column of a menu screen.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuItemView {
    pub label: Label,
    /// Active voice on the root menu, current mode on a slide menu.
    pub marked: bool,
}

/// A menu with its current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuView {
    pub items: Vec<MenuItemView, MAX_ENTRIES>,
    /// Index of the highlighted item.
    pub selected: usize,
}

/// An edit session in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditView {
    /// Record key of the field being edited, e.g. `"attack"`.
    pub name: &'static str,
    /// Pending value, rounded to 1 decimal.
    pub value: Label,
}

/// Everything the display can show.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Menu(MenuView),
    Edit(EditView),
    /// Shown while performing.
    Notice,
}

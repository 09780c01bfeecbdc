//! The static menu tree.
//!
//! ```text
//! Root ─┬─ Voix 1 ─┬─ Form ──── Max, Dty
//!       ├─ Voix 2  ├─ ADSR ──── Attack, Decay, Sustain, Release
//!       ├─ Voix 3  └─ Slide ─── Q, noQ
//!       └─ Voix 4
//! ```

use crate::patch::{PatchField, SlideMode};
use crate::VOICE_COUNT;

/// Identifies one menu of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuId {
    /// Voice selection.
    Root,
    /// Form / ADSR / Slide for a voice.
    Voice(usize),
    /// Max level and duty cycle of a voice.
    Form(usize),
    /// Envelope times and sustain of a voice.
    Adsr(usize),
    /// Slide mode choice of a voice.
    Slide(usize),
}

/// What confirming an entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuTarget {
    /// Descend into another menu.
    Submenu(MenuId),
    /// Edit a numeric field of a voice's patch.
    NumericField(PatchField, usize),
    /// Set a voice's slide mode.
    ToggleField(SlideMode, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuEntry {
    pub label: &'static str,
    pub target: MenuTarget,
}

const fn entry(label: &'static str, target: MenuTarget) -> MenuEntry {
    MenuEntry { label, target }
}

static ROOT: [MenuEntry; VOICE_COUNT] = [
    entry("Voix 1", MenuTarget::Submenu(MenuId::Voice(0))),
    entry("Voix 2", MenuTarget::Submenu(MenuId::Voice(1))),
    entry("Voix 3", MenuTarget::Submenu(MenuId::Voice(2))),
    entry("Voix 4", MenuTarget::Submenu(MenuId::Voice(3))),
];

const fn voice_menu(v: usize) -> [MenuEntry; 3] {
    [
        entry("Form", MenuTarget::Submenu(MenuId::Form(v))),
        entry("ADSR", MenuTarget::Submenu(MenuId::Adsr(v))),
        entry("Slide", MenuTarget::Submenu(MenuId::Slide(v))),
    ]
}

const fn form_menu(v: usize) -> [MenuEntry; 2] {
    [
        entry("Max", MenuTarget::NumericField(PatchField::MaxLevel, v)),
        entry("Dty", MenuTarget::NumericField(PatchField::DutyCycle, v)),
    ]
}

const fn adsr_menu(v: usize) -> [MenuEntry; 4] {
    [
        entry("Attack", MenuTarget::NumericField(PatchField::Attack, v)),
        entry("Decay", MenuTarget::NumericField(PatchField::Decay, v)),
        entry("Sustain", MenuTarget::NumericField(PatchField::Sustain, v)),
        entry("Release", MenuTarget::NumericField(PatchField::Release, v)),
    ]
}

const fn slide_menu(v: usize) -> [MenuEntry; 2] {
    [
        entry("Q", MenuTarget::ToggleField(SlideMode::Quantized, v)),
        entry("noQ", MenuTarget::ToggleField(SlideMode::Interpolated, v)),
    ]
}

static VOICE_MENUS: [[MenuEntry; 3]; VOICE_COUNT] =
    [voice_menu(0), voice_menu(1), voice_menu(2), voice_menu(3)];
static FORM_MENUS: [[MenuEntry; 2]; VOICE_COUNT] =
    [form_menu(0), form_menu(1), form_menu(2), form_menu(3)];
static ADSR_MENUS: [[MenuEntry; 4]; VOICE_COUNT] =
    [adsr_menu(0), adsr_menu(1), adsr_menu(2), adsr_menu(3)];
static SLIDE_MENUS: [[MenuEntry; 2]; VOICE_COUNT] =
    [slide_menu(0), slide_menu(1), slide_menu(2), slide_menu(3)];

impl MenuId {
    /// Entries of this menu, in display order.
    ///
    /// A voice index outside `0..VOICE_COUNT` yields an empty menu.
    pub fn entries(self) -> &'static [MenuEntry] {
        match self {
            MenuId::Root => &ROOT,
            MenuId::Voice(v) => VOICE_MENUS.get(v).map(|m| m.as_slice()).unwrap_or(&[]),
            MenuId::Form(v) => FORM_MENUS.get(v).map(|m| m.as_slice()).unwrap_or(&[]),
            MenuId::Adsr(v) => ADSR_MENUS.get(v).map(|m| m.as_slice()).unwrap_or(&[]),
            MenuId::Slide(v) => SLIDE_MENUS.get(v).map(|m| m.as_slice()).unwrap_or(&[]),
        }
    }

    pub fn len(self) -> usize {
        self.entries().len()
    }

    pub fn is_root(self) -> bool {
        self == MenuId::Root
    }
}

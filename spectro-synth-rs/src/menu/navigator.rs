//! Button-driven navigation of the menu tree and patch editing.

use heapless::Vec;

use super::screen::{label, value_label, value_text, EditView, MenuItemView, MenuView, Screen};
use super::tree::{MenuId, MenuTarget};
use super::{EDIT_MAX, EDIT_MIN, EDIT_STEP, MAX_DEPTH};
use crate::engine::EngineConfig;
use crate::io::Key;
use crate::patch::{Patch, PatchField, PatchStore, RecordStore};

/// Result of handling one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavEvent {
    /// Nothing visible changed.
    Unchanged,
    /// The screen must be redrawn.
    Redraw,
    /// Cancel at the root menu: leave the menu for performance.
    EnterPerformance,
}

/// A numeric field being edited.
///
/// The pending value lives here until confirmed; the stored patch and the
/// engine are untouched until then.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditSession {
    pub field: PatchField,
    pub voice: usize,
    pub value: f32,
}

/// Menu position, active voice and any edit in progress.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: MenuId,
    selected: usize,
    stack: Vec<MenuId, MAX_DEPTH>,
    active_voice: usize,
    edit: Option<EditSession>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start at the root menu with voice 0 active.
    pub const fn new() -> Self {
        Self {
            current: MenuId::Root,
            selected: 0,
            stack: Vec::new(),
            active_voice: 0,
            edit: None,
        }
    }

    pub fn current(&self) -> MenuId {
        self.current
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn active_voice(&self) -> usize {
        self.active_voice
    }

    pub fn edit(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Jump back to the root menu with the active voice selected.
    ///
    /// Used when leaving performance. Any edit in progress is dropped.
    pub fn return_to_root(&mut self) {
        self.current = MenuId::Root;
        self.selected = self.active_voice;
        self.stack.clear();
        self.edit = None;
    }

    /// Apply one key press.
    pub fn handle<S: RecordStore>(
        &mut self,
        key: Key,
        patches: &mut PatchStore<S>,
        engine: &mut EngineConfig,
    ) -> NavEvent {
        if let Some(session) = self.edit {
            return self.handle_edit(session, key, patches, engine);
        }

        let len = self.current.len();
        if len == 0 {
            return NavEvent::Unchanged;
        }

        match key {
            Key::Up => {
                self.selected = (self.selected + 1) % len;
                NavEvent::Redraw
            }
            Key::Down => {
                self.selected = (self.selected + len - 1) % len;
                NavEvent::Redraw
            }
            Key::Confirm => self.confirm(patches, engine),
            Key::Cancel => self.cancel(),
        }
    }

    fn confirm<S: RecordStore>(
        &mut self,
        patches: &mut PatchStore<S>,
        engine: &mut EngineConfig,
    ) -> NavEvent {
        let Some(entry) = self.current.entries().get(self.selected) else {
            return NavEvent::Unchanged;
        };

        match entry.target {
            MenuTarget::Submenu(next) => {
                if self.stack.push(self.current).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Menu stack full, staying in {}", self.current);
                    return NavEvent::Unchanged;
                }

                if self.current.is_root() {
                    self.active_voice = self.selected;
                    let patch = patches.load(self.active_voice);
                    engine.apply(&patch);

                    #[cfg(feature = "defmt")]
                    defmt::info!("Voice {} active", self.active_voice);
                }

                self.current = next;
                self.selected = 0;
            }
            MenuTarget::NumericField(field, voice) => {
                let value = patches.load(voice).get(field);
                self.edit = Some(EditSession { field, voice, value });
            }
            MenuTarget::ToggleField(mode, voice) => {
                let mut patch = patches.load(voice);
                patch.slide_mode = mode;
                self.commit(voice, &patch, patches, engine);
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Menu {} item {}", self.current, self.selected);

        NavEvent::Redraw
    }

    fn cancel(&mut self) -> NavEvent {
        if self.current.is_root() {
            return NavEvent::EnterPerformance;
        }

        if let Some(previous) = self.stack.pop() {
            self.current = previous;
            self.selected = 0;
            NavEvent::Redraw
        } else {
            NavEvent::Unchanged
        }
    }

    fn handle_edit<S: RecordStore>(
        &mut self,
        mut session: EditSession,
        key: Key,
        patches: &mut PatchStore<S>,
        engine: &mut EngineConfig,
    ) -> NavEvent {
        match key {
            Key::Up => {
                session.value = (session.value + EDIT_STEP).min(EDIT_MAX);
                self.edit = Some(session);
            }
            Key::Down => {
                session.value = (session.value - EDIT_STEP).max(EDIT_MIN);
                self.edit = Some(session);
            }
            Key::Confirm => {
                let mut patch = patches.load(session.voice);
                patch.set(session.field, session.value);
                self.commit(session.voice, &patch, patches, engine);
                self.edit = None;
            }
            Key::Cancel => self.edit = None,
        }
        NavEvent::Redraw
    }

    /// Save `patch` and, if it belongs to the active voice, apply it.
    ///
    /// A failed save is logged and otherwise ignored: the engine still
    /// plays the edited patch until the next reload.
    fn commit<S: RecordStore>(
        &self,
        voice: usize,
        patch: &Patch,
        patches: &mut PatchStore<S>,
        engine: &mut EngineConfig,
    ) {
        if let Err(_e) = patches.save(voice, patch) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Saving voice {} failed", voice);
        }

        if voice == self.active_voice {
            engine.apply(patch);
        }
    }

    /// Build the screen for the current state.
    ///
    /// Leaf labels show stored values, so this reads the voice's patch from
    /// `patches`.
    pub fn screen<S: RecordStore>(&self, patches: &mut PatchStore<S>) -> Screen {
        if let Some(session) = &self.edit {
            return Screen::Edit(EditView {
                name: session.field.key(),
                value: value_text(session.value),
            });
        }

        let mut cached: Option<(usize, Patch)> = None;
        let mut items = Vec::new();

        for (i, entry) in self.current.entries().iter().enumerate() {
            let item = match entry.target {
                MenuTarget::Submenu(_) => MenuItemView {
                    label: label(entry.label),
                    marked: self.current.is_root() && i == self.active_voice,
                },
                MenuTarget::NumericField(field, voice) => {
                    let patch = voice_patch(&mut cached, voice, patches);
                    MenuItemView {
                        label: value_label(entry.label, patch.get(field)),
                        marked: false,
                    }
                }
                MenuTarget::ToggleField(mode, voice) => {
                    let patch = voice_patch(&mut cached, voice, patches);
                    MenuItemView {
                        label: label(entry.label),
                        marked: patch.slide_mode == mode,
                    }
                }
            };
            if items.push(item).is_err() {
                break;
            }
        }

        Screen::Menu(MenuView {
            items,
            selected: self.selected,
        })
    }
}

/// Load `voice` once per screen; every leaf of a menu shares one voice.
fn voice_patch<S: RecordStore>(
    cached: &mut Option<(usize, Patch)>,
    voice: usize,
    patches: &mut PatchStore<S>,
) -> Patch {
    match cached {
        Some((v, patch)) if *v == voice => *patch,
        _ => {
            let patch = patches.load(voice);
            *cached = Some((voice, patch));
            patch
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{MemoryStore, SlideMode};
    use libm::fabsf;

    struct Rig {
        nav: Navigator,
        patches: PatchStore<MemoryStore>,
        engine: EngineConfig,
    }

    impl Rig {
        fn new() -> Self {
            let mut patches = PatchStore::new(MemoryStore::new());
            patches.init().unwrap();
            Self {
                nav: Navigator::new(),
                patches,
                engine: EngineConfig::default(),
            }
        }

        fn press(&mut self, key: Key) -> NavEvent {
            self.nav.handle(key, &mut self.patches, &mut self.engine)
        }

        fn press_all(&mut self, keys: &[Key]) {
            for &k in keys {
                self.press(k);
            }
        }

        fn screen(&mut self) -> Screen {
            self.nav.screen(&mut self.patches)
        }

        fn menu(&mut self) -> MenuView {
            match self.screen() {
                Screen::Menu(view) => view,
                other => panic!("expected a menu, got {:?}", other),
            }
        }
    }

    // ── Movement ─────────────────────────────────────────────────────────

    #[test]
    fn up_and_down_wrap() {
        let mut rig = Rig::new();
        assert_eq!(rig.press(Key::Down), NavEvent::Redraw);
        assert_eq!(rig.nav.selected(), 3);
        rig.press(Key::Up);
        assert_eq!(rig.nav.selected(), 0);
    }

    #[test]
    fn up_wraps_in_a_three_item_menu() {
        let mut rig = Rig::new();
        rig.press(Key::Confirm);
        assert_eq!(rig.nav.current(), MenuId::Voice(0));
        rig.press_all(&[Key::Up, Key::Up]);
        assert_eq!(rig.nav.selected(), 2);
        rig.press(Key::Up);
        assert_eq!(rig.nav.selected(), 0);
    }

    // ── Voice selection ──────────────────────────────────────────────────

    #[test]
    fn confirm_at_root_hot_swaps_the_voice() {
        let mut rig = Rig::new();
        let patch = Patch {
            sustain: 0.7,
            slide_mode: SlideMode::Interpolated,
            ..Patch::DEFAULT
        };
        rig.patches.save(2, &patch).unwrap();
        let before = rig.engine.version();

        rig.press_all(&[Key::Up, Key::Up, Key::Confirm]);

        assert_eq!(rig.nav.active_voice(), 2);
        assert_eq!(rig.nav.current(), MenuId::Voice(2));
        assert_eq!(rig.nav.selected(), 0);
        assert_eq!(rig.nav.depth(), 1);
        assert_eq!(rig.engine.version(), before + 1);
        assert_eq!(rig.engine.params().sustain, 0.7);
        assert_eq!(rig.engine.params().slide_mode, SlideMode::Interpolated);
    }

    #[test]
    fn descending_below_root_keeps_the_voice() {
        let mut rig = Rig::new();
        rig.press_all(&[Key::Up, Key::Confirm]);
        let version = rig.engine.version();
        rig.press(Key::Confirm);
        assert_eq!(rig.nav.current(), MenuId::Form(1));
        assert_eq!(rig.nav.active_voice(), 1);
        assert_eq!(rig.engine.version(), version);
    }

    #[test]
    fn root_marks_the_active_voice() {
        let mut rig = Rig::new();
        rig.press_all(&[Key::Up, Key::Confirm, Key::Cancel]);
        let view = rig.menu();
        let marks: [bool; 4] = core::array::from_fn(|i| view.items[i].marked);
        assert_eq!(marks, [false, true, false, false]);
        assert_eq!(view.items[0].label.as_str(), "Voix 1");
    }

    // ── Cancel ───────────────────────────────────────────────────────────

    #[test]
    fn cancel_pops_and_resets_selection() {
        let mut rig = Rig::new();
        rig.press_all(&[Key::Confirm, Key::Up, Key::Confirm]);
        assert_eq!(rig.nav.current(), MenuId::Adsr(0));

        assert_eq!(rig.press(Key::Cancel), NavEvent::Redraw);
        assert_eq!(rig.nav.current(), MenuId::Voice(0));
        assert_eq!(rig.nav.selected(), 0);

        rig.press(Key::Cancel);
        assert_eq!(rig.nav.current(), MenuId::Root);
        assert_eq!(rig.nav.depth(), 0);
    }

    #[test]
    fn cancel_at_root_enters_performance() {
        let mut rig = Rig::new();
        assert_eq!(rig.press(Key::Cancel), NavEvent::EnterPerformance);
        assert_eq!(rig.nav.current(), MenuId::Root);
    }

    #[test]
    fn return_to_root_selects_the_active_voice() {
        let mut rig = Rig::new();
        rig.press_all(&[Key::Down, Key::Confirm, Key::Confirm]);
        assert_eq!(rig.nav.active_voice(), 3);
        rig.nav.return_to_root();
        assert_eq!(rig.nav.current(), MenuId::Root);
        assert_eq!(rig.nav.selected(), 3);
        assert_eq!(rig.nav.depth(), 0);
    }

    // ── Numeric edits ────────────────────────────────────────────────────

    /// Root → Voix 1 → ADSR → Release.
    fn open_release_edit(rig: &mut Rig) {
        rig.press_all(&[Key::Confirm, Key::Up, Key::Confirm, Key::Down, Key::Confirm]);
    }

    #[test]
    fn edit_shows_field_and_value() {
        let mut rig = Rig::new();
        open_release_edit(&mut rig);
        let session = rig.nav.edit().copied();
        assert_eq!(session.map(|s| s.field), Some(PatchField::Release));
        assert_eq!(
            rig.screen(),
            Screen::Edit(EditView {
                name: "release",
                value: value_text(0.4),
            })
        );
    }

    #[test]
    fn edit_commit_saves_and_applies() {
        let mut rig = Rig::new();
        open_release_edit(&mut rig);
        let version = rig.engine.version();

        rig.press_all(&[Key::Up, Key::Up, Key::Confirm]);

        assert!(rig.nav.edit().is_none());
        let stored = rig.patches.load(0).release;
        assert!(fabsf(stored - 0.6) < 1e-5, "{}", stored);
        assert_eq!(rig.engine.version(), version + 1);
        assert_eq!(rig.engine.params().release, stored);
        // Back on the ADSR menu with the new value shown.
        let view = rig.menu();
        assert_eq!(view.items[3].label.as_str(), "Release 0.6");
        assert_eq!(view.selected, 3);
    }

    #[test]
    fn edit_cancel_discards() {
        let mut rig = Rig::new();
        open_release_edit(&mut rig);
        let version = rig.engine.version();

        rig.press_all(&[Key::Up, Key::Up, Key::Cancel]);

        assert!(rig.nav.edit().is_none());
        assert_eq!(rig.patches.load(0).release, 0.4);
        assert_eq!(rig.engine.version(), version);
        assert_eq!(rig.nav.current(), MenuId::Adsr(0));
    }

    #[test]
    fn edit_value_is_clamped() {
        let mut rig = Rig::new();
        // Root → Voix 1 → ADSR → Attack (0.0).
        rig.press_all(&[Key::Confirm, Key::Up, Key::Confirm, Key::Confirm]);
        rig.press(Key::Down);
        assert_eq!(rig.nav.edit().map(|s| s.value), Some(0.0));

        for _ in 0..150 {
            rig.press(Key::Up);
        }
        assert_eq!(rig.nav.edit().map(|s| s.value), Some(10.0));
    }

    #[test]
    fn editing_an_inactive_voice_leaves_the_engine_alone() {
        let mut rig = Rig::new();
        rig.press_all(&[Key::Up, Key::Confirm]);
        assert_eq!(rig.nav.active_voice(), 1);

        let version = rig.engine.version();
        let patch = Patch {
            decay: 2.0,
            ..Patch::DEFAULT
        };
        rig.nav.commit(3, &patch, &mut rig.patches, &mut rig.engine);
        assert_eq!(rig.engine.version(), version);
        assert_eq!(rig.patches.load(3).decay, 2.0);
    }

    #[test]
    fn failed_save_still_applies_to_the_engine() {
        let mut rig = Rig::new();
        open_release_edit(&mut rig);
        rig.patches.store_mut().fail_writes(true);

        rig.press_all(&[Key::Up, Key::Confirm]);

        assert!(rig.nav.edit().is_none());
        assert!(fabsf(rig.engine.params().release - 0.5) < 1e-5);
        rig.patches.store_mut().fail_writes(false);
        assert_eq!(rig.patches.load(0).release, 0.4);
    }

    // ── Toggles and leaf rendering ───────────────────────────────────────

    #[test]
    fn toggle_sets_slide_mode() {
        let mut rig = Rig::new();
        // Root → Voix 1 → Slide → noQ.
        rig.press_all(&[Key::Confirm, Key::Down, Key::Confirm, Key::Up, Key::Confirm]);

        assert_eq!(rig.patches.load(0).slide_mode, SlideMode::Interpolated);
        assert_eq!(rig.engine.params().slide_mode, SlideMode::Interpolated);

        let view = rig.menu();
        assert!(!view.items[0].marked);
        assert!(view.items[1].marked);
        assert_eq!(view.items[1].label.as_str(), "noQ");
    }

    #[test]
    fn numeric_leaves_show_stored_values() {
        let mut rig = Rig::new();
        rig.press_all(&[Key::Confirm, Key::Confirm]);
        let view = rig.menu();
        assert_eq!(view.items[0].label.as_str(), "Max 0.3");
        assert_eq!(view.items[1].label.as_str(), "Dty 0.3");
        assert_eq!(view.selected, 0);
    }
}

//! Four-button menu: tree, navigation and screen model.
//!
//! Up / Down move the selection (wrapping), Confirm descends or acts on a
//! leaf and Cancel goes back up. Numeric leaves open an [`EditSession`]
//! that Up / Down step by [`EDIT_STEP`] until Confirm stores the value or
//! Cancel drops it.

mod navigator;
mod screen;
mod tree;

pub use navigator::{EditSession, NavEvent, Navigator};
pub use screen::{
    label, value_label, value_text, EditView, Label, MenuItemView, MenuView, Screen,
    LABEL_CAPACITY,
};
pub use tree::{MenuEntry, MenuId, MenuTarget};

/// Amount one Up / Down press changes an edited value by.
pub const EDIT_STEP: f32 = 0.1;

/// Lowest value an edit can reach.
pub const EDIT_MIN: f32 = 0.0;

/// Highest value an edit can reach.
pub const EDIT_MAX: f32 = 10.0;

/// Most entries any menu has.
pub const MAX_ENTRIES: usize = 4;

/// Deepest the navigation stack gets (root → voice → leaf menu).
pub const MAX_DEPTH: usize = 4;

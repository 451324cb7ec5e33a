//! Context-menu and paste-flow anchor state.
//!
//! The menus themselves are presentation; the core captures where the
//! right-click landed (canvas space) and which node sat under it, so
//! "create here", "delete node", and multi-line paste anchor at the exact
//! clicked spot no matter how the view has been panned or zoomed since.

use mm_core::EntityId;

/// Vertical step between nodes created from multi-line paste.
pub const PASTE_LINE_STEP: f32 = 80.0;

/// Captured context-menu state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MenuState {
    menu_open: bool,
    paste_open: bool,
    /// Canvas-space position of the context click.
    anchor: (f32, f32),
    /// Node under the context click, for "delete node".
    target: Option<EntityId>,
}

impl MenuState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the menu, capturing anchor and target.
    pub fn open_at(&mut self, anchor: (f32, f32), target: Option<EntityId>) {
        self.menu_open = true;
        self.anchor = anchor;
        self.target = target;
    }

    /// Close the menu. The anchor survives so a paste flow started from
    /// the menu still knows where to create nodes.
    pub fn close_menu(&mut self) {
        self.menu_open = false;
        self.target = None;
    }

    /// Switch from the menu to the paste dialog.
    pub fn begin_paste(&mut self) {
        self.close_menu();
        self.paste_open = true;
    }

    pub fn close_paste(&mut self) {
        self.paste_open = false;
    }

    /// Escape: close whatever overlay is showing.
    pub fn close_all(&mut self) {
        self.close_menu();
        self.close_paste();
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn is_paste_open(&self) -> bool {
        self.paste_open
    }

    pub fn anchor(&self) -> (f32, f32) {
        self.anchor
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }
}

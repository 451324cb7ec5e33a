//! The editor session: one struct wiring model, viewport, scene,
//! interaction machine, menu state, and snapshot store together.
//!
//! Data flow: input events → interaction state machine → model/viewport
//! mutation → scene refresh → snapshot save. Structural changes (create,
//! delete, connect, paste, clear, import, text commit) save immediately;
//! positional and viewport changes save only when the gesture ends, so
//! save frequency is bounded by discrete user gestures rather than
//! per-pixel pointer motion.

use crate::input::{InputEvent, PointerButton};
use crate::interaction::{EditorAction, InteractionState, Mode};
use crate::menu::{MenuState, PASTE_LINE_STEP};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use kurbo::Point;
use mm_core::{
    DEFAULT_NODE_TEXT, EntityId, GraphModel, Snapshot, ViewTransform, ZOOM_STEP_IN, ZOOM_STEP_OUT,
};
use mm_render::{Hit, RenderScene, hit_test};
use mm_store::{SnapshotStore, StoreError};
use std::path::{Path, PathBuf};

pub struct EditorSession {
    model: GraphModel,
    view: ViewTransform,
    scene: RenderScene,
    interaction: InteractionState,
    menu: MenuState,
    store: Box<dyn SnapshotStore>,
}

impl EditorSession {
    /// Create a session, loading from the store exactly once before any
    /// interaction is processed. A failed or absent load starts empty,
    /// never an error. A loaded snapshot is normalized (danglers dropped,
    /// scale clamped) and written back.
    pub fn bootstrap(mut store: Box<dyn SnapshotStore>) -> Self {
        let loaded = match store.load() {
            Ok(found) => found,
            Err(err) => {
                log::warn!("loading snapshot failed, starting empty: {err}");
                None
            }
        };

        let mut session = Self {
            model: GraphModel::new(),
            view: ViewTransform::default(),
            scene: RenderScene::new(),
            interaction: InteractionState::new(),
            menu: MenuState::new(),
            store,
        };
        if let Some(snapshot) = loaded {
            session.apply_snapshot(&snapshot);
        }
        session
    }

    /// Replace the whole editor state from a snapshot, then persist the
    /// normalized result in a single write.
    fn apply_snapshot(&mut self, snapshot: &Snapshot) {
        let (model, view) = snapshot.restore();
        self.model = model;
        self.view = view;
        self.scene.sync_all(&mut self.model);
        self.save();
    }

    /// Capture and hand the full current state to the store. Failures are
    /// logged and otherwise ignored: no rollback, no retry, since the
    /// next save carries the complete latest state anyway.
    fn save(&mut self) {
        let snapshot = Snapshot::capture(&self.model, &self.view);
        if let Err(err) = self.store.save(&snapshot) {
            log::error!("saving snapshot failed: {err}");
        }
    }

    // ─── Input dispatch ──────────────────────────────────────────────────

    /// Feed one normalized input event through the session.
    pub fn handle_input(&mut self, event: &InputEvent) {
        match event {
            InputEvent::Key { key, modifiers } => {
                if let Some(action) = ShortcutMap::resolve(key, *modifiers) {
                    self.apply_shortcut(action);
                }
            }
            InputEvent::PointerDown {
                x,
                y,
                button: PointerButton::Secondary,
                ..
            } => self.open_context_menu(*x, *y),
            _ => {
                if matches!(
                    event,
                    InputEvent::PointerDown {
                        button: PointerButton::Primary,
                        ..
                    }
                ) {
                    self.menu.close_menu();
                }
                let hit = self.hit_for(event);
                for action in self.interaction.handle(event, hit, &self.view) {
                    self.apply_action(action);
                }
            }
        }
    }

    fn hit_for(&self, event: &InputEvent) -> Hit {
        match event.position() {
            Some((sx, sy)) => {
                let (cx, cy) = self.view.to_canvas(sx, sy);
                hit_test(&self.scene, Point::new(cx as f64, cy as f64))
            }
            None => Hit::Empty,
        }
    }

    fn apply_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::DragNode { id, dx, dy } => {
                if self.model.translate_node(id, dx, dy) {
                    self.refresh_node(id);
                }
            }
            EditorAction::Pan { dx, dy } => self.view.pan(dx, dy),
            EditorAction::Zoom {
                factor,
                anchor_x,
                anchor_y,
            } => {
                self.view.zoom(factor, anchor_x, anchor_y);
                self.scene.update_all_connections(&mut self.model);
            }
            EditorAction::BeginConnecting { source } => self.scene.begin_rubber_band(source),
            EditorAction::TraceConnecting { x, y } => {
                let (cx, cy) = self.view.to_canvas(x, y);
                self.scene.trace_rubber_band(Point::new(cx as f64, cy as f64));
            }
            EditorAction::EndConnecting { source, target } => {
                if let Some(target) = target
                    && let Some(id) = self.model.create_connection(source, target)
                {
                    self.scene.update_connection(&mut self.model, id);
                    self.save();
                }
                self.scene.clear_rubber_band();
            }
            EditorAction::DeleteConnection { id } => {
                if self.model.delete_connection(id) {
                    self.scene.remove_line(id);
                    self.save();
                }
            }
            EditorAction::CreateNodeAt { x, y } => {
                self.create_node_at(x, y);
            }
            EditorAction::GestureEnded => self.save(),
        }
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::ZoomIn => {
                self.view.zoom(ZOOM_STEP_IN, 0.0, 0.0);
                self.scene.update_all_connections(&mut self.model);
            }
            ShortcutAction::ZoomOut => {
                self.view.zoom(ZOOM_STEP_OUT, 0.0, 0.0);
                self.scene.update_all_connections(&mut self.model);
            }
            ShortcutAction::ResetView => self.reset_view(),
            ShortcutAction::CloseOverlays => self.menu.close_all(),
        }
    }

    /// Rebuild a node's box and re-glue its incident edges.
    fn refresh_node(&mut self, id: EntityId) {
        if let Some(node) = self.model.node(id) {
            let node = node.clone();
            self.scene.upsert_node(&node);
        }
        self.scene.update_connections_for_node(&mut self.model, id);
    }

    // ─── Operations exposed to the menu/dialog layer ─────────────────────

    /// Create a node at a canvas-space position with the default label.
    pub fn create_node_at(&mut self, x: f32, y: f32) -> EntityId {
        let id = self.insert_node(x, y, DEFAULT_NODE_TEXT);
        self.save();
        id
    }

    fn insert_node(&mut self, x: f32, y: f32, text: &str) -> EntityId {
        let id = self.model.create_node(x, y, text);
        self.refresh_node(id);
        id
    }

    /// Delete a node and everything attached to it. No-op when absent.
    pub fn delete_node(&mut self, id: EntityId) {
        if !self.model.contains_node(id) {
            return;
        }
        let removed = self.model.delete_node(id);
        self.scene.remove_node(id);
        for conn_id in removed {
            self.scene.remove_line(conn_id);
        }
        self.save();
    }

    /// Commit an in-place label edit.
    pub fn commit_node_text(&mut self, id: EntityId, text: &str) {
        if self.model.set_node_text(id, text) {
            self.refresh_node(id);
            self.save();
        }
    }

    /// Capture the context-click position (canvas space) and the node
    /// under it, then open the menu.
    pub fn open_context_menu(&mut self, screen_x: f32, screen_y: f32) {
        let (cx, cy) = self.view.to_canvas(screen_x, screen_y);
        let target = hit_test(&self.scene, Point::new(cx as f64, cy as f64)).node();
        self.menu.open_at((cx, cy), target);
    }

    /// "Create node here" menu action.
    pub fn create_node_from_menu(&mut self) -> EntityId {
        let (x, y) = self.menu.anchor();
        let id = self.create_node_at(x, y);
        self.menu.close_menu();
        id
    }

    /// "Delete node" menu action.
    pub fn delete_node_from_menu(&mut self) {
        if let Some(target) = self.menu.target() {
            self.delete_node(target);
        }
        self.menu.close_menu();
    }

    /// Open the paste dialog, keeping the captured anchor.
    pub fn begin_paste_flow(&mut self) {
        self.menu.begin_paste();
    }

    /// Create one node per non-blank line of pasted text, stepped
    /// vertically from the captured anchor. One save for the whole batch.
    pub fn commit_paste(&mut self, text: &str) -> Vec<EntityId> {
        let (anchor_x, anchor_y) = self.menu.anchor();
        let created: Vec<EntityId> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| {
                self.insert_node(anchor_x, anchor_y + index as f32 * PASTE_LINE_STEP, line)
            })
            .collect();
        if !created.is_empty() {
            self.save();
        }
        self.menu.close_paste();
        created
    }

    /// Empty the graph and persist the empty snapshot.
    pub fn clear_all(&mut self) {
        self.model.clear();
        self.scene.clear();
        self.save();
    }

    /// Back to scale 1, origin translate.
    pub fn reset_view(&mut self) {
        self.view.reset();
        self.scene.update_all_connections(&mut self.model);
    }

    // ─── Manual backup escape hatch ──────────────────────────────────────

    /// Export the current state as a dated JSON file in `dir`.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, StoreError> {
        mm_store::export_snapshot(&Snapshot::capture(&self.model, &self.view), dir)
    }

    /// Replace the current state from a user-chosen file. Malformed files
    /// error so the shell can report them; nothing is changed on failure.
    pub fn import_from(&mut self, path: &Path) -> Result<(), StoreError> {
        let snapshot = mm_store::import_snapshot(path)?;
        self.apply_snapshot(&snapshot);
        Ok(())
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn scene(&self) -> &RenderScene {
        &self.scene
    }

    pub fn mode(&self) -> Mode {
        self.interaction.mode()
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }
}

//! Snapshot: the complete serializable state of graph and viewport.
//!
//! One JSON document, no version field. Every top-level field is optional
//! on load and defaults to empty/identity, so partial or older documents
//! still restore. List order mirrors insertion order for readability but
//! carries no meaning.

use crate::id::EntityId;
use crate::model::GraphModel;
use crate::view::{MAX_SCALE, MIN_SCALE, ViewTransform};
use serde::{Deserialize, Serialize};

/// Persisted form of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub text: String,
}

/// Persisted form of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub id: EntityId,
    pub from: EntityId,
    pub to: EntityId,
}

/// Persisted form of the viewport transform. Field names match the wire
/// format (`translateX`/`translateY`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewState {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl From<ViewTransform> for ViewState {
    fn from(view: ViewTransform) -> Self {
        Self {
            scale: view.scale,
            translate_x: view.translate_x,
            translate_y: view.translate_y,
        }
    }
}

impl ViewState {
    /// Convert to a live transform, sanitizing persisted values: a
    /// non-positive or non-finite scale falls back to 1, then clamps.
    pub fn into_transform(self) -> ViewTransform {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale.clamp(MIN_SCALE, MAX_SCALE)
        } else {
            1.0
        };
        ViewTransform {
            scale,
            translate_x: if self.translate_x.is_finite() { self.translate_x } else { 0.0 },
            translate_y: if self.translate_y.is_finite() { self.translate_y } else { 0.0 },
        }
    }
}

/// The full transferable state: what `save` writes and `load` restores.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRecord>,
    pub view: ViewState,
}

impl Snapshot {
    /// Capture the current model and viewport.
    pub fn capture(model: &GraphModel, view: &ViewTransform) -> Self {
        Self {
            nodes: model
                .nodes()
                .iter()
                .map(|node| NodeRecord {
                    id: node.id,
                    x: node.x,
                    y: node.y,
                    text: node.text.clone(),
                })
                .collect(),
            connections: model
                .connections()
                .iter()
                .map(|conn| ConnectionRecord {
                    id: conn.id,
                    from: conn.from,
                    to: conn.to,
                })
                .collect(),
            view: ViewState::from(*view),
        }
    }

    /// Restore into a fresh model + transform. Connections with dangling
    /// endpoints are dropped inside `replace_all`.
    pub fn restore(&self) -> (GraphModel, ViewTransform) {
        let mut model = GraphModel::new();
        model.replace_all(&self.nodes, &self.connections);
        (model, self.view.into_transform())
    }
}

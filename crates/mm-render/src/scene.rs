//! Retained visual scene: one box per node, one line per connection.
//!
//! The scene is the render index mapping entity ids to visual handles.
//! All geometry lives in canvas space; the viewport transform is applied
//! to the canvas as a whole at paint time, so pan/zoom never rewrites it.
//! Edge lines are glued to node-box centers and must be refreshed whenever
//! an endpoint box moves or resizes.

use kurbo::{Point, Rect};
use mm_core::{EntityId, GraphModel, Node};
use std::collections::HashMap;

/// Node box height. Width grows with the label.
pub const NODE_HEIGHT: f64 = 48.0;
/// Minimum node box width.
pub const NODE_MIN_WIDTH: f64 = 120.0;

// Approximate per-glyph advance; real shaping is deferred to the font
// milestone, see paint.rs.
const CHAR_ADVANCE: f64 = 7.5;
const LABEL_PADDING: f64 = 28.0;

/// Visual handle for a node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: EntityId,
    /// Canvas-space box; the node position is the top-left corner.
    pub rect: Rect,
    pub label: String,
}

impl NodeBox {
    pub fn center(&self) -> Point {
        self.rect.center()
    }
}

/// Visual handle for a connection: a segment joining two box centers.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLine {
    pub id: EntityId,
    pub from: EntityId,
    pub to: EntityId,
    pub p0: Point,
    pub p1: Point,
}

/// The render index. Z-order follows insertion: later boxes paint (and
/// hit) on top of earlier ones.
#[derive(Debug, Clone, Default)]
pub struct RenderScene {
    boxes: HashMap<EntityId, NodeBox>,
    lines: HashMap<EntityId, EdgeLine>,
    z_order: Vec<EntityId>,
    /// In-progress rubber band, source center → pointer, canvas space.
    rubber_band: Option<(Point, Point)>,
    /// Node highlighted as the pending connection source.
    active_source: Option<EntityId>,
}

impl RenderScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn measure(label: &str) -> f64 {
        (label.chars().count() as f64 * CHAR_ADVANCE + LABEL_PADDING).max(NODE_MIN_WIDTH)
    }

    fn box_for(node: &Node) -> NodeBox {
        let width = Self::measure(&node.text);
        NodeBox {
            id: node.id,
            rect: Rect::new(
                node.x as f64,
                node.y as f64,
                node.x as f64 + width,
                node.y as f64 + NODE_HEIGHT,
            ),
            label: node.text.clone(),
        }
    }

    // ─── Node handles ────────────────────────────────────────────────────

    /// Create or refresh the box for a node (position or label changed).
    pub fn upsert_node(&mut self, node: &Node) {
        if !self.boxes.contains_key(&node.id) {
            self.z_order.push(node.id);
        }
        self.boxes.insert(node.id, Self::box_for(node));
    }

    /// Drop a node's box. Incident lines are removed separately, from the
    /// ids the model's cascade delete reports.
    pub fn remove_node(&mut self, id: EntityId) {
        self.boxes.remove(&id);
        self.z_order.retain(|&other| other != id);
        if self.active_source == Some(id) {
            self.clear_rubber_band();
        }
    }

    pub fn node_box(&self, id: EntityId) -> Option<&NodeBox> {
        self.boxes.get(&id)
    }

    pub fn node_center(&self, id: EntityId) -> Option<Point> {
        self.boxes.get(&id).map(NodeBox::center)
    }

    /// Boxes front-to-back (topmost first), for hit testing.
    pub fn boxes_topmost_first(&self) -> impl Iterator<Item = &NodeBox> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.boxes.get(id))
    }

    /// Boxes back-to-front (paint order).
    pub fn boxes_backmost_first(&self) -> impl Iterator<Item = &NodeBox> {
        self.z_order.iter().filter_map(|id| self.boxes.get(id))
    }

    // ─── Edge lines ──────────────────────────────────────────────────────

    /// Recompute a single edge line, self-healing on the way: a line whose
    /// connection or endpoint nodes vanished is deleted (from the model
    /// too, when a dangling connection somehow survived) rather than drawn
    /// broken.
    pub fn update_connection(&mut self, model: &mut GraphModel, id: EntityId) {
        let Some(conn) = model.connection(id).copied() else {
            self.lines.remove(&id);
            return;
        };
        if !model.contains_node(conn.from) || !model.contains_node(conn.to) {
            log::warn!("healing stale connection {id} with missing endpoint");
            model.delete_connection(id);
            self.lines.remove(&id);
            return;
        }
        // Make sure both endpoint boxes exist before gluing to their centers
        for end in [conn.from, conn.to] {
            if !self.boxes.contains_key(&end) {
                if let Some(node) = model.node(end) {
                    let node = node.clone();
                    self.upsert_node(&node);
                }
            }
        }
        let (Some(p0), Some(p1)) = (self.node_center(conn.from), self.node_center(conn.to)) else {
            return;
        };
        self.lines.insert(
            id,
            EdgeLine {
                id,
                from: conn.from,
                to: conn.to,
                p0,
                p1,
            },
        );
    }

    /// Refresh only the lines touching one node, O(incident edges).
    /// Called on every drag delta.
    pub fn update_connections_for_node(&mut self, model: &mut GraphModel, id: EntityId) {
        for conn_id in model.incident_connections(id) {
            self.update_connection(model, conn_id);
        }
    }

    /// Refresh every line and drop the ones whose connection is gone.
    /// Called after zoom and bulk load, where all geometry may have moved.
    pub fn update_all_connections(&mut self, model: &mut GraphModel) {
        self.lines.retain(|id, _| model.connection(*id).is_some());
        let ids: Vec<EntityId> = model.connections().iter().map(|c| c.id).collect();
        for id in ids {
            self.update_connection(model, id);
        }
    }

    pub fn remove_line(&mut self, id: EntityId) {
        self.lines.remove(&id);
    }

    pub fn edge_line(&self, id: EntityId) -> Option<&EdgeLine> {
        self.lines.get(&id)
    }

    pub fn lines(&self) -> impl Iterator<Item = &EdgeLine> {
        self.lines.values()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    // ─── Rubber band (in-progress connection) ────────────────────────────

    /// Show the temporary line from a source node's center.
    pub fn begin_rubber_band(&mut self, source: EntityId) {
        if let Some(center) = self.node_center(source) {
            self.active_source = Some(source);
            self.rubber_band = Some((center, center));
        }
    }

    /// Move the free endpoint to the pointer (canvas space).
    pub fn trace_rubber_band(&mut self, to: Point) {
        if let Some((origin, _)) = self.rubber_band {
            self.rubber_band = Some((origin, to));
        }
    }

    /// Remove the temporary line and the source highlight.
    pub fn clear_rubber_band(&mut self) {
        self.rubber_band = None;
        self.active_source = None;
    }

    pub fn rubber_band(&self) -> Option<(Point, Point)> {
        self.rubber_band
    }

    pub fn active_source(&self) -> Option<EntityId> {
        self.active_source
    }

    // ─── Bulk sync ───────────────────────────────────────────────────────

    /// Rebuild the whole scene from the model. Used after load/import.
    pub fn sync_all(&mut self, model: &mut GraphModel) {
        self.boxes.clear();
        self.lines.clear();
        self.z_order.clear();
        self.clear_rubber_band();
        let nodes: Vec<Node> = model.nodes().into_iter().cloned().collect();
        for node in &nodes {
            self.upsert_node(node);
        }
        self.update_all_connections(model);
    }

    /// Drop everything, including any in-progress rubber band.
    pub fn clear(&mut self) {
        self.boxes.clear();
        self.lines.clear();
        self.z_order.clear();
        self.clear_rubber_band();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn model_with_pair() -> (GraphModel, EntityId, EntityId, EntityId) {
        let mut model = GraphModel::new();
        let a = model.create_node(100.0, 100.0, "A");
        let b = model.create_node(400.0, 100.0, "B");
        let conn = model.create_connection(a, b).unwrap();
        (model, a, b, conn)
    }

    #[test]
    fn sync_all_builds_boxes_and_glued_lines() {
        let (mut model, a, b, conn) = model_with_pair();
        let mut scene = RenderScene::new();
        scene.sync_all(&mut model);

        assert!(scene.node_box(a).is_some());
        assert!(scene.node_box(b).is_some());
        let line = scene.edge_line(conn).unwrap();
        assert_eq!(line.p0, scene.node_center(a).unwrap());
        assert_eq!(line.p1, scene.node_center(b).unwrap());
    }

    #[test]
    fn dragging_a_node_moves_only_incident_lines() {
        let (mut model, a, _b, conn) = model_with_pair();
        let c = model.create_node(100.0, 400.0, "C");
        let d = model.create_node(400.0, 400.0, "D");
        let far = model.create_connection(c, d).unwrap();

        let mut scene = RenderScene::new();
        scene.sync_all(&mut model);
        let far_before = scene.edge_line(far).unwrap().clone();

        model.translate_node(a, 50.0, -20.0);
        let node = model.node(a).unwrap().clone();
        scene.upsert_node(&node);
        scene.update_connections_for_node(&mut model, a);

        let moved = scene.edge_line(conn).unwrap();
        assert_eq!(moved.p0, scene.node_center(a).unwrap());
        assert_eq!(scene.edge_line(far).unwrap(), &far_before);
    }

    #[test]
    fn label_growth_widens_the_box_and_recenters_edges() {
        let (mut model, a, _b, conn) = model_with_pair();
        let mut scene = RenderScene::new();
        scene.sync_all(&mut model);
        let before = scene.edge_line(conn).unwrap().p0;

        model.set_node_text(a, "A considerably longer label than before");
        let node = model.node(a).unwrap().clone();
        scene.upsert_node(&node);
        scene.update_connections_for_node(&mut model, a);

        let after = scene.edge_line(conn).unwrap().p0;
        assert!(after.x > before.x, "center must follow the wider box");
        assert!(scene.node_box(a).unwrap().rect.width() > NODE_MIN_WIDTH);
    }

    #[test]
    fn stale_lines_are_healed_away() {
        let (mut model, a, _b, conn) = model_with_pair();
        let mut scene = RenderScene::new();
        scene.sync_all(&mut model);
        assert_eq!(scene.line_count(), 1);

        // Model cascade removes the connection; the scene still holds the
        // line until the next sweep.
        model.delete_node(a);
        scene.remove_node(a);
        scene.update_connection(&mut model, conn);
        assert_eq!(scene.line_count(), 0);
    }

    #[test]
    fn update_all_drops_every_orphan() {
        let (mut model, a, _b, _conn) = model_with_pair();
        let mut scene = RenderScene::new();
        scene.sync_all(&mut model);

        model.delete_node(a);
        scene.remove_node(a);
        scene.update_all_connections(&mut model);
        assert_eq!(scene.line_count(), 0);
    }

    #[test]
    fn rubber_band_tracks_and_clears() {
        let (mut model, a, _b, _conn) = model_with_pair();
        let mut scene = RenderScene::new();
        scene.sync_all(&mut model);

        scene.begin_rubber_band(a);
        assert_eq!(scene.active_source(), Some(a));
        let origin = scene.node_center(a).unwrap();
        assert_eq!(scene.rubber_band(), Some((origin, origin)));

        scene.trace_rubber_band(Point::new(900.0, 900.0));
        assert_eq!(
            scene.rubber_band(),
            Some((origin, Point::new(900.0, 900.0)))
        );

        scene.clear_rubber_band();
        assert_eq!(scene.rubber_band(), None);
        assert_eq!(scene.active_source(), None);
    }

    #[test]
    fn removing_the_source_node_drops_the_rubber_band() {
        let (mut model, a, _b, _conn) = model_with_pair();
        let mut scene = RenderScene::new();
        scene.sync_all(&mut model);

        scene.begin_rubber_band(a);
        scene.remove_node(a);
        assert_eq!(scene.rubber_band(), None);
    }
}

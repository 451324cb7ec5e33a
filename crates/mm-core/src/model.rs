//! Graph data model: labeled nodes joined by undirected connections.
//!
//! The model is pure data. It owns every node and connection and enforces
//! the referential invariants (no dangling endpoints, no duplicate pairs,
//! cascade delete), but knows nothing about rendering or storage: visual
//! handles live in `mm-render`, persistence triggering in `mm-editor`.

use crate::id::{EntityId, IdAllocator};
use crate::snapshot::{ConnectionRecord, NodeRecord};
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableUnGraph;
use petgraph::visit::EdgeRef;
use smallvec::SmallVec;
use std::collections::HashMap;

/// Label given to nodes created without explicit text.
pub const DEFAULT_NODE_TEXT: &str = "New Node";

/// A labeled node at a canvas-space position.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// An undirected connection between two nodes. The `from`/`to` naming is
/// wire-format convention only; the pair is unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub id: EntityId,
    pub from: EntityId,
    pub to: EntityId,
}

impl Connection {
    /// Whether this connection touches the given node.
    pub fn touches(&self, id: EntityId) -> bool {
        self.from == id || self.to == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint at all.
    pub fn other_end(&self, id: EntityId) -> Option<EntityId> {
        if self.from == id {
            Some(self.to)
        } else if self.to == id {
            Some(self.from)
        } else {
            None
        }
    }
}

/// The complete mind-map graph.
///
/// Backed by a stable undirected graph so removing a node cascades to its
/// incident connections without disturbing other indices. `id_index` and
/// `connection_index` keep id → index lookups O(1).
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    graph: StableUnGraph<Node, Connection>,
    id_index: HashMap<EntityId, NodeIndex>,
    connection_index: HashMap<EntityId, EdgeIndex>,
    ids: IdAllocator,
}

impl GraphModel {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Node operations ─────────────────────────────────────────────────

    /// Insert a new node at the given canvas coordinates. Always succeeds.
    pub fn create_node(&mut self, x: f32, y: f32, text: &str) -> EntityId {
        let id = self.ids.node_id();
        self.insert_node_record(&NodeRecord {
            id,
            x,
            y,
            text: text.to_string(),
        });
        id
    }

    /// Remove a node and every connection touching it. Returns the ids of
    /// the removed connections; empty when the node was already absent.
    pub fn delete_node(&mut self, id: EntityId) -> SmallVec<[EntityId; 4]> {
        let Some(&idx) = self.id_index.get(&id) else {
            return SmallVec::new();
        };
        let removed: SmallVec<[EntityId; 4]> =
            self.graph.edges(idx).map(|e| e.weight().id).collect();
        for conn_id in &removed {
            self.connection_index.remove(conn_id);
        }
        // remove_node drops the incident edges along with the node
        self.graph.remove_node(idx);
        self.id_index.remove(&id);
        removed
    }

    /// Replace a node's label in place.
    pub fn set_node_text(&mut self, id: EntityId, text: &str) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Move a node to an absolute canvas position.
    pub fn set_node_position(&mut self, id: EntityId, x: f32, y: f32) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.x = x;
                node.y = y;
                true
            }
            None => false,
        }
    }

    /// Move a node by a canvas-space delta.
    pub fn translate_node(&mut self, id: EntityId, dx: f32, dy: f32) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.x += dx;
                node.y += dy;
                true
            }
            None => false,
        }
    }

    // ─── Connection operations ───────────────────────────────────────────

    /// Connect two nodes. Returns `None` without touching the graph when
    /// the pair is a self-loop, either endpoint is missing, or the
    /// unordered pair is already connected.
    pub fn create_connection(&mut self, from: EntityId, to: EntityId) -> Option<EntityId> {
        if from == to {
            log::debug!("rejecting self-loop on {from}");
            return None;
        }
        let from_idx = *self.id_index.get(&from)?;
        let to_idx = *self.id_index.get(&to)?;
        if self.graph.find_edge(from_idx, to_idx).is_some() {
            return None;
        }
        let id = self.ids.connection_id();
        let edge = self.graph.add_edge(from_idx, to_idx, Connection { id, from, to });
        self.connection_index.insert(id, edge);
        Some(id)
    }

    /// Remove a connection. Returns `false` when it was already absent.
    pub fn delete_connection(&mut self, id: EntityId) -> bool {
        match self.connection_index.remove(&id) {
            Some(edge) => {
                self.graph.remove_edge(edge);
                true
            }
            None => false,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn node(&self, id: EntityId) -> Option<&Node> {
        self.id_index.get(&id).map(|&idx| &self.graph[idx])
    }

    fn node_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        self.id_index.get(&id).copied().map(|idx| &mut self.graph[idx])
    }

    pub fn contains_node(&self, id: EntityId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn connection(&self, id: EntityId) -> Option<&Connection> {
        self.connection_index
            .get(&id)
            .and_then(|&edge| self.graph.edge_weight(edge))
    }

    /// All nodes in ascending index order. Sorting keeps the order
    /// deterministic regardless of how the adjacency storage iterates.
    pub fn nodes(&self) -> Vec<&Node> {
        let mut indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        indices.sort();
        indices.into_iter().map(|idx| &self.graph[idx]).collect()
    }

    /// All connections in ascending index order.
    pub fn connections(&self) -> Vec<&Connection> {
        let mut indices: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        indices.sort();
        indices
            .into_iter()
            .filter_map(|edge| self.graph.edge_weight(edge))
            .collect()
    }

    /// Ids of the connections touching a node. O(degree), not O(edges).
    pub fn incident_connections(&self, id: EntityId) -> SmallVec<[EntityId; 4]> {
        match self.id_index.get(&id) {
            Some(&idx) => self.graph.edges(idx).map(|e| e.weight().id).collect(),
            None => SmallVec::new(),
        }
    }

    /// The connection joining the unordered pair `(a, b)`, if any.
    pub fn connection_between(&self, a: EntityId, b: EntityId) -> Option<EntityId> {
        let a_idx = *self.id_index.get(&a)?;
        let b_idx = *self.id_index.get(&b)?;
        self.graph
            .find_edge(a_idx, b_idx)
            .and_then(|edge| self.graph.edge_weight(edge))
            .map(|c| c.id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    // ─── Bulk operations ─────────────────────────────────────────────────

    /// Drop every node and connection. Id counters keep running so ids are
    /// never reused within a session.
    pub fn clear(&mut self) {
        self.graph = StableUnGraph::default();
        self.id_index.clear();
        self.connection_index.clear();
    }

    /// Replace the whole graph from snapshot records.
    ///
    /// Node ids are preserved as given; connections whose endpoints did not
    /// both load are dropped silently. Never errors; a half-usable
    /// snapshot still produces a usable graph.
    pub fn replace_all(&mut self, nodes: &[NodeRecord], connections: &[ConnectionRecord]) {
        self.clear();

        for record in nodes {
            if self.id_index.contains_key(&record.id) {
                log::warn!("duplicate node id {} in snapshot, keeping first", record.id);
                continue;
            }
            self.insert_node_record(record);
            self.ids.absorb(record.id);
        }

        for record in connections {
            let (Some(&from_idx), Some(&to_idx)) = (
                self.id_index.get(&record.from),
                self.id_index.get(&record.to),
            ) else {
                log::warn!(
                    "dropping connection {} with dangling endpoint ({} -> {})",
                    record.id,
                    record.from,
                    record.to
                );
                continue;
            };
            if record.from == record.to || self.graph.find_edge(from_idx, to_idx).is_some() {
                continue;
            }
            if self.connection_index.contains_key(&record.id) {
                continue;
            }
            let edge = self.graph.add_edge(
                from_idx,
                to_idx,
                Connection {
                    id: record.id,
                    from: record.from,
                    to: record.to,
                },
            );
            self.connection_index.insert(record.id, edge);
            self.ids.absorb(record.id);
        }
    }

    fn insert_node_record(&mut self, record: &NodeRecord) {
        let idx = self.graph.add_node(Node {
            id: record.id,
            x: record.x,
            y: record.y,
            text: record.text.clone(),
        });
        self.id_index.insert(record.id, idx);
    }
}

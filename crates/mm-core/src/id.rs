use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner backing every entity id.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// A lightweight, interned identifier for nodes and connections.
/// Wraps a 4-byte `Spur` index, so copies and comparisons are cheap.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(Spur);

impl EntityId {
    /// Intern a string as an EntityId, or return the existing id if already interned.
    pub fn intern(s: &str) -> Self {
        EntityId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Numeric suffix of a `<prefix>N` id, if it has one.
    fn counter_suffix(&self, prefix: &str) -> Option<u64> {
        self.as_str().strip_prefix(prefix)?.parse().ok()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(EntityId::intern(&s))
    }
}

/// Allocates `node-N` / `connection-N` ids for a single graph.
///
/// Counters only move forward. Ids preserved from a loaded snapshot are
/// passed through `absorb` so future allocations never collide with them.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_node: u64,
    next_connection: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next node id (`node-1`, `node-2`, …).
    pub fn node_id(&mut self) -> EntityId {
        self.next_node += 1;
        EntityId::intern(&format!("node-{}", self.next_node))
    }

    /// Allocate the next connection id (`connection-1`, `connection-2`, …).
    pub fn connection_id(&mut self) -> EntityId {
        self.next_connection += 1;
        EntityId::intern(&format!("connection-{}", self.next_connection))
    }

    /// Bump the counters past a foreign id's numeric suffix.
    pub fn absorb(&mut self, id: EntityId) {
        if let Some(n) = id.counter_suffix("node-") {
            self.next_node = self.next_node.max(n);
        }
        if let Some(n) = id.counter_suffix("connection-") {
            self.next_connection = self.next_connection.max(n);
        }
    }
}

//! Hit testing: canvas point → entity lookup.
//!
//! Node boxes are tested front-to-back (topmost wins) and always beat
//! connection lines. Lines are hit within a small tolerance band so a
//! one-pixel stroke is still clickable.

use crate::scene::RenderScene;
use kurbo::Point;
use mm_core::EntityId;

/// Distance (canvas units) within which a line counts as hit.
pub const LINE_HIT_TOLERANCE: f64 = 6.0;

/// What the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Node(EntityId),
    Connection(EntityId),
    Empty,
}

impl Hit {
    pub fn node(self) -> Option<EntityId> {
        match self {
            Hit::Node(id) => Some(id),
            _ => None,
        }
    }
}

/// Find what lies under a canvas-space point.
pub fn hit_test(scene: &RenderScene, point: Point) -> Hit {
    for node_box in scene.boxes_topmost_first() {
        if node_box.rect.contains(point) {
            return Hit::Node(node_box.id);
        }
    }
    for line in scene.lines() {
        if segment_distance(line.p0, line.p1, point) <= LINE_HIT_TOLERANCE {
            return Hit::Connection(line.id);
        }
    }
    Hit::Empty
}

/// Distance from `p` to the segment `a`–`b`.
fn segment_distance(a: Point, b: Point, p: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

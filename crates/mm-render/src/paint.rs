//! Render scene → Vello drawing commands.
//!
//! Emits edge lines, the in-progress rubber band, and node boxes in
//! z-order. Geometry stays in canvas space; one viewport affine carries
//! the pan/zoom for all of it.

use crate::scene::RenderScene;
use kurbo::{Affine, Line, Stroke};
use mm_core::ViewTransform;
use peniko::{Color, Fill};
use vello::Scene;

const NODE_CORNER_RADIUS: f64 = 8.0;
const NODE_STROKE_WIDTH: f64 = 1.5;
const EDGE_STROKE_WIDTH: f64 = 2.0;

/// Colors for boxes, edges, and the rubber band.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub node_fill: Color,
    pub node_stroke: Color,
    /// Stroke for the highlighted connection source.
    pub node_stroke_active: Color,
    pub edge: Color,
    pub rubber_band: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color::from_rgb8(0xFA, 0xFA, 0xF8),
            node_fill: Color::from_rgb8(0xFF, 0xFF, 0xFF),
            node_stroke: Color::from_rgb8(0x90, 0x90, 0x98),
            node_stroke_active: Color::from_rgb8(0x3B, 0x82, 0xF6),
            edge: Color::from_rgb8(0x60, 0x60, 0x68),
            rubber_band: Color::from_rgb8(0x3B, 0x82, 0xF6),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::from_rgb8(0x1E, 0x1E, 0x22),
            node_fill: Color::from_rgb8(0x2A, 0x2A, 0x30),
            node_stroke: Color::from_rgb8(0x55, 0x55, 0x5E),
            node_stroke_active: Color::from_rgb8(0x60, 0xA5, 0xFA),
            edge: Color::from_rgb8(0x8A, 0x8A, 0x92),
            rubber_band: Color::from_rgb8(0x60, 0xA5, 0xFA),
        }
    }
}

/// The affine the canvas container carries: scale about the origin, then
/// translate. `screen = canvas * scale + translate`.
pub fn viewport_affine(view: &ViewTransform) -> Affine {
    Affine::translate((view.translate_x as f64, view.translate_y as f64))
        * Affine::scale(view.scale as f64)
}

/// Paint the whole scene. Call once per frame with a freshly-cleared
/// `Scene`; the caller presents it.
pub fn paint_scene(out: &mut Scene, scene: &RenderScene, view: &ViewTransform, theme: &Theme) {
    let transform = viewport_affine(view);

    // Edges under boxes, rubber band on top of edges
    for line in scene.lines() {
        out.stroke(
            &Stroke::new(EDGE_STROKE_WIDTH),
            transform,
            theme.edge,
            None,
            &Line::new(line.p0, line.p1),
        );
    }
    if let Some((origin, free)) = scene.rubber_band() {
        out.stroke(
            &Stroke::new(EDGE_STROKE_WIDTH).with_dashes(0.0, [6.0, 4.0]),
            transform,
            theme.rubber_band,
            None,
            &Line::new(origin, free),
        );
    }

    for node_box in scene.boxes_backmost_first() {
        let shape = node_box.rect.to_rounded_rect(NODE_CORNER_RADIUS);
        out.fill(Fill::NonZero, transform, theme.node_fill, None, &shape);

        let stroke_color = if scene.active_source() == Some(node_box.id) {
            theme.node_stroke_active
        } else {
            theme.node_stroke
        };
        out.stroke(
            &Stroke::new(NODE_STROKE_WIDTH),
            transform,
            stroke_color,
            None,
            &shape,
        );

        log::trace!(
            "LABEL {} {:?} at ({}, {})",
            node_box.id,
            node_box.label,
            node_box.rect.x0,
            node_box.rect.y0
        );
        // Full text shaping requires a font context; deferred to the font milestone.
    }
}

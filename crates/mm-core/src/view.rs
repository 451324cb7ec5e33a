//! Viewport transform: the affine map between canvas space and screen space.
//!
//! `screen = canvas * scale + translate`. Node positions live in canvas
//! space; the transform applies to the canvas as a whole, so panning and
//! zooming never rewrite node coordinates.

/// Lower zoom bound.
pub const MIN_SCALE: f32 = 0.1;
/// Upper zoom bound.
pub const MAX_SCALE: f32 = 5.0;

/// Fixed zoom-in step used by keyboard shortcuts.
pub const ZOOM_STEP_IN: f32 = 1.1;
/// Fixed zoom-out step used by keyboard shortcuts.
pub const ZOOM_STEP_OUT: f32 = 0.9;

/// The current pan/zoom state of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl ViewTransform {
    /// Map a screen point (viewport-relative pixels) into canvas space.
    pub fn to_canvas(&self, screen_x: f32, screen_y: f32) -> (f32, f32) {
        (
            (screen_x - self.translate_x) / self.scale,
            (screen_y - self.translate_y) / self.scale,
        )
    }

    /// Map a canvas point to screen space.
    pub fn to_screen(&self, canvas_x: f32, canvas_y: f32) -> (f32, f32) {
        (
            canvas_x * self.scale + self.translate_x,
            canvas_y * self.scale + self.translate_y,
        )
    }

    /// Shift the viewport by a screen-space delta. Successive pans
    /// accumulate additively, independent of order.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Scale by `factor`, keeping the canvas point under the screen anchor
    /// visually fixed. The anchor is in screen pixels relative to the
    /// viewport's top-left corner.
    ///
    /// The translate must be recomputed from the scale ratio, not
    /// re-derived from scratch, or the content jumps under the cursor.
    pub fn zoom(&mut self, factor: f32, anchor_x: f32, anchor_y: f32) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let change = new_scale / self.scale;

        self.translate_x = anchor_x - (anchor_x - self.translate_x) * change;
        self.translate_y = anchor_y - (anchor_y - self.translate_y) * change;
        self.scale = new_scale;
    }

    /// Back to scale 1, origin translate.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

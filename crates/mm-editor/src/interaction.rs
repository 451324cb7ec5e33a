//! Pointer/touch interaction state machine.
//!
//! Exactly one mode is active at a time: idle, dragging a node, panning
//! the viewport, or drawing a connection. Input events either transition
//! the mode or produce `EditorAction`s for the session to apply.
//! Transitions are total: events that make no sense in the current mode
//! (a second button press mid-drag, a move with no gesture) are ignored
//! or folded into the active mode, never an error.

use crate::input::{InputEvent, Modifiers, PointerButton};
use mm_core::{EntityId, ViewTransform};
use mm_render::Hit;

/// Wheel deltas are damped and sign-inverted: scrolling down pans the
/// canvas content up.
pub const WHEEL_PAN_SPEED: f32 = 0.3;

/// The active interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    DraggingNode(EntityId),
    Panning,
    Connecting(EntityId),
}

/// What an input event asks the session to do.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Move a node by a canvas-space delta (already scale-compensated).
    DragNode { id: EntityId, dx: f32, dy: f32 },
    /// Shift the viewport by a raw screen-space delta.
    Pan { dx: f32, dy: f32 },
    /// Scale about a screen-space anchor.
    Zoom {
        factor: f32,
        anchor_x: f32,
        anchor_y: f32,
    },
    /// Show the rubber band from this node's center.
    BeginConnecting { source: EntityId },
    /// Move the rubber band's free endpoint to the pointer (screen).
    TraceConnecting { x: f32, y: f32 },
    /// Release while connecting. `target` is set only when the pointer is
    /// over a node other than the source; otherwise the gesture discards.
    EndConnecting {
        source: EntityId,
        target: Option<EntityId>,
    },
    /// A connection line was clicked.
    DeleteConnection { id: EntityId },
    /// Create a node at a canvas-space position.
    CreateNodeAt { x: f32, y: f32 },
    /// A gesture finished. This is the persistence boundary.
    GestureEnded,
}

/// The state machine. Pinch tracking runs independently of `mode` so a
/// second finger never corrupts a one-finger gesture.
#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    mode: Mode,
    last_pointer: (f32, f32),
    pinch_distance: Option<f32>,
}

impl InteractionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Feed one event through the machine. `hit` is what lies under the
    /// event's position in canvas space.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Hit,
        view: &ViewTransform,
    ) -> Vec<EditorAction> {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.pointer_down(*x, *y, *button, *modifiers, hit),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(*x, *y, view),
            InputEvent::PointerUp { .. } => self.pointer_up(hit),
            InputEvent::Wheel { dx, dy } => vec![EditorAction::Pan {
                dx: -dx * WHEEL_PAN_SPEED,
                dy: -dy * WHEEL_PAN_SPEED,
            }],
            InputEvent::DoubleClick { x, y } => {
                if hit == Hit::Empty {
                    let (cx, cy) = view.to_canvas(*x, *y);
                    vec![EditorAction::CreateNodeAt { x: cx, y: cy }]
                } else {
                    // Double-click on a node is in-place text editing,
                    // which belongs to the shell
                    vec![]
                }
            }
            InputEvent::TouchStart { touches } => self.touch_start(touches, hit),
            InputEvent::TouchMove { touches } => self.touch_move(touches, view),
            InputEvent::TouchEnd => self.touch_end(),
            InputEvent::Key { .. } => vec![], // keys resolve through the shortcut map
        }
    }

    fn pointer_down(
        &mut self,
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
        hit: Hit,
    ) -> Vec<EditorAction> {
        if button == PointerButton::Secondary {
            // Context menu path; never enters a gesture mode
            return vec![];
        }
        if self.mode != Mode::Idle {
            // Fold a second press into the active gesture
            return vec![];
        }
        self.last_pointer = (x, y);

        match hit {
            Hit::Connection(id) => vec![EditorAction::DeleteConnection { id }],
            Hit::Node(id) if modifiers.connect() => {
                self.mode = Mode::Connecting(id);
                vec![
                    EditorAction::BeginConnecting { source: id },
                    EditorAction::TraceConnecting { x, y },
                ]
            }
            Hit::Node(id) => {
                self.mode = Mode::DraggingNode(id);
                vec![]
            }
            Hit::Empty => {
                self.mode = Mode::Panning;
                vec![]
            }
        }
    }

    fn pointer_move(&mut self, x: f32, y: f32, view: &ViewTransform) -> Vec<EditorAction> {
        let dx = x - self.last_pointer.0;
        let dy = y - self.last_pointer.1;
        self.last_pointer = (x, y);

        match self.mode {
            Mode::Connecting(_) => vec![EditorAction::TraceConnecting { x, y }],
            // Node drags are scale-compensated so the node tracks the
            // pointer 1:1 at any zoom level
            Mode::DraggingNode(id) => vec![EditorAction::DragNode {
                id,
                dx: dx / view.scale,
                dy: dy / view.scale,
            }],
            // Pan speed is defined in screen pixels, deliberately not
            // scale-compensated
            Mode::Panning => vec![EditorAction::Pan { dx, dy }],
            Mode::Idle => vec![],
        }
    }

    fn pointer_up(&mut self, hit: Hit) -> Vec<EditorAction> {
        let mut actions = Vec::new();
        if let Mode::Connecting(source) = self.mode {
            let target = hit.node().filter(|&t| t != source);
            actions.push(EditorAction::EndConnecting { source, target });
        }
        self.mode = Mode::Idle;
        actions.push(EditorAction::GestureEnded);
        actions
    }

    fn touch_start(&mut self, touches: &[(f32, f32)], hit: Hit) -> Vec<EditorAction> {
        match *touches {
            [(x, y)] => {
                if self.mode == Mode::Idle {
                    self.last_pointer = (x, y);
                    // No connect modifier on touch: a node drags,
                    // anything else pans
                    self.mode = match hit {
                        Hit::Node(id) => Mode::DraggingNode(id),
                        _ => Mode::Panning,
                    };
                }
                vec![]
            }
            [a, b] => {
                self.pinch_distance = Some(touch_distance(a, b));
                vec![]
            }
            _ => vec![],
        }
    }

    fn touch_move(&mut self, touches: &[(f32, f32)], view: &ViewTransform) -> Vec<EditorAction> {
        match *touches {
            [(x, y)] => self.pointer_move(x, y, view),
            [a, b] => {
                let distance = touch_distance(a, b);
                let Some(last) = self.pinch_distance else {
                    self.pinch_distance = Some(distance);
                    return vec![];
                };
                self.pinch_distance = Some(distance);
                if last <= f32::EPSILON {
                    return vec![];
                }
                // Anchor at the pinch midpoint so the content between the
                // fingers stays put
                vec![EditorAction::Zoom {
                    factor: distance / last,
                    anchor_x: (a.0 + b.0) / 2.0,
                    anchor_y: (a.1 + b.1) / 2.0,
                }]
            }
            _ => vec![],
        }
    }

    fn touch_end(&mut self) -> Vec<EditorAction> {
        self.mode = Mode::Idle;
        self.pinch_distance = None;
        vec![EditorAction::GestureEnded]
    }
}

fn touch_distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

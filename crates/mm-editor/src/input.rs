//! Input abstraction layer.
//!
//! Normalizes mouse, touch, and keyboard events into a unified
//! `InputEvent` enum consumed by the interaction state machine. All
//! coordinates are screen pixels relative to the viewport's top-left
//! corner.

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// The connect modifier: Ctrl, or ⌘ on macOS.
    pub fn connect(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Which pointer button an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    /// Right button, the context-menu trigger.
    Secondary,
}

/// A normalized input event from any device.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f32,
        y: f32,
        button: PointerButton,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },
    PointerUp {
        x: f32,
        y: f32,
        modifiers: Modifiers,
    },

    /// Trackpad/wheel scroll. Treated as a pan request, never zoom.
    Wheel { dx: f32, dy: f32 },

    DoubleClick { x: f32, y: f32 },

    /// Active touch points at gesture start. One point drags/pans, two
    /// points pinch-zoom.
    TouchStart { touches: Vec<(f32, f32)> },
    TouchMove { touches: Vec<(f32, f32)> },
    TouchEnd,

    /// Keyboard input, resolved through the shortcut map.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    /// The event's pointer position, when it has one. Multi-touch events
    /// report the first touch.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::DoubleClick { x, y } => Some((*x, *y)),
            Self::TouchStart { touches } | Self::TouchMove { touches } => {
                touches.first().copied()
            }
            _ => None,
        }
    }
}

//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! Platform-aware: ⌘ plays the Ctrl role on macOS.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Fixed zoom step in, anchored at the viewport origin.
    ZoomIn,
    /// Fixed zoom step out, anchored at the viewport origin.
    ZoomOut,
    /// Back to scale 1, origin translate.
    ResetView,
    /// Close the context menu and paste dialog. Never touches an active
    /// drag/pan/connect gesture.
    CloseOverlays,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"+"`, `"Escape"`).
    /// Returns `None` when the combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        // Escape closes overlays no matter what else is held
        if key == "Escape" {
            return Some(ShortcutAction::CloseOverlays);
        }

        let cmd = modifiers.ctrl || modifiers.meta;
        if cmd && !modifiers.shift {
            return match key {
                // some layouts deliver '=' for plus
                "+" | "=" => Some(ShortcutAction::ZoomIn),
                "-" | "_" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ResetView),
                _ => None,
            };
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
        alt: false,
        meta: false,
    };
    const META: Modifiers = Modifiers {
        meta: true,
        shift: false,
        alt: false,
        ctrl: false,
    };

    #[test]
    fn resolve_zoom_keys() {
        assert_eq!(ShortcutMap::resolve("+", CTRL), Some(ShortcutAction::ZoomIn));
        assert_eq!(ShortcutMap::resolve("=", META), Some(ShortcutAction::ZoomIn));
        assert_eq!(ShortcutMap::resolve("-", CTRL), Some(ShortcutAction::ZoomOut));
        assert_eq!(ShortcutMap::resolve("_", META), Some(ShortcutAction::ZoomOut));
        assert_eq!(ShortcutMap::resolve("0", CTRL), Some(ShortcutAction::ResetView));
    }

    #[test]
    fn zoom_needs_the_command_modifier() {
        assert_eq!(ShortcutMap::resolve("+", Modifiers::NONE), None);
        assert_eq!(ShortcutMap::resolve("-", Modifiers::NONE), None);
    }

    #[test]
    fn shift_suppresses_zoom_combos() {
        let ctrl_shift = Modifiers {
            ctrl: true,
            shift: true,
            alt: false,
            meta: false,
        };
        assert_eq!(ShortcutMap::resolve("+", ctrl_shift), None);
    }

    #[test]
    fn escape_always_closes_overlays() {
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE),
            Some(ShortcutAction::CloseOverlays)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", CTRL),
            Some(ShortcutAction::CloseOverlays)
        );
    }

    #[test]
    fn unbound_keys_resolve_to_none() {
        assert_eq!(ShortcutMap::resolve("q", Modifiers::NONE), None);
        assert_eq!(ShortcutMap::resolve("z", CTRL), None);
    }
}

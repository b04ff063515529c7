//! Keyboard shortcut mapping for comment commands.
//!
//! Maps key + modifier combos to semantic `CommentAction`s. The plugin never
//! listens to the keyboard itself; the host resolves key events here and
//! passes the action to `CommentPlugin::apply_action`.
//!
//! - Shift+C = add an inline comment at the pointer
//! - Shift+F = frame the selected nodes
//! - Delete / Backspace = delete the focused comment

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    AddInlineAtPointer,
    AddFrameFromSelection,
    DeleteFocused,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"C"`, `"Delete"`).
    /// Combos with Ctrl/⌘ or Alt are left to the host editor.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<CommentAction> {
        if ctrl || meta || alt {
            return None;
        }

        if shift {
            return match key {
                "c" | "C" => Some(CommentAction::AddInlineAtPointer),
                "f" | "F" => Some(CommentAction::AddFrameFromSelection),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(CommentAction::DeleteFocused),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_add_comment() {
        assert_eq!(
            ShortcutMap::resolve("C", false, true, false, false),
            Some(CommentAction::AddInlineAtPointer)
        );
        assert_eq!(
            ShortcutMap::resolve("F", false, true, false, false),
            Some(CommentAction::AddFrameFromSelection)
        );
    }

    #[test]
    fn resolve_delete() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(CommentAction::DeleteFocused)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(CommentAction::DeleteFocused)
        );
    }

    #[test]
    fn resolve_leaves_editor_combos_alone() {
        // Cmd+Shift+C belongs to the host (copy style etc.)
        assert_eq!(ShortcutMap::resolve("C", false, true, false, true), None);
        assert_eq!(ShortcutMap::resolve("Delete", true, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("c", false, false, false, false), None);
    }
}

//! Keyboard shortcuts for the markup layer.
//!
//! Shortcuts are only honoured while markup mode is active; the engine
//! checks that before acting on [`shortcut_for`].

/// A key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key, as typed (case is ignored)
    pub key: char,
    /// Control held
    pub ctrl: bool,
    /// Command/meta held
    pub meta: bool,
    /// Shift held
    pub shift: bool,
}

impl KeyPress {
    /// A bare key press.
    pub fn new(key: char) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    /// Same press with control held.
    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Same press with command/meta held.
    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Same press with shift held.
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Actions bound to markup shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupShortcut {
    /// ctrl/cmd+Z
    Undo,
    /// ctrl/cmd+shift+Z or ctrl/cmd+Y
    Redo,
}

/// Get the markup action for a key press, if any.
pub fn shortcut_for(press: &KeyPress) -> Option<MarkupShortcut> {
    if !press.command() {
        return None;
    }
    match press.key.to_ascii_lowercase() {
        'z' if press.shift => Some(MarkupShortcut::Redo),
        'z' => Some(MarkupShortcut::Undo),
        'y' => Some(MarkupShortcut::Redo),
        _ => None,
    }
}

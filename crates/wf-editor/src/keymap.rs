//! Keyboard chords and the command table.

use std::collections::HashMap;

/// Every action the toolbar, config panel or keyboard can trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    DeleteSelection,
    Save,
    Load,
    Copy,
    Paste,
    Undo,
    Redo,
    /// Contents of a user-picked `.json` file.
    Import(String),
    Export,
    /// Asks for confirmation before replacing the canvas.
    LoadTemplate(String),
    Validate,
    /// Asks for confirmation before emptying the canvas.
    Clear,
    ToggleGrid,
    ZoomIn,
    ZoomOut,
    FitView,
    Confirm,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

/// Raw modifier state of a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    pub fn ctrl() -> Self {
        Modifiers {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Modifiers {
            meta: true,
            ..Self::NONE
        }
    }

    pub fn ctrl_shift() -> Self {
        Modifiers {
            ctrl: true,
            shift: true,
            ..Self::NONE
        }
    }
}

/// Normalized key combination. Ctrl and Cmd both count as `command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub command: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            command: false,
            shift: false,
            alt: false,
        }
    }

    pub fn command(c: char) -> Self {
        Self {
            command: true,
            ..Self::plain(Key::Char(c))
        }
    }

    pub fn command_shift(c: char) -> Self {
        Self {
            shift: true,
            ..Self::command(c)
        }
    }

    pub fn from_event(key: Key, modifiers: Modifiers) -> Self {
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self {
            key,
            command: modifiers.ctrl || modifiers.meta,
            shift: modifiers.shift,
            alt: modifiers.alt,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyChord, Command>,
}

impl Default for Keymap {
    fn default() -> Self {
        let bindings = [
            (KeyChord::plain(Key::Delete), Command::DeleteSelection),
            (KeyChord::plain(Key::Backspace), Command::DeleteSelection),
            (KeyChord::plain(Key::Escape), Command::Cancel),
            (KeyChord::command('s'), Command::Save),
            (KeyChord::command('c'), Command::Copy),
            (KeyChord::command('v'), Command::Paste),
            (KeyChord::command('z'), Command::Undo),
            (KeyChord::command_shift('z'), Command::Redo),
            (KeyChord::command('y'), Command::Redo),
        ]
        .into_iter()
        .collect();
        Self { bindings }
    }
}

impl Keymap {
    pub fn lookup(&self, key: Key, modifiers: Modifiers) -> Option<Command> {
        self.bindings
            .get(&KeyChord::from_event(key, modifiers))
            .cloned()
    }

    /// Add or override a binding; returns the command it replaced.
    pub fn bind(&mut self, chord: KeyChord, command: Command) -> Option<Command> {
        self.bindings.insert(chord, command)
    }
}

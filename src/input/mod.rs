mod shortcut;

pub use shortcut::{
    resolve_shortcut, KeyChord, KeyChordError, ShortcutAction, ShortcutKey, ShortcutModifiers,
};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Enter,
    Escape,
}

/// Pressed modifiers; the platform command key counts as `ctrl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    ToggleLanguage,
    ToggleTheme,
    Print,
    ExportPdf,
    ExportPng,
    ShowHelp,
    CloseModals,
}

impl ShortcutAction {
    pub const ALL: [ShortcutAction; 7] = [
        ShortcutAction::ToggleLanguage,
        ShortcutAction::ToggleTheme,
        ShortcutAction::Print,
        ShortcutAction::ExportPdf,
        ShortcutAction::ExportPng,
        ShortcutAction::ShowHelp,
        ShortcutAction::CloseModals,
    ];

    /// Key legend and description shown in the help dialog.
    pub const fn help(self) -> (&'static str, &'static str) {
        match self {
            Self::ToggleLanguage => ("Ctrl/Cmd + Shift + L", "Toggle Language"),
            Self::ToggleTheme => ("Ctrl/Cmd + Shift + T", "Toggle Theme"),
            Self::Print => ("Ctrl/Cmd + P", "Print CV"),
            Self::ExportPdf => ("Ctrl/Cmd + Shift + P", "Export as PDF"),
            Self::ExportPng => ("Ctrl/Cmd + Shift + I", "Export as PNG"),
            Self::ShowHelp => ("Ctrl/Cmd + /", "Show this help"),
            Self::CloseModals => ("Escape", "Close modals"),
        }
    }
}

pub fn resolve_shortcut(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<ShortcutAction> {
    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Escape, _, _) => Some(ShortcutAction::CloseModals),
        (ShortcutKey::Character('l'), true, true) => Some(ShortcutAction::ToggleLanguage),
        (ShortcutKey::Character('t'), true, true) => Some(ShortcutAction::ToggleTheme),
        (ShortcutKey::Character('p'), true, true) => Some(ShortcutAction::ExportPdf),
        (ShortcutKey::Character('i'), true, true) => Some(ShortcutAction::ExportPng),
        (ShortcutKey::Character('p'), true, false) => Some(ShortcutAction::Print),
        (ShortcutKey::Character('/'), true, false) => Some(ShortcutAction::ShowHelp),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyChordError {
    #[error("empty key chord")]
    Empty,
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
}

/// A key plus modifiers written as `ctrl+shift+l`, `cmd+/` or `escape`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: ShortcutKey,
    pub modifiers: ShortcutModifiers,
}

impl KeyChord {
    pub fn parse(raw: &str) -> Result<Self, KeyChordError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(KeyChordError::Empty);
        }
        let (modifier_part, key_part) = match raw.rsplit_once('+') {
            Some((modifiers, "")) => (modifiers.strip_suffix('+').unwrap_or(modifiers), "+"),
            Some((modifiers, key)) => (modifiers, key),
            None => ("", raw),
        };

        let mut modifiers = ShortcutModifiers::default();
        for token in modifier_part.split('+').filter(|token| !token.is_empty()) {
            match token.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "meta" | "super" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                other => return Err(KeyChordError::UnknownModifier(other.to_string())),
            }
        }

        let key = parse_key(key_part.trim())?;
        Ok(Self { key, modifiers })
    }

    pub fn action(self) -> Option<ShortcutAction> {
        resolve_shortcut(self.key, self.modifiers)
    }
}

fn parse_key(raw: &str) -> Result<ShortcutKey, KeyChordError> {
    let lowered = raw.to_lowercase();
    match lowered.as_str() {
        "escape" | "esc" => return Ok(ShortcutKey::Escape),
        "enter" | "return" => return Ok(ShortcutKey::Enter),
        _ => {}
    }
    let mut chars = lowered.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ShortcutKey::Character(ch)),
        _ => Err(KeyChordError::UnknownKey(raw.to_string())),
    }
}

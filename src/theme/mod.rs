use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dom::SharedDocument;
use crate::events::{Channel, ColorThemeChanged, ThemeChanged};
use crate::storage::{keys, persist, PreferenceStore};
use crate::ui::{ids, LAYOUT_TOKENS};

mod color;

pub use color::{darken_color, lighten_color};
pub(crate) use color::parse_hex;

const TRANSITION_CLASS: &str = "theme-transition";
const ACCENT_LIGHTEN_PERCENT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn meta_color(self) -> &'static str {
        match self {
            Self::Light => "#ffffff",
            Self::Dark => "#1e293b",
        }
    }

    /// Icon and tooltip for the toggle, which offers the opposite mode.
    const fn toggle_presentation(self) -> (&'static str, &'static str) {
        match self {
            Self::Light => ("fas fa-moon", "Switch to Dark Mode"),
            Self::Dark => ("fas fa-sun", "Switch to Light Mode"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Orange,
    Teal,
}

impl Accent {
    pub const ALL: [Accent; 6] = [
        Accent::Blue,
        Accent::Green,
        Accent::Purple,
        Accent::Red,
        Accent::Orange,
        Accent::Teal,
    ];

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|accent| accent.id() == id)
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Teal => "teal",
        }
    }

    pub const fn base_color(self) -> &'static str {
        match self {
            Self::Blue => "#2563eb",
            Self::Green => "#059669",
            Self::Purple => "#7c3aed",
            Self::Red => "#dc2626",
            Self::Orange => "#ea580c",
            Self::Teal => "#0d9488",
        }
    }

    pub fn lightened(self) -> String {
        lighten_color(self.base_color(), ACCENT_LIGHTEN_PERCENT)
            .unwrap_or_else(|| self.base_color().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeState {
    pub mode: ThemeMode,
    pub accent: Accent,
}

/// Portable snapshot produced by [`ThemeCoordinator::export_settings`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub theme: String,
    pub color_theme: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeSource {
    Stored,
    Environment,
    User,
}

pub struct ThemeCoordinator {
    state: Cell<ThemeState>,
    explicit: Cell<bool>,
    transition_until: Cell<Option<Instant>>,
    preferences: Rc<dyn PreferenceStore>,
    document: SharedDocument,
    theme_changed: Channel<ThemeChanged>,
    color_changed: Channel<ColorThemeChanged>,
}

impl ThemeCoordinator {
    pub fn new(preferences: Rc<dyn PreferenceStore>, document: SharedDocument) -> Self {
        Self {
            state: Cell::new(ThemeState::default()),
            explicit: Cell::new(false),
            transition_until: Cell::new(None),
            preferences,
            document,
            theme_changed: Channel::new("themeChanged"),
            color_changed: Channel::new("colorThemeChanged"),
        }
    }

    /// Stored mode wins; otherwise the environment preference is applied
    /// without being persisted, so later environment changes keep applying.
    pub fn initialize(&self, prefers_dark: Option<bool>) -> ThemeState {
        let stored_mode = self
            .preferences
            .get(keys::THEME)
            .and_then(|id| ThemeMode::from_id(&id));
        match stored_mode {
            Some(mode) => self.apply_mode(mode, ModeSource::Stored),
            None => {
                let mode = match prefers_dark {
                    Some(true) => ThemeMode::Dark,
                    _ => ThemeMode::Light,
                };
                self.apply_mode(mode, ModeSource::Environment)
            }
        };

        let stored_accent = self
            .preferences
            .get(keys::COLOR_THEME)
            .and_then(|id| Accent::from_id(&id));
        self.apply_accent(stored_accent.unwrap_or_default(), stored_accent.is_none());
        tracing::debug!(state = ?self.state(), explicit = self.explicit.get(), "theme initialized");
        self.state()
    }

    pub fn set_theme(&self, mode: &str) -> ThemeState {
        match ThemeMode::from_id(mode) {
            Some(mode) => self.apply_mode(mode, ModeSource::User),
            None => {
                tracing::debug!(mode, "ignoring unsupported theme mode");
                self.state()
            }
        }
    }

    pub fn toggle_theme(&self) -> ThemeState {
        self.apply_mode(self.state().mode.toggled(), ModeSource::User)
    }

    pub fn set_color_theme(&self, accent: &str) -> ThemeState {
        match Accent::from_id(accent) {
            Some(accent) => self.apply_accent(accent, true),
            None => {
                tracing::debug!(accent, "ignoring unsupported color theme");
                self.state()
            }
        }
    }

    /// Follows the environment only while the user has not chosen a mode.
    pub fn on_system_preference_changed(&self, prefers_dark: bool) -> ThemeState {
        if self.explicit.get() {
            tracing::debug!(prefers_dark, "explicit theme set; ignoring environment change");
            return self.state();
        }
        let mode = if prefers_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };
        self.apply_mode(mode, ModeSource::Environment)
    }

    fn apply_mode(&self, mode: ThemeMode, source: ModeSource) -> ThemeState {
        let mut state = self.state.get();
        state.mode = mode;
        self.state.set(state);

        match source {
            ModeSource::User => {
                self.explicit.set(true);
                persist(self.preferences.as_ref(), keys::THEME, mode.id());
            }
            ModeSource::Stored => self.explicit.set(true),
            ModeSource::Environment => {}
        }

        {
            let mut doc = self.document.borrow_mut();
            let body = doc.body();
            doc.set_attr(body, "data-theme", mode.id());

            if let Some(toggle) = doc.by_id(ids::THEME_TOGGLE) {
                let (icon_classes, tooltip) = mode.toggle_presentation();
                doc.set_attr(toggle, "title", tooltip);
                doc.set_attr(toggle, "aria-label", tooltip);
                if let Some(icon) = doc.by_tag(toggle, "i").first().copied() {
                    doc.set_classes(icon, icon_classes);
                }
            }

            let meta = doc.ensure_meta("theme-color");
            doc.set_attr(meta, "content", mode.meta_color());

            if source != ModeSource::Stored {
                doc.add_class(body, TRANSITION_CLASS);
                self.transition_until.set(Some(
                    Instant::now() + Duration::from_millis(LAYOUT_TOKENS.theme_transition_ms),
                ));
            }
        }

        tracing::info!(mode = mode.id(), ?source, "theme changed");
        self.theme_changed.publish(&ThemeChanged { mode });
        state
    }

    fn apply_accent(&self, accent: Accent, store: bool) -> ThemeState {
        let mut state = self.state.get();
        state.accent = accent;
        self.state.set(state);
        if store {
            persist(self.preferences.as_ref(), keys::COLOR_THEME, accent.id());
        }

        {
            let mut doc = self.document.borrow_mut();
            let body = doc.body();
            doc.set_attr(body, "data-color-theme", accent.id());
            for button in doc.by_class("theme-color") {
                if doc.attr(button, "data-theme") == Some(accent.id()) {
                    doc.add_class(button, "active");
                } else {
                    doc.remove_class(button, "active");
                }
            }
            let root = doc.root();
            doc.set_style(root, "--primary-color", accent.base_color());
            doc.set_style(root, "--accent-color", accent.lightened());
        }

        tracing::info!(accent = accent.id(), "color theme changed");
        self.color_changed.publish(&ColorThemeChanged { accent });
        state
    }

    /// Removes the transition marker once its window has elapsed.
    pub fn tick(&self, now: Instant) {
        let Some(deadline) = self.transition_until.get() else {
            return;
        };
        if now >= deadline {
            self.transition_until.set(None);
            let mut doc = self.document.borrow_mut();
            let body = doc.body();
            doc.remove_class(body, TRANSITION_CLASS);
        }
    }

    pub fn state(&self) -> ThemeState {
        self.state.get()
    }

    pub fn is_dark_mode(&self) -> bool {
        self.state.get().mode == ThemeMode::Dark
    }

    pub fn primary_color(&self) -> &'static str {
        self.state.get().accent.base_color()
    }

    pub fn accent_color(&self) -> String {
        self.state.get().accent.lightened()
    }

    pub fn export_settings(&self) -> ThemeSettings {
        let state = self.state.get();
        ThemeSettings {
            theme: state.mode.id().to_string(),
            color_theme: state.accent.id().to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Applies a snapshot through the validating setters; unknown values are ignored.
    pub fn import_settings(&self, settings: &ThemeSettings) -> ThemeState {
        self.set_theme(&settings.theme);
        self.set_color_theme(&settings.color_theme)
    }

    pub fn theme_changed(&self) -> &Channel<ThemeChanged> {
        &self.theme_changed
    }

    pub fn color_changed(&self) -> &Channel<ColorThemeChanged> {
        &self.color_changed
    }
}

impl std::fmt::Debug for ThemeCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeCoordinator")
            .field("state", &self.state.get())
            .field("explicit", &self.explicit.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPreferenceStore;
    use crate::ui::build_page;

    fn coordinator(prefs: MemoryPreferenceStore) -> (ThemeCoordinator, Rc<MemoryPreferenceStore>, SharedDocument) {
        let prefs = Rc::new(prefs);
        let document = build_page().shared();
        let theme = ThemeCoordinator::new(prefs.clone(), Rc::clone(&document));
        (theme, prefs, document)
    }

    #[test]
    fn accent_name_is_not_a_mode() {
        let (theme, _, _) = coordinator(MemoryPreferenceStore::new());
        theme.initialize(None);
        let before = theme.state();
        assert_eq!(theme.set_theme("purple"), before);
        assert_eq!(theme.state(), before);
    }

    #[test]
    fn unknown_accent_leaves_state_unchanged() {
        let (theme, prefs, _) = coordinator(MemoryPreferenceStore::new());
        theme.initialize(None);
        theme.set_color_theme("teal");
        let before = theme.state();
        for id in ["magenta", "", "Teal", "dark"] {
            assert_eq!(theme.set_color_theme(id), before);
        }
        assert_eq!(prefs.get(keys::COLOR_THEME).as_deref(), Some("teal"));
    }

    #[test]
    fn set_theme_updates_markup_and_persists() {
        let (theme, prefs, document) = coordinator(MemoryPreferenceStore::new());
        theme.initialize(None);
        theme.set_theme("dark");

        assert!(theme.is_dark_mode());
        assert_eq!(prefs.get(keys::THEME).as_deref(), Some("dark"));
        let doc = document.borrow();
        assert_eq!(doc.attr(doc.body(), "data-theme"), Some("dark"));
        let toggle = doc.by_id(ids::THEME_TOGGLE).unwrap();
        assert_eq!(doc.attr(toggle, "title"), Some("Switch to Light Mode"));
        let icon = doc.by_tag(toggle, "i")[0];
        assert!(doc.has_class(icon, "fa-sun"));
        let meta = doc
            .find_all(doc.head(), |el| el.attributes.get("name").is_some_and(|n| n == "theme-color"))
            [0];
        assert_eq!(doc.attr(meta, "content"), Some("#1e293b"));
    }

    #[test]
    fn transition_marker_is_removed_after_window() {
        let (theme, _, document) = coordinator(MemoryPreferenceStore::new());
        theme.initialize(None);
        theme.toggle_theme();
        let body = document.borrow().body();
        assert!(document.borrow().has_class(body, TRANSITION_CLASS));

        theme.tick(Instant::now());
        assert!(document.borrow().has_class(body, TRANSITION_CLASS));

        theme.tick(Instant::now() + Duration::from_millis(LAYOUT_TOKENS.theme_transition_ms + 1));
        assert!(!document.borrow().has_class(body, TRANSITION_CLASS));
    }

    #[test]
    fn color_theme_marks_active_swatch_and_sets_variables() {
        let (theme, _, document) = coordinator(MemoryPreferenceStore::new());
        theme.initialize(None);
        theme.set_color_theme("green");

        let doc = document.borrow();
        let active: Vec<_> = doc
            .by_class("theme-color")
            .into_iter()
            .filter(|node| doc.has_class(*node, "active"))
            .map(|node| doc.attr(node, "data-theme").unwrap().to_string())
            .collect();
        assert_eq!(active, vec!["green".to_string()]);
        assert_eq!(doc.style(doc.root(), "--primary-color"), Some("#059669"));
        assert_eq!(theme.primary_color(), "#059669");
        assert_eq!(doc.attr(doc.body(), "data-color-theme"), Some("green"));
    }

    #[test]
    fn environment_preference_applies_without_persisting() {
        let (theme, prefs, _) = coordinator(MemoryPreferenceStore::new());
        assert_eq!(theme.initialize(Some(true)).mode, ThemeMode::Dark);
        assert_eq!(prefs.get(keys::THEME), None);

        assert_eq!(theme.on_system_preference_changed(false).mode, ThemeMode::Light);
        theme.set_theme("dark");
        assert_eq!(theme.on_system_preference_changed(false).mode, ThemeMode::Dark);
    }

    #[test]
    fn stored_values_win_over_environment() {
        let (theme, _, _) = coordinator(MemoryPreferenceStore::with_values([
            (keys::THEME, "light"),
            (keys::COLOR_THEME, "orange"),
        ]));
        let state = theme.initialize(Some(true));
        assert_eq!(state.mode, ThemeMode::Light);
        assert_eq!(state.accent, Accent::Orange);
        assert_eq!(theme.on_system_preference_changed(true).mode, ThemeMode::Light);
    }

    #[test]
    fn invalid_stored_accent_falls_back_to_blue() {
        let (theme, _, _) =
            coordinator(MemoryPreferenceStore::with_values([(keys::COLOR_THEME, "pink")]));
        assert_eq!(theme.initialize(None).accent, Accent::Blue);
    }

    #[test]
    fn settings_snapshot_round_trips_through_setters() {
        let (source, _, _) = coordinator(MemoryPreferenceStore::new());
        source.initialize(None);
        source.set_theme("dark");
        source.set_color_theme("red");
        let snapshot = source.export_settings();

        let (target, _, _) = coordinator(MemoryPreferenceStore::new());
        target.initialize(None);
        assert_eq!(target.import_settings(&snapshot), source.state());

        let bogus = ThemeSettings {
            theme: "sepia".to_string(),
            color_theme: "gold".to_string(),
            timestamp: Utc::now(),
        };
        assert_eq!(target.import_settings(&bogus), source.state());
    }

    #[test]
    fn broadcasts_once_per_change() {
        let (theme, _, _) = coordinator(MemoryPreferenceStore::new());
        theme.initialize(None);
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        theme.theme_changed().subscribe(move |_| seen.set(seen.get() + 1));
        theme.set_theme("dark");
        theme.set_theme("bogus");
        assert_eq!(count.get(), 1);
    }
}

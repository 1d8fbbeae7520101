//! Locale Coordinator: current language, text direction, dual-language text
//! substitution and `languageChanged` notifications.

use std::cell::Cell;
use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dom::SharedDocument;
use crate::events::{Channel, LanguageChanged};
use crate::storage::{keys, persist, PreferenceStore};

pub mod format;

pub const TITLE_EN: &str = "Professional CV Template";
pub const TITLE_AR: &str = "قالب السيرة الذاتية المهنية";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

impl Language {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Self::English),
            "ar" => Some(Self::Arabic),
            _ => None,
        }
    }

    /// Maps an environment tag such as `ar-SA` onto a supported language.
    pub fn from_environment_tag(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("ar") {
            Self::Arabic
        } else {
            Self::English
        }
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }

    pub const fn direction(self) -> Direction {
        match self {
            Self::English => Direction::Ltr,
            Self::Arabic => Direction::Rtl,
        }
    }

    pub const fn other(self) -> Self {
        match self {
            Self::English => Self::Arabic,
            Self::Arabic => Self::English,
        }
    }

    pub const fn native_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Arabic => "عربي",
        }
    }

    pub fn pick<T>(self, en: T, ar: T) -> T {
        match self {
            Self::English => en,
            Self::Arabic => ar,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocaleState {
    language: Language,
}

impl LocaleState {
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

    pub const fn language(self) -> Language {
        self.language
    }

    pub const fn direction(self) -> Direction {
        self.language.direction()
    }
}

pub struct LocaleCoordinator {
    state: Cell<LocaleState>,
    preferences: Rc<dyn PreferenceStore>,
    document: SharedDocument,
    changed: Channel<LanguageChanged>,
}

impl LocaleCoordinator {
    pub fn new(preferences: Rc<dyn PreferenceStore>, document: SharedDocument) -> Self {
        Self {
            state: Cell::new(LocaleState::default()),
            preferences,
            document,
            changed: Channel::new("languageChanged"),
        }
    }

    /// Persisted language wins, then the environment's language, then English.
    pub fn initialize(&self, environment_language: Option<&str>) -> LocaleState {
        let saved = self
            .preferences
            .get(keys::LANGUAGE)
            .and_then(|code| Language::from_code(&code));
        let language = saved.unwrap_or_else(|| {
            environment_language
                .map(Language::from_environment_tag)
                .unwrap_or_default()
        });
        tracing::debug!(?saved, ?environment_language, %language, "initial language resolved");
        self.apply(language)
    }

    /// Switches to `code`; unrecognized codes leave the state untouched.
    pub fn set_language(&self, code: &str) -> LocaleState {
        match Language::from_code(code) {
            Some(language) => self.apply(language),
            None => {
                tracing::debug!(code, "ignoring unsupported language");
                self.state()
            }
        }
    }

    pub fn toggle_language(&self) -> LocaleState {
        self.apply(self.current().other())
    }

    fn apply(&self, language: Language) -> LocaleState {
        let state = LocaleState::new(language);
        self.state.set(state);
        persist(self.preferences.as_ref(), keys::LANGUAGE, language.code());

        {
            let mut doc = self.document.borrow_mut();
            let direction = language.direction();
            let root = doc.root();
            let body = doc.body();
            doc.set_attr(root, "lang", language.code());
            doc.set_attr(root, "dir", direction.as_str());
            doc.set_attr(body, "data-lang", language.code());
            doc.add_class(body, direction.as_str());
            doc.remove_class(body, language.other().direction().as_str());

            let meta = doc.ensure_meta("language");
            doc.set_attr(meta, "content", language.code());
            let meta = doc.ensure_meta("direction");
            doc.set_attr(meta, "content", direction.as_str());
            doc.set_title(language.pick(TITLE_EN, TITLE_AR));

            let attribute = format!("data-{}", language.code());
            for node in doc.with_attributes(&["data-en", "data-ar"]) {
                if let Some(text) = doc.attr(node, &attribute).map(str::to_string) {
                    if !text.is_empty() {
                        doc.set_text(node, text);
                    }
                }
            }

            for node in doc.by_class("lang-text") {
                doc.set_text(node, language.other().native_name());
            }
        }

        tracing::info!(%language, "language changed");
        self.changed.publish(&LanguageChanged { language });
        state
    }

    pub fn state(&self) -> LocaleState {
        self.state.get()
    }

    pub fn current(&self) -> Language {
        self.state.get().language()
    }

    pub fn is_rtl(&self) -> bool {
        self.direction() == Direction::Rtl
    }

    pub fn direction(&self) -> Direction {
        self.state.get().direction()
    }

    pub fn format_text<'a>(&self, en: &'a str, ar: &'a str) -> &'a str {
        self.current().pick(en, ar)
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        format::format_date(self.current(), date)
    }

    pub fn format_number(&self, value: f64) -> String {
        format::format_number(self.current(), value)
    }

    pub fn language_class(&self) -> String {
        format!("lang-{}", self.current().code())
    }

    pub fn changed(&self) -> &Channel<LanguageChanged> {
        &self.changed
    }
}

impl std::fmt::Debug for LocaleCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleCoordinator")
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::El;
    use crate::storage::MemoryPreferenceStore;
    use crate::ui::build_page;
    use std::cell::RefCell;

    fn coordinator_with(prefs: MemoryPreferenceStore) -> (LocaleCoordinator, SharedDocument) {
        let document = build_page().shared();
        let coordinator = LocaleCoordinator::new(Rc::new(prefs), Rc::clone(&document));
        (coordinator, document)
    }

    #[test]
    fn unsupported_codes_leave_state_unchanged() {
        let (locale, _) = coordinator_with(MemoryPreferenceStore::new());
        locale.set_language("ar");
        let before = locale.state();

        for code in ["fr", "", "AR", "en-US", "arabic"] {
            assert_eq!(locale.set_language(code), before);
            assert_eq!(locale.state(), before);
        }
    }

    #[test]
    fn direction_is_rtl_exactly_for_arabic() {
        let (locale, _) = coordinator_with(MemoryPreferenceStore::new());
        locale.set_language("en");
        assert_eq!(locale.direction(), Direction::Ltr);
        assert!(!locale.is_rtl());
        locale.toggle_language();
        assert_eq!(locale.direction(), Direction::Rtl);
        assert!(locale.is_rtl());
        locale.toggle_language();
        assert_eq!(locale.current(), Language::English);
        assert_eq!(locale.direction(), Direction::Ltr);
    }

    #[test]
    fn environment_arabic_region_selects_arabic_when_nothing_persisted() {
        let (locale, document) = coordinator_with(MemoryPreferenceStore::new());
        let state = locale.initialize(Some("ar-SA"));

        assert_eq!(state.language(), Language::Arabic);
        assert_eq!(state.direction(), Direction::Rtl);
        let doc = document.borrow();
        assert_eq!(doc.attr(doc.root(), "dir"), Some("rtl"));
        assert_eq!(doc.attr(doc.body(), "data-lang"), Some("ar"));
    }

    #[test]
    fn persisted_language_beats_environment() {
        let (locale, _) =
            coordinator_with(MemoryPreferenceStore::with_values([(keys::LANGUAGE, "en")]));
        assert_eq!(locale.initialize(Some("ar-SA")).language(), Language::English);
    }

    #[test]
    fn garbage_persisted_value_falls_through_to_default() {
        let (locale, _) =
            coordinator_with(MemoryPreferenceStore::with_values([(keys::LANGUAGE, "de")]));
        assert_eq!(locale.initialize(None).language(), Language::English);
    }

    #[test]
    fn transition_persists_updates_markup_then_broadcasts() {
        let prefs = Rc::new(MemoryPreferenceStore::new());
        let document = build_page().shared();
        let locale = LocaleCoordinator::new(prefs.clone(), Rc::clone(&document));

        let observed = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&observed);
        let doc_for_handler = Rc::clone(&document);
        let prefs_for_handler = Rc::clone(&prefs);
        locale.changed().subscribe(move |event: &LanguageChanged| {
            let doc = doc_for_handler.borrow();
            seen.borrow_mut().push((
                event.language,
                prefs_for_handler.get(keys::LANGUAGE),
                doc.attr(doc.root(), "dir").map(str::to_string),
            ));
        });

        locale.set_language("ar");

        assert_eq!(
            *observed.borrow(),
            vec![(
                Language::Arabic,
                Some("ar".to_string()),
                Some("rtl".to_string())
            )]
        );
    }

    #[test]
    fn every_dual_language_element_is_updated() {
        let (locale, document) = coordinator_with(MemoryPreferenceStore::new());
        {
            let mut doc = document.borrow_mut();
            let body = doc.body();
            doc.append_tree(
                body,
                El::new("span").bilingual("View Project", "عرض المشروع", "View Project"),
            );
        }

        locale.set_language("ar");

        let doc = document.borrow();
        for node in doc.with_attributes(&["data-en", "data-ar"]) {
            assert_eq!(
                doc.text_content(node),
                doc.attr(node, "data-ar").unwrap(),
                "element left in the wrong language"
            );
        }
        let toggle = doc.by_class("lang-text")[0];
        assert_eq!(doc.text_content(toggle), "English");
        assert_eq!(doc.title().as_deref(), Some(TITLE_AR));
    }

    #[test]
    fn formatting_follows_current_language() {
        let (locale, _) = coordinator_with(MemoryPreferenceStore::new());
        locale.set_language("ar");
        assert_eq!(locale.format_text("Hello", "مرحبا"), "مرحبا");
        assert_eq!(locale.format_number(12.0), "١٢");
        assert_eq!(locale.language_class(), "lang-ar");
        locale.set_language("en");
        assert_eq!(
            locale.format_date(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap()),
            "January 2, 2026"
        );
    }
}

//! Localized résumé content and its loading policy.
//!
//! Loading never fails from the caller's point of view: any fetch or parse
//! error is logged and the built-in default document is used instead.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize};

use crate::events::{Channel, ContentLoaded};
use crate::locale::Language;

mod defaults;
mod source;

pub use defaults::default_document;
pub use source::{
    content_source_for, ContentError, ContentSource, FileContentSource, HttpContentSource,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    #[serde(default)]
    pub en: Option<T>,
    #[serde(default)]
    pub ar: Option<T>,
}

impl<T> Localized<T> {
    pub fn new(en: T, ar: T) -> Self {
        Self {
            en: Some(en),
            ar: Some(ar),
        }
    }

    /// The variant for `language`, falling back to English.
    pub fn get(&self, language: Language) -> Option<&T> {
        let variant = match language {
            Language::English => self.en.as_ref(),
            Language::Arabic => self.ar.as_ref(),
        };
        variant.or(self.en.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub linkedin: String,
    pub github: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub location: String,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub duration: String,
    pub location: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gpa: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSkill {
    pub language: String,
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSetting {
    pub enabled: bool,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColorsSetting {
    pub primary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSetting {
    pub default: String,
    pub colors: ThemeColorsSetting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub profile_image: ImageSetting,
    pub qr_code: ImageSetting,
    pub theme: ThemeSetting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalizedDocument {
    pub personal_info: Localized<PersonalInfo>,
    pub experience: Localized<Vec<Experience>>,
    pub education: Localized<Vec<Education>>,
    pub skills: Localized<Skills>,
    pub projects: Localized<Vec<Project>>,
    pub languages: Localized<Vec<LanguageSkill>>,
    pub interests: Localized<Vec<String>>,
    pub settings: Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    PersonalInfo,
    Experience,
    Education,
    Skills,
    Projects,
    Languages,
    Interests,
    Settings,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::PersonalInfo,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
        Section::Languages,
        Section::Interests,
        Section::Settings,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PersonalInfo => "personalInfo",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Languages => "languages",
            Self::Interests => "interests",
            Self::Settings => "settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionData<'a> {
    PersonalInfo(&'a PersonalInfo),
    Experience(&'a [Experience]),
    Education(&'a [Education]),
    Skills(&'a Skills),
    Projects(&'a [Project]),
    Languages(&'a [LanguageSkill]),
    Interests(&'a [String]),
    Settings(&'a Settings),
}

impl LocalizedDocument {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn section_for(&self, section: Section, language: Language) -> Option<SectionData<'_>> {
        match section {
            Section::PersonalInfo => self
                .personal_info
                .get(language)
                .map(SectionData::PersonalInfo),
            Section::Experience => self
                .experience
                .get(language)
                .map(|items| SectionData::Experience(items)),
            Section::Education => self
                .education
                .get(language)
                .map(|items| SectionData::Education(items)),
            Section::Skills => self.skills.get(language).map(SectionData::Skills),
            Section::Projects => self
                .projects
                .get(language)
                .map(|items| SectionData::Projects(items)),
            Section::Languages => self
                .languages
                .get(language)
                .map(|items| SectionData::Languages(items)),
            Section::Interests => self
                .interests
                .get(language)
                .map(|items| SectionData::Interests(items)),
            Section::Settings => Some(SectionData::Settings(&self.settings)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    Source,
    Defaults,
}

/// Owns the loaded document and announces every completed load.
#[derive(Debug)]
pub struct ContentModel {
    document: RefCell<Option<Rc<LocalizedDocument>>>,
    loaded: Channel<ContentLoaded>,
}

impl ContentModel {
    pub fn new() -> Self {
        Self {
            document: RefCell::new(None),
            loaded: Channel::new("contentLoaded"),
        }
    }

    pub async fn load(&self, source: &dyn ContentSource) -> Rc<LocalizedDocument> {
        let (document, origin) = match fetch_document(source).await {
            Ok(document) => {
                tracing::info!(source = %source.describe(), "loaded CV data");
                (document, ContentOrigin::Source)
            }
            Err(err) => {
                tracing::warn!(source = %source.describe(), %err, "error loading CV data; using defaults");
                (default_document(), ContentOrigin::Defaults)
            }
        };

        let document = Rc::new(document);
        *self.document.borrow_mut() = Some(Rc::clone(&document));
        self.loaded.publish(&ContentLoaded { origin });
        document
    }

    pub fn document(&self) -> Option<Rc<LocalizedDocument>> {
        self.document.borrow().clone()
    }

    pub fn settings(&self) -> Option<Settings> {
        self.document.borrow().as_ref().map(|doc| doc.settings.clone())
    }

    pub fn loaded(&self) -> &Channel<ContentLoaded> {
        &self.loaded
    }
}

impl Default for ContentModel {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_document(source: &dyn ContentSource) -> Result<LocalizedDocument, ContentError> {
    let raw = source.fetch().await?;
    Ok(LocalizedDocument::from_json(&raw)?)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        Some(serde_json::Value::Number(number)) => Some(number.to_string()),
        Some(serde_json::Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::cell::Cell;

    struct FixedSource(Result<String, u16>);

    #[async_trait(?Send)]
    impl ContentSource for FixedSource {
        fn describe(&self) -> String {
            "fixture".to_string()
        }

        async fn fetch(&self) -> Result<String, ContentError> {
            match &self.0 {
                Ok(raw) => Ok(raw.clone()),
                Err(status) => Err(ContentError::Status { status: *status }),
            }
        }
    }

    #[test]
    fn arabic_request_falls_back_to_english_variant() {
        let document = LocalizedDocument::from_json(
            r#"{"experience":{"en":[{"title":"Engineer","company":"Acme","description":["Built things"]}]}}"#,
        )
        .unwrap();

        let Some(SectionData::Experience(items)) =
            document.section_for(Section::Experience, Language::Arabic)
        else {
            panic!("expected english fallback");
        };
        assert_eq!(items[0].title, "Engineer");
        assert_eq!(
            document.section_for(Section::Experience, Language::Arabic),
            document.section_for(Section::Experience, Language::English)
        );
    }

    #[test]
    fn absent_section_yields_none_but_settings_always_present() {
        let document = LocalizedDocument::from_json("{}").unwrap();
        assert!(document
            .section_for(Section::Projects, Language::English)
            .is_none());
        assert!(matches!(
            document.section_for(Section::Settings, Language::Arabic),
            Some(SectionData::Settings(_))
        ));
    }

    #[test]
    fn gpa_accepts_numbers_and_strings() {
        let document = LocalizedDocument::from_json(
            r#"{"education":{"en":[{"degree":"BSc","gpa":3.8},{"degree":"MSc","gpa":"4.0/4.0"}]}}"#,
        )
        .unwrap();
        let items = document.education.get(Language::English).unwrap();
        assert_eq!(items[0].gpa.as_deref(), Some("3.8"));
        assert_eq!(items[1].gpa.as_deref(), Some("4.0/4.0"));
    }

    #[test]
    fn section_names_parse() {
        assert_eq!(Section::from_name("personalInfo"), Some(Section::PersonalInfo));
        assert_eq!(Section::from_name("settings"), Some(Section::Settings));
        assert_eq!(Section::from_name("hobbies"), None);
    }

    #[tokio::test]
    async fn failed_fetch_substitutes_defaults_and_notifies_once() {
        let model = ContentModel::new();
        let notifications = Rc::new(Cell::new(0));
        let counter = Rc::clone(&notifications);
        model.loaded().subscribe(move |event: &ContentLoaded| {
            assert_eq!(event.origin, ContentOrigin::Defaults);
            counter.set(counter.get() + 1);
        });

        let document = model.load(&FixedSource(Err(404))).await;

        let Some(SectionData::PersonalInfo(info)) =
            document.section_for(Section::PersonalInfo, Language::English)
        else {
            panic!("defaults must carry personal info");
        };
        assert_eq!(info.name, "Your Name");
        assert_eq!(notifications.get(), 1);
    }

    #[tokio::test]
    async fn malformed_json_substitutes_defaults() {
        let model = ContentModel::new();
        let document = model.load(&FixedSource(Ok("{ broken".to_string()))).await;
        assert_eq!(*document, default_document());
    }

    #[tokio::test]
    async fn successful_load_keeps_source_document() {
        let model = ContentModel::new();
        let document = model
            .load(&FixedSource(Ok(
                r#"{"personalInfo":{"en":{"name":"Layla Haddad"}}}"#.to_string(),
            )))
            .await;
        assert_eq!(
            document.personal_info.get(Language::Arabic).unwrap().name,
            "Layla Haddad"
        );
        assert!(model.document().is_some());
    }
}

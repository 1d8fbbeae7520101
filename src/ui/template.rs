//! Page skeleton: chrome controls, the content region and the named
//! insertion points the binder fills.

use crate::dom::{Document, El};
use crate::export::{control_content, ControlState, ExportFormat};
use crate::locale::Language;
use crate::theme::Accent;

use super::style::PAGE_STYLESHEET;
use super::widgets::{bilingual_label, icon, icon_button, section_title};

pub mod ids {
    pub const CONTENT: &str = "cv-content";
    pub const PROFILE_NAME: &str = "profile-name";
    pub const PROFILE_TITLE: &str = "profile-title";
    pub const PROFILE_IMAGE: &str = "profile-image";
    pub const SUMMARY: &str = "summary-text";
    pub const CONTACT_LIST: &str = "contact-list";
    pub const TECHNICAL_SKILLS: &str = "technical-skills";
    pub const SOFT_SKILLS: &str = "soft-skills";
    pub const LANGUAGES_LIST: &str = "languages-list";
    pub const EXPERIENCE_LIST: &str = "experience-list";
    pub const EDUCATION_LIST: &str = "education-list";
    pub const PROJECTS_LIST: &str = "projects-list";
    pub const INTERESTS_LIST: &str = "interests-list";
    pub const QR_CODE: &str = "qr-code";
    pub const LANG_TOGGLE: &str = "lang-toggle";
    pub const THEME_TOGGLE: &str = "theme-toggle";
    pub const LOADING_SCREEN: &str = "loading-screen";
}

pub const NO_PRINT_CLASS: &str = "no-print";

pub fn build_page() -> Document {
    let language = Language::English;
    let mut doc = Document::new();
    let root = doc.root();
    doc.set_attr(root, "lang", language.code());
    doc.set_attr(root, "dir", language.direction().as_str());

    let head = doc.head();
    doc.append_tree(head, El::new("meta").attr("charset", "utf-8"));
    doc.append_tree(
        head,
        El::new("meta")
            .attr("name", "viewport")
            .attr("content", "width=device-width, initial-scale=1.0"),
    );
    doc.append_tree(head, El::new("style").raw(PAGE_STYLESHEET));
    doc.set_title(language.pick(crate::locale::TITLE_EN, crate::locale::TITLE_AR));

    let body = doc.body();
    doc.set_attr(body, "data-lang", language.code());
    doc.set_attr(body, "data-theme", "light");
    doc.set_attr(body, "data-color-theme", Accent::default().id());

    doc.append_tree(
        body,
        El::new("div")
            .id(ids::LOADING_SCREEN)
            .class("loading-screen")
            .child(El::new("div").class("spinner")),
    );
    doc.append_tree(body, controls(language));
    doc.append_tree(
        body,
        El::new("div").class("cv-container").child(
            El::new("div")
                .id(ids::CONTENT)
                .class("cv-wrapper")
                .child(sidebar(language))
                .child(main_column(language)),
        ),
    );
    doc
}

fn controls(language: Language) -> El {
    let accents = Accent::ALL.iter().map(|accent| {
        El::new("button")
            .class("theme-color")
            .attr("type", "button")
            .attr("data-theme", accent.id())
            .attr("title", accent.id())
            .attr("style", format!("background: {}", accent.base_color()))
    });

    let exports = ExportFormat::ALL.iter().map(|format| {
        El::new("button")
            .id(format.control_id())
            .class("btn-control")
            .attr("type", "button")
            .children(control_content(*format, ControlState::Idle, language))
    });

    El::new("div")
        .class("controls")
        .class(NO_PRINT_CLASS)
        .child(
            icon_button(ids::LANG_TOGGLE, "fas fa-language", "Toggle language", &[]).child(
                El::new("span")
                    .class("lang-text")
                    .text(language.other().native_name()),
            ),
        )
        .child(icon_button(
            ids::THEME_TOGGLE,
            "fas fa-moon",
            "Switch to Dark Mode",
            &[],
        ))
        .child(El::new("div").class("theme-colors").children(accents))
        .children(exports)
}

fn sidebar(language: Language) -> El {
    El::new("aside")
        .class("sidebar")
        .child(
            El::new("img")
                .id(ids::PROFILE_IMAGE)
                .class("profile-image")
                .attr("alt", "Profile"),
        )
        .child(El::new("h1").id(ids::PROFILE_NAME).class("profile-name"))
        .child(El::new("p").id(ids::PROFILE_TITLE).class("profile-title"))
        .child(
            El::new("section")
                .class("contact-section")
                .child(section_title("Contact", "التواصل", language))
                .child(El::new("div").id(ids::CONTACT_LIST)),
        )
        .child(
            El::new("section")
                .class("skills-section collapsible")
                .child(section_title("Skills", "المهارات", language))
                .child(
                    El::new("h3").child(bilingual_label(
                        "Technical Skills",
                        "المهارات التقنية",
                        language,
                    )),
                )
                .child(El::new("div").id(ids::TECHNICAL_SKILLS).class("skills-list"))
                .child(
                    El::new("h3").child(bilingual_label(
                        "Soft Skills",
                        "المهارات الشخصية",
                        language,
                    )),
                )
                .child(El::new("div").id(ids::SOFT_SKILLS).class("skills-list")),
        )
        .child(
            El::new("section")
                .class("languages-section")
                .child(section_title("Languages", "اللغات", language))
                .child(El::new("div").id(ids::LANGUAGES_LIST)),
        )
        .child(
            El::new("section")
                .class("qr-section")
                .child(El::new("div").id(ids::QR_CODE).class("qr-code")),
        )
}

fn main_column(language: Language) -> El {
    let section = |class: &str, en: &str, ar: &str, target: &str| {
        El::new("section")
            .class(class)
            .child(section_title(en, ar, language))
            .child(El::new("div").id(target))
    };

    El::new("main")
        .class("main-content")
        .child(
            El::new("section")
                .class("summary-section")
                .child(section_title("Professional Summary", "الملخص المهني", language))
                .child(El::new("p").id(ids::SUMMARY)),
        )
        .child(section(
            "experience-section collapsible",
            "Experience",
            "الخبرة العملية",
            ids::EXPERIENCE_LIST,
        ))
        .child(section(
            "education-section collapsible",
            "Education",
            "التعليم",
            ids::EDUCATION_LIST,
        ))
        .child(section(
            "projects-section collapsible",
            "Projects",
            "المشاريع",
            ids::PROJECTS_LIST,
        ))
        .child(
            El::new("section")
                .class("interests-section")
                .child(section_title("Interests", "الاهتمامات", language))
                .child(El::new("div").id(ids::INTERESTS_LIST).class("interests")),
        )
        .child(El::new("footer").class("page-footer").child(icon("fas fa-file-alt")))
}

/// Full-page error shown when the application cannot start.
pub fn startup_failure_page(message: &str) -> Document {
    let mut doc = Document::new();
    let head = doc.head();
    doc.append_tree(head, El::new("meta").attr("charset", "utf-8"));
    doc.append_tree(head, El::new("style").raw(PAGE_STYLESHEET));
    doc.set_title("Error");
    doc.append_tree(
        doc.body(),
        El::new("div").class("error-message").child(
            El::new("div")
                .class("error-content")
                .child(icon("fas fa-exclamation-triangle"))
                .child(El::new("h3").text("Error"))
                .child(El::new("p").text(message))
                .child(
                    El::new("button")
                        .class("btn-control btn-primary")
                        .attr("onclick", "location.reload()")
                        .child(icon("fas fa-refresh"))
                        .text("Reload Page"),
                ),
        ),
    );
    doc
}

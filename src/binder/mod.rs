//! Renders content sections into their named insertion points.
//!
//! Every renderer replaces the target's children, so rendering is idempotent
//! and may be repeated after any language change. Missing targets and absent
//! sections are skipped.

use crate::content::{
    Education, Experience, LanguageSkill, LocalizedDocument, PersonalInfo, Project, Section,
    SectionData, Settings, Skills,
};
use crate::dom::{Document, El};
use crate::locale::Language;
use crate::ui::{icon, ids};

pub struct PresentationBinder;

impl PresentationBinder {
    pub fn render_all(doc: &mut Document, content: &LocalizedDocument, language: Language) {
        for section in Section::ALL {
            Self::render_section(doc, content, section, language);
        }
        tracing::debug!(%language, "content rendered");
    }

    pub fn render_section(
        doc: &mut Document,
        content: &LocalizedDocument,
        section: Section,
        language: Language,
    ) {
        let Some(data) = content.section_for(section, language) else {
            tracing::debug!(section = section.name(), "section absent; skipping");
            return;
        };
        match data {
            SectionData::PersonalInfo(info) => render_personal_info(doc, info),
            SectionData::Experience(items) => render_list(doc, ids::EXPERIENCE_LIST, items, experience_item),
            SectionData::Education(items) => render_list(doc, ids::EDUCATION_LIST, items, education_item),
            SectionData::Skills(skills) => render_skills(doc, skills),
            SectionData::Projects(items) => {
                render_list(doc, ids::PROJECTS_LIST, items, |project| project_item(project, language))
            }
            SectionData::Languages(items) => render_list(doc, ids::LANGUAGES_LIST, items, language_item),
            SectionData::Interests(items) => render_list(doc, ids::INTERESTS_LIST, items, |interest| {
                El::new("span").class("interest-item").text(interest.as_str())
            }),
            SectionData::Settings(settings) => render_profile_image(doc, settings),
        }
    }

    /// Points the profile picture at `src`, e.g. the placeholder after a failed load.
    pub fn set_profile_image(doc: &mut Document, src: &str) {
        if let Some(image) = doc.by_id(ids::PROFILE_IMAGE) {
            doc.set_attr(image, "src", src);
        }
    }
}

fn set_text(doc: &mut Document, id: &str, text: &str) {
    if let Some(node) = doc.by_id(id) {
        doc.set_text(node, text);
    }
}

fn replace_children(doc: &mut Document, id: &str, children: Vec<El>) {
    let Some(target) = doc.by_id(id) else {
        return;
    };
    doc.clear_children(target);
    for child in children {
        doc.append_tree(target, child);
    }
}

fn render_list<T>(doc: &mut Document, id: &str, items: &[T], item: impl Fn(&T) -> El) {
    replace_children(doc, id, items.iter().map(item).collect());
}

fn render_personal_info(doc: &mut Document, info: &PersonalInfo) {
    set_text(doc, ids::PROFILE_NAME, &info.name);
    set_text(doc, ids::PROFILE_TITLE, &info.title);
    set_text(doc, ids::SUMMARY, &info.summary);
    replace_children(doc, ids::CONTACT_LIST, contact_items(info));
}

fn contact_items(info: &PersonalInfo) -> Vec<El> {
    let entries: [(&str, &str, Option<String>); 6] = [
        ("fas fa-envelope", info.email.as_str(), Some(format!("mailto:{}", info.email))),
        ("fas fa-phone", info.phone.as_str(), Some(format!("tel:{}", info.phone))),
        ("fas fa-map-marker-alt", info.location.as_str(), None),
        ("fas fa-globe", info.website.as_str(), Some(info.website.clone())),
        ("fab fa-linkedin", "LinkedIn", Some(info.linkedin.clone())),
        ("fab fa-github", "GitHub", Some(info.github.clone())),
    ];

    entries
        .into_iter()
        .filter(|(_, value, _)| !value.is_empty())
        .map(|(icon_classes, value, link)| {
            let body = match link.filter(|href| !href.is_empty()) {
                Some(href) => El::new("a")
                    .attr("href", href)
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer")
                    .text(value),
                None => El::new("span").text(value),
            };
            El::new("div")
                .class("contact-item")
                .child(icon(icon_classes))
                .child(body)
        })
        .collect()
}

fn render_skills(doc: &mut Document, skills: &Skills) {
    let chip = |skill: &String| El::new("div").class("skill-item").text(skill.as_str());
    render_list(doc, ids::TECHNICAL_SKILLS, &skills.technical, chip);
    render_list(doc, ids::SOFT_SKILLS, &skills.soft, chip);
}

fn meta_entry(icon_classes: &str, text: &str) -> El {
    El::new("span").child(icon(icon_classes)).text(format!(" {text}"))
}

fn experience_item(item: &Experience) -> El {
    El::new("div")
        .class("experience-item")
        .child(
            El::new("div")
                .class("experience-header")
                .child(El::new("h3").class("experience-title").text(item.title.as_str()))
                .child(El::new("div").class("experience-company").text(item.company.as_str()))
                .child(
                    El::new("div")
                        .class("experience-meta")
                        .child(meta_entry("fas fa-calendar", &item.duration))
                        .child(meta_entry("fas fa-map-marker-alt", &item.location)),
                ),
        )
        .child(
            El::new("ul")
                .class("experience-description")
                .children(item.description.iter().map(|line| El::new("li").text(line.as_str()))),
        )
}

fn education_item(item: &Education) -> El {
    let gpa = item.gpa.as_deref().filter(|gpa| !gpa.is_empty());
    let description = item.description.as_deref().filter(|text| !text.is_empty());
    El::new("div")
        .class("education-item")
        .child(El::new("h3").class("education-degree").text(item.degree.as_str()))
        .child(El::new("div").class("education-institution").text(item.institution.as_str()))
        .child(
            El::new("div")
                .class("education-meta")
                .child(meta_entry("fas fa-calendar", &item.duration))
                .child(meta_entry("fas fa-map-marker-alt", &item.location))
                .child_if(gpa.is_some(), || {
                    meta_entry("fas fa-star", &format!("GPA: {}", gpa.unwrap_or_default()))
                }),
        )
        .child_if(description.is_some(), || {
            El::new("p")
                .class("education-description")
                .text(description.unwrap_or_default())
        })
}

fn project_item(project: &Project, language: Language) -> El {
    let link = project.link.as_deref().filter(|link| !link.is_empty());
    El::new("div")
        .class("project-item")
        .child(El::new("h3").class("project-name").text(project.name.as_str()))
        .child(El::new("p").class("project-description").text(project.description.as_str()))
        .child(
            El::new("div").class("project-technologies").children(
                project
                    .technologies
                    .iter()
                    .map(|tech| El::new("span").class("tech-tag").text(tech.as_str())),
            ),
        )
        .child_if(link.is_some(), || {
            El::new("a")
                .class("project-link")
                .attr("href", link.unwrap_or_default())
                .attr("target", "_blank")
                .attr("rel", "noopener noreferrer")
                .child(icon("fas fa-external-link-alt"))
                .child(El::new("span").bilingual(
                    "View Project",
                    "عرض المشروع",
                    language.pick("View Project", "عرض المشروع"),
                ))
        })
}

fn language_item(item: &LanguageSkill) -> El {
    El::new("div")
        .class("language-item")
        .child(El::new("span").class("language-name").text(item.language.as_str()))
        .child(El::new("span").class("language-level").text(item.level.as_str()))
}

fn render_profile_image(doc: &mut Document, settings: &Settings) {
    let image = &settings.profile_image;
    if !image.enabled || image.url.is_empty() {
        return;
    }
    PresentationBinder::set_profile_image(doc, &image.url);
}

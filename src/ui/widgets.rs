use crate::dom::El;
use crate::locale::Language;

pub fn icon(classes: &str) -> El {
    El::new("i").class(classes)
}

pub fn icon_button(id: &str, icon_classes: &str, tooltip: &str, extra_classes: &[&str]) -> El {
    let mut button = El::new("button")
        .id(id)
        .class("btn-control")
        .attr("type", "button")
        .attr("title", tooltip)
        .attr("aria-label", tooltip)
        .child(icon(icon_classes));
    for css_class in extra_classes {
        button = button.class(css_class);
    }
    button
}

/// `<span>` carrying both language variants, showing the one for `language`.
pub fn bilingual_label(en: &str, ar: &str, language: Language) -> El {
    El::new("span").bilingual(en, ar, language.pick(en, ar))
}

pub fn section_title(en: &str, ar: &str, language: Language) -> El {
    El::new("h2")
        .class("section-title")
        .bilingual(en, ar, language.pick(en, ar))
}

use chrono::NaiveDate;

use crate::dom::Document;
use crate::locale::Language;
use crate::ui::ids;

const FALLBACK_NAME: &str = "CV";

fn is_kept(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ('\u{0600}'..='\u{06FF}').contains(&ch)
}

/// Replaces every character outside ASCII alphanumerics and the Arabic block with `_`.
pub fn sanitize_display_name(name: &str) -> String {
    name.chars()
        .map(|ch| if is_kept(ch) { ch } else { '_' })
        .collect()
}

/// Trimmed text of the rendered profile name, or `CV` when the element is
/// absent. A blank name stays empty.
pub fn display_name(document: &Document) -> String {
    document
        .by_id(ids::PROFILE_NAME)
        .map(|node| document.text_content(node).trim().to_string())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

pub fn artifact_file_name(
    display_name: &str,
    language: Language,
    date: NaiveDate,
    extension: &str,
) -> String {
    format!(
        "{}_CV_{}_{}.{extension}",
        sanitize_display_name(display_name),
        language.code(),
        date.format("%Y-%m-%d"),
    )
}

//! What the operating environment reports about the user: preferred language
//! and color scheme.

const LOCALE_VARIABLES: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];
const COLOR_SCHEME_VARIABLE: &str = "CVPAGE_COLOR_SCHEME";
const GTK_THEME_VARIABLE: &str = "GTK_THEME";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    /// BCP 47-style tag such as `ar-SA`.
    pub language: Option<String>,
    pub prefers_dark: Option<bool>,
}

impl EnvironmentSnapshot {
    pub fn detect() -> Self {
        Self::detect_with(|name| std::env::var(name).ok())
    }

    pub fn detect_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let language = LOCALE_VARIABLES
            .iter()
            .filter_map(|name| lookup(*name))
            .find_map(|raw| normalize_locale_tag(&raw));

        let prefers_dark = lookup(COLOR_SCHEME_VARIABLE)
            .and_then(|raw| color_scheme_from_value(&raw))
            .or_else(|| lookup(GTK_THEME_VARIABLE).and_then(|raw| prefers_dark_from_theme_name(&raw)));

        Self {
            language,
            prefers_dark,
        }
    }
}

/// `ar_SA.UTF-8@euro` → `ar-SA`; `C`/`POSIX`/empty → `None`.
pub fn normalize_locale_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let without_modifier = trimmed.split('@').next().unwrap_or_default();
    let without_encoding = without_modifier.split('.').next().unwrap_or_default();
    if without_encoding.is_empty() || matches!(without_encoding, "C" | "POSIX") {
        return None;
    }
    Some(without_encoding.replace('_', "-"))
}

fn color_scheme_from_value(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "dark" | "prefer-dark" => Some(true),
        "light" | "prefer-light" | "default" => Some(false),
        _ => None,
    }
}

fn prefers_dark_from_theme_name(theme_name: &str) -> Option<bool> {
    let normalized = theme_name.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return None;
    }
    if normalized.contains("dark") {
        return Some(true);
    }
    if normalized.contains("light") {
        return Some(false);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn locale_tag_normalization() {
        assert_eq!(normalize_locale_tag("ar_SA.UTF-8").as_deref(), Some("ar-SA"));
        assert_eq!(normalize_locale_tag("en_US.UTF-8@euro").as_deref(), Some("en-US"));
        assert_eq!(normalize_locale_tag("C"), None);
        assert_eq!(normalize_locale_tag(""), None);
    }

    #[test]
    fn lc_all_wins_over_lang() {
        let snapshot = EnvironmentSnapshot::detect_with(lookup_from(&[
            ("LC_ALL", "ar_EG.UTF-8"),
            ("LANG", "en_US.UTF-8"),
        ]));
        assert_eq!(snapshot.language.as_deref(), Some("ar-EG"));
    }

    #[test]
    fn explicit_color_scheme_beats_gtk_theme_name() {
        let snapshot = EnvironmentSnapshot::detect_with(lookup_from(&[
            ("CVPAGE_COLOR_SCHEME", "light"),
            ("GTK_THEME", "Adwaita:dark"),
        ]));
        assert_eq!(snapshot.prefers_dark, Some(false));

        let snapshot =
            EnvironmentSnapshot::detect_with(lookup_from(&[("GTK_THEME", "Adwaita:dark")]));
        assert_eq!(snapshot.prefers_dark, Some(true));
    }

    #[test]
    fn unknown_theme_name_reports_nothing() {
        let snapshot = EnvironmentSnapshot::detect_with(lookup_from(&[("GTK_THEME", "Breeze")]));
        assert_eq!(snapshot.prefers_dark, None);
        assert_eq!(snapshot.language, None);
    }
}

//! QR code for the contact link, re-rendered when the presentation changes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use qrcode::render::svg;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use thiserror::Error;

use crate::dom::SharedDocument;
use crate::theme::ThemeMode;
use crate::ui::{ids, LAYOUT_TOKENS};

const UNAVAILABLE: &str = "<p>QR Code unavailable</p>";

#[derive(Debug, Error)]
pub enum CodeError {
    #[error("nothing to encode")]
    Empty,
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] QrError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeColors {
    pub dark: &'static str,
    pub light: &'static str,
}

impl CodeColors {
    pub const fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                dark: "#000000",
                light: "#ffffff",
            },
            ThemeMode::Dark => Self {
                dark: "#ffffff",
                light: "#000000",
            },
        }
    }
}

/// Renders `text` as SVG markup exactly `size` pixels square.
pub trait CodeRenderer {
    fn render(&self, text: &str, colors: CodeColors, size: u32) -> Result<String, CodeError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QrSvgRenderer;

impl CodeRenderer for QrSvgRenderer {
    fn render(&self, text: &str, colors: CodeColors, size: u32) -> Result<String, CodeError> {
        if text.is_empty() {
            return Err(CodeError::Empty);
        }
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M)?;
        let markup = code
            .render::<svg::Color>()
            .module_dimensions(1, 1)
            .dark_color(svg::Color(colors.dark))
            .light_color(svg::Color(colors.light))
            .build();
        Ok(fit_to_size(&markup, size))
    }
}

/// Pins the root `<svg>` element to `size` x `size`, scaling the drawing
/// through its view box. The XML declaration is dropped for inline use.
fn fit_to_size(markup: &str, size: u32) -> String {
    let Some(start) = markup.find("<svg") else {
        return markup.to_string();
    };
    let Some(end) = markup[start..].find('>').map(|offset| start + offset) else {
        return markup.to_string();
    };
    let mut tag = markup[start..end].to_string();
    let width = replace_attribute(&mut tag, "width", size);
    let height = replace_attribute(&mut tag, "height", size);
    if !tag.contains("viewBox=") {
        if let (Some(width), Some(height)) = (width, height) {
            tag.push_str(&format!(r#" viewBox="0 0 {width} {height}""#));
        }
    }
    format!("{tag}{}", &markup[end..])
}

/// Sets `name` on a start tag, returning the previous value.
fn replace_attribute(tag: &mut String, name: &str, value: u32) -> Option<String> {
    let needle = format!(" {name}=\"");
    let Some(position) = tag.find(&needle) else {
        tag.push_str(&format!(r#" {name}="{value}""#));
        return None;
    };
    let value_start = position + needle.len();
    let value_end = value_start + tag[value_start..].find('"')?;
    let previous = tag[value_start..value_end].to_string();
    tag.replace_range(value_start..value_end, &value.to_string());
    Some(previous)
}

pub struct CodeGenerator {
    document: SharedDocument,
    renderer: Rc<dyn CodeRenderer>,
    colors: Cell<CodeColors>,
    url: RefCell<Option<String>>,
}

impl CodeGenerator {
    pub fn new(document: SharedDocument, renderer: Rc<dyn CodeRenderer>, mode: ThemeMode) -> Self {
        Self {
            document,
            renderer,
            colors: Cell::new(CodeColors::for_mode(mode)),
            url: RefCell::new(None),
        }
    }

    /// Renders `url` into the code container; a missing container is not an error.
    pub fn generate(&self, url: &str) {
        let mut doc = self.document.borrow_mut();
        let Some(container) = doc.by_id(ids::QR_CODE) else {
            tracing::debug!("no QR code container; skipping");
            return;
        };
        doc.clear_children(container);

        let size = LAYOUT_TOKENS.qr_code_size;
        match self.renderer.render(url, self.colors.get(), size) {
            Ok(markup) => doc.set_raw(container, markup),
            Err(err) => {
                tracing::error!(%err, "failed to generate QR code");
                doc.set_raw(container, UNAVAILABLE);
            }
        }
        *self.url.borrow_mut() = Some(url.to_string());
    }

    /// Switches module colors for `mode` and re-renders the retained URL.
    pub fn update_colors(&self, mode: ThemeMode) {
        self.colors.set(CodeColors::for_mode(mode));
        let url = self.url.borrow().clone();
        if let Some(url) = url {
            self.generate(&url);
        }
    }

    pub fn url(&self) -> Option<String> {
        self.url.borrow().clone()
    }

    pub fn colors(&self) -> CodeColors {
        self.colors.get()
    }
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeGenerator")
            .field("colors", &self.colors.get())
            .field("url", &self.url.borrow())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::html::outer_html;
    use crate::dom::Document;
    use crate::ui::build_page;

    struct FailingRenderer;

    impl CodeRenderer for FailingRenderer {
        fn render(&self, _: &str, _: CodeColors, _: u32) -> Result<String, CodeError> {
            Err(CodeError::Empty)
        }
    }

    fn container_html(document: &SharedDocument) -> String {
        let doc = document.borrow();
        outer_html(&doc, doc.by_id(ids::QR_CODE).unwrap())
    }

    #[test]
    fn svg_renderer_uses_requested_colors() {
        let svg = QrSvgRenderer
            .render(
                "https://example.com",
                CodeColors::for_mode(ThemeMode::Dark),
                120,
            )
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#" width="120" height="120""#));
        assert!(svg.contains("viewBox="));
        assert!(svg.contains("#ffffff"));
        assert!(svg.contains("#000000"));
    }

    #[test]
    fn long_urls_keep_the_same_display_size() {
        let long = format!("https://example.com/cv?{}", "section=experience&".repeat(12));
        for url in ["https://a.io", long.as_str()] {
            let svg = QrSvgRenderer
                .render(url, CodeColors::for_mode(ThemeMode::Light), 120)
                .unwrap();
            assert!(svg.contains(r#" width="120" height="120""#), "{url}");
        }
    }

    #[test]
    fn fitting_adds_a_view_box_when_missing() {
        let fitted = fit_to_size(r#"<svg width="33" height="33"><path/></svg>"#, 120);
        assert_eq!(
            fitted,
            r#"<svg width="120" height="120" viewBox="0 0 33 33"><path/></svg>"#
        );
    }

    #[test]
    fn generate_renders_into_container_and_retains_url() {
        let document = build_page().shared();
        let generator = CodeGenerator::new(Rc::clone(&document), Rc::new(QrSvgRenderer), ThemeMode::Light);
        generator.generate("https://example.com/cv");

        assert!(container_html(&document).contains("<svg"));
        assert_eq!(generator.url().as_deref(), Some("https://example.com/cv"));
    }

    #[test]
    fn renderer_failure_shows_placeholder() {
        let document = build_page().shared();
        let generator = CodeGenerator::new(Rc::clone(&document), Rc::new(FailingRenderer), ThemeMode::Light);
        generator.generate("https://example.com/cv");
        assert!(container_html(&document).contains(UNAVAILABLE));
    }

    #[test]
    fn update_colors_regenerates_from_retained_url() {
        let document = build_page().shared();
        let generator = CodeGenerator::new(Rc::clone(&document), Rc::new(QrSvgRenderer), ThemeMode::Light);
        generator.generate("https://example.com/cv");
        let light = container_html(&document);

        generator.update_colors(ThemeMode::Dark);

        assert_eq!(generator.colors(), CodeColors::for_mode(ThemeMode::Dark));
        let dark = container_html(&document);
        assert!(dark.contains("<svg"));
        assert_ne!(light, dark);
    }

    #[test]
    fn update_colors_without_url_only_switches_palette() {
        let document = build_page().shared();
        let generator = CodeGenerator::new(Rc::clone(&document), Rc::new(QrSvgRenderer), ThemeMode::Light);
        generator.update_colors(ThemeMode::Dark);
        assert!(!container_html(&document).contains("<svg"));
        assert_eq!(generator.url(), None);
    }

    #[test]
    fn missing_container_is_ignored() {
        let document = Document::new().shared();
        let generator = CodeGenerator::new(document, Rc::new(QrSvgRenderer), ThemeMode::Light);
        generator.generate("https://example.com/cv");
        assert_eq!(generator.url(), None);
    }
}

use super::{Document, Element, NodeId, NodeKind};

const VOID_ELEMENTS: &[&str] = &["area", "br", "hr", "img", "input", "link", "meta", "source"];

pub fn render_document(document: &Document) -> String {
    let mut out = String::from("<!DOCTYPE html>\n");
    render_node(document, document.root(), &mut out);
    out.push('\n');
    out
}

pub fn outer_html(document: &Document, node: NodeId) -> String {
    let mut out = String::new();
    render_node(document, node, &mut out);
    out
}

/// Renders `content` as a self-contained page that keeps the document head
/// and the `<html>`/`<body>` attributes, so styling and direction survive.
pub fn standalone_page(document: &Document, content: NodeId) -> String {
    let mut out = String::from("<!DOCTYPE html>\n");
    let root = document.element(document.root());
    let body = document.element(document.body());

    open_tag(root, "html", &mut out);
    render_node(document, document.head(), &mut out);
    open_tag(body, "body", &mut out);
    render_node(document, content, &mut out);
    out.push_str("</body></html>\n");
    out
}

fn open_tag(element: Option<&Element>, fallback: &str, out: &mut String) {
    match element {
        Some(element) => write_start_tag(element, out),
        None => {
            out.push('<');
            out.push_str(fallback);
            out.push('>');
        }
    }
}

fn render_node(document: &Document, node: NodeId, out: &mut String) {
    match document.kind(node) {
        NodeKind::Text(text) => out.push_str(&escape_text(text)),
        NodeKind::Raw(markup) => out.push_str(markup),
        NodeKind::Element(element) => {
            write_start_tag(element, out);
            if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                return;
            }
            for child in document.children(node) {
                render_node(document, *child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn write_start_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    if let Some(id) = element.attributes.get("id") {
        push_attribute(out, "id", id);
    }
    if !element.classes.is_empty() {
        push_attribute(out, "class", &element.classes.join(" "));
    }
    for (name, value) in element.attributes.iter().filter(|(name, _)| *name != "id") {
        push_attribute(out, name, value);
    }
    if !element.styles.is_empty() {
        let style = element
            .styles
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");
        push_attribute(out, "style", &style);
    }
    out.push('>');
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

//! In-memory document tree the page is rendered into.
//!
//! Nodes live in an arena and are addressed by generational [`NodeId`]s.
//! Subtrees dropped by `remove`, `clear_children`, `set_text` or `set_raw` are
//! freed and their slots reused; ids that pointed into them go stale and every
//! accessor treats a stale id as a detached, empty node.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

mod builder;
pub mod html;

pub use builder::{Child, El};

pub type SharedDocument = Rc<RefCell<Document>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub styles: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    /// Pre-rendered markup emitted verbatim (stylesheets, inline SVG).
    Raw(String),
}

static FREED: NodeKind = NodeKind::Text(String::new());

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<usize>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let placeholder = NodeId {
            index: 0,
            generation: 0,
        };
        let mut document = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: placeholder,
            head: placeholder,
            body: placeholder,
        };
        let root = document.create_element("html");
        let head = document.create_element("head");
        let body = document.create_element("body");
        document.append(root, head);
        document.append(root, body);
        document.root = root;
        document.head = head;
        document.body = body;
        document
    }

    pub fn shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub const fn head(&self) -> NodeId {
        self.head
    }

    pub const fn body(&self) -> NodeId {
        self.body
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Text(text.into()))
    }

    fn create(&mut self, kind: NodeKind) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.nodes[index];
            slot.kind = kind;
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.nodes.len();
        self.nodes.push(Node {
            kind,
            generation: 0,
            parent: None,
            children: Vec::new(),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    fn slot(&self, node: NodeId) -> Option<&Node> {
        self.nodes
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
    }

    fn slot_mut(&mut self, node: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
    }

    /// Slots in the arena, live or free.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes currently allocated, attached or not.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.slot(node).is_some()
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        self.slot(node).map_or(&FREED, |slot| &slot.kind)
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(slot) = self.slot_mut(child) {
            slot.parent = Some(parent);
        }
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(child);
        }
    }

    /// Builds `spec` and appends it under `parent`, returning the new element.
    pub fn append_tree(&mut self, parent: NodeId, spec: El) -> NodeId {
        let node = self.build(spec);
        self.append(parent, node);
        node
    }

    fn build(&mut self, spec: El) -> NodeId {
        let El {
            tag,
            classes,
            attributes,
            children,
        } = spec;
        let node = self.create(NodeKind::Element(Element {
            tag,
            attributes: attributes.into_iter().collect(),
            classes,
            styles: Vec::new(),
        }));
        for child in children {
            let child_node = match child {
                Child::Element(el) => self.build(el),
                Child::Text(text) => self.create(NodeKind::Text(text)),
                Child::Raw(markup) => self.create(NodeKind::Raw(markup)),
            };
            self.append(node, child_node);
        }
        node
    }

    /// Detaches `node` and frees it together with everything below it.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
        self.free_subtree(node);
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.slot_mut(node).and_then(|slot| slot.parent.take()) else {
            return;
        };
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.retain(|child| *child != node);
        }
    }

    pub fn clear_children(&mut self, node: NodeId) {
        let children = match self.slot_mut(node) {
            Some(slot) => std::mem::take(&mut slot.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    fn free_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slot_mut(current) else {
                continue;
            };
            stack.append(&mut slot.children);
            slot.parent = None;
            slot.kind = NodeKind::Text(String::new());
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
        }
    }

    /// Replaces all children of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        self.clear_children(node);
        let text_node = self.create_text(text);
        self.append(node, text_node);
    }

    pub fn set_raw(&mut self, node: NodeId, markup: impl Into<String>) {
        self.clear_children(node);
        let raw = self.create(NodeKind::Raw(markup.into()));
        self.append(node, raw);
    }

    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match self.kind(node) {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Raw(_) => {}
            NodeKind::Element(_) => {
                for child in self.children(node) {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.slot(node).map_or(&[], |slot| slot.children.as_slice())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).and_then(|slot| slot.parent)
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match self.slot(node).map(|slot| &slot.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match self.slot_mut(node).map(|slot| &mut slot.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|element| element.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|element| element.attributes.get(name))
            .map(String::as_str)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.element_mut(node) {
            element.attributes.insert(name.to_string(), value.into());
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Option<String> {
        self.element_mut(node)
            .and_then(|element| element.attributes.remove(name))
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|element| element.classes.iter().any(|c| c == class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    pub fn set_classes(&mut self, node: NodeId, classes: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes = classes.split_whitespace().map(str::to_string).collect();
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node).and_then(|element| {
            element
                .styles
                .iter()
                .find(|(name, _)| name == property)
                .map(|(_, value)| value.as_str())
        })
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(element) = self.element_mut(node) {
            match element.styles.iter_mut().find(|(name, _)| name == property) {
                Some(entry) => entry.1 = value,
                None => element.styles.push((property.to_string(), value)),
            }
        }
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) -> Option<String> {
        let element = self.element_mut(node)?;
        let index = element.styles.iter().position(|(name, _)| name == property)?;
        Some(element.styles.remove(index).1)
    }

    /// Whether the element itself carries an inline `display: none`.
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.style(node, "display") == Some("none")
    }

    /// Pre-order walk of `node` and everything attached below it.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let Some(slot) = self.slot(current) else {
                continue;
            };
            out.push(current);
            stack.extend(slot.children.iter().rev().copied());
        }
        out
    }

    pub fn find_all(&self, scope: NodeId, predicate: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|node| self.element(*node).is_some_and(&predicate))
            .collect()
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root).into_iter().find(|node| {
            self.element(*node)
                .and_then(|element| element.attributes.get("id"))
                .is_some_and(|value| value == id)
        })
    }

    pub fn by_class(&self, class: &str) -> Vec<NodeId> {
        self.find_all(self.root, |element| element.classes.iter().any(|c| c == class))
    }

    pub fn by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.find_all(scope, |element| element.tag == tag)
    }

    /// Elements carrying every attribute in `names`.
    pub fn with_attributes(&self, names: &[&str]) -> Vec<NodeId> {
        self.find_all(self.root, |element| {
            names
                .iter()
                .all(|name| element.attributes.contains_key(*name))
        })
    }

    /// Returns the `<meta name=...>` element in the head, creating it if absent.
    pub fn ensure_meta(&mut self, name: &str) -> NodeId {
        let existing = self
            .find_all(self.head, |element| {
                element.tag == "meta" && element.attributes.get("name").is_some_and(|n| n == name)
            })
            .first()
            .copied();
        if let Some(meta) = existing {
            return meta;
        }
        let meta = self.create_element("meta");
        self.set_attr(meta, "name", name);
        self.append(self.head, meta);
        meta
    }

    pub fn set_title(&mut self, title: &str) {
        let head = self.head;
        let node = match self.by_tag(head, "title").first().copied() {
            Some(node) => node,
            None => {
                let node = self.create_element("title");
                self.append(head, node);
                node
            }
        };
        self.set_text(node, title);
    }

    pub fn title(&self) -> Option<String> {
        self.by_tag(self.head, "title")
            .first()
            .map(|node| self.text_content(*node))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

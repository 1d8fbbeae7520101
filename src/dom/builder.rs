/// Declarative element description appended with [`super::Document::append_tree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct El {
    pub(super) tag: String,
    pub(super) classes: Vec<String>,
    pub(super) attributes: Vec<(String, String)>,
    pub(super) children: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Element(El),
    Text(String),
    Raw(String),
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Adds one or more whitespace-separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(text.into()));
        self
    }

    pub fn raw(mut self, markup: impl Into<String>) -> Self {
        self.children.push(Child::Raw(markup.into()));
        self
    }

    pub fn child(mut self, child: El) -> Self {
        self.children.push(Child::Element(child));
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = El>) -> Self {
        self.children
            .extend(children.into_iter().map(Child::Element));
        self
    }

    pub fn child_if(self, condition: bool, child: impl FnOnce() -> El) -> Self {
        if condition {
            self.child(child())
        } else {
            self
        }
    }

    /// Dual-language text: both variants as `data-en`/`data-ar`, `shown` as content.
    pub fn bilingual(self, en: &str, ar: &str, shown: &str) -> Self {
        self.attr("data-en", en).attr("data-ar", ar).text(shown)
    }
}

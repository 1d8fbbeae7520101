use std::cell::Cell;
use std::rc::Rc;

use crate::dom::{NodeId, SharedDocument};
use crate::theme::ThemeMode;
use crate::ui::NO_PRINT_CLASS;

/// Scoped document mutation for one export or print.
///
/// While alive it holds the in-progress flag, keeps chrome hidden and may
/// force the light presentation. Dropping it restores every change,
/// whether the export completed, failed, panicked or was cancelled.
pub struct ExportSession {
    document: SharedDocument,
    in_progress: Rc<Cell<bool>>,
    hidden: Vec<(NodeId, Option<String>)>,
    prior_theme: Option<Option<String>>,
}

impl ExportSession {
    /// Returns `None` when another session is already active.
    pub fn begin(document: SharedDocument, in_progress: Rc<Cell<bool>>) -> Option<Self> {
        if in_progress.replace(true) {
            return None;
        }

        let hidden = {
            let mut doc = document.borrow_mut();
            doc.by_class(NO_PRINT_CLASS)
                .into_iter()
                .map(|node| {
                    let prior = doc.style(node, "display").map(str::to_string);
                    doc.set_style(node, "display", "none");
                    (node, prior)
                })
                .collect()
        };

        Some(Self {
            document,
            in_progress,
            hidden,
            prior_theme: None,
        })
    }

    pub fn force_light_theme(&mut self) {
        let mut doc = self.document.borrow_mut();
        let body = doc.body();
        if self.prior_theme.is_none() {
            self.prior_theme = Some(doc.attr(body, "data-theme").map(str::to_string));
        }
        doc.set_attr(body, "data-theme", ThemeMode::Light.id());
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }
}

impl Drop for ExportSession {
    fn drop(&mut self) {
        self.in_progress.set(false);

        let Ok(mut doc) = self.document.try_borrow_mut() else {
            tracing::error!("document busy; export changes could not be restored");
            return;
        };
        for (node, prior) in self.hidden.drain(..) {
            match prior {
                Some(value) => doc.set_style(node, "display", value),
                None => {
                    doc.remove_style(node, "display");
                }
            }
        }
        if let Some(prior) = self.prior_theme.take() {
            let body = doc.body();
            match prior {
                Some(theme) => doc.set_attr(body, "data-theme", theme),
                None => {
                    doc.remove_attr(body, "data-theme");
                }
            }
        }
        tracing::debug!("export session restored");
    }
}

impl std::fmt::Debug for ExportSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportSession")
            .field("hidden", &self.hidden.len())
            .field("prior_theme", &self.prior_theme)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::El;
    use crate::ui::build_page;

    fn visible_nodes(document: &SharedDocument) -> Vec<NodeId> {
        let doc = document.borrow();
        doc.descendants(doc.root())
            .into_iter()
            .filter(|node| doc.element(*node).is_some() && !doc.is_hidden(*node))
            .collect()
    }

    #[test]
    fn only_one_session_at_a_time() {
        let document = build_page().shared();
        let flag = Rc::new(Cell::new(false));
        let first = ExportSession::begin(Rc::clone(&document), Rc::clone(&flag));
        assert!(first.is_some());
        assert!(ExportSession::begin(Rc::clone(&document), Rc::clone(&flag)).is_none());
        drop(first);
        assert!(!flag.get());
        assert!(ExportSession::begin(document, flag).is_some());
    }

    #[test]
    fn drop_restores_visibility_and_presentation() {
        let document = build_page().shared();
        {
            let mut doc = document.borrow_mut();
            let body = doc.body();
            doc.set_attr(body, "data-theme", "dark");
            let banner = doc.append_tree(body, El::new("div").class(NO_PRINT_CLASS));
            doc.set_style(banner, "display", "flex");
        }
        let before = visible_nodes(&document);

        let flag = Rc::new(Cell::new(false));
        let mut session = ExportSession::begin(Rc::clone(&document), Rc::clone(&flag)).unwrap();
        session.force_light_theme();
        assert_eq!(session.hidden_count(), 2);
        {
            let doc = document.borrow();
            assert!(doc.by_class(NO_PRINT_CLASS).iter().all(|n| doc.is_hidden(*n)));
            assert_eq!(doc.attr(doc.body(), "data-theme"), Some("light"));
        }
        drop(session);

        assert_eq!(visible_nodes(&document), before);
        let doc = document.borrow();
        assert_eq!(doc.attr(doc.body(), "data-theme"), Some("dark"));
        let banner = doc.by_class(NO_PRINT_CLASS)[1];
        assert_eq!(doc.style(banner, "display"), Some("flex"));
    }

    #[test]
    fn restores_even_when_the_scope_panics() {
        let document = build_page().shared();
        let flag = Rc::new(Cell::new(false));
        let doc_for_panic = Rc::clone(&document);
        let flag_for_panic = Rc::clone(&flag);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _session = ExportSession::begin(doc_for_panic, flag_for_panic).unwrap();
            panic!("rasterizer exploded");
        }));

        assert!(result.is_err());
        assert!(!flag.get());
        let doc = document.borrow();
        assert!(doc.by_class(NO_PRINT_CLASS).iter().all(|n| !doc.is_hidden(*n)));
    }
}

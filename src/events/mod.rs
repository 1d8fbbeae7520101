//! Typed, synchronous publish/subscribe channels.
//!
//! Each notification kind gets its own [`Channel`]. Delivery happens inline on
//! the publishing thread: every subscriber registered at the moment of
//! `publish` has run before `publish` returns.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::content::ContentOrigin;
use crate::locale::Language;
use crate::theme::{Accent, ThemeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber<T> {
    id: SubscriptionId,
    once: bool,
    handler: Rc<dyn Fn(&T)>,
}

pub struct Channel<T> {
    name: &'static str,
    subscribers: RefCell<Vec<Subscriber<T>>>,
    next_id: Cell<u64>,
}

impl<T> Channel<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> SubscriptionId {
        self.register(false, Rc::new(handler))
    }

    /// Registers a handler that is removed after its first delivery.
    pub fn subscribe_once(&self, handler: impl Fn(&T) + 'static) -> SubscriptionId {
        self.register(true, Rc::new(handler))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|subscriber| subscriber.id != id);
        before != subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Delivers `event` to every current subscriber and returns how many ran.
    pub fn publish(&self, event: &T) -> usize {
        // Snapshot first so handlers may subscribe or publish re-entrantly.
        let snapshot: Vec<Rc<dyn Fn(&T)>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            let handlers = subscribers
                .iter()
                .map(|subscriber| Rc::clone(&subscriber.handler))
                .collect();
            subscribers.retain(|subscriber| !subscriber.once);
            handlers
        };

        tracing::trace!(
            channel = self.name,
            subscribers = snapshot.len(),
            "publish notification"
        );
        for handler in &snapshot {
            handler(event);
        }
        snapshot.len()
    }

    fn register(&self, once: bool, handler: Rc<dyn Fn(&T)>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.subscribers.borrow_mut().push(Subscriber { id, once, handler });
        id
    }
}

impl<T> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageChanged {
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeChanged {
    pub mode: ThemeMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorThemeChanged {
    pub accent: Accent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLoaded {
    pub origin: ContentOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintLifecycle {
    Before,
    After,
}

/// Print notifications fired by the environment around a native print.
#[derive(Debug)]
pub struct PrintEvents {
    pub before: Channel<PrintLifecycle>,
    pub after: Channel<PrintLifecycle>,
}

impl PrintEvents {
    pub fn new() -> Self {
        Self {
            before: Channel::new("beforeprint"),
            after: Channel::new("afterprint"),
        }
    }
}

impl Default for PrintEvents {
    fn default() -> Self {
        Self::new()
    }
}

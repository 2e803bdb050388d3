//! Typed change notifications between shell components.

use crate::tab::TabId;
use std::fmt;
use std::sync::Arc;

/// A tab committed a new URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlChanged {
    pub tab: TabId,
    pub url: String,
}

/// The tab host switched its active tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveTabChanged {
    pub index: usize,
    pub tab: TabId,
    pub url: String,
}

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Ordered list of listeners for one event type.
///
/// Cloning shares the registered handlers, which is how a tab host hands the
/// same url listeners to every tab it creates.
pub struct Subscribers<E> {
    handlers: Vec<Handler<E>>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a listener. Listeners run in registration order.
    pub fn subscribe(&mut self, handler: impl Fn(&E) + Send + Sync + 'static) {
        self.handlers.push(Arc::new(handler));
    }

    /// Call every listener once with `event`.
    pub fn emit(&self, event: &E) {
        for handler in &self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Clone for Subscribers<E> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_emit_reaches_every_listener_once() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut subscribers = Subscribers::new();

        let first = seen.clone();
        subscribers.subscribe(move |event: &UrlChanged| {
            first.lock().push(format!("a:{}", event.url));
        });
        let second = seen.clone();
        subscribers.subscribe(move |event: &UrlChanged| {
            second.lock().push(format!("b:{}", event.url));
        });

        subscribers.emit(&UrlChanged {
            tab: TabId(1),
            url: "https://example.com".to_string(),
        });

        assert_eq!(
            *seen.lock(),
            vec!["a:https://example.com", "b:https://example.com"]
        );
    }

    #[test]
    fn test_clone_shares_handlers() {
        let count = Arc::new(Mutex::new(0));
        let mut subscribers = Subscribers::new();
        let counter = count.clone();
        subscribers.subscribe(move |_: &ActiveTabChanged| *counter.lock() += 1);

        let copy = subscribers.clone();
        let event = ActiveTabChanged {
            index: 0,
            tab: TabId(1),
            url: String::new(),
        };
        subscribers.emit(&event);
        copy.emit(&event);

        assert_eq!(copy.len(), 1);
        assert_eq!(*count.lock(), 2);
    }
}

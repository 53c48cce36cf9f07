//! Scoped window-listener subscriptions.
//!
//! Gestures need window-level move/up listeners so a drag keeps tracking
//! when the pointer leaves the tile, and the metadata panel needs a global
//! keydown listener while it is mounted. Both are modelled as a
//! [`Subscription`]: a set of attached listeners that is detached exactly
//! once, either explicitly or when the value is dropped.
//!
//! The registry behind it is a trait so the engine side can be tested
//! natively; `crate::web` implements it on the browser `window`.

#[cfg(test)]
#[path = "subscription_test.rs"]
mod subscription_test;

use std::rc::Rc;

use crate::engine::Action;

/// A window event the editor listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    PointerUp,
    KeyDown,
}

impl ListenerKind {
    /// DOM event name.
    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            Self::PointerMove => "mousemove",
            Self::PointerUp => "mouseup",
            Self::KeyDown => "keydown",
        }
    }
}

/// Opaque handle for one attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerToken(pub u64);

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("failed to attach {kind:?} listener: {reason}")]
    Attach { kind: ListenerKind, reason: String },
}

/// Something listeners can be attached to and detached from.
pub trait ListenerRegistry {
    /// Attach the handler for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying target rejects the listener.
    fn attach(&self, kind: ListenerKind) -> Result<ListenerToken, SubscriptionError>;

    /// Detach a previously attached listener. Unknown tokens are ignored.
    fn detach(&self, token: ListenerToken);
}

/// Listeners attached as a unit and detached together.
pub struct Subscription<R: ListenerRegistry + ?Sized> {
    registry: Rc<R>,
    tokens: Vec<ListenerToken>,
}

impl<R: ListenerRegistry + ?Sized> Subscription<R> {
    /// Attach every listener in `kinds`, or none of them.
    ///
    /// # Errors
    ///
    /// If any attach fails, the listeners attached so far are detached and
    /// the error is returned.
    pub fn new(registry: Rc<R>, kinds: &[ListenerKind]) -> Result<Self, SubscriptionError> {
        let mut sub = Self { registry, tokens: Vec::with_capacity(kinds.len()) };
        for kind in kinds {
            // On error `sub` drops here and detaches what was attached.
            let token = sub.registry.attach(*kind)?;
            sub.tokens.push(token);
        }
        Ok(sub)
    }

    /// Number of listeners currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Detach now instead of waiting for drop.
    pub fn unsubscribe(mut self) {
        self.detach_all();
    }

    fn detach_all(&mut self) {
        for token in self.tokens.drain(..) {
            self.registry.detach(token);
        }
    }
}

impl<R: ListenerRegistry + ?Sized> Drop for Subscription<R> {
    fn drop(&mut self) {
        self.detach_all();
    }
}

/// Keeps the window move/up subscription in step with engine actions.
pub struct GestureListeners<R: ListenerRegistry + ?Sized> {
    registry: Rc<R>,
    active: Option<Subscription<R>>,
}

impl<R: ListenerRegistry + ?Sized> GestureListeners<R> {
    #[must_use]
    pub fn new(registry: Rc<R>) -> Self {
        Self { registry, active: None }
    }

    /// Whether window listeners are currently attached.
    #[must_use]
    pub fn is_capturing(&self) -> bool {
        self.active.is_some()
    }

    /// Process `CaptureWindow` / `ReleaseWindow` in order. Other actions are
    /// ignored. A repeated capture keeps the existing subscription.
    ///
    /// # Errors
    ///
    /// Returns the attach error; no listeners are left half-attached.
    pub fn sync(&mut self, actions: &[Action]) -> Result<(), SubscriptionError> {
        for action in actions {
            match action {
                Action::CaptureWindow if self.active.is_none() => {
                    let sub = Subscription::new(
                        Rc::clone(&self.registry),
                        &[ListenerKind::PointerMove, ListenerKind::PointerUp],
                    )?;
                    self.active = Some(sub);
                }
                Action::ReleaseWindow => {
                    if let Some(sub) = self.active.take() {
                        sub.unsubscribe();
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Drop any window listeners. Used on unmount.
    pub fn release(&mut self) {
        if let Some(sub) = self.active.take() {
            sub.unsubscribe();
        }
    }
}

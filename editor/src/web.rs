//! Browser binding for window-level listeners.
//!
//! This module is the only place that touches `web_sys::Window`. The host
//! builds a [`WindowRegistry`] once per mounted editor with the closures that
//! feed the engine, then hands it to [`GestureListeners`] and to the panel's
//! keydown [`Subscription`].
//!
//! [`GestureListeners`]: crate::subscription::GestureListeners
//! [`Subscription`]: crate::subscription::Subscription

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{KeyboardEvent, MouseEvent, Window};

use crate::geom::Point;
use crate::input::Key;
use crate::subscription::{ListenerKind, ListenerRegistry, ListenerToken, SubscriptionError};

/// Owns the JS closures and attaches them to `window` on demand.
///
/// The closures live as long as the registry, so a listener can be attached
/// and detached any number of times.
pub struct WindowRegistry {
    window: Window,
    on_move: Closure<dyn FnMut(MouseEvent)>,
    on_up: Closure<dyn FnMut(MouseEvent)>,
    on_key: Closure<dyn FnMut(KeyboardEvent)>,
    attached: RefCell<HashMap<ListenerToken, ListenerKind>>,
    next_token: Cell<u64>,
}

impl WindowRegistry {
    /// Build a registry on the current `window`. Returns `None` outside a
    /// browser context.
    #[must_use]
    pub fn new(
        on_move: impl FnMut(Point) + 'static,
        on_up: impl FnMut() + 'static,
        on_key: impl FnMut(Key) + 'static,
    ) -> Option<Self> {
        let window = web_sys::window()?;
        let mut on_move = on_move;
        let mut on_up = on_up;
        let mut on_key = on_key;
        Some(Self {
            window,
            on_move: Closure::wrap(Box::new(move |e: MouseEvent| {
                on_move(Point::new(f64::from(e.client_x()), f64::from(e.client_y())));
            }) as Box<dyn FnMut(MouseEvent)>),
            on_up: Closure::wrap(Box::new(move |_e: MouseEvent| on_up()) as Box<dyn FnMut(MouseEvent)>),
            on_key: Closure::wrap(Box::new(move |e: KeyboardEvent| on_key(Key(e.key()))) as Box<dyn FnMut(KeyboardEvent)>),
            attached: RefCell::new(HashMap::new()),
            next_token: Cell::new(0),
        })
    }

    fn callback(&self, kind: ListenerKind) -> &js_sys::Function {
        match kind {
            ListenerKind::PointerMove => self.on_move.as_ref().unchecked_ref(),
            ListenerKind::PointerUp => self.on_up.as_ref().unchecked_ref(),
            ListenerKind::KeyDown => self.on_key.as_ref().unchecked_ref(),
        }
    }
}

impl ListenerRegistry for WindowRegistry {
    fn attach(&self, kind: ListenerKind) -> Result<ListenerToken, SubscriptionError> {
        self.window
            .add_event_listener_with_callback(kind.event_name(), self.callback(kind))
            .map_err(|e| SubscriptionError::Attach { kind, reason: format!("{e:?}") })?;
        let token = ListenerToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.attached.borrow_mut().insert(token, kind);
        Ok(token)
    }

    fn detach(&self, token: ListenerToken) {
        let Some(kind) = self.attached.borrow_mut().remove(&token) else {
            return;
        };
        if let Err(e) = self.window.remove_event_listener_with_callback(kind.event_name(), self.callback(kind)) {
            log::warn!("failed to detach {} listener: {e:?}", kind.event_name());
        }
    }
}

impl Drop for WindowRegistry {
    fn drop(&mut self) {
        let remaining: Vec<ListenerToken> = self.attached.borrow().keys().copied().collect();
        for token in remaining {
            self.detach(token);
        }
    }
}

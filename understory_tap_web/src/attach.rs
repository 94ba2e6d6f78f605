// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener installation and the [`FastTap`] handle.

use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use js_sys::Function;
use tracing::{debug, warn};
use understory_tap::{Response, TapConfig, TapPhase, TapState};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, HtmlElement, MouseEvent, TouchEvent};

use crate::AttachError;
use crate::host::{self, WebHost};

struct Shared {
    tap: TapState<Element>,
    host: WebHost,
}

type SharedRef = Rc<RefCell<Shared>>;

/// Run a handler against the shared state, then flush queued synthetic events
/// once the borrow is released.
fn handle(shared: &SharedRef, f: impl FnOnce(&mut Shared) -> Response) -> Option<Response> {
    let (response, pending, window) = {
        let Ok(mut state) = shared.try_borrow_mut() else {
            warn!("re-entrant tap event ignored");
            return None;
        };
        let response = f(&mut *state);
        let pending = state.host.take_pending();
        (response, pending, state.host.window().clone())
    };
    host::dispatch_pending(&window, pending);
    Some(response)
}

#[derive(Copy, Clone)]
enum TouchKind {
    Start,
    Move,
    End,
    Cancel,
}

impl TouchKind {
    fn event_type(self) -> &'static str {
        match self {
            Self::Start => "touchstart",
            Self::Move => "touchmove",
            Self::End => "touchend",
            Self::Cancel => "touchcancel",
        }
    }
}

fn touch_listener(root: &Element, shared: &SharedRef, kind: TouchKind) -> EventListener {
    let shared = Rc::clone(shared);
    let options = EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    };
    EventListener::new_with_options(root, kind.event_type(), options, move |event: &Event| {
        let Some(event) = event.dyn_ref::<TouchEvent>() else {
            return;
        };
        let response = match kind {
            TouchKind::Cancel => handle(&shared, |s| s.tap.on_touch_cancel()),
            TouchKind::Start => {
                let Some(input) = host::touch_input(event, &event.target_touches()) else {
                    return;
                };
                handle(&shared, |s| s.tap.on_touch_start(&mut s.host, &input))
            }
            TouchKind::Move => {
                let Some(input) = host::touch_input(event, &event.changed_touches()) else {
                    return;
                };
                handle(&shared, |s| s.tap.on_touch_move(&input))
            }
            TouchKind::End => {
                let Some(input) = host::touch_input(event, &event.changed_touches()) else {
                    return;
                };
                handle(&shared, |s| s.tap.on_touch_end(&mut s.host, &input))
            }
        };
        if let Some(response) = response {
            host::apply_response(event, response);
        }
    })
}

fn mouse_listener(root: &Element, shared: &SharedRef, event_type: &'static str) -> EventListener {
    let shared = Rc::clone(shared);
    let is_click = event_type == "click";
    let options = EventListenerOptions {
        phase: EventListenerPhase::Capture,
        passive: false,
    };
    EventListener::new_with_options(root, event_type, options, move |event: &Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let Some(input) = host::mouse_input(event) else {
            return;
        };
        let response = handle(&shared, |s| {
            if is_click {
                s.tap.on_click(&s.host, &input)
            } else {
                s.tap.on_mouse(&s.host, &input)
            }
        });
        if let Some(response) = response {
            host::apply_response(event, response);
        }
    })
}

/// Move a function assigned to `root.onclick` into a bubbling listener.
fn migrate_onclick(root: &Element) -> Option<EventListener> {
    let root = root.dyn_ref::<HtmlElement>()?;
    let handler: Function = root.onclick()?;
    root.set_onclick(None);
    let this: JsValue = root.clone().into();
    Some(EventListener::new(root, "click", move |event: &Event| {
        if let Err(err) = handler.call1(&this, event) {
            warn!(?err, "migrated onclick handler threw");
        }
    }))
}

/// Tap handling attached to one element subtree.
pub struct FastTap {
    shared: Option<SharedRef>,
    listeners: Vec<EventListener>,
}

impl fmt::Debug for FastTap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastTap")
            .field("active", &self.is_active())
            .field("phase", &self.phase())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl FastTap {
    /// Attach tap handling to `root` and everything below it.
    ///
    /// Returns an inert handle when the platform has no tap delay.
    pub fn attach(root: &Element, config: TapConfig) -> Result<Self, AttachError> {
        config.validate()?;
        let window = web_sys::window().ok_or(AttachError::NoWindow)?;
        let document = window.document().ok_or(AttachError::NoDocument)?;

        let environment = host::environment(&window, &document);
        if environment.shim_not_needed() {
            debug!(browser = ?environment.browser, "tap handling not needed");
            return Ok(Self {
                shared: None,
                listeners: Vec::new(),
            });
        }

        let policy = environment.policy();
        debug!(?policy, "attaching tap handling");
        let shared = Rc::new(RefCell::new(Shared {
            tap: TapState::new(config, policy),
            host: WebHost::new(window, document),
        }));

        let mut listeners = Vec::new();
        if policy.intercepts_mouse() {
            for event_type in ["mouseover", "mousedown", "mouseup"] {
                listeners.push(mouse_listener(root, &shared, event_type));
            }
        }
        listeners.push(mouse_listener(root, &shared, "click"));
        for kind in [
            TouchKind::Start,
            TouchKind::Move,
            TouchKind::End,
            TouchKind::Cancel,
        ] {
            listeners.push(touch_listener(root, &shared, kind));
        }
        listeners.extend(migrate_onclick(root));

        Ok(Self {
            shared: Some(shared),
            listeners,
        })
    }

    /// Returns `true` if listeners are installed.
    pub fn is_active(&self) -> bool {
        self.shared.is_some()
    }

    /// Current tap phase, or `None` for an inert handle.
    pub fn phase(&self) -> Option<TapPhase> {
        let shared = self.shared.as_ref()?;
        shared.try_borrow().ok().map(|state| state.tap.phase())
    }

    /// Remove every listener installed by [`attach`](Self::attach).
    pub fn destroy(mut self) {
        self.listeners.clear();
        if let Some(shared) = self.shared.take() {
            if let Ok(mut state) = shared.try_borrow_mut() {
                state.tap.reset();
            }
        }
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`TapHost`] over `web-sys`, plus conversions between DOM events and tap inputs.

use js_sys::Reflect;
use kurbo::Point;
use understory_tap::element::{ElementInfo, LABELABLE_SELECTOR};
use understory_tap::host::{ScrollMetrics, SyntheticEvent, TapHost};
use understory_tap::policy::{BrowserInfo, Environment};
use understory_tap::{MouseInput, Response, TouchInput, TouchPoint};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlElement, MouseEvent, MouseEventInit, Touch, TouchEvent,
    TouchList, Window,
};

/// Property set on synthesized events so our own listeners let them pass.
const FORWARDED_MARKER: &str = "forwardedTouchEvent";

/// A synthetic event waiting for the state borrow to be released.
pub(crate) type Pending = (Element, SyntheticEvent);

pub(crate) struct WebHost {
    window: Window,
    document: Document,
    pending: Vec<Pending>,
}

impl WebHost {
    pub(crate) fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            pending: Vec::new(),
        }
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    /// Synthetic events queued by the last handler.
    pub(crate) fn take_pending(&mut self) -> Vec<Pending> {
        core::mem::take(&mut self.pending)
    }
}

fn bool_property(target: &JsValue, name: &str) -> bool {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

fn string_property(target: &JsValue, name: &str) -> Option<String> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|v| v.as_string())
}

impl TapHost for WebHost {
    type Element = Element;

    fn describe(&self, element: &Element) -> ElementInfo {
        let ty = string_property(element, "type").unwrap_or_default();
        // SVG elements expose `className` as an object; the attribute is always a string.
        let class_name = element.get_attribute("class").unwrap_or_default();
        ElementInfo::from_tag_name(&element.tag_name())
            .with_type(&ty)
            .with_disabled(bool_property(element, "disabled"))
            .with_read_only(bool_property(element, "readOnly"))
            .with_class_name(&class_name)
    }

    fn parent(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn contains(&self, ancestor: &Element, element: &Element) -> bool {
        ancestor.contains(Some(element.as_ref()))
    }

    fn scroll_metrics(&self, element: &Element) -> ScrollMetrics {
        let offset_height = element
            .dyn_ref::<HtmlElement>()
            .map_or_else(|| element.client_height(), HtmlElement::offset_height);
        ScrollMetrics {
            scroll_height: f64::from(element.scroll_height()),
            offset_height: f64::from(offset_height),
            scroll_top: f64::from(element.scroll_top()),
        }
    }

    fn label_control(&self, label: &Element) -> Option<Element> {
        let control = Reflect::get(label, &JsValue::from_str("control")).ok()?;
        if !control.is_undefined() {
            return control.dyn_into::<Element>().ok();
        }
        if let Some(id) = string_property(label, "htmlFor").filter(|id| !id.is_empty()) {
            return self.document.get_element_by_id(&id);
        }
        label.query_selector(LABELABLE_SELECTOR).ok().flatten()
    }

    fn has_text_selection(&self) -> bool {
        self.window
            .get_selection()
            .ok()
            .flatten()
            .is_some_and(|selection| selection.range_count() > 0 && !selection.is_collapsed())
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focus(&mut self, element: &Element) {
        if let Some(element) = element.dyn_ref::<HtmlElement>() {
            let _ = element.focus();
        }
    }

    fn blur(&mut self, element: &Element) {
        if let Some(element) = element.dyn_ref::<HtmlElement>() {
            let _ = element.blur();
        }
    }

    fn dispatch_synthetic(&mut self, target: &Element, event: SyntheticEvent) {
        self.pending.push((target.clone(), event));
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Mouse event coordinates are integral CSS pixels."
)]
fn css_px(v: f64) -> i32 {
    v as i32
}

/// Build and dispatch queued synthetic events, each carrying the forwarding marker.
pub(crate) fn dispatch_pending(window: &Window, pending: Vec<Pending>) {
    for (target, synthetic) in pending {
        let init = MouseEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_view(Some(window));
        init.set_detail(1);
        init.set_screen_x(css_px(synthetic.screen.x));
        init.set_screen_y(css_px(synthetic.screen.y));
        init.set_client_x(css_px(synthetic.client.x));
        init.set_client_y(css_px(synthetic.client.y));

        let event =
            match MouseEvent::new_with_mouse_event_init_dict(synthetic.kind.as_str(), &init) {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(?err, "could not construct synthetic event");
                    continue;
                }
            };
        let _ = Reflect::set(&event, &JsValue::from_str(FORWARDED_MARKER), &JsValue::TRUE);
        if let Err(err) = target.dispatch_event(&event) {
            tracing::warn!(?err, "synthetic event dispatch failed");
        }
    }
}

/// Apply a tap response to the native event.
pub(crate) fn apply_response(event: &Event, response: Response) {
    match response {
        Response::Allow => {}
        Response::PreventDefault => event.prevent_default(),
        Response::StopAndPrevent => {
            event.stop_immediate_propagation();
            event.stop_propagation();
            event.prevent_default();
        }
    }
}

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn touch_point(touch: &Touch) -> TouchPoint {
    TouchPoint {
        identifier: touch.identifier(),
        page: Point::new(f64::from(touch.page_x()), f64::from(touch.page_y())),
        screen: Point::new(f64::from(touch.screen_x()), f64::from(touch.screen_y())),
        client: Point::new(f64::from(touch.client_x()), f64::from(touch.client_y())),
    }
}

/// Convert a touch event, reading the first touch of `list`.
///
/// Returns `None` when the target is not an element or the list is empty.
pub(crate) fn touch_input(event: &TouchEvent, list: &TouchList) -> Option<TouchInput<Element>> {
    Some(TouchInput {
        target: event_element(event)?,
        time_stamp: event.time_stamp(),
        target_touches: usize::try_from(event.target_touches().length()).unwrap_or(usize::MAX),
        touch: touch_point(&list.item(0)?),
    })
}

pub(crate) fn mouse_input(event: &MouseEvent) -> Option<MouseInput<Element>> {
    Some(MouseInput {
        target: event_element(event)?,
        cancelable: event.cancelable(),
        detail: event.detail(),
        forwarded: bool_property(event, FORWARDED_MARKER),
    })
}

/// Gather the page facts that decide whether tap handling is needed.
pub(crate) fn environment(window: &Window, document: &Document) -> Environment {
    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let viewport = document
        .query_selector("meta[name=viewport]")
        .ok()
        .flatten()
        .map(|meta| meta.get_attribute("content").unwrap_or_default());
    let document_scroll_width = document
        .document_element()
        .map_or(0.0, |root| f64::from(root.scroll_width()));
    let window_outer_width = window
        .outer_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0);
    let in_nested_frame = window
        .top()
        .ok()
        .flatten()
        .is_some_and(|top| top != *window);

    Environment {
        has_touch: Reflect::has(window, &JsValue::from_str("ontouchstart")).unwrap_or(false),
        browser: BrowserInfo::from_user_agent(&user_agent),
        viewport,
        document_scroll_width,
        window_outer_width,
        in_nested_frame,
    }
}

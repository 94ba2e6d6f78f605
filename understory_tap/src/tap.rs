// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tap state machine: classify a touch sequence and mediate one synthetic click.
//!
//! ## Usage
//!
//! 1) Forward `touchstart`, `touchmove`, `touchend` and `touchcancel` to the
//!    matching `on_touch_*` method.
//! 2) Forward native `click` events to [`TapState::on_click`] and, where
//!    [`Policy::intercepts_mouse`] says so, `mouseover`/`mousedown`/`mouseup`
//!    to [`TapState::on_mouse`].
//! 3) Apply the returned [`Response`] to the native event.
//!
//! A release that qualifies as a tap dispatches a synthetic click through the
//! host and answers [`Response::PreventDefault`]; the native click that may
//! still follow is stopped by `on_click`.
//!
//! ## States
//!
//! - [`TapPhase::Idle`]: nothing tracked.
//! - [`TapPhase::Tracking`]: a single touch is a tap candidate.
//! - [`TapPhase::PendingNative`]: a touch was released and its target is kept
//!   so the native click that follows can be judged.

use kurbo::Point;
use tracing::{debug, trace};

use crate::config::TapConfig;
use crate::element::{ElementInfo, Tag};
use crate::event::{MouseInput, Response, TouchInput, TouchPoint};
use crate::host::{SyntheticEvent, TapHost};
use crate::policy::Policy;

/// Observable state of a [`TapState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TapPhase {
    /// No touch is tracked and no native click is awaited.
    Idle,
    /// A touch is in progress and still qualifies as a tap.
    Tracking,
    /// A touch ended; the next native click on its target is judged.
    PendingNative,
}

#[derive(Clone, Debug, PartialEq)]
struct Tracking<E> {
    start_time: f64,
    start: Point,
    /// Scroll container of the touched element and its offset at touch start.
    scroll: Option<ScrollSnapshot<E>>,
}

#[derive(Clone, Debug, PartialEq)]
struct ScrollSnapshot<E> {
    container: E,
    scroll_top: f64,
}

impl<E: Clone + PartialEq> ScrollSnapshot<E> {
    /// Returns `true` if the container no longer sits at the recorded offset.
    fn moved<H: TapHost<Element = E>>(&self, host: &H) -> bool {
        host.scroll_metrics(&self.container).scroll_top != self.scroll_top
    }
}

/// Last element whose scroll container was looked up.
#[derive(Clone, Debug, PartialEq)]
struct ScrollParent<E> {
    target: E,
    container: E,
}

/// Touch-to-click disambiguator for one attached element subtree.
#[derive(Clone, Debug)]
pub struct TapState<E> {
    config: TapConfig,
    policy: Policy,
    tracking: Option<Tracking<E>>,
    target: Option<E>,
    last_touch_id: i32,
    last_click_time: Option<f64>,
    suppress_next_click: bool,
    scroll_parent: Option<ScrollParent<E>>,
}

impl<E: Clone + PartialEq> TapState<E> {
    /// Create an idle state machine.
    pub fn new(config: TapConfig, policy: Policy) -> Self {
        Self {
            config,
            policy,
            tracking: None,
            target: None,
            last_touch_id: 0,
            last_click_time: None,
            suppress_next_click: false,
            scroll_parent: None,
        }
    }

    /// Thresholds in use.
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// Policy in use.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Current phase.
    pub fn phase(&self) -> TapPhase {
        if self.tracking.is_some() {
            TapPhase::Tracking
        } else if self.target.is_some() {
            TapPhase::PendingNative
        } else {
            TapPhase::Idle
        }
    }

    /// The tracked or pending target.
    pub fn target(&self) -> Option<&E> {
        self.target.as_ref()
    }

    /// Returns `true` if the next native click will be cancelled regardless of its target.
    pub fn suppresses_next_click(&self) -> bool {
        self.suppress_next_click
    }

    /// Return to the state right after construction, dropping the cached scroll container.
    pub fn reset(&mut self) {
        self.tracking = None;
        self.target = None;
        self.last_touch_id = 0;
        self.last_click_time = None;
        self.suppress_next_click = false;
        self.scroll_parent = None;
    }

    /// Handle `touchstart`.
    pub fn on_touch_start<H>(&mut self, host: &mut H, event: &TouchInput<E>) -> Response
    where
        H: TapHost<Element = E>,
    {
        self.suppress_next_click = false;

        if event.target_touches > 1 {
            trace!(reason = "multi_touch", "touch start rejected");
            self.end_tracking();
            return Response::Allow;
        }

        if self.policy.guards_touch_start() {
            if host.has_text_selection() {
                trace!(reason = "text_selection", "touch start rejected");
                return Response::Allow;
            }

            let id = event.touch.identifier;
            if id != 0 && id == self.last_touch_id {
                trace!(reason = "duplicate_identifier", "touch start rejected");
                return Response::PreventDefault;
            }
            self.last_touch_id = id;
        }

        let scroll = if self.policy.detects_scroll_stop() {
            self.scroll_snapshot(&*host, &event.target)
        } else {
            None
        };
        self.tracking = Some(Tracking {
            start_time: event.time_stamp,
            start: event.touch.page,
            scroll,
        });
        self.target = Some(event.target.clone());

        // Too soon after the last tap: keep the browser from zooming on the double tap.
        if self.within_tap_delay(event.time_stamp) {
            Response::PreventDefault
        } else {
            Response::Allow
        }
    }

    /// Handle `touchmove`.
    pub fn on_touch_move(&mut self, event: &TouchInput<E>) -> Response {
        let Some(start) = self.tracking.as_ref().map(|t| t.start) else {
            return Response::Allow;
        };

        let retargeted = self.target.as_ref() != Some(&event.target);
        if retargeted || self.has_moved(start, event.touch.page) {
            trace!(retargeted, "touch moved, tap abandoned");
            self.end_tracking();
        }
        Response::Allow
    }

    /// Handle `touchcancel`.
    pub fn on_touch_cancel(&mut self) -> Response {
        self.end_tracking();
        Response::Allow
    }

    /// Handle `touchend`: decide whether the touch was a tap.
    pub fn on_touch_end<H>(&mut self, host: &mut H, event: &TouchInput<E>) -> Response
    where
        H: TapHost<Element = E>,
    {
        let Some(tracking) = self.tracking.take() else {
            return Response::Allow;
        };
        let now = event.time_stamp;

        if self.within_tap_delay(now) {
            trace!(reason = "tap_delay", "tap not synthesized");
            self.suppress_next_click = true;
            return Response::Allow;
        }

        let elapsed = now - tracking.start_time;
        if elapsed > self.config.tap_timeout {
            trace!(reason = "long_press", elapsed, "tap not synthesized");
            self.end_tracking();
            return Response::Allow;
        }

        self.suppress_next_click = false;
        self.last_click_time = Some(now);

        let Some(mut target) = self.target.clone() else {
            return Response::Allow;
        };
        let mut info = host.describe(&target);

        if info.tag == Tag::Label {
            if let Some(control) = host.label_control(&target) {
                host.focus(&control);
                if self.policy.label_focus_only() {
                    trace!(reason = "label_focus", "tap not synthesized");
                    return Response::Allow;
                }
                info = host.describe(&control);
                target = control;
            }
        } else if self.policy.needs_focus(&info) {
            return self.activate_by_focus(host, target, &info, elapsed, &event.touch);
        }

        // The touch only stopped a scroll in progress; leave it to the browser.
        if tracking.scroll.is_some_and(|scroll| scroll.moved(&*host)) {
            trace!(reason = "scroll_stop", "tap not synthesized");
            self.target = None;
            return Response::Allow;
        }

        // Until a click is synthesized, a native click is judged against the touched element.
        if self.policy.needs_click(&info) {
            trace!(reason = "needs_click", "tap left to the browser");
            return Response::Allow;
        }

        self.target = Some(target.clone());
        self.send_click(host, &target, &info, &event.touch);
        Response::PreventDefault
    }

    /// Judge a native `mouseover`, `mousedown` or `mouseup`.
    ///
    /// Returns [`Response::StopAndPrevent`] when the event belongs to a tap
    /// that was already handled, [`Response::Allow`] otherwise.
    pub fn on_mouse<H>(&self, host: &H, event: &MouseInput<E>) -> Response
    where
        H: TapHost<Element = E>,
    {
        let Some(target) = &self.target else {
            return Response::Allow;
        };
        if event.forwarded || !event.cancelable {
            return Response::Allow;
        }
        if self.suppress_next_click || !self.policy.needs_click(&host.describe(target)) {
            trace!(
                suppress_next_click = self.suppress_next_click,
                "native mouse event stopped"
            );
            return Response::StopAndPrevent;
        }
        Response::Allow
    }

    /// Judge a native `click`.
    pub fn on_click<H>(&mut self, host: &H, event: &MouseInput<E>) -> Response
    where
        H: TapHost<Element = E>,
    {
        // A click while still tracking was fired by someone else; let it through.
        if self.tracking.is_some() {
            self.end_tracking();
            return Response::Allow;
        }

        // Virtual keyboards submit forms with a zero-detail click on the submit button.
        if event.detail == 0 && host.describe(&event.target).is_submit() {
            return Response::Allow;
        }

        let response = self.on_mouse(host, event);
        if !response.is_permitted() {
            self.target = None;
        }
        response
    }

    fn activate_by_focus<H>(
        &mut self,
        host: &mut H,
        target: E,
        info: &ElementInfo,
        elapsed: f64,
        touch: &TouchPoint,
    ) -> Response
    where
        H: TapHost<Element = E>,
    {
        // After a longer touch the browser has already focused the field.
        if elapsed > self.config.focus_grace
            || (info.tag == Tag::Input && self.policy.skips_framed_inputs())
        {
            trace!(reason = "native_focus", elapsed, "tap not synthesized");
            self.target = None;
            return Response::Allow;
        }

        host.focus(&target);
        self.send_click(host, &target, info, touch);

        if info.tag == Tag::Select && self.policy.select_keeps_default() {
            return Response::Allow;
        }
        self.target = None;
        Response::PreventDefault
    }

    fn send_click<H>(&self, host: &mut H, target: &E, info: &ElementInfo, touch: &TouchPoint)
    where
        H: TapHost<Element = E>,
    {
        // Some browsers ignore a synthetic click while another element keeps focus.
        if let Some(active) = host.active_element() {
            if active != *target {
                host.blur(&active);
            }
        }

        let event = SyntheticEvent {
            kind: self.policy.synthetic_kind(info),
            screen: touch.screen,
            client: touch.client,
        };
        debug!(
            kind = event.kind.as_str(),
            x = event.client.x,
            y = event.client.y,
            "synthesizing click"
        );
        host.dispatch_synthetic(target, event);
    }

    fn end_tracking(&mut self) {
        self.tracking = None;
        self.target = None;
    }

    fn within_tap_delay(&self, now: f64) -> bool {
        self.last_click_time
            .is_some_and(|last| now - last < self.config.tap_delay)
    }

    fn has_moved(&self, start: Point, now: Point) -> bool {
        let boundary = self.config.touch_boundary;
        let beyond = |delta: f64| delta > boundary || delta < -boundary;
        beyond(now.x - start.x) || beyond(now.y - start.y)
    }

    /// Find the scroll container of `target` and read its current offset.
    ///
    /// The last lookup is kept and reused while its container still contains
    /// the target.
    fn scroll_snapshot<H>(&mut self, host: &H, target: &E) -> Option<ScrollSnapshot<E>>
    where
        H: TapHost<Element = E>,
    {
        let container = match self.scroll_parent.take() {
            Some(cached)
                if cached.target == *target && host.contains(&cached.container, target) =>
            {
                Some(cached.container)
            }
            _ => find_scroll_container(host, target),
        }?;

        let scroll_top = host.scroll_metrics(&container).scroll_top;
        self.scroll_parent = Some(ScrollParent {
            target: target.clone(),
            container: container.clone(),
        });
        Some(ScrollSnapshot {
            container,
            scroll_top,
        })
    }
}

/// Nearest element, starting at `element` itself, whose content overflows vertically.
fn find_scroll_container<H: TapHost>(host: &H, element: &H::Element) -> Option<H::Element> {
    let mut node = Some(element.clone());
    while let Some(current) = node {
        if host.scroll_metrics(&current).overflows() {
            return Some(current);
        }
        node = host.parent(&current);
    }
    None
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::host::ScrollMetrics;
    use crate::policy::Platform;

    /// Element `0` is a scrolling list; every other element is a row inside it.
    struct List {
        scroll_top: f64,
        dispatched: Vec<usize>,
    }

    impl TapHost for List {
        type Element = usize;

        fn describe(&self, _: &usize) -> ElementInfo {
            ElementInfo::new(Tag::Other)
        }

        fn parent(&self, element: &usize) -> Option<usize> {
            (*element != 0).then_some(0)
        }

        fn contains(&self, ancestor: &usize, element: &usize) -> bool {
            *ancestor == 0 || ancestor == element
        }

        fn scroll_metrics(&self, element: &usize) -> ScrollMetrics {
            if *element == 0 {
                ScrollMetrics {
                    scroll_height: 5000.0,
                    offset_height: 500.0,
                    scroll_top: self.scroll_top,
                }
            } else {
                ScrollMetrics::default()
            }
        }

        fn label_control(&self, _: &usize) -> Option<usize> {
            None
        }

        fn has_text_selection(&self) -> bool {
            false
        }

        fn active_element(&self) -> Option<usize> {
            None
        }

        fn focus(&mut self, _: &usize) {}

        fn blur(&mut self, _: &usize) {}

        fn dispatch_synthetic(&mut self, target: &usize, _: SyntheticEvent) {
            self.dispatched.push(*target);
        }
    }

    #[test]
    fn only_the_latest_scroll_lookup_is_kept() {
        let mut list = List {
            scroll_top: 0.0,
            dispatched: Vec::new(),
        };
        let mut tap = TapState::new(TapConfig::default(), Policy::new(Platform::Ios));

        for row in 1..=64_usize {
            let t = row as f64 * 1000.0;
            let at = Point::new(10.0, 10.0);
            tap.on_touch_start(&mut list, &TouchInput::new(row, t, at));
            tap.on_touch_end(&mut list, &TouchInput::new(row, t + 50.0, at));
            list.scroll_top += 40.0;
        }

        assert_eq!(list.dispatched, (1..=64).collect::<Vec<_>>());
        assert_eq!(
            tap.scroll_parent,
            Some(ScrollParent {
                target: 64,
                container: 0,
            })
        );
        assert!(tap.tracking.is_none(), "a finished touch keeps no snapshot");

        tap.reset();
        assert_eq!(tap.scroll_parent, None);
    }
}

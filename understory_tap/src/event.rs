// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event payloads consumed by [`TapState`](crate::TapState) and the outcome it returns.

use kurbo::Point;

/// One touch point, as reported by the host.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TouchPoint {
    /// Touch identifier.
    pub identifier: i32,
    /// Page coordinates; used for drift checks.
    pub page: Point,
    /// Screen coordinates; copied onto the synthetic event.
    pub screen: Point,
    /// Client coordinates; copied onto the synthetic event.
    pub client: Point,
}

/// A touch lifecycle event.
///
/// `touch` is the first of `targetTouches` for a touch start and the first of
/// `changedTouches` for moves and ends.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchInput<E> {
    /// Event target.
    pub target: E,
    /// Event timestamp.
    pub time_stamp: f64,
    /// Number of active touches on the target (`targetTouches.length`).
    pub target_touches: usize,
    /// The relevant touch point.
    pub touch: TouchPoint,
}

impl<E> TouchInput<E> {
    /// A single-touch event on `target` at `time_stamp`, with every coordinate at `page`.
    pub fn new(target: E, time_stamp: f64, page: Point) -> Self {
        Self {
            target,
            time_stamp,
            target_touches: 1,
            touch: TouchPoint {
                identifier: 0,
                page,
                screen: page,
                client: page,
            },
        }
    }

    /// Set the touch identifier.
    #[must_use]
    pub fn with_identifier(mut self, identifier: i32) -> Self {
        self.touch.identifier = identifier;
        self
    }

    /// Set the number of active touches on the target.
    #[must_use]
    pub fn with_target_touches(mut self, target_touches: usize) -> Self {
        self.target_touches = target_touches;
        self
    }
}

/// A native `click`, `mouseover`, `mousedown` or `mouseup` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MouseInput<E> {
    /// Event target.
    pub target: E,
    /// The event can be cancelled; programmatic events usually cannot.
    pub cancelable: bool,
    /// Click count; `0` for keyboard-generated clicks.
    pub detail: i32,
    /// The event carries the forwarding marker of a synthesized event.
    pub forwarded: bool,
}

impl<E> MouseInput<E> {
    /// A user-generated, cancelable, single-click event on `target`.
    pub fn new(target: E) -> Self {
        Self {
            target,
            cancelable: true,
            detail: 1,
            forwarded: false,
        }
    }

    /// Mark the event as forwarded from a tap.
    #[must_use]
    pub fn forwarded(mut self) -> Self {
        self.forwarded = true;
        self
    }

    /// Set the `cancelable` flag.
    #[must_use]
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Set the click count.
    #[must_use]
    pub fn with_detail(mut self, detail: i32) -> Self {
        self.detail = detail;
        self
    }
}

/// What the host should do with the event it just delivered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Response {
    /// Let the event proceed.
    #[default]
    Allow,
    /// Cancel the default action; propagation continues.
    PreventDefault,
    /// Stop immediate propagation and cancel the default action.
    StopAndPrevent,
}

impl Response {
    /// Returns `true` unless the event was stopped.
    ///
    /// This is the "permitted" answer of mouse interception.
    pub fn is_permitted(self) -> bool {
        self != Self::StopAndPrevent
    }

    /// Returns `true` if the default action should be cancelled.
    pub fn prevents_default(self) -> bool {
        self != Self::Allow
    }
}

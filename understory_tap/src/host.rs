// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host seam: element queries and side effects needed by tap handling.
//!
//! [`TapState`](crate::TapState) never touches a document directly. A host
//! (a DOM binding, a test double, a retained UI tree) implements [`TapHost`]
//! over its own element handles.

use kurbo::Point;

use crate::element::ElementInfo;

/// Type of a synthesized event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SyntheticKind {
    /// `click`
    Click,
    /// `mousedown`
    MouseDown,
}

impl SyntheticKind {
    /// DOM event type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseDown => "mousedown",
        }
    }
}

/// A click-class event to dispatch in place of the browser's delayed one.
///
/// Hosts must attach their forwarding marker so that the event comes back
/// through [`TapState::on_click`](crate::TapState::on_click) with
/// [`MouseInput::forwarded`](crate::MouseInput::forwarded) set.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SyntheticEvent {
    /// Event type.
    pub kind: SyntheticKind,
    /// Screen coordinates of the releasing touch.
    pub screen: Point,
    /// Client coordinates of the releasing touch.
    pub client: Point,
}

/// Scroll geometry of one element.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// `scrollHeight`
    pub scroll_height: f64,
    /// `offsetHeight`
    pub offset_height: f64,
    /// `scrollTop`
    pub scroll_top: f64,
}

impl ScrollMetrics {
    /// Returns `true` if the content overflows the box vertically.
    pub fn overflows(&self) -> bool {
        self.scroll_height > self.offset_height
    }
}

/// Element queries and effects provided by the embedding environment.
pub trait TapHost {
    /// Element handle. Compared by identity.
    type Element: Clone + PartialEq;

    /// Describe an element for the policy predicates.
    fn describe(&self, element: &Self::Element) -> ElementInfo;

    /// The parent element, if any.
    fn parent(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Returns `true` if `ancestor` is `element` or one of its ancestors.
    fn contains(&self, ancestor: &Self::Element, element: &Self::Element) -> bool;

    /// Scroll geometry of `element`.
    fn scroll_metrics(&self, element: &Self::Element) -> ScrollMetrics;

    /// The form control associated with a `<label>`.
    ///
    /// Resolution order is the explicit `control` association, then the
    /// element whose id matches `for`, then the first descendant matching
    /// [`LABELABLE_SELECTOR`](crate::element::LABELABLE_SELECTOR).
    fn label_control(&self, label: &Self::Element) -> Option<Self::Element>;

    /// Returns `true` while the user has a non-collapsed text selection.
    fn has_text_selection(&self) -> bool;

    /// The currently focused element.
    fn active_element(&self) -> Option<Self::Element>;

    /// Move focus to `element`.
    fn focus(&mut self, element: &Self::Element);

    /// Remove focus from `element`.
    fn blur(&mut self, element: &Self::Element);

    /// Dispatch `event` on `target`, carrying the forwarding marker.
    fn dispatch_synthetic(&mut self, target: &Self::Element, event: SyntheticEvent);
}

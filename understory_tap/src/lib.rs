// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tap --heading-base-level=0

//! Understory Tap: fire clicks on tap release instead of after the browser's delay.
//!
//! Mobile browsers wait a few hundred milliseconds after a touch before they
//! synthesize a `click`, to see whether a double tap follows. This crate
//! recognizes genuine taps from raw touch events, dispatches a synthetic click
//! as soon as the finger lifts, and cancels the browser's own late click.
//!
//! ## Overview
//!
//! - [`TapState`] is the state machine. It consumes touch, click and mouse
//!   events for one element subtree and returns a [`Response`] for each.
//! - [`policy`] answers whether the shim is needed on a platform at all and
//!   which elements need the browser's native click or focus handling.
//! - [`TapHost`] is the seam to the document: element descriptions, focus,
//!   scroll geometry, and dispatching the synthetic event.
//!
//! The crate knows nothing about any particular DOM binding. `understory_tap_web`
//! implements [`TapHost`] over `web-sys`; tests implement it over a plain tree.
//!
//! ## Classification
//!
//! A touch is a tap when it starts with a single finger, never drifts more than
//! [`TapConfig::touch_boundary`] from its origin on either axis, stays on the
//! same target, and lifts within [`TapConfig::tap_timeout`]. A tap arriving
//! within [`TapConfig::tap_delay`] of the previous one is left to the browser
//! and its native click is cancelled.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_tap::element::{ElementInfo, Tag};
//! use understory_tap::host::{ScrollMetrics, SyntheticEvent, TapHost};
//! use understory_tap::policy::{Platform, Policy};
//! use understory_tap::{MouseInput, Response, TapConfig, TapState, TouchInput};
//!
//! /// A document with a single `<div>`, element `1`.
//! #[derive(Default)]
//! struct OneDiv {
//!     clicks: Vec<(u32, SyntheticEvent)>,
//! }
//!
//! impl TapHost for OneDiv {
//!     type Element = u32;
//!     fn describe(&self, _: &u32) -> ElementInfo { ElementInfo::new(Tag::Other) }
//!     fn parent(&self, _: &u32) -> Option<u32> { None }
//!     fn contains(&self, a: &u32, b: &u32) -> bool { a == b }
//!     fn scroll_metrics(&self, _: &u32) -> ScrollMetrics { ScrollMetrics::default() }
//!     fn label_control(&self, _: &u32) -> Option<u32> { None }
//!     fn has_text_selection(&self) -> bool { false }
//!     fn active_element(&self) -> Option<u32> { None }
//!     fn focus(&mut self, _: &u32) {}
//!     fn blur(&mut self, _: &u32) {}
//!     fn dispatch_synthetic(&mut self, target: &u32, event: SyntheticEvent) {
//!         self.clicks.push((*target, event));
//!     }
//! }
//!
//! let mut host = OneDiv::default();
//! let mut tap = TapState::new(TapConfig::default(), Policy::new(Platform::Ios));
//!
//! let at = Point::new(40.0, 60.0);
//! tap.on_touch_start(&mut host, &TouchInput::new(1, 1000.0, at));
//! let response = tap.on_touch_end(&mut host, &TouchInput::new(1, 1080.0, at));
//!
//! // The click fires on release and the touch's default action is cancelled.
//! assert_eq!(response, Response::PreventDefault);
//! assert_eq!(host.clicks.len(), 1);
//!
//! // The synthetic click comes back marked and passes; a late native one is stopped.
//! assert_eq!(tap.on_click(&host, &MouseInput::new(1).forwarded()), Response::Allow);
//! assert_eq!(tap.on_click(&host, &MouseInput::new(1)), Response::StopAndPrevent);
//! ```
//!
//! ## Logging
//!
//! Decisions are reported through `tracing`: every early exit of the state
//! machine at `trace` level with a `reason` field, and each synthesized click
//! at `debug` level. Install a subscriber in the host application to see them.
//!
//! ## Features
//!
//! - `std` (default): build Kurbo and `tracing` against the standard library.
//! - `libm`: `no_std` floating point support for Kurbo.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

pub mod config;
pub mod element;
pub mod event;
pub mod host;
pub mod policy;
pub mod tap;

pub use config::{ConfigError, TapConfig};
pub use event::{MouseInput, Response, TouchInput, TouchPoint};
pub use host::TapHost;
pub use tap::{TapPhase, TapState};

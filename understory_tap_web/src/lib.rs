// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_tap_web --heading-base-level=0

//! Browser bindings for `understory_tap`.
//!
//! This crate attaches [`understory_tap::TapState`] to a DOM subtree when
//! targeting `wasm32`: it installs the touch, click and (where needed) mouse
//! listeners, translates DOM events into tap inputs, applies the returned
//! responses, and dispatches synthetic clicks.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn install(
//!     body: &web_sys::Element,
//! ) -> Result<understory_tap_web::FastTap, understory_tap_web::AttachError> {
//!     understory_tap_web::FastTap::attach(body, understory_tap::TapConfig::default())
//! }
//! ```
//!
//! Notes:
//! - The environment is probed once in [`FastTap::attach`]. On platforms without a
//!   tap delay the returned handle is inert and installs no listeners.
//! - Synthetic events carry a `forwardedTouchEvent` property so the click
//!   listener recognizes them.
//! - A function assigned to the root's `onclick` property is moved into a
//!   regular listener, so a stopped native click does not reach it either.
//! - Dropping the handle, or calling [`FastTap::destroy`], removes every listener.

mod error;

pub use error::AttachError;

#[cfg(target_arch = "wasm32")]
mod host;

#[cfg(target_arch = "wasm32")]
mod attach;

#[cfg(target_arch = "wasm32")]
pub use attach::FastTap;

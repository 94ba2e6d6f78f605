// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Environment policy: platform detection and element predicates.
//!
//! Everything here is pure. A host resolves an [`Environment`] once when it
//! attaches, asks [`Environment::shim_not_needed`] whether to install anything
//! at all, and hands the resulting [`Policy`] to [`TapState`](crate::TapState).
//! Tests substitute any [`Platform`] they like.
//!
//! ```
//! use understory_tap::element::{ElementInfo, Tag};
//! use understory_tap::policy::{Platform, Policy};
//!
//! let android = Policy::new(Platform::Android);
//! let ios = Policy::new(Platform::Ios);
//! let select = ElementInfo::new(Tag::Select);
//!
//! // Android opens its picker from a synthetic mousedown and needs no focus.
//! assert!(!android.needs_focus(&select));
//! assert!(ios.needs_focus(&select));
//! ```

use alloc::string::String;

use crate::element::{ElementInfo, Tag};
use crate::host::SyntheticKind;

/// Platform classes with distinct touch quirks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    /// iPhone, iPad and iPod browsers.
    Ios,
    /// Android browsers.
    Android,
    /// Everything else, including Windows Phone.
    #[default]
    Other,
}

impl Platform {
    /// Detect the platform class from a user-agent string.
    pub fn from_user_agent(ua: &str) -> Self {
        if ua.contains("Windows Phone") {
            return Self::Other;
        }
        // A leading "Android" is not a real Android user agent.
        if ua.find("Android").is_some_and(|at| at > 0) {
            return Self::Android;
        }
        if ["iPad", "iPhone", "iPod"].iter().any(|d| ua.contains(d)) {
            return Self::Ios;
        }
        Self::Other
    }
}

/// Platform plus the browser versions that decide whether the shim is needed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct BrowserInfo {
    /// Platform class.
    pub platform: Platform,
    /// Major version from `Chrome/<n>`, if present and non-zero.
    pub chrome_version: Option<u32>,
    /// Major version from `Firefox/<n>`, if present and non-zero.
    pub firefox_version: Option<u32>,
}

impl BrowserInfo {
    /// Parse a user-agent string.
    pub fn from_user_agent(ua: &str) -> Self {
        Self {
            platform: Platform::from_user_agent(ua),
            chrome_version: major_version(ua, "Chrome/"),
            firefox_version: major_version(ua, "Firefox/"),
        }
    }
}

/// Major version following the first occurrence of `product`.
fn major_version(ua: &str, product: &str) -> Option<u32> {
    let start = ua.find(product)? + product.len();
    let rest = &ua[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok().filter(|&v| v > 0)
}

/// Page and runtime facts gathered once at attachment time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    /// The runtime exposes touch events at all.
    pub has_touch: bool,
    /// Parsed user agent.
    pub browser: BrowserInfo,
    /// Content of `<meta name="viewport">`, if the page declares one.
    pub viewport: Option<String>,
    /// `document.documentElement.scrollWidth`.
    pub document_scroll_width: f64,
    /// `window.outerWidth`.
    pub window_outer_width: f64,
    /// The page runs inside a frame (`window.top !== window`).
    pub in_nested_frame: bool,
}

impl Environment {
    /// Returns `true` when the platform has no tap delay to eliminate.
    pub fn shim_not_needed(&self) -> bool {
        if !self.has_touch {
            return true;
        }

        let not_scalable = self
            .viewport
            .as_deref()
            .is_some_and(|content| content.contains("user-scalable=no"));
        let fits_width = self.document_scroll_width <= self.window_outer_width;

        if let Some(chrome) = self.browser.chrome_version {
            if self.browser.platform != Platform::Android {
                // Desktop Chrome with touch support has no delay.
                return true;
            }
            if self.viewport.is_some() && (not_scalable || (chrome > 31 && fits_width)) {
                return true;
            }
        }

        if self.browser.firefox_version.is_some_and(|v| v >= 27)
            && self.viewport.is_some()
            && (not_scalable || fits_width)
        {
            return true;
        }

        false
    }

    /// The policy to run the disambiguator with.
    pub fn policy(&self) -> Policy {
        Policy {
            platform: self.browser.platform,
            in_nested_frame: self.in_nested_frame,
        }
    }
}

/// Element predicates and platform quirks consulted during tap handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Policy {
    /// Platform class.
    pub platform: Platform,
    /// The page runs inside a frame.
    pub in_nested_frame: bool,
}

impl Policy {
    /// A top-level page policy for `platform`.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            in_nested_frame: false,
        }
    }

    /// Mark the page as framed.
    #[must_use]
    pub fn with_nested_frame(mut self, in_nested_frame: bool) -> Self {
        self.in_nested_frame = in_nested_frame;
        self
    }

    /// Returns `true` when `info` must receive the browser's own click.
    pub fn needs_click(&self, info: &ElementInfo) -> bool {
        match info.tag {
            Tag::Button | Tag::Select | Tag::Textarea => info.disabled,
            Tag::Label | Tag::Iframe | Tag::Video => true,
            _ => info.needs_click_marker,
        }
    }

    /// Returns `true` when `info` is activated by focusing it.
    pub fn needs_focus(&self, info: &ElementInfo) -> bool {
        match info.tag {
            Tag::Textarea => true,
            Tag::Select => self.platform != Platform::Android,
            Tag::Input => {
                if info.control_type.is_some_and(|ty| ty.is_click_activated()) {
                    false
                } else {
                    !info.disabled && !info.read_only
                }
            }
            _ => info.needs_focus_marker,
        }
    }

    /// The event type to synthesize on `info`.
    pub fn synthetic_kind(&self, info: &ElementInfo) -> SyntheticKind {
        // Android select boxes do not open from a synthetic click.
        if self.platform == Platform::Android && info.tag == Tag::Select {
            SyntheticKind::MouseDown
        } else {
            SyntheticKind::Click
        }
    }

    /// Touch starts are checked against text selection and duplicate identifiers.
    pub fn guards_touch_start(&self) -> bool {
        self.platform == Platform::Ios
    }

    /// A touch that stopped a scrolling container is not a tap.
    pub fn detects_scroll_stop(&self) -> bool {
        self.platform == Platform::Ios
    }

    /// Inputs inside frames are left to the browser.
    pub fn skips_framed_inputs(&self) -> bool {
        self.platform == Platform::Ios && self.in_nested_frame
    }

    /// A focused `<select>` keeps its native default so the picker opens.
    pub fn select_keeps_default(&self) -> bool {
        self.platform == Platform::Ios
    }

    /// Focusing a label's control is enough; no click is synthesized.
    pub fn label_focus_only(&self) -> bool {
        self.platform == Platform::Android
    }

    /// The browser emits ghost mouse events after touches that must be filtered.
    pub fn intercepts_mouse(&self) -> bool {
        self.platform == Platform::Android
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ControlType;
    use alloc::string::ToString;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const DESKTOP_CHROME: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const WINDOWS_PHONE: &str = "Mozilla/5.0 (Windows Phone 10.0; Android 6.0.1; Microsoft; Lumia 950) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/52.0 Mobile Safari/537.36 Edge/15.14977";
    const ANDROID_FIREFOX: &str =
        "Mozilla/5.0 (Android 13; Mobile; rv:120.0) Gecko/120.0 Firefox/120.0";

    fn env(ua: &str) -> Environment {
        Environment {
            has_touch: true,
            browser: BrowserInfo::from_user_agent(ua),
            viewport: None,
            document_scroll_width: 800.0,
            window_outer_width: 400.0,
            in_nested_frame: false,
        }
    }

    #[test]
    fn platform_detection() {
        assert_eq!(Platform::from_user_agent(IPHONE), Platform::Ios);
        assert_eq!(Platform::from_user_agent(ANDROID_CHROME), Platform::Android);
        assert_eq!(Platform::from_user_agent(DESKTOP_CHROME), Platform::Other);
        assert_eq!(Platform::from_user_agent(WINDOWS_PHONE), Platform::Other);
        assert_eq!(Platform::from_user_agent("Android"), Platform::Other);
    }

    #[test]
    fn browser_versions() {
        let info = BrowserInfo::from_user_agent(ANDROID_CHROME);
        assert_eq!(info.chrome_version, Some(120));
        assert_eq!(info.firefox_version, None);

        let info = BrowserInfo::from_user_agent(ANDROID_FIREFOX);
        assert_eq!(info.chrome_version, None);
        assert_eq!(info.firefox_version, Some(120));

        assert_eq!(major_version("Chrome/", "Chrome/"), None);
        assert_eq!(major_version("Chrome/0.1", "Chrome/"), None);
    }

    #[test]
    fn no_touch_never_needs_shim() {
        let mut e = env(IPHONE);
        e.has_touch = false;
        assert!(e.shim_not_needed());
    }

    #[test]
    fn ios_safari_needs_shim() {
        assert!(!env(IPHONE).shim_not_needed());
    }

    #[test]
    fn desktop_chrome_never_needs_shim() {
        assert!(env(DESKTOP_CHROME).shim_not_needed());
    }

    #[test]
    fn android_chrome_depends_on_viewport() {
        let mut e = env(ANDROID_CHROME);
        assert!(!e.shim_not_needed(), "no viewport meta");

        e.viewport = Some("width=device-width, user-scalable=no".to_string());
        assert!(e.shim_not_needed());

        e.viewport = Some("width=device-width".to_string());
        assert!(!e.shim_not_needed(), "document wider than window");

        e.document_scroll_width = 400.0;
        assert!(e.shim_not_needed());

        e.browser.chrome_version = Some(31);
        assert!(!e.shim_not_needed(), "old Chrome still has the delay");
    }

    #[test]
    fn firefox_depends_on_viewport() {
        let mut e = env(ANDROID_FIREFOX);
        assert!(!e.shim_not_needed());

        e.viewport = Some("width=device-width".to_string());
        assert!(!e.shim_not_needed());

        e.document_scroll_width = 300.0;
        assert!(e.shim_not_needed());

        e.browser.firefox_version = Some(26);
        assert!(!e.shim_not_needed());
    }

    #[test]
    fn needs_click_predicate() {
        let p = Policy::new(Platform::Ios);
        assert!(p.needs_click(&ElementInfo::new(Tag::Button).with_disabled(true)));
        assert!(!p.needs_click(&ElementInfo::new(Tag::Button)));
        assert!(p.needs_click(&ElementInfo::new(Tag::Textarea).with_disabled(true)));
        assert!(p.needs_click(&ElementInfo::new(Tag::Label)));
        assert!(p.needs_click(&ElementInfo::new(Tag::Iframe)));
        assert!(p.needs_click(&ElementInfo::new(Tag::Video)));
        assert!(p.needs_click(&ElementInfo::new(Tag::Other).with_class_name("x needsclick")));
        assert!(!p.needs_click(&ElementInfo::new(Tag::Other)));
        // Disabled inputs are not in the native-click set.
        assert!(!p.needs_click(&ElementInfo::new(Tag::Input).with_disabled(true)));
    }

    #[test]
    fn needs_focus_predicate() {
        let ios = Policy::new(Platform::Ios);
        let android = Policy::new(Platform::Android);
        let text = ElementInfo::new(Tag::Input).with_type("text");

        assert!(ios.needs_focus(&ElementInfo::new(Tag::Textarea)));
        assert!(ios.needs_focus(&text));
        assert!(ios.needs_focus(&ElementInfo::new(Tag::Input)));
        assert!(!ios.needs_focus(&text.with_disabled(true)));
        assert!(!ios.needs_focus(&text.with_read_only(true)));
        for ty in ["button", "checkbox", "file", "image", "radio", "submit"] {
            let info = ElementInfo::new(Tag::Input).with_type(ty);
            assert!(!ios.needs_focus(&info), "{ty} activates on click");
        }
        assert_eq!(
            ElementInfo::new(Tag::Input).with_type("hidden").control_type,
            Some(ControlType::Hidden)
        );
        assert!(ios.needs_focus(&ElementInfo::new(Tag::Select)));
        assert!(!android.needs_focus(&ElementInfo::new(Tag::Select)));
        assert!(ios.needs_focus(&ElementInfo::new(Tag::Other).with_class_name("needsfocus")));
        assert!(!ios.needs_focus(&ElementInfo::new(Tag::Button)));
    }

    #[test]
    fn synthetic_kind_for_android_select() {
        let select = ElementInfo::new(Tag::Select);
        assert_eq!(
            Policy::new(Platform::Android).synthetic_kind(&select),
            SyntheticKind::MouseDown
        );
        assert_eq!(
            Policy::new(Platform::Ios).synthetic_kind(&select),
            SyntheticKind::Click
        );
        assert_eq!(
            Policy::new(Platform::Android).synthetic_kind(&ElementInfo::new(Tag::Button)),
            SyntheticKind::Click
        );
    }

    #[test]
    fn framed_inputs_only_skipped_on_ios() {
        assert!(Policy::new(Platform::Ios).with_nested_frame(true).skips_framed_inputs());
        assert!(!Policy::new(Platform::Ios).skips_framed_inputs());
        assert!(!Policy::new(Platform::Android).with_nested_frame(true).skips_framed_inputs());
    }

    #[test]
    fn environment_policy_carries_frame_flag() {
        let mut e = env(IPHONE);
        e.in_nested_frame = true;
        assert_eq!(e.policy(), Policy::new(Platform::Ios).with_nested_frame(true));
    }
}

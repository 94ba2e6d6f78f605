// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element descriptors: the few facts about a target that tap handling looks at.
//!
//! Hosts build an [`ElementInfo`] from whatever their element model exposes
//! (tag name, the `type` property, flags, class name). The disambiguator never
//! inspects host elements directly.
//!
//! ```
//! use understory_tap::element::{ControlType, ElementInfo, Tag};
//!
//! let info = ElementInfo::from_tag_name("INPUT")
//!     .with_type("submit")
//!     .with_class_name("primary needsclick");
//! assert_eq!(info.tag, Tag::Input);
//! assert_eq!(info.control_type, Some(ControlType::Submit));
//! assert!(info.needs_click_marker);
//! assert!(!info.needs_focus_marker);
//! ```

/// Class marker that forces native click handling.
pub const NEEDS_CLICK_MARKER: &str = "needsclick";

/// Class marker that forces focus-based activation.
pub const NEEDS_FOCUS_MARKER: &str = "needsfocus";

/// Selector for the first focusable descendant of a `<label>` without an
/// explicit control association.
pub const LABELABLE_SELECTOR: &str =
    "button, input:not([type=hidden]), keygen, meter, output, progress, select, textarea";

/// Element kinds that tap handling distinguishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Tag {
    /// `<button>`
    Button,
    /// `<select>`
    Select,
    /// `<textarea>`
    Textarea,
    /// `<input>`
    Input,
    /// `<label>`
    Label,
    /// `<iframe>`
    Iframe,
    /// `<video>`
    Video,
    /// Anything else.
    #[default]
    Other,
}

impl Tag {
    /// Classify a tag or node name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Self {
        const NAMES: [(&str, Tag); 7] = [
            ("button", Tag::Button),
            ("select", Tag::Select),
            ("textarea", Tag::Textarea),
            ("input", Tag::Input),
            ("label", Tag::Label),
            ("iframe", Tag::Iframe),
            ("video", Tag::Video),
        ];
        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map_or(Self::Other, |&(_, tag)| tag)
    }
}

/// Value of a control's `type` property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ControlType {
    /// `type="button"`
    Button,
    /// `type="checkbox"`
    Checkbox,
    /// `type="file"`
    File,
    /// `type="image"`
    Image,
    /// `type="radio"`
    Radio,
    /// `type="submit"`
    Submit,
    /// `type="hidden"`
    Hidden,
    /// Text-like and every other type.
    Other,
}

impl ControlType {
    /// Classify a `type` property value, ignoring ASCII case.
    pub fn from_type(ty: &str) -> Self {
        const TYPES: [(&str, ControlType); 7] = [
            ("button", ControlType::Button),
            ("checkbox", ControlType::Checkbox),
            ("file", ControlType::File),
            ("image", ControlType::Image),
            ("radio", ControlType::Radio),
            ("submit", ControlType::Submit),
            ("hidden", ControlType::Hidden),
        ];
        TYPES
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(ty))
            .map_or(Self::Other, |&(_, kind)| kind)
    }

    /// Returns `true` for control types that activate on click rather than focus.
    pub fn is_click_activated(self) -> bool {
        matches!(
            self,
            Self::Button | Self::Checkbox | Self::File | Self::Image | Self::Radio | Self::Submit
        )
    }
}

/// Snapshot of the element properties consulted by the environment policy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementInfo {
    /// Element kind.
    pub tag: Tag,
    /// The `type` property, when the element has one.
    pub control_type: Option<ControlType>,
    /// The `disabled` property.
    pub disabled: bool,
    /// The `readOnly` property.
    pub read_only: bool,
    /// The class list carries [`NEEDS_CLICK_MARKER`].
    pub needs_click_marker: bool,
    /// The class list carries [`NEEDS_FOCUS_MARKER`].
    pub needs_focus_marker: bool,
}

impl ElementInfo {
    /// Create a descriptor for an element of the given kind.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    /// Create a descriptor from a tag or node name such as `"INPUT"`.
    pub fn from_tag_name(name: &str) -> Self {
        Self::new(Tag::from_name(name))
    }

    /// Set the control type from a `type` property value.
    ///
    /// An empty string leaves the control type unset.
    #[must_use]
    pub fn with_type(mut self, ty: &str) -> Self {
        self.control_type = (!ty.is_empty()).then(|| ControlType::from_type(ty));
        self
    }

    /// Set the `disabled` flag.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the `readOnly` flag.
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Scan a class name for the `needsclick` / `needsfocus` markers.
    #[must_use]
    pub fn with_class_name(mut self, class_name: &str) -> Self {
        self.needs_click_marker = has_marker(class_name, NEEDS_CLICK_MARKER);
        self.needs_focus_marker = has_marker(class_name, NEEDS_FOCUS_MARKER);
        self
    }

    /// Returns `true` when the element's `type` is `submit`.
    pub fn is_submit(&self) -> bool {
        self.control_type == Some(ControlType::Submit)
    }
}

/// Word-boundary match of `marker` inside `class_name`.
///
/// Word characters are ASCII alphanumerics and `_`, so `needsclick-large`
/// carries the marker while `noneedsclick` does not.
pub fn has_marker(class_name: &str, marker: &str) -> bool {
    class_name
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| word == marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_are_case_insensitive() {
        assert_eq!(Tag::from_name("LABEL"), Tag::Label);
        assert_eq!(Tag::from_name("TextArea"), Tag::Textarea);
        assert_eq!(Tag::from_name("div"), Tag::Other);
        assert_eq!(Tag::from_name(""), Tag::Other);
    }

    #[test]
    fn control_types_classify() {
        assert_eq!(ControlType::from_type("SUBMIT"), ControlType::Submit);
        assert_eq!(ControlType::from_type("email"), ControlType::Other);
        assert!(ControlType::Radio.is_click_activated());
        assert!(!ControlType::Hidden.is_click_activated());
        assert!(!ControlType::Other.is_click_activated());
    }

    #[test]
    fn empty_type_leaves_control_type_unset() {
        let info = ElementInfo::from_tag_name("div").with_type("");
        assert_eq!(info.control_type, None);
        assert!(!info.is_submit());
    }

    #[test]
    fn markers_match_on_word_boundaries() {
        assert!(has_marker("needsclick", NEEDS_CLICK_MARKER));
        assert!(has_marker("btn needsclick big", NEEDS_CLICK_MARKER));
        assert!(has_marker("needsclick-large", NEEDS_CLICK_MARKER));
        assert!(!has_marker("noneedsclick", NEEDS_CLICK_MARKER));
        assert!(!has_marker("needsclick_x", NEEDS_CLICK_MARKER));
        assert!(!has_marker("", NEEDS_CLICK_MARKER));
    }

    #[test]
    fn class_name_sets_both_markers() {
        let info = ElementInfo::new(Tag::Other).with_class_name("needsfocus\tneedsclick");
        assert!(info.needs_click_marker);
        assert!(info.needs_focus_marker);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thresholds that bound what counts as a tap.

use core::fmt;

/// Tap recognition thresholds.
///
/// Distances are in CSS pixels and durations in the host's event timestamp
/// unit (milliseconds for DOM events).
///
/// ```
/// use understory_tap::TapConfig;
///
/// let config = TapConfig::default().with_touch_boundary(16.0).with_tap_delay(150.0);
/// assert_eq!(config.touch_boundary, 16.0);
/// assert_eq!(config.tap_timeout, 700.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TapConfig {
    /// Maximum drift from the touch origin, per axis, before a touch stops being a tap.
    pub touch_boundary: f64,
    /// Minimum gap between accepted taps; a faster second tap is left to the browser.
    pub tap_delay: f64,
    /// Maximum duration of a tap; longer touches are long presses.
    pub tap_timeout: f64,
    /// Touch duration after which the browser is assumed to have focused a
    /// text field on its own.
    pub focus_grace: f64,
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            touch_boundary: 10.0,
            tap_delay: 200.0,
            tap_timeout: 700.0,
            focus_grace: 100.0,
        }
    }
}

impl TapConfig {
    /// Set [`touch_boundary`](Self::touch_boundary).
    #[must_use]
    pub fn with_touch_boundary(mut self, touch_boundary: f64) -> Self {
        self.touch_boundary = touch_boundary;
        self
    }

    /// Set [`tap_delay`](Self::tap_delay).
    #[must_use]
    pub fn with_tap_delay(mut self, tap_delay: f64) -> Self {
        self.tap_delay = tap_delay;
        self
    }

    /// Set [`tap_timeout`](Self::tap_timeout).
    #[must_use]
    pub fn with_tap_timeout(mut self, tap_timeout: f64) -> Self {
        self.tap_timeout = tap_timeout;
        self
    }

    /// Set [`focus_grace`](Self::focus_grace).
    #[must_use]
    pub fn with_focus_grace(mut self, focus_grace: f64) -> Self {
        self.focus_grace = focus_grace;
        self
    }

    /// Check that every threshold is finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            (ConfigField::TouchBoundary, self.touch_boundary),
            (ConfigField::TapDelay, self.tap_delay),
            (ConfigField::TapTimeout, self.tap_timeout),
            (ConfigField::FocusGrace, self.focus_grace),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError { field, value });
            }
        }
        Ok(())
    }
}

/// Names a [`TapConfig`] threshold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConfigField {
    /// [`TapConfig::touch_boundary`]
    TouchBoundary,
    /// [`TapConfig::tap_delay`]
    TapDelay,
    /// [`TapConfig::tap_timeout`]
    TapTimeout,
    /// [`TapConfig::focus_grace`]
    FocusGrace,
}

impl ConfigField {
    fn name(self) -> &'static str {
        match self {
            Self::TouchBoundary => "touch_boundary",
            Self::TapDelay => "tap_delay",
            Self::TapTimeout => "tap_timeout",
            Self::FocusGrace => "focus_grace",
        }
    }
}

/// Error returned when a threshold is negative or not finite.
#[derive(Copy, Clone, PartialEq)]
pub struct ConfigError {
    /// The offending threshold.
    pub field: ConfigField,
    /// Its value.
    pub value: f64,
}

impl fmt::Debug for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError {{ field: {:?}, value: {:?} }}",
            self.field, self.value
        )
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` must be finite and non-negative, got {}",
            self.field.name(),
            self.value
        )
    }
}

impl core::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn defaults_match_documented_values() {
        let config = TapConfig::default();
        assert_eq!(config.touch_boundary, 10.0);
        assert_eq!(config.tap_delay, 200.0);
        assert_eq!(config.tap_timeout, 700.0);
        assert_eq!(config.focus_grace, 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_is_honored() {
        let config = TapConfig::default().with_touch_boundary(0.0);
        assert_eq!(config.touch_boundary, 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let err = TapConfig::default()
            .with_tap_timeout(-1.0)
            .validate()
            .unwrap_err();
        assert_eq!(err.field, ConfigField::TapTimeout);
        assert_eq!(
            err.to_string(),
            "`tap_timeout` must be finite and non-negative, got -1"
        );
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let err = TapConfig::default()
            .with_focus_grace(f64::NAN)
            .validate()
            .unwrap_err();
        assert_eq!(err.field, ConfigField::FocusGrace);

        let err = TapConfig::default()
            .with_tap_delay(f64::INFINITY)
            .validate()
            .unwrap_err();
        assert_eq!(err.field, ConfigField::TapDelay);
    }
}

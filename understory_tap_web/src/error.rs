// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use understory_tap::ConfigError;

/// Error returned when tap handling cannot be attached.
#[derive(Copy, Clone, PartialEq)]
pub enum AttachError {
    /// The configuration has an invalid threshold.
    InvalidConfig(ConfigError),
    /// There is no global `window`.
    NoWindow,
    /// The window has no `document`.
    NoDocument,
}

impl fmt::Debug for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(err) => write!(f, "AttachError::InvalidConfig({err:?})"),
            Self::NoWindow => f.write_str("AttachError::NoWindow"),
            Self::NoDocument => f.write_str("AttachError::NoDocument"),
        }
    }
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(err) => write!(f, "invalid tap configuration: {err}"),
            Self::NoWindow => f.write_str("no global `window` to attach to"),
            Self::NoDocument => f.write_str("the window has no `document`"),
        }
    }
}

impl core::error::Error for AttachError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            Self::NoWindow | Self::NoDocument => None,
        }
    }
}

impl From<ConfigError> for AttachError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

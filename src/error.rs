//! Error types shared across the crate.

use core::fmt;

use crate::arena::ElementHandle;
use crate::element::Role;

/// Setup-time configuration errors. These indicate a caller bug and are
/// reported before anything is scheduled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Fixed-width chase window wider than the chase's own range.
    WidthExceedsRange { width: u32, range: u32 },
    /// Speed must be positive when the chase speed is a rate.
    NonPositiveSpeed(f64),
    /// Frame rate must be positive.
    NonPositiveFrameRate(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::WidthExceedsRange { width, range } => {
                write!(f, "chase width {} exceeds chase range {}", width, range)
            }
            ConfigError::NonPositiveSpeed(speed) => {
                write!(f, "chase speed must be positive, got {}", speed)
            }
            ConfigError::NonPositiveFrameRate(rate) => {
                write!(f, "frame rate must be positive, got {}", rate)
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// No sampled time on a tween curve came close enough to the target value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpTimeNotFound {
    pub target: f64,
}

impl fmt::Display for JumpTimeNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no time on the curve produces value {}", self.target)
    }
}

impl core::error::Error for JumpTimeNotFound {}

/// Transport-level failure reported by an [`OutputDriver`](crate::OutputDriver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputError {
    /// The transport is not connected or not ready.
    Unavailable,
    /// The transport rejected the frame.
    Rejected(&'static str),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::Unavailable => write!(f, "output transport unavailable"),
            OutputError::Rejected(reason) => write!(f, "output transport rejected frame: {}", reason),
        }
    }
}

impl core::error::Error for OutputError {}

/// Failure to route an attribute write to an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeError {
    /// The handle does not refer to a live element.
    UnknownElement(ElementHandle),
    /// The element kind has no such settable attribute.
    Unsupported { element: ElementHandle, role: Role },
    /// The element refused the value.
    Invalid(ConfigError),
}

impl From<ConfigError> for AttributeError {
    fn from(err: ConfigError) -> Self {
        AttributeError::Invalid(err)
    }
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeError::UnknownElement(handle) => write!(f, "unknown element {:?}", handle),
            AttributeError::Unsupported { element, role } => {
                write!(f, "element {:?} has no {} attribute", element, role.as_str())
            }
            AttributeError::Invalid(err) => write!(f, "invalid attribute value: {}", err),
        }
    }
}

impl core::error::Error for AttributeError {}

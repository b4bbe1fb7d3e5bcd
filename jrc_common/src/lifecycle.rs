//! Controller lifecycle states and host-facing return codes.
//!
//! A controller is created `Unconfigured`, becomes `Inactive` after a
//! successful configure and `Active` after a successful activate. It never
//! changes state on its own; every transition is an explicit host call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LifecycleState {
    /// Created, or configuration failed / was cleaned up. Not activatable.
    #[default]
    Unconfigured = 0,
    /// Configured with valid parameters, interfaces not bound.
    Inactive = 1,
    /// Interfaces bound; `update` is legal.
    Active = 2,
}

impl LifecycleState {
    /// Convert from raw `u8`. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unconfigured),
            1 => Some(Self::Inactive),
            2 => Some(Self::Active),
            _ => None,
        }
    }

    /// Lowercase label used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Inactive => "inactive",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a lifecycle callback (`on_configure`, `on_activate`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackReturn {
    Success,
    Failure,
}

impl CallbackReturn {
    #[inline]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl<E> From<Result<(), E>> for CallbackReturn {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(_) => Self::Failure,
        }
    }
}

/// Result of a single control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    Ok,
    Error,
}

impl<E> From<Result<(), E>> for ReturnType {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::Ok,
            Err(_) => Self::Error,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unconfigured() {
        assert_eq!(LifecycleState::default(), LifecycleState::Unconfigured);
    }

    #[test]
    fn from_u8_matches_discriminants() {
        for state in [
            LifecycleState::Unconfigured,
            LifecycleState::Inactive,
            LifecycleState::Active,
        ] {
            assert_eq!(LifecycleState::from_u8(state as u8), Some(state));
        }
        assert_eq!(LifecycleState::from_u8(3), None);
    }

    #[test]
    fn display_uses_lowercase_label() {
        assert_eq!(LifecycleState::Inactive.to_string(), "inactive");
    }

    #[test]
    fn results_map_to_return_codes() {
        let ok: Result<(), &str> = Ok(());
        let err: Result<(), &str> = Err("boom");
        assert_eq!(CallbackReturn::from(ok), CallbackReturn::Success);
        assert_eq!(CallbackReturn::from(err), CallbackReturn::Failure);
        assert_eq!(ReturnType::from(ok), ReturnType::Ok);
        assert_eq!(ReturnType::from(err), ReturnType::Error);
        assert!(CallbackReturn::Success.is_success());
        assert!(!CallbackReturn::Failure.is_success());
    }
}

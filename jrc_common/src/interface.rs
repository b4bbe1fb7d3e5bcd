//! Host-owned interface slots and the loans handed to controllers.
//!
//! Hardware backends own one [`InterfaceSlot`] per exported value
//! (e.g. `fr3_joint3/velocity`). A controller never owns a slot; it receives
//! a [`StateInterface`] (read) or [`CommandInterface`] (read/write) loan and
//! drops it when deactivated.
//!
//! Slot values are `f64` stored as raw bits in an `AtomicU64`, so slots are
//! `Send + Sync` without locks. A slot can be marked unavailable by its owner
//! (e.g. a disconnected drive); reads and writes through loans then fail.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;

/// Interface access failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterfaceError {
    /// The owning hardware marked the slot unavailable.
    #[error("interface '{0}' is unavailable")]
    Unavailable(String),
}

/// Physical quantity carried by an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    #[default]
    Position,
    Velocity,
    Effort,
}

impl InterfaceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Velocity => "velocity",
            Self::Effort => "effort",
        }
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full interface name for a joint: `{arm_id}_joint{joint}/{kind}`.
///
/// `joint` is 1-based.
pub fn joint_interface_name(arm_id: &str, joint: usize, kind: InterfaceKind) -> String {
    format!("{arm_id}_joint{joint}/{kind}")
}

// ─── Slot ───────────────────────────────────────────────────────────

/// A single host-owned value cell.
#[derive(Debug)]
pub struct InterfaceSlot {
    name: String,
    bits: AtomicU64,
    available: AtomicBool,
}

impl InterfaceSlot {
    /// Create an available slot holding `0.0`.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            bits: AtomicU64::new(0.0f64.to_bits()),
            available: AtomicBool::new(true),
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner-side read, ignores availability.
    #[inline]
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Owner-side write, ignores availability.
    #[inline]
    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// Mark the slot (un)available to loan holders.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::Release);
    }

    fn checked_get(&self) -> Result<f64, InterfaceError> {
        if self.is_available() {
            Ok(self.get())
        } else {
            Err(InterfaceError::Unavailable(self.name.clone()))
        }
    }
}

// ─── Loans ──────────────────────────────────────────────────────────

/// Read-only loan of a state slot.
#[derive(Debug, Clone)]
pub struct StateInterface {
    slot: Arc<InterfaceSlot>,
}

impl StateInterface {
    pub fn new(slot: Arc<InterfaceSlot>) -> Self {
        Self { slot }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.slot.name()
    }

    #[inline]
    pub fn get_value(&self) -> Result<f64, InterfaceError> {
        self.slot.checked_get()
    }
}

/// Read/write loan of a command slot.
///
/// Not `Clone`: a command slot has exactly one writer at a time.
#[derive(Debug)]
pub struct CommandInterface {
    slot: Arc<InterfaceSlot>,
}

impl CommandInterface {
    pub fn new(slot: Arc<InterfaceSlot>) -> Self {
        Self { slot }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.slot.name()
    }

    #[inline]
    pub fn get_value(&self) -> Result<f64, InterfaceError> {
        self.slot.checked_get()
    }

    /// Fails exactly when [`set_value`](Self::set_value) would.
    #[inline]
    pub fn check_writable(&self) -> Result<(), InterfaceError> {
        if !self.slot.is_available() {
            return Err(InterfaceError::Unavailable(self.slot.name.clone()));
        }
        Ok(())
    }

    #[inline]
    pub fn set_value(&mut self, value: f64) -> Result<(), InterfaceError> {
        self.check_writable()?;
        self.slot.set(value);
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

//! Controller lifecycle transitions.
//!
//! Unconfigured → Inactive ↔ Active, with reconfiguration allowed from
//! Inactive and cleanup back to Unconfigured. A failed configure always lands
//! in Unconfigured so that a stale configuration can never be activated.

use jrc_common::lifecycle::LifecycleState;

/// Result of a lifecycle transition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Transition succeeded, new state.
    Ok(LifecycleState),
    /// Transition rejected, reason.
    Rejected(&'static str),
}

/// Event that can trigger a lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Parameters validated and stored.
    Configure,
    /// Parameter validation failed.
    ConfigureFailed,
    /// Interfaces bound, start pose captured.
    Activate,
    /// Interfaces released.
    Deactivate,
    /// Configuration dropped.
    Cleanup,
}

/// Lifecycle manager holding the current state.
#[derive(Debug, Clone, Default)]
pub struct LifecycleStateMachine {
    state: LifecycleState,
}

impl LifecycleStateMachine {
    /// Create a new state machine in Unconfigured state.
    pub const fn new() -> Self {
        Self {
            state: LifecycleState::Unconfigured,
        }
    }

    #[inline]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    #[inline]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, LifecycleState::Active)
    }

    /// Attempt a transition given an event.
    pub fn handle_event(&mut self, event: LifecycleEvent) -> TransitionResult {
        use LifecycleEvent::*;
        use LifecycleState::*;

        let next = match (self.state, event) {
            (Unconfigured | Inactive, Configure) => Inactive,
            (Unconfigured | Inactive, ConfigureFailed) => Unconfigured,
            (Inactive, Activate) => Active,
            (Active, Deactivate) => Inactive,
            (Inactive, Cleanup) => Unconfigured,
            _ => return TransitionResult::Rejected(invalid_transition_reason(self.state, event)),
        };

        self.state = next;
        TransitionResult::Ok(next)
    }
}

fn invalid_transition_reason(state: LifecycleState, event: LifecycleEvent) -> &'static str {
    use LifecycleEvent::*;
    use LifecycleState::*;
    match (state, event) {
        (Active, Configure | ConfigureFailed) => "Active: deactivate before reconfiguring",
        (Active, Activate) => "Active: already active",
        (Active, Cleanup) => "Active: deactivate before cleanup",
        (Unconfigured, Activate) => "Unconfigured: configure before activating",
        (Unconfigured, _) => "Unconfigured: only Configure allowed",
        (Inactive, _) => "Inactive: not active",
        (Active, _) => "Active: invalid event for current state",
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

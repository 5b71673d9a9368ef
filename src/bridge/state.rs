//! Session lifecycle
//!
//! The bridge owns at most one provider session. Its lifecycle is tracked as a
//! [`Phase`] with an explicit table of allowed transitions; the host only sees
//! the coarser [`BridgeState`].

use serde::{Deserialize, Serialize};

/// Lifecycle state visible to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BridgeState {
    #[default]
    Uninitialized,
    Scanning,
    Paused,
}

/// Why a session could not be established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    PermissionDenied,
    StartFailed,
}

/// Internal lifecycle of a bridge's session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No session and no permission request yet
    #[default]
    Uninitialized,
    /// Permission requested, answer outstanding
    AwaitingPermission,
    Scanning,
    Paused,
    /// Terminal: no session will ever be created for this bridge
    Unavailable(Unavailable),
}

impl Phase {
    /// Whether a provider session exists
    #[inline]
    pub fn has_session(self) -> bool {
        matches!(self, Phase::Scanning | Phase::Paused)
    }

    /// Host-facing view of this phase
    pub fn public(self) -> BridgeState {
        match self {
            Phase::Scanning => BridgeState::Scanning,
            Phase::Paused => BridgeState::Paused,
            Phase::Uninitialized | Phase::AwaitingPermission | Phase::Unavailable(_) => {
                BridgeState::Uninitialized
            }
        }
    }

    /// Check if a transition is allowed
    pub fn can_transition(self, to: Phase) -> bool {
        use Phase::*;
        match (self, to) {
            (Uninitialized, AwaitingPermission) => true,
            (AwaitingPermission, Scanning) => true,
            (AwaitingPermission, Unavailable(_)) => true,
            (Scanning, Paused) => true,
            (Paused, Scanning) => true,
            _ => false,
        }
    }
}

/// Tracks the current phase and rejects transitions outside the table
#[derive(Debug, Default)]
pub struct Lifecycle {
    phase: Phase,
}

impl Lifecycle {
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to `to`, returning `false` (and staying put) if not allowed
    pub fn advance(&mut self, to: Phase) -> bool {
        if !self.phase.can_transition(to) {
            return false;
        }
        self.phase = to;
        true
    }
}

// Session state machine for one submission
//
// Idle -> Submitted -> LocalPrecheck -> Rejected
//                                    -> CloudCall -> LocalPostcheck -> Displayed
// Submitted -> Stopped (soft stop before any call)
// LocalPrecheck | CloudCall -> Failed (strict failure mode only)

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Submitted,
    LocalPrecheck,
    Rejected,
    CloudCall,
    LocalPostcheck,
    Displayed,
    Stopped,
    Failed,
}

impl SessionState {
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Submitted)
                | (Submitted, LocalPrecheck)
                | (Submitted, Stopped)
                | (LocalPrecheck, Rejected)
                | (LocalPrecheck, CloudCall)
                | (LocalPrecheck, Failed)
                | (CloudCall, LocalPostcheck)
                | (CloudCall, Failed)
                | (LocalPostcheck, Displayed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Rejected
                | SessionState::Displayed
                | SessionState::Stopped
                | SessionState::Failed
        )
    }
}

/// Records the states a run passes through.
#[derive(Debug, Clone)]
pub struct StateTracker {
    current: SessionState,
    path: Vec<SessionState>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self {
            current: SessionState::Idle,
            path: vec![SessionState::Idle],
        }
    }

    pub fn current(&self) -> SessionState {
        self.current
    }

    pub fn advance(&mut self, next: SessionState) {
        if !self.current.can_transition_to(next) {
            tracing::error!("Invalid session transition {:?} -> {:?}", self.current, next);
            debug_assert!(false, "invalid transition {:?} -> {:?}", self.current, next);
        }
        tracing::debug!("Session state: {:?} -> {:?}", self.current, next);
        self.current = next;
        self.path.push(next);
    }

    pub fn into_path(self) -> Vec<SessionState> {
        self.path
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

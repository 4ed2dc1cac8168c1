//! Action state transitions.

use uuid::Uuid;

use super::events::ActionEvent;
use super::states::ActionPhase;

/// Represents a state transition result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTransition {
    pub from: ActionPhase,
    pub to: ActionPhase,
    pub event: ActionEvent,
    /// False when the event was ignored or left the phase unchanged.
    pub changed: bool,
}

/// Lifecycle of one action: `Idle -> Pending -> {Settled | Failed | Cancelled}`.
///
/// Guard failures move straight to `Failed` or `UpgradeRequired`. Outcome
/// events are only honoured for the request currently in flight, so a
/// superseded or cancelled request can never change the phase.
#[derive(Debug, Clone)]
pub struct ActionMachine {
    phase: ActionPhase,
    request_id: Option<Uuid>,
    error: Option<String>,
    history: Vec<StateTransition>,
    max_history: usize,
}

impl Default for ActionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionMachine {
    pub fn new() -> Self {
        Self {
            phase: ActionPhase::Idle,
            request_id: None,
            error: None,
            history: Vec::new(),
            max_history: 50,
        }
    }

    pub fn phase(&self) -> ActionPhase {
        self.phase
    }

    /// Request in flight, only while `Pending`.
    pub fn request_id(&self) -> Option<Uuid> {
        self.request_id
    }

    /// User-facing error from the last attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn history(&self) -> &[StateTransition] {
        &self.history
    }

    pub fn handle_event(&mut self, event: ActionEvent) -> StateTransition {
        let from = self.phase;
        let next = self.compute_next_phase(&event);

        if let Some(to) = next {
            self.phase = to;
            match &event {
                ActionEvent::Submitted { request_id } => {
                    self.request_id = Some(*request_id);
                    self.error = None;
                }
                ActionEvent::ValidationFailed { message } => {
                    self.request_id = None;
                    self.error = Some(message.clone());
                }
                ActionEvent::QuotaExceeded { limit } => {
                    self.request_id = None;
                    self.error = Some(format!(
                        "You have used all {limit} generations for this month. Upgrade to continue."
                    ));
                }
                ActionEvent::Failed { message, .. } => {
                    self.request_id = None;
                    self.error = Some(message.clone());
                }
                ActionEvent::Succeeded { .. } | ActionEvent::Cancelled { .. } => {
                    self.request_id = None;
                    self.error = None;
                }
            }
        }

        let transition = StateTransition {
            from,
            to: self.phase,
            changed: next.is_some() && from != self.phase,
            event,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        transition
    }

    /// `None` when the event does not apply to the current state.
    fn compute_next_phase(&self, event: &ActionEvent) -> Option<ActionPhase> {
        let current = |id: &Uuid| self.request_id.as_ref() == Some(id);

        match (self.phase, event) {
            // ========== Guards (any state) ==========
            (_, ActionEvent::ValidationFailed { .. }) => Some(ActionPhase::Failed),
            (_, ActionEvent::QuotaExceeded { .. }) => Some(ActionPhase::UpgradeRequired),

            // ========== Submit (supersedes a pending request) ==========
            (_, ActionEvent::Submitted { .. }) => Some(ActionPhase::Pending),

            // ========== Outcomes of the current request ==========
            (ActionPhase::Pending, ActionEvent::Succeeded { request_id }) if current(request_id) => {
                Some(ActionPhase::Settled)
            }
            (ActionPhase::Pending, ActionEvent::Failed { request_id, .. }) if current(request_id) => {
                Some(ActionPhase::Failed)
            }
            (ActionPhase::Pending, ActionEvent::Cancelled { request_id }) if current(request_id) => {
                Some(ActionPhase::Cancelled)
            }

            // ========== Default: No transition ==========
            _ => None,
        }
    }

    /// Check if an event would be honoured without applying it.
    pub fn can_handle(&self, event: &ActionEvent) -> bool {
        self.compute_next_phase(event).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_flow() {
        let mut sm = ActionMachine::new();
        assert_eq!(sm.phase(), ActionPhase::Idle);

        let id = Uuid::new_v4();
        let t1 = sm.handle_event(ActionEvent::Submitted { request_id: id });
        assert!(t1.changed);
        assert_eq!(sm.phase(), ActionPhase::Pending);
        assert_eq!(sm.request_id(), Some(id));

        let t2 = sm.handle_event(ActionEvent::Succeeded { request_id: id });
        assert!(t2.changed);
        assert_eq!(sm.phase(), ActionPhase::Settled);
        assert_eq!(sm.request_id(), None);
    }

    #[test]
    fn test_validation_failure_from_idle() {
        let mut sm = ActionMachine::new();
        sm.handle_event(ActionEvent::ValidationFailed {
            message: "Please upload a file".into(),
        });
        assert_eq!(sm.phase(), ActionPhase::Failed);
        assert_eq!(sm.error(), Some("Please upload a file"));
    }

    #[test]
    fn test_quota_exceeded() {
        let mut sm = ActionMachine::new();
        sm.handle_event(ActionEvent::QuotaExceeded { limit: 10 });
        assert_eq!(sm.phase(), ActionPhase::UpgradeRequired);
        assert!(sm.error().unwrap().contains("10"));
    }

    #[test]
    fn test_new_submit_clears_previous_error() {
        let mut sm = ActionMachine::new();
        let first = Uuid::new_v4();
        sm.handle_event(ActionEvent::Submitted { request_id: first });
        sm.handle_event(ActionEvent::Failed {
            request_id: first,
            message: "boom".into(),
        });
        assert_eq!(sm.error(), Some("boom"));

        sm.handle_event(ActionEvent::Submitted {
            request_id: Uuid::new_v4(),
        });
        assert_eq!(sm.error(), None);
        assert_eq!(sm.phase(), ActionPhase::Pending);
    }

    #[test]
    fn test_stale_outcome_is_ignored() {
        let mut sm = ActionMachine::new();
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        sm.handle_event(ActionEvent::Submitted { request_id: old });
        sm.handle_event(ActionEvent::Submitted { request_id: new });

        let t = sm.handle_event(ActionEvent::Succeeded { request_id: old });
        assert!(!t.changed);
        assert_eq!(sm.phase(), ActionPhase::Pending);
        assert_eq!(sm.request_id(), Some(new));
    }

    #[test]
    fn test_outcome_after_cancel_is_ignored() {
        let mut sm = ActionMachine::new();
        let id = Uuid::new_v4();
        sm.handle_event(ActionEvent::Submitted { request_id: id });
        sm.handle_event(ActionEvent::Cancelled { request_id: id });
        assert_eq!(sm.phase(), ActionPhase::Cancelled);

        assert!(!sm.can_handle(&ActionEvent::Failed {
            request_id: id,
            message: "late".into(),
        }));
        sm.handle_event(ActionEvent::Failed {
            request_id: id,
            message: "late".into(),
        });
        assert_eq!(sm.phase(), ActionPhase::Cancelled);
        assert_eq!(sm.error(), None);
    }

    #[test]
    fn test_history_is_capped() {
        let mut sm = ActionMachine::new();
        for _ in 0..60 {
            sm.handle_event(ActionEvent::Submitted {
                request_id: Uuid::new_v4(),
            });
        }
        assert_eq!(sm.history().len(), 50);
    }
}

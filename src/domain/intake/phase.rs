//! Per-session intake phase.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

use super::classifier::NextStep;

/// Where a session is in the request cycle.
///
/// `AwaitingReadiness` and `AwaitingAnswer` loop on themselves while the
/// user declines or answers. `Completing` is held only while retrieval and
/// generation run. `Done` means a record exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakePhase {
    #[default]
    AwaitingReadiness,
    AwaitingAnswer,
    Completing,
    Done,
}

impl IntakePhase {
    /// Phase implied by a classifier decision.
    pub fn after(step: &NextStep) -> Self {
        match step {
            NextStep::ReadinessCheck | NextStep::NotReady => IntakePhase::AwaitingReadiness,
            NextStep::Ask { .. } | NextStep::Clarify { .. } => IntakePhase::AwaitingAnswer,
            NextStep::Complete => IntakePhase::Completing,
        }
    }
}

impl StateMachine for IntakePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use IntakePhase::*;
        matches!(
            (self, target),
            (AwaitingReadiness, AwaitingReadiness)
                | (AwaitingReadiness, AwaitingAnswer)
                | (AwaitingReadiness, Completing)
                | (AwaitingAnswer, AwaitingAnswer)
                | (AwaitingAnswer, Completing)
                | (Completing, Done)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use IntakePhase::*;
        match self {
            AwaitingReadiness => vec![AwaitingReadiness, AwaitingAnswer, Completing],
            AwaitingAnswer => vec![AwaitingAnswer, Completing],
            Completing => vec![Done],
            Done => vec![],
        }
    }
}

//! Live (in-progress) intake session.
//!
//! A live session owns the append-only turn history for one user and one
//! session id. Once a record has been produced the phase is `Done` and the
//! session is kept only until the user deletes it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, SessionId, StateMachine, Timestamp, UserId,
};
use crate::domain::intake::{prompts::READINESS_PROMPT, IntakePhase, Turn};

/// Maximum characters of the first user turn used as a listing title.
pub const MAX_TITLE_CHARS: usize = 50;

/// Title shown before the user has said anything.
pub const UNTITLED: &str = "New consultation";

/// In-progress conversation for one user.
///
/// # Invariants
///
/// - `turns` is append-only
/// - `phase` only moves along `IntakePhase` edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveSession {
    id: SessionId,
    user_id: UserId,
    turns: Vec<Turn>,
    phase: IntakePhase,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl LiveSession {
    /// Creates a session seeded with the given history.
    pub fn new(id: SessionId, user_id: UserId, turns: Vec<Turn>) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            turns,
            phase: IntakePhase::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a fresh session whose only turn is the readiness prompt.
    pub fn started(user_id: UserId) -> Self {
        let greeting = Turn::assistant(READINESS_PROMPT)
            .map(|t| vec![t])
            .unwrap_or_default();
        Self::new(SessionId::new(), user_id, greeting)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn phase(&self) -> IntakePhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == IntakePhase::Done
    }

    pub fn message_count(&self) -> usize {
        self.turns.len()
    }

    pub fn has_user_turns(&self) -> bool {
        self.turns.iter().any(Turn::is_user)
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Listing title: the first user turn, truncated.
    pub fn title(&self) -> String {
        match self.turns.iter().find(|t| t.is_user()) {
            Some(turn) => truncate_title(turn.content()),
            None => UNTITLED.to_string(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a turn to the history.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.updated_at = Timestamp::now();
    }

    /// Appends a user turn unless the history already ends with it.
    ///
    /// Clients that send their full conversation often include the message
    /// they are submitting as the last entry.
    pub fn append_user_turn(&mut self, turn: Turn) {
        if self.turns.last() != Some(&turn) {
            self.append(turn);
        }
    }

    /// Moves to `target`.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the edge does not exist
    pub fn advance_to(&mut self, target: IntakePhase) -> Result<(), DomainError> {
        self.phase = self.phase.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
                .with_detail("session_id", self.id.to_string())
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

fn truncate_title(text: &str) -> String {
    if text.chars().count() <= MAX_TITLE_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_TITLE_CHARS).collect();
        format!("{}...", head.trim_end())
    }
}

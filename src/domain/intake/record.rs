//! The finalized outcome of a completed questionnaire.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    RecordId, SessionId, StateMachine, Timestamp, UserId, ValidationError,
};

use super::turn::Turn;

/// One question with the answer given to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Review lifecycle of a record.
///
/// Records start as `PendingReview` when a document was generated and as
/// `Pending` when generation failed and a human has to draft it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    PendingReview,
    Approved,
    Rejected,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::PendingReview => "pending_review",
            RecordStatus::Approved => "approved",
            RecordStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RecordStatus::Pending),
            "pending_review" => Ok(RecordStatus::PendingReview),
            "approved" => Ok(RecordStatus::Approved),
            "rejected" => Ok(RecordStatus::Rejected),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown record status '{}'", other),
            )),
        }
    }
}

impl StateMachine for RecordStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RecordStatus::*;
        matches!(
            (self, target),
            (Pending, PendingReview)
                | (Pending, Rejected)
                | (PendingReview, Approved)
                | (PendingReview, Rejected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RecordStatus::*;
        match self {
            Pending => vec![PendingReview, Rejected],
            PendingReview => vec![Approved, Rejected],
            Approved | Rejected => vec![],
        }
    }
}

/// A persisted, finalized intake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub id: RecordId,
    pub user_id: UserId,
    pub session_id: SessionId,
    pub title: String,
    pub pairs: Vec<QaPair>,
    pub document: Option<String>,
    pub status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl IntakeRecord {
    /// A record whose document was generated; goes to review.
    pub fn generated(
        user_id: UserId,
        session_id: SessionId,
        pairs: Vec<QaPair>,
        document: String,
    ) -> Self {
        Self::build(user_id, session_id, pairs, Some(document), RecordStatus::PendingReview)
    }

    /// A record whose generation failed; the answers are kept without a document.
    pub fn without_document(user_id: UserId, session_id: SessionId, pairs: Vec<QaPair>) -> Self {
        Self::build(user_id, session_id, pairs, None, RecordStatus::Pending)
    }

    fn build(
        user_id: UserId,
        session_id: SessionId,
        pairs: Vec<QaPair>,
        document: Option<String>,
        status: RecordStatus,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: RecordId::new(),
            user_id,
            session_id,
            title: format!(
                "Mitigation statement ({})",
                now.as_datetime().format("%-d %b %Y")
            ),
            pairs,
            document,
            status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Tombstones the record. Idempotent.
    pub fn soft_delete(&mut self) {
        if self.deleted_at.is_none() {
            let now = Timestamp::now();
            self.deleted_at = Some(now);
            self.updated_at = now;
        }
    }

    /// Moves the record through its review lifecycle.
    pub fn transition_to(&mut self, target: RecordStatus) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Rebuilds a chat-shaped transcript: each pair becomes a question turn
    /// followed by an answer turn, then the document if there is one.
    ///
    /// Pairs with blank text are skipped rather than failing the fetch.
    pub fn transcript(&self) -> Vec<Turn> {
        let mut turns = Vec::with_capacity(self.pairs.len() * 2 + 1);
        for pair in &self.pairs {
            if let (Ok(question), Ok(answer)) =
                (Turn::assistant(&*pair.question), Turn::user(&*pair.answer))
            {
                turns.push(question);
                turns.push(answer);
            }
        }
        if let Some(Ok(document)) = self.document.as_deref().map(Turn::assistant) {
            turns.push(document);
        }
        turns
    }
}

//! SendMessage command handler - the conversation orchestrator.
//!
//! One inbound user message drives one cycle:
//!
//! 1. Load the stored history (or seed it from the client's conversation)
//! 2. Append the message and classify the history
//! 3. Either reply with the next prompt, or on completion run retrieval and
//!    generation, persist an `IntakeRecord` and mark the session `Done`
//!
//! The assistant reply is appended to the stored history before returning.
//! Retrieval failures degrade to empty context. Generation failures still
//! persist the answers, as a `Pending` record without a document.

use std::sync::Arc;

use crate::application::IntakeError;
use crate::domain::foundation::{RecordId, SessionId, UserId};
use crate::domain::intake::{
    prompts::{completion_message, ALREADY_COMPLETE, DEGRADED_COMPLETION},
    Classification, ConversationClassifier, IntakePhase, IntakeRecord, NextStep, QaPair, Turn,
};
use crate::domain::session::LiveSession;
use crate::ports::{
    GenerationClient, GenerationContext, IntakeRecordRepository, RetrievalClient, SessionStore,
};

use super::session_locks::SessionLocks;

/// Number of reference cases fetched when none is configured.
pub const DEFAULT_TOP_K: usize = 5;

/// Command carrying one inbound user message.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub user_id: UserId,
    /// Absent for a brand-new conversation.
    pub session_id: Option<SessionId>,
    pub message: String,
    /// Client-held history. Only used when the store has nothing for the session.
    pub conversation: Vec<Turn>,
}

impl SendMessageCommand {
    pub fn new(user_id: UserId, message: impl Into<String>) -> Self {
        Self {
            user_id,
            session_id: None,
            message: message.into(),
            conversation: Vec::new(),
        }
    }

    pub fn in_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_conversation(mut self, conversation: Vec<Turn>) -> Self {
        self.conversation = conversation;
        self
    }
}

/// Reply for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageResult {
    pub session_id: SessionId,
    pub response: String,
    pub is_final: bool,
    /// Set when this message produced a record.
    pub record_id: Option<RecordId>,
}

/// Drives sessions through the questionnaire.
pub struct ConversationOrchestrator {
    classifier: Arc<ConversationClassifier>,
    sessions: Arc<dyn SessionStore>,
    records: Arc<dyn IntakeRecordRepository>,
    retrieval: Arc<dyn RetrievalClient>,
    generation: Arc<dyn GenerationClient>,
    locks: SessionLocks,
    top_k: usize,
}

impl ConversationOrchestrator {
    pub fn new(
        classifier: Arc<ConversationClassifier>,
        sessions: Arc<dyn SessionStore>,
        records: Arc<dyn IntakeRecordRepository>,
        retrieval: Arc<dyn RetrievalClient>,
        generation: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            classifier,
            sessions,
            records,
            retrieval,
            generation,
            locks: SessionLocks::new(),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<SendMessageResult, IntakeError> {
        if cmd.message.trim().is_empty() {
            return Err(IntakeError::EmptyMessage);
        }
        let message = Turn::user(cmd.message.as_str())?;
        let session_id = cmd.session_id.unwrap_or_default();
        let user_id = cmd.user_id;

        let _guard = self.locks.acquire(&user_id, &session_id).await;

        let mut session = match self.sessions.get(&user_id, &session_id).await? {
            Some(mut stored) => {
                if stored.is_done() {
                    return Ok(already_complete(session_id));
                }
                stored.append(message);
                stored
            }
            None => {
                // The live session may have expired after its record was written.
                if self
                    .records
                    .find_by_session(&user_id, &session_id)
                    .await?
                    .is_some()
                {
                    return Ok(already_complete(session_id));
                }
                let mut seeded = LiveSession::new(session_id, user_id.clone(), cmd.conversation);
                seeded.append_user_turn(message);
                seeded
            }
        };

        let classification = self.classifier.classify(session.turns());
        let step = self.classifier.decide(&classification);

        tracing::debug!(
            user_id = %user_id,
            session_id = %session_id,
            state = ?classification.state,
            answered = classification.answered_count,
            question = ?step.question_index(),
            "Classified conversation"
        );

        let Some(reply) = self.classifier.reply_for(&step)? else {
            // A previous attempt may have written the record but not the Done session.
            if self
                .records
                .find_by_session(&user_id, &session_id)
                .await?
                .is_some()
            {
                return self.close_completed(session).await;
            }
            return self.complete(session, &classification).await;
        };

        session.advance_to(IntakePhase::after(&step))?;
        session.append(Turn::assistant(reply.as_str())?);
        self.sessions.save(&session).await.map_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Failed to save session");
            IntakeError::from(e)
        })?;

        Ok(SendMessageResult {
            session_id,
            response: reply,
            is_final: false,
            record_id: None,
        })
    }

    async fn complete(
        &self,
        mut session: LiveSession,
        classification: &Classification,
    ) -> Result<SendMessageResult, IntakeError> {
        let session_id = *session.id();
        let user_id = session.user_id().clone();
        session.advance_to(IntakePhase::after(&NextStep::Complete))?;

        let pairs = self.classifier.answer_pairs(classification);
        let cases = match self.retrieval.query(&retrieval_query(&pairs), self.top_k).await {
            Ok(cases) => cases,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Retrieval failed, continuing without context");
                Vec::new()
            }
        };

        let ctx = GenerationContext {
            user_id: user_id.clone(),
            session_id,
        };
        let (record, reply) = match self.generation.generate(&ctx, &pairs, &cases).await {
            Ok(document) => {
                let reply = completion_message(&document);
                (
                    IntakeRecord::generated(user_id.clone(), session_id, pairs, document),
                    reply,
                )
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Generation failed, saving answers without a document");
                (
                    IntakeRecord::without_document(user_id.clone(), session_id, pairs),
                    DEGRADED_COMPLETION.to_string(),
                )
            }
        };

        self.records.save(&record).await.map_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Failed to save intake record");
            IntakeError::from(e)
        })?;

        session.append(Turn::assistant(reply.as_str())?);
        session.advance_to(IntakePhase::Done)?;
        self.sessions.save(&session).await.map_err(|e| {
            tracing::error!(session_id = %session_id, error = %e, "Failed to save completed session");
            IntakeError::from(e)
        })?;

        tracing::info!(
            user_id = %user_id,
            session_id = %session_id,
            record_id = %record.id,
            status = %record.status,
            pairs = record.pairs.len(),
            cases = cases.len(),
            "Intake completed"
        );

        Ok(SendMessageResult {
            session_id,
            response: reply,
            is_final: true,
            record_id: Some(record.id),
        })
    }
}

impl ConversationOrchestrator {
    /// Marks a session `Done` when its record already exists.
    async fn close_completed(
        &self,
        mut session: LiveSession,
    ) -> Result<SendMessageResult, IntakeError> {
        let session_id = *session.id();
        session.advance_to(IntakePhase::Completing)?;
        session.append(Turn::assistant(ALREADY_COMPLETE)?);
        session.advance_to(IntakePhase::Done)?;

        if let Err(e) = self.sessions.save(&session).await {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to close session with existing record");
        } else {
            tracing::info!(session_id = %session_id, "Closed session whose record already existed");
        }

        Ok(already_complete(session_id))
    }
}

fn already_complete(session_id: SessionId) -> SendMessageResult {
    SendMessageResult {
        session_id,
        response: ALREADY_COMPLETE.to_string(),
        is_final: true,
        record_id: None,
    }
}

/// The user's answers, joined into one query text.
fn retrieval_query(pairs: &[QaPair]) -> String {
    pairs
        .iter()
        .map(|p| p.answer.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

//! HTTP handlers for the chat endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::{
    ConversationOrchestrator, DeleteConversationCommand, DeleteConversationHandler,
    DeleteRecordCommand, DeleteRecordHandler, GetConversationHandler, GetConversationQuery,
    InitializeSessionCommand, InitializeSessionHandler, ListConversationsHandler,
    ListConversationsQuery, SendMessageCommand,
};
use crate::application::IntakeError;
use crate::domain::foundation::{RecordId, SessionId};
use crate::ports::{IntakeRecordRepository, SessionStore};

use super::dto::{
    ConversationDetailResponse, ConversationListResponse, DeleteResponse, ErrorResponse,
    InitSessionResponse, SendMessageRequest, SendMessageResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatHandlers {
    orchestrator: Arc<ConversationOrchestrator>,
    init_handler: Arc<InitializeSessionHandler>,
    list_handler: Arc<ListConversationsHandler>,
    get_handler: Arc<GetConversationHandler>,
    delete_conversation_handler: Arc<DeleteConversationHandler>,
    delete_record_handler: Arc<DeleteRecordHandler>,
}

impl ChatHandlers {
    pub fn new(
        orchestrator: Arc<ConversationOrchestrator>,
        init_handler: Arc<InitializeSessionHandler>,
        list_handler: Arc<ListConversationsHandler>,
        get_handler: Arc<GetConversationHandler>,
        delete_conversation_handler: Arc<DeleteConversationHandler>,
        delete_record_handler: Arc<DeleteRecordHandler>,
    ) -> Self {
        Self {
            orchestrator,
            init_handler,
            list_handler,
            get_handler,
            delete_conversation_handler,
            delete_record_handler,
        }
    }

    /// Builds the conversation handlers over the same stores the orchestrator uses.
    pub fn from_stores(
        orchestrator: Arc<ConversationOrchestrator>,
        sessions: Arc<dyn SessionStore>,
        records: Arc<dyn IntakeRecordRepository>,
    ) -> Self {
        Self::new(
            orchestrator,
            Arc::new(InitializeSessionHandler::new(sessions.clone())),
            Arc::new(ListConversationsHandler::new(sessions.clone(), records.clone())),
            Arc::new(GetConversationHandler::new(sessions.clone(), records.clone())),
            Arc::new(DeleteConversationHandler::new(sessions.clone(), records.clone())),
            Arc::new(DeleteRecordHandler::new(sessions, records)),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/chat/init - Start a session with the readiness prompt
pub async fn init_session(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ChatApiError> {
    let result = handlers
        .init_handler
        .handle(InitializeSessionCommand { user_id: user.id })
        .await?;

    Ok(Json(InitSessionResponse {
        session_id: result.session_id.to_string(),
    }))
}

/// POST /api/chat - Submit one message and get the next prompt
pub async fn send_message(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ChatApiError> {
    let Json(request) = payload?;
    let mut cmd = SendMessageCommand::new(user.id, request.message.clone())
        .with_conversation(request.turns());

    if let Some(raw) = request.session_id.as_deref().filter(|s| !s.trim().is_empty()) {
        cmd = cmd.in_session(parse_session_id(raw)?);
    }

    let result = handlers.orchestrator.handle(cmd).await?;

    Ok(Json(SendMessageResponse {
        response: result.response,
        session_id: result.session_id.to_string(),
        is_final: result.is_final,
    }))
}

/// GET /api/chat/conversations - List live sessions and finalized records
pub async fn list_conversations(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ChatApiError> {
    let summaries = handlers
        .list_handler
        .handle(ListConversationsQuery { user_id: user.id })
        .await?;

    Ok(Json(ConversationListResponse::from(summaries)))
}

/// GET /api/chat/conversations/:session_id - Full history of one conversation
pub async fn get_conversation(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id = parse_session_id(&session_id)?;

    let entry = handlers
        .get_handler
        .handle(GetConversationQuery {
            user_id: user.id,
            session_id,
        })
        .await?;

    Ok(Json(ConversationDetailResponse::from(entry)))
}

/// DELETE /api/chat/conversations/:session_id - Drop a session and tombstone its record
pub async fn delete_conversation(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id = parse_session_id(&session_id)?;

    handlers
        .delete_conversation_handler
        .handle(DeleteConversationCommand {
            user_id: user.id,
            session_id,
        })
        .await?;

    Ok(Json(DeleteResponse::deleted("Conversation deleted")))
}

/// DELETE /api/chat/orders/:record_id - Soft-delete a finalized record
pub async fn delete_record(
    State(handlers): State<ChatHandlers>,
    RequireAuth(user): RequireAuth,
    Path(record_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let record_id: RecordId = record_id
        .parse()
        .map_err(|_| ChatApiError::BadRequest("Invalid record ID".to_string()))?;

    handlers
        .delete_record_handler
        .handle(DeleteRecordCommand {
            user_id: user.id,
            record_id,
        })
        .await?;

    Ok(Json(DeleteResponse::deleted("Record deleted")))
}

fn parse_session_id(raw: &str) -> Result<SessionId, ChatApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ChatApiError::BadRequest("Invalid session ID".to_string()))
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum ChatApiError {
    BadRequest(String),
    NotFound(&'static str, String),
    Internal(String),
}

impl From<IntakeError> for ChatApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::EmptyMessage => ChatApiError::BadRequest(err.to_string()),
            IntakeError::Validation { .. } => ChatApiError::BadRequest(err.to_string()),
            IntakeError::SessionNotFound(id) => ChatApiError::NotFound("Conversation", id.to_string()),
            IntakeError::RecordNotFound(id) => ChatApiError::NotFound("Record", id.to_string()),
            IntakeError::Infrastructure(msg) => ChatApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ChatApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected chat request body");
        ChatApiError::BadRequest("Request body must be JSON with a string message".to_string())
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ChatApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            ChatApiError::NotFound(resource, id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found(resource, &id))
            }
            ChatApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Chat request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal("An internal error occurred"),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_bad_request() {
        let response = ChatApiError::from(IntakeError::EmptyMessage).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_session_is_not_found() {
        let err = ChatApiError::from(IntakeError::SessionNotFound(SessionId::new()));
        assert!(matches!(err, ChatApiError::NotFound("Conversation", _)));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn missing_record_is_not_found() {
        let err = ChatApiError::from(IntakeError::RecordNotFound(RecordId::new()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response =
            ChatApiError::from(IntakeError::infrastructure("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "INTERNAL_ERROR");
        assert!(!error.message.contains("connection refused"));
    }

    #[test]
    fn session_ids_must_be_uuids() {
        assert!(parse_session_id("not-a-uuid").is_err());
        let id = SessionId::new();
        assert_eq!(parse_session_id(&format!(" {} ", id)).unwrap(), id);
    }
}

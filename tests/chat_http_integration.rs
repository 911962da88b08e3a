//! Integration tests for the chat HTTP surface.
//!
//! Drives the assembled axum router end to end with in-memory stores, the
//! mock bearer-token validator and the mock AI provider.

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use mitigation_intake::adapters::ai::{
    GenerationSettings, MockAIProvider, MockError, StatementGenerator,
};
use mitigation_intake::adapters::auth::MockSessionValidator;
use mitigation_intake::adapters::http::{app_router, ChatHandlers};
use mitigation_intake::adapters::retrieval::InMemoryRetrievalClient;
use mitigation_intake::adapters::storage::{
    InMemoryIntakeRecordRepository, InMemorySessionStore,
};
use mitigation_intake::application::handlers::ConversationOrchestrator;
use mitigation_intake::config::ServerConfig;
use mitigation_intake::domain::intake::prompts::{
    completion_message, ALREADY_COMPLETE, CLARIFICATION_REQUEST, CONTINUE_PREFIX,
    DEGRADED_COMPLETION, NOT_READY_REPLY, READINESS_PROMPT, START_PREFIX,
};
use mitigation_intake::domain::intake::{ConversationClassifier, QuestionBank, ShortAnswerPolicy};

// =============================================================================
// Test Infrastructure
// =============================================================================

const TOKEN: &str = "token-alice";
const OTHER_TOKEN: &str = "token-bob";

struct TestApp {
    router: Router,
    provider: MockAIProvider,
    sessions: InMemorySessionStore,
    records: InMemoryIntakeRecordRepository,
    bank: QuestionBank,
}

fn small_bank() -> QuestionBank {
    QuestionBank::new(vec![
        "What is your profession?".to_string(),
        "Which regulator is involved?".to_string(),
        "What happened?".to_string(),
    ])
    .unwrap()
}

fn test_app(bank: QuestionBank, provider: MockAIProvider) -> TestApp {
    let sessions = InMemorySessionStore::new();
    let records = InMemoryIntakeRecordRepository::new();
    let retrieval = InMemoryRetrievalClient::new(vec![
        "A nurse facing a regulator hearing over a missed medication round".to_string(),
    ]);
    let generator =
        StatementGenerator::new(Arc::new(provider.clone()), GenerationSettings::default());

    let orchestrator = ConversationOrchestrator::new(
        Arc::new(ConversationClassifier::new(
            bank.clone(),
            ShortAnswerPolicy::LastAnswerOnly,
        )),
        Arc::new(sessions.clone()),
        Arc::new(records.clone()),
        Arc::new(retrieval),
        Arc::new(generator),
    );

    let handlers = ChatHandlers::from_stores(
        Arc::new(orchestrator),
        Arc::new(sessions.clone()),
        Arc::new(records.clone()),
    );
    let validator = MockSessionValidator::new()
        .with_test_user(TOKEN, "alice")
        .with_test_user(OTHER_TOKEN, "bob");

    TestApp {
        router: app_router(handlers, Arc::new(validator), &ServerConfig::default()),
        provider,
        sessions,
        records,
        bank,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn init(&self) -> String {
        let (status, body) = self.call(Method::POST, "/api/chat/init", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        body["sessionId"].as_str().unwrap().to_string()
    }

    async fn send(&self, session_id: &str, message: &str) -> Value {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/chat",
                Some(TOKEN),
                Some(json!({ "message": message, "sessionId": session_id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
        body
    }

    /// Affirms and answers every question. Returns the final response body.
    async fn complete_intake(&self, session_id: &str) -> Value {
        self.send(session_id, "yes").await;
        let mut last = Value::Null;
        for i in 0..self.bank.len() {
            last = self.send(session_id, &format!("My answer to question {}", i + 1)).await;
        }
        last
    }

    async fn conversations(&self) -> Vec<Value> {
        let (status, body) = self
            .call(Method::GET, "/api/chat/conversations", Some(TOKEN), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body["conversations"].as_array().unwrap().clone()
    }
}

// =============================================================================
// Health and authentication
// =============================================================================

#[tokio::test]
async fn health_needs_no_token() {
    let app = test_app(small_bank(), MockAIProvider::new());

    let (status, body) = app.call(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert!(body["uptime_secs"].is_u64());
}

#[tokio::test]
async fn chat_routes_require_a_token() {
    let app = test_app(small_bank(), MockAIProvider::new());

    let (status, body) = app.call(Method::POST, "/api/chat/init", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let (status, _) = app
        .call(Method::GET, "/api/chat/conversations", Some("forged"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .call(Method::POST, "/api/chat", None, Some(json!({ "message": "yes" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Intake flow
// =============================================================================

#[tokio::test]
async fn init_stores_readiness_prompt() {
    let app = test_app(small_bank(), MockAIProvider::new());
    let session_id = app.init().await;

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/chat/conversations/{}", session_id),
            Some(TOKEN),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isCompleted"], json!(false));
    assert_eq!(
        body["messages"],
        json!([{ "role": "assistant", "content": READINESS_PROMPT }])
    );
}

#[tokio::test]
async fn full_default_intake_produces_statement() {
    let provider = MockAIProvider::new().with_response("Drafted mitigation statement");
    let app = test_app(QuestionBank::default_bank(), provider);
    let n = app.bank.len();
    let session_id = app.init().await;

    let first = app.send(&session_id, "yes").await;
    assert_eq!(
        first["response"],
        format!("{}{}", START_PREFIX, app.bank.get(0).unwrap())
    );
    assert_eq!(first["isFinal"], json!(false));

    for i in 0..n - 1 {
        let body = app.send(&session_id, &format!("Answer number {}", i + 1)).await;
        assert_eq!(body["isFinal"], json!(false));
        assert_eq!(
            body["response"],
            format!("{}{}", CONTINUE_PREFIX, app.bank.get(i + 1).unwrap())
        );
        assert_eq!(body["sessionId"], session_id);
    }

    let last = app.send(&session_id, "The final answer").await;
    assert_eq!(last["isFinal"], json!(true));
    assert_eq!(
        last["response"],
        completion_message("Drafted mitigation statement")
    );
    assert_eq!(app.provider.call_count(), 1);

    let conversations = app.conversations().await;
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0]["sessionId"], session_id);
    assert_eq!(conversations[0]["isCompleted"], json!(true));
    assert_eq!(conversations[0]["status"], "pending_review");
    assert!(conversations[0]["recordId"].is_string());

    let (status, detail) = app
        .call(
            Method::GET,
            &format!("/api/chat/conversations/{}", session_id),
            Some(TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["isCompleted"], json!(true));
    let messages = detail["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2 * n + 3);
    assert_eq!(
        messages.last().unwrap()["content"],
        completion_message("Drafted mitigation statement")
    );
}

#[tokio::test]
async fn completed_session_never_generates_twice() {
    let app = test_app(small_bank(), MockAIProvider::new().with_response("Statement"));
    let session_id = app.init().await;
    app.complete_intake(&session_id).await;

    let again = app.send(&session_id, "One more thing to add").await;

    assert_eq!(again["response"], ALREADY_COMPLETE);
    assert_eq!(again["isFinal"], json!(true));
    assert_eq!(app.provider.call_count(), 1);
    assert_eq!(app.records.record_count().await, 1);
}

#[tokio::test]
async fn generation_failure_still_finishes() {
    let provider = MockAIProvider::new().with_error(MockError::Unavailable {
        message: "overloaded".into(),
    });
    let app = test_app(small_bank(), provider);
    let session_id = app.init().await;

    let last = app.complete_intake(&session_id).await;

    assert_eq!(last["isFinal"], json!(true));
    assert_eq!(last["response"], DEGRADED_COMPLETION);

    let conversations = app.conversations().await;
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0]["status"], "pending");
}

#[tokio::test]
async fn one_character_answer_asks_for_detail() {
    let app = test_app(small_bank(), MockAIProvider::new());
    let session_id = app.init().await;
    app.send(&session_id, "yes").await;

    let body = app.send(&session_id, "x").await;

    assert_eq!(body["isFinal"], json!(false));
    assert!(body["response"]
        .as_str()
        .unwrap()
        .starts_with(CLARIFICATION_REQUEST));
}

#[tokio::test]
async fn client_history_seeds_new_session() {
    let app = test_app(small_bank(), MockAIProvider::new());

    let (status, body) = app
        .call(
            Method::POST,
            "/api/chat",
            Some(TOKEN),
            Some(json!({
                "message": "yes",
                "conversation": [
                    { "role": "assistant", "content": READINESS_PROMPT },
                    { "role": "narrator", "content": "dropped" },
                    { "content": "no role" },
                    { "role": "user", "content": "yes" }
                ]
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["response"],
        format!("{}{}", START_PREFIX, app.bank.get(0).unwrap())
    );
    let session_id = body["sessionId"].as_str().unwrap();
    assert!(uuid::Uuid::parse_str(session_id).is_ok());
    assert_eq!(app.sessions.session_count().await, 1);
}

#[tokio::test]
async fn declining_does_not_start() {
    let app = test_app(small_bank(), MockAIProvider::new());
    let session_id = app.init().await;

    let body = app.send(&session_id, "not today").await;

    assert_eq!(body["isFinal"], json!(false));
    assert_eq!(body["response"], NOT_READY_REPLY);
}

// =============================================================================
// Request validation
// =============================================================================

#[tokio::test]
async fn blank_message_is_bad_request() {
    let app = test_app(small_bank(), MockAIProvider::new());

    let (status, body) = app
        .call(
            Method::POST,
            "/api/chat",
            Some(TOKEN),
            Some(json!({ "message": "   " })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(app.sessions.session_count().await, 0);
}

#[tokio::test]
async fn non_string_message_is_bad_request() {
    let app = test_app(small_bank(), MockAIProvider::new());

    let (status, body) = app
        .call(Method::POST, "/api/chat", Some(TOKEN), Some(json!({ "message": 42 })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn body_that_is_not_json_is_bad_request() {
    let app = test_app(small_bank(), MockAIProvider::new());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header("Authorization", format!("Bearer {}", TOKEN))
        .header("Content-Type", "application/json")
        .body(Body::from("message=hello"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(app.sessions.session_count().await, 0);
}

#[tokio::test]
async fn malformed_session_id_is_bad_request() {
    let app = test_app(small_bank(), MockAIProvider::new());

    let (status, _) = app
        .call(
            Method::POST,
            "/api/chat",
            Some(TOKEN),
            Some(json!({ "message": "yes", "sessionId": "session-1" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(Method::GET, "/api/chat/conversations/nope", Some(TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Listing, fetch and deletion
// =============================================================================

#[tokio::test]
async fn listing_is_scoped_and_newest_first() {
    let app = test_app(small_bank(), MockAIProvider::new());
    let older = app.init().await;
    app.send(&older, "yes").await;
    let untouched = app.init().await;
    let newer = app.init().await;
    app.send(&newer, "yes").await;

    let conversations = app.conversations().await;

    let ids: Vec<&str> = conversations
        .iter()
        .map(|c| c["sessionId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![newer.as_str(), older.as_str()]);
    assert!(!ids.contains(&untouched.as_str()));
    assert_eq!(conversations[0]["title"], "yes");
    assert_eq!(conversations[0]["messageCount"], 3);

    let (_, other) = app
        .call(Method::GET, "/api/chat/conversations", Some(OTHER_TOKEN), None)
        .await;
    assert_eq!(other["conversations"], json!([]));
}

#[tokio::test]
async fn other_users_cannot_read_a_session() {
    let app = test_app(small_bank(), MockAIProvider::new());
    let session_id = app.init().await;

    let (status, body) = app
        .call(
            Method::GET,
            &format!("/api/chat/conversations/{}", session_id),
            Some(OTHER_TOKEN),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn deleting_a_conversation_hides_it() {
    let app = test_app(small_bank(), MockAIProvider::new().with_response("Statement"));
    let session_id = app.init().await;
    app.complete_intake(&session_id).await;
    let uri = format!("/api/chat/conversations/{}", session_id);

    let (status, body) = app.call(Method::DELETE, &uri, Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, _) = app.call(Method::GET, &uri, Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.conversations().await.is_empty());

    let (status, _) = app.call(Method::DELETE, &uri, Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_order_removes_it_from_listing() {
    let app = test_app(small_bank(), MockAIProvider::new().with_response("Statement"));
    let session_id = app.init().await;
    app.complete_intake(&session_id).await;
    let record_id = app.conversations().await[0]["recordId"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!("/api/chat/orders/{}", record_id);

    let (status, _) = app.call(Method::DELETE, &uri, Some(OTHER_TOKEN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call(Method::DELETE, &uri, Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.conversations().await.is_empty());

    let (status, _) = app
        .call(
            Method::GET,
            &format!("/api/chat/conversations/{}", session_id),
            Some(TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call(Method::DELETE, &uri, Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_conversation_is_not_found() {
    let app = test_app(small_bank(), MockAIProvider::new());

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/chat/conversations/{}", uuid::Uuid::new_v4()),
            Some(TOKEN),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

//! Redis-backed session store for multi-server deployments.
//!
//! Each live session is one JSON string at `intake:session:{user}:{session}`.
//! A set at `intake:sessions:{user}` indexes the user's sessions for
//! listing. Every write refreshes the TTL on both keys, so abandoned
//! sessions age out on their own.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode, SessionId, UserId};
use crate::domain::session::LiveSession;
use crate::ports::SessionStore;

const KEY_PREFIX: &str = "intake";

/// Default lifetime of an idle session: seven days.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

fn session_key(user_id: &UserId, session_id: &SessionId) -> String {
    format!("{}:session:{}:{}", KEY_PREFIX, user_id, session_id)
}

fn index_key(user_id: &UserId) -> String {
    format!("{}:sessions:{}", KEY_PREFIX, user_id)
}

fn cache_error(err: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::CacheError, format!("Redis error: {}", err))
}

/// Redis session store.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(
        &self,
        user_id: &UserId,
        session_id: &SessionId,
    ) -> Result<Option<LiveSession>, DomainError> {
        let mut conn = self.conn.clone();
        let json: Option<String> = conn
            .get(session_key(user_id, session_id))
            .await
            .map_err(cache_error)?;

        json.map(|j| {
            serde_json::from_str(&j).map_err(|e| {
                DomainError::new(ErrorCode::CacheError, format!("Corrupt session: {}", e))
                    .with_detail("session_id", session_id.to_string())
            })
        })
        .transpose()
    }

    async fn save(&self, session: &LiveSession) -> Result<(), DomainError> {
        let json = serde_json::to_string(session).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Failed to encode session: {}", e))
        })?;
        let key = session_key(session.user_id(), session.id());
        let index = index_key(session.user_id());

        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(&key)
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .ignore()
            .cmd("SADD")
            .arg(&index)
            .arg(session.id().to_string())
            .ignore()
            .cmd("EXPIRE")
            .arg(&index)
            .arg(self.ttl_secs)
            .ignore()
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(cache_error)
    }

    async fn delete(&self, user_id: &UserId, session_id: &SessionId) -> Result<bool, DomainError> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn
            .del(session_key(user_id, session_id))
            .await
            .map_err(cache_error)?;
        conn.srem::<_, _, ()>(index_key(user_id), session_id.to_string())
            .await
            .map_err(cache_error)?;
        Ok(removed > 0)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<LiveSession>, DomainError> {
        let mut conn = self.conn.clone();
        let index = index_key(user_id);
        let ids: Vec<String> = conn.smembers(&index).await.map_err(cache_error)?;

        let mut sessions = Vec::with_capacity(ids.len());
        for raw in ids {
            let Ok(session_id) = raw.parse::<SessionId>() else {
                tracing::warn!(user_id = %user_id, entry = %raw, "Dropping malformed session index entry");
                conn.srem::<_, _, ()>(&index, &raw).await.map_err(cache_error)?;
                continue;
            };
            match self.get(user_id, &session_id).await? {
                Some(session) => sessions.push(session),
                None => {
                    // Session key expired before the index did.
                    conn.srem::<_, _, ()>(&index, &raw).await.map_err(cache_error)?;
                }
            }
        }
        Ok(sessions)
    }
}

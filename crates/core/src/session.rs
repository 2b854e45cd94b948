use std::collections::HashMap;
use std::sync::Arc;

use agentlink_llm::chat::ChatMessage;
use agentlink_llm::ToolContext;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

/// Conversation state for one (application, user) pair.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub app_name: String,
    pub user_id: String,
    pub history: Vec<ChatMessage>,
    pub tool_ctx: ToolContext,
}

impl Session {
    fn new(app_name: &str, user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            history: Vec::new(),
            tool_ctx: ToolContext::new(),
        }
    }
}

/// In-memory session store with create/get semantics, keyed by
/// (application, user). Nothing is evicted or persisted.
#[derive(Default)]
pub struct SessionService {
    sessions: RwLock<HashMap<(String, String), Arc<Mutex<Session>>>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, app_name: &str, user_id: &str) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&(app_name.to_string(), user_id.to_string()))
            .cloned()
    }

    pub async fn create(&self, app_name: &str, user_id: &str) -> Arc<Mutex<Session>> {
        let session = Arc::new(Mutex::new(Session::new(app_name, user_id)));
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            (app_name.to_string(), user_id.to_string()),
            session.clone(),
        );
        session
    }

    pub async fn get_or_create(&self, app_name: &str, user_id: &str) -> Arc<Mutex<Session>> {
        if let Some(session) = self.get(app_name, user_id).await {
            return session;
        }
        self.create(app_name, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_does_not_create() {
        let service = SessionService::new();
        assert!(service.get("app", "user").await.is_none());
    }

    #[tokio::test]
    async fn test_get_or_create_is_stable() {
        let service = SessionService::new();
        let first = service.get_or_create("app", "user").await;
        let second = service.get_or_create("app", "user").await;

        let first_id = first.lock().await.id;
        let second_id = second.lock().await.id;
        assert_eq!(first_id, second_id);
    }

    #[tokio::test]
    async fn test_sessions_are_keyed_by_app_and_user() {
        let service = SessionService::new();
        let a = service.get_or_create("app", "alice").await;
        let b = service.get_or_create("app", "bob").await;
        let c = service.get_or_create("other-app", "alice").await;

        let a_id = a.lock().await.id;
        assert_ne!(a_id, b.lock().await.id);
        assert_ne!(a_id, c.lock().await.id);
    }

    #[tokio::test]
    async fn test_history_survives_lookups() {
        let service = SessionService::new();
        {
            let session = service.get_or_create("app", "user").await;
            let mut session = session.lock().await;
            session
                .history
                .push(ChatMessage::user().content("remembered").build());
        }

        let session = service.get("app", "user").await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].content, "remembered");
    }
}

//! Per-conversation state and the store that keys it by session id.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::base::types::{Res, SessionId, Severity, TicketRequest};

/// Where a conversation is in the intake flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    AwaitGreeting,
    AwaitDescription,
    AwaitSeverity,
    AwaitCategory,
    AwaitConfirmation,
    Done,
}

/// The mutable state of one in-progress ticket conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub step: Step,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub category: Option<String>,
}

impl Session {
    pub fn new(id: impl Into<SessionId>) -> Self {
        Self {
            id: id.into(),
            step: Step::AwaitGreeting,
            description: None,
            severity: None,
            category: None,
        }
    }

    /// The completed ticket, once every field has been collected.
    pub fn ticket_request(&self) -> Res<TicketRequest> {
        match (&self.category, self.severity, &self.description) {
            (Some(category), Some(severity), Some(description)) => Ok(TicketRequest {
                category: category.clone(),
                severity,
                description: description.clone(),
            }),
            _ => Err(anyhow::anyhow!("Session `{}` is missing ticket fields at step {:?}.", self.id, self.step)),
        }
    }
}

/// A session shared between the store and the reply currently driving it.
pub type SessionSlot = Arc<Mutex<Session>>;

/// Active sessions, keyed by session id.
///
/// Each session sits behind its own lock, so replies for one session are
/// processed one at a time while different sessions proceed concurrently.
/// Sessions that are never finished stay here for the process lifetime.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, SessionSlot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the session for `id`, creating a fresh one if none is active.
    pub async fn checkout(&self, id: &str) -> SessionSlot {
        self.sessions.lock().await.entry(id.to_string()).or_insert_with(|| Arc::new(Mutex::new(Session::new(id)))).clone()
    }

    /// Forgets a finished session.
    pub async fn remove(&self, id: &str) {
        self.sessions.lock().await.remove(id);
    }

    /// A copy of the current state of an active session.
    pub async fn snapshot(&self, id: &str) -> Option<Session> {
        let slot = self.sessions.lock().await.get(id).cloned()?;
        let session = slot.lock().await.clone();

        Some(session)
    }

    /// Number of active sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn checkout_creates_once_per_id() {
        let store = SessionStore::new();

        let a = store.checkout("a").await;
        let again = store.checkout("a").await;
        let b = store.checkout("b").await;

        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.len().await, 2);
        assert_eq!(a.lock().await.step, Step::AwaitGreeting);
    }

    #[tokio::test]
    async fn remove_starts_over() {
        let store = SessionStore::new();

        store.checkout("a").await.lock().await.step = Step::AwaitCategory;
        assert_eq!(store.snapshot("a").await.unwrap().step, Step::AwaitCategory);

        store.remove("a").await;
        assert!(store.snapshot("a").await.is_none());
        assert_eq!(store.checkout("a").await.lock().await.step, Step::AwaitGreeting);
    }

    #[test]
    fn ticket_request_requires_all_fields() {
        let mut session = Session::new("a");
        session.description = Some("printer is broken".to_string());
        session.severity = Some(Severity::High);

        assert!(session.ticket_request().is_err());

        session.category = Some("hardware".to_string());
        let request = session.ticket_request().unwrap();

        assert_eq!(request.category, "hardware");
        assert_eq!(request.severity, Severity::High);
        assert_eq!(request.description, "printer is broken");
    }
}

pub mod console;
pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::{base::types::Void, interaction::conversation::Conversation, service::card::Card};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This is the boundary between the intake conversation and whatever delivers
/// text to the user. Outbound calls address a conversation by its session id;
/// inbound replies are handed to the [`Conversation`] passed to `start`.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the chat client listener.
    ///
    /// Every user message received is passed to `conversation.on_reply`,
    /// at most one in flight per session and in arrival order (transports that
    /// must not block go through `conversation.handle_reply`, which queues).
    async fn start(&self, conversation: Conversation) -> Void;

    /// Send a plain message.
    async fn send_text(&self, session_id: &str, text: &str) -> Void;

    /// Ask the user to pick one of `options`.
    async fn send_choice(&self, session_id: &str, text: &str, options: &[String]) -> Void;

    /// Ask the user a yes / no question.
    async fn send_confirmation(&self, session_id: &str, text: &str) -> Void;

    /// Send a confirmation card.
    async fn send_card(&self, session_id: &str, card: &Card) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}

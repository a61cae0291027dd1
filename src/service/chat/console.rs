//! Console chat client: one conversation over stdin and stdout.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, instrument};

use crate::{
    base::{prompts, types::Void},
    interaction::conversation::Conversation,
    service::card::Card,
};

use super::{ChatClient, GenericChatClient};

/// Session id used for the single console conversation.
pub const CONSOLE_SESSION_ID: &str = "console";

impl ChatClient {
    /// Creates a console chat client.
    pub fn console() -> Self {
        Self { inner: Arc::new(ConsoleChatClient) }
    }
}

struct ConsoleChatClient;

impl ConsoleChatClient {
    async fn write(&self, text: &str) -> Void {
        let mut stdout = tokio::io::stdout();

        stdout.write_all(format!("bot> {text}\n").as_bytes()).await?;
        stdout.flush().await?;

        Ok(())
    }
}

#[async_trait]
impl GenericChatClient for ConsoleChatClient {
    #[instrument(skip_all)]
    async fn start(&self, conversation: Conversation) -> Void {
        info!("Console transport ready; say anything to start.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        // Replies are handled inline, so a session never sees two at once.
        while let Some(line) = lines.next_line().await? {
            conversation.on_reply(CONSOLE_SESSION_ID, &line).await?;
        }

        info!("Console input closed.");

        Ok(())
    }

    async fn send_text(&self, _session_id: &str, text: &str) -> Void {
        self.write(text).await
    }

    async fn send_choice(&self, _session_id: &str, text: &str, options: &[String]) -> Void {
        self.write(&format!("{text}\n{}", prompts::render_options(options))).await
    }

    async fn send_confirmation(&self, _session_id: &str, text: &str) -> Void {
        self.write(&format!("{text}\n{}", prompts::CONFIRMATION_HINT)).await
    }

    async fn send_card(&self, _session_id: &str, card: &Card) -> Void {
        self.write(&card.text).await
    }
}

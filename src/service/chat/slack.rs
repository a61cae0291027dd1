//! Slack chat client for helpdesk-bot.
//!
//! Runs a socket mode listener; every user message becomes a reply for the
//! session `"{channel}/{user}"`, and prompts are posted back to that channel.
//! Choices, confirmations, and cards are rendered as text.

use crate::{
    base::{
        config::Config,
        prompts,
        types::{Res, Void},
    },
    interaction::conversation::Conversation,
    service::card::Card,
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Helpers.

/// Builds the session id for a user in a channel.
pub fn session_id(channel_id: &str, user_id: &str) -> String {
    format!("{channel_id}/{user_id}")
}

/// Extracts the channel a session lives in.
pub fn channel_of(session_id: &str) -> &str {
    session_id.split_once('/').map(|(channel, _)| channel).unwrap_or(session_id)
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    conversation: Conversation,
    bot_user_id: String,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub bot_user_id: String,
    pub client: Arc<FullClient>,
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID, so the bot ignores its own messages.

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;
        let bot_user_id = bot_user.user_id.0;

        info!("Slack bot user ID: {}", bot_user_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            client,
        })
    }

    /// Posts a message to the channel the session lives in.
    async fn post(&self, session_id: &str, text: String) -> Void {
        let message = SlackMessageContent::new().with_text(text);
        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_of(session_id).to_string()), message).with_link_names(true);

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    async fn start(&self, conversation: Conversation) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new()
            .with_command_events(handle_command_event)
            .with_interaction_events(handle_interaction_event)
            .with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            conversation,
            bot_user_id: self.bot_user_id.clone(),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register an app token to listen for events,
        socket_mode_listener.listen_for(&self.app_token).await?;

        // Start WS connections calling Slack API to get WS url for the token,
        // and wait for Ctrl-C to shutdown.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn send_text(&self, session_id: &str, text: &str) -> Void {
        self.post(session_id, text.to_string()).await
    }

    #[instrument(skip(self, text))]
    async fn send_choice(&self, session_id: &str, text: &str, options: &[String]) -> Void {
        self.post(session_id, format!("{text}\n{}", prompts::render_options(options))).await
    }

    #[instrument(skip(self, text))]
    async fn send_confirmation(&self, session_id: &str, text: &str) -> Void {
        self.post(session_id, format!("{text}\n{}", prompts::CONFIRMATION_HINT)).await
    }

    #[instrument(skip(self, card))]
    async fn send_card(&self, session_id: &str, card: &Card) -> Void {
        self.post(session_id, card.text.clone()).await
    }
}

// Socket mode listener callbacks for Slack.

/// Handles command events from Slack.
async fn handle_command_event(
    event: SlackCommandEvent,
    _client: Arc<SlackHyperClient>,
    _states: SlackClientEventsUserState,
) -> Result<SlackCommandEventResponse, Box<dyn std::error::Error + Send + Sync>> {
    warn!("[COMMAND] {:#?}", event);
    Ok(SlackCommandEventResponse::new(SlackMessageContent::new().with_text("No app commands are currently supported.".into())))
}

/// Handles interaction events from Slack.
async fn handle_interaction_event(event: SlackInteractionEvent, _client: Arc<SlackHyperClient>, _states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    warn!("[INTERACTION] {:#?}", event);
    Ok(())
}

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let event = event_callback.event;
    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    match event {
        SlackEventCallbackBody::Message(slack_message_event) => {
            // Edits, joins, and bot posts carry a subtype or a bot id; none of them are replies.
            if slack_message_event.subtype.is_some() || slack_message_event.sender.bot_id.is_some() {
                debug!("Skipping non-user message event.");
                return Ok(());
            }

            let Some(user_id) = slack_message_event.sender.user.as_ref().map(|u| u.0.to_owned()) else {
                warn!("Skipping message event without a user.");
                return Ok(());
            };

            if user_id == user_state.bot_user_id {
                debug!("Skipping message event from the bot itself.");
                return Ok(());
            }

            let channel_id = slack_message_event.origin.channel.as_ref().ok_or(anyhow::anyhow!("Failed to get channel ID"))?.0.to_owned();
            let text = slack_message_event.content.as_ref().and_then(|c| c.text.clone()).unwrap_or_default();

            info!("Received message event ...");

            user_state.conversation.handle_reply(session_id(&channel_id, &user_id), text);
        }
        _ => {
            warn!("Received unhandled push event.")
        }
    }

    Ok(())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_round_trip_to_channel() {
        let id = session_id("D0123", "U456");

        assert_eq!(id, "D0123/U456");
        assert_eq!(channel_of(&id), "D0123");
        assert_eq!(channel_of("D0123"), "D0123");
    }
}

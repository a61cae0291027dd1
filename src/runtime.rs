//! Runtime services and shared state for the helpdesk-bot.

use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::{
    base::{
        config::{Config, Transport},
        types::{Res, Void},
    },
    interaction::conversation::Conversation,
    service::{
        card::CardBuilder,
        chat::ChatClient,
        intake::IntakeClient,
        tickets::{TicketIntakeService, http},
    },
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the ticket service, the clients built on top of it, and
/// configuration. It is designed to be trivially cloneable, allowing it to be
/// passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The in-process ticket intake service.
    pub tickets: TicketIntakeService,
    /// The client conversations submit tickets through.
    pub intake: IntakeClient,
    /// The chat client instance, if a transport is configured.
    pub chat: Option<ChatClient>,
    /// The conversation handler, if a transport is configured.
    pub conversation: Option<Conversation>,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the ticket service.
        let tickets = TicketIntakeService::new();

        // Initialize the intake client: remote if an endpoint is configured, otherwise in-process.
        let intake = match &config.intake_endpoint {
            Some(endpoint) => IntakeClient::http(&config, endpoint)?,
            None => IntakeClient::local(tickets.clone()),
        };

        // Initialize the chat client.
        let chat = match config.transport {
            Transport::Console => Some(ChatClient::console()),
            Transport::Slack => Some(ChatClient::slack(&config).await?),
            Transport::None => None,
        };

        let conversation = chat.clone().map(|chat| Conversation::new(chat, intake.clone(), CardBuilder::adaptive(&config)));

        Ok(Self {
            config,
            tickets,
            intake,
            chat,
            conversation,
        })
    }

    /// Runs the submission endpoint (if configured) and the chat transport until either stops.
    pub async fn start(&self) -> Void {
        let listener = match &self.config.intake_listen_address {
            Some(address) => Some(TcpListener::bind(address).await?),
            None => None,
        };

        let endpoint = async {
            match listener {
                Some(listener) => http::serve(self.tickets.clone(), listener).await,
                None => std::future::pending().await,
            }
        };

        let transport = async {
            match (&self.chat, &self.conversation) {
                (Some(chat), Some(conversation)) => chat.start(conversation.clone()).await,
                _ => std::future::pending().await,
            }
        };

        tokio::select! {
            result = endpoint => result,
            result = transport => result,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down ...");
                Ok(())
            }
        }
    }
}

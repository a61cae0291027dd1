//! Drives intake conversations: looks up the session, advances the dialog, and
//! carries out the resulting action against the chat, intake, and card services.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::mpsc::{self, error::SendError};
use tracing::{Instrument, error, info, instrument, warn};

use crate::{
    base::{
        prompts,
        types::{Res, SessionId, TicketRequest, Void},
    },
    service::{card::CardBuilder, chat::ChatClient, intake::IntakeClient},
};

use super::{
    dialog::{self, Action, Prompt},
    session::{SessionStore, Step},
};

/// The intake conversation handler shared by every session.
///
/// This is trivially cloneable; clones share the same session store and reply queues.
#[derive(Clone)]
pub struct Conversation {
    chat: ChatClient,
    intake: IntakeClient,
    cards: CardBuilder,
    sessions: SessionStore,
    inboxes: Arc<Mutex<HashMap<SessionId, mpsc::UnboundedSender<String>>>>,
}

impl Conversation {
    pub fn new(chat: ChatClient, intake: IntakeClient, cards: CardBuilder) -> Self {
        Self {
            chat,
            intake,
            cards,
            sessions: SessionStore::new(),
            inboxes: Arc::default(),
        }
    }

    /// The active sessions.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handles a reply in the background.
    ///
    /// Used by transports whose event callbacks must return promptly. Replies
    /// for one session are queued and handled one after another, in the order
    /// they were handed in; different sessions proceed independently.
    #[instrument(skip(self, reply))]
    pub fn handle_reply(&self, session_id: String, reply: String) {
        let mut inboxes = self.inboxes.lock().unwrap_or_else(PoisonError::into_inner);

        // Queue behind the replies still pending for this session.
        let reply = match inboxes.get(&session_id) {
            Some(inbox) => match inbox.send(reply) {
                Ok(()) => return,
                Err(SendError(reply)) => reply,
            },
            None => reply,
        };

        let (inbox, pending) = mpsc::unbounded_channel();
        if inbox.send(reply).is_err() {
            return;
        }
        inboxes.insert(session_id.clone(), inbox);
        drop(inboxes);

        let conversation = self.clone();
        tokio::spawn(conversation.drain(session_id, pending).in_current_span());
    }

    /// Works through a session's queued replies, then retires the queue.
    async fn drain(self, session_id: SessionId, mut pending: mpsc::UnboundedReceiver<String>) {
        loop {
            let reply = match pending.try_recv() {
                Ok(reply) => reply,
                Err(_) => {
                    // Senders enqueue under the same lock, so an empty queue here stays empty.
                    let mut inboxes = self.inboxes.lock().unwrap_or_else(PoisonError::into_inner);

                    match pending.try_recv() {
                        Ok(reply) => reply,
                        Err(_) => {
                            inboxes.remove(&session_id);
                            return;
                        }
                    }
                }
            };

            // Process the reply.
            let result = self.on_reply(&session_id, &reply).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling: {}", err);
            }
        }
    }

    /// Handles one reply for a session and returns the step the session ends up at.
    ///
    /// The session's lock is held for the whole step, including any ticket
    /// submission and the final messages, so a session never processes two
    /// replies at once.
    #[instrument(skip(self, reply))]
    pub async fn on_reply(&self, session_id: &str, reply: &str) -> Res<Step> {
        loop {
            let slot = self.sessions.checkout(session_id).await;
            let mut session = slot.lock().await;

            // A reply that waited on a session that has since finished starts a new one.
            if session.step == Step::Done {
                continue;
            }

            let action = dialog::advance(&mut session, reply)?;
            let step = session.step;

            let result = self.perform(session_id, action).await;

            // Drop the finished session only once its last message is out.
            if step == Step::Done {
                self.sessions.remove(session_id).await;
            }

            result?;

            return Ok(step);
        }
    }

    /// Carries out a dialog action.
    async fn perform(&self, session_id: &str, action: Action) -> Void {
        match action {
            Action::Ask { notice, prompt } => {
                if let Some(notice) = notice {
                    self.chat.send_text(session_id, notice).await?;
                }

                match prompt {
                    Prompt::Text(text) => self.chat.send_text(session_id, &text).await,
                    Prompt::Choice { text, options } => self.chat.send_choice(session_id, &text, &options).await,
                    Prompt::Confirm(text) => self.chat.send_confirmation(session_id, &text).await,
                }
            }
            Action::Submit(request) => self.submit(session_id, request).await,
            Action::Decline => {
                info!("Ticket declined by user.");
                self.chat.send_text(session_id, prompts::NOT_CREATED).await
            }
        }
    }

    /// Submits the ticket once and reports the outcome to the user.
    async fn submit(&self, session_id: &str, request: TicketRequest) -> Void {
        let result = self.intake.submit(&request.category, request.severity, &request.description).await;

        match result {
            Ok(ticket_id) if ticket_id > 0 => {
                info!("Ticket {} created.", ticket_id);

                let card = self.cards.build(ticket_id, &request.category, request.severity, &request.description);
                self.chat.send_card(session_id, &card).await
            }
            Ok(ticket_id) => {
                warn!("Intake service returned invalid ticket id {}.", ticket_id);
                self.chat.send_text(session_id, prompts::SUBMIT_FAILED).await
            }
            Err(err) => {
                warn!("Ticket submission failed: {}", err);
                self.chat.send_text(session_id, prompts::SUBMIT_FAILED).await
            }
        }
    }
}

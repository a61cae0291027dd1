//! Confirmation cards shown once a ticket has been created.
//!
//! The conversation never looks inside a [`Card`]; it hands it to the chat
//! client as-is.

pub mod adaptive;

use std::{ops::Deref, sync::Arc};

use serde::Serialize;
use serde_json::Value;

use crate::base::types::{Severity, TicketId};

// Types.

/// A presentable confirmation artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// The ticket the card confirms.
    pub ticket_id: TicketId,
    /// Plain-text rendering, for transports that cannot show rich cards.
    pub text: String,
    /// Rich card payload.
    pub content: Value,
}

// Traits.

/// Generic card builder trait that builders must implement.
pub trait GenericCardBuilder: Send + Sync + 'static {
    /// Builds the confirmation card for a freshly created ticket.
    fn build(&self, ticket_id: TicketId, category: &str, severity: Severity, description: &str) -> Card;
}

// Structs.

/// Card builder for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct CardBuilder {
    inner: Arc<dyn GenericCardBuilder>,
}

impl Deref for CardBuilder {
    type Target = dyn GenericCardBuilder;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl CardBuilder {
    pub fn new(inner: Arc<dyn GenericCardBuilder>) -> Self {
        Self { inner }
    }
}

//! Adaptive card implementation of the card builder.

use std::sync::Arc;

use serde_json::json;

use crate::base::{
    config::Config,
    prompts,
    types::{Severity, TicketId},
};

use super::{Card, CardBuilder, GenericCardBuilder};

/// Content type transports use to attach the card.
pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

impl CardBuilder {
    /// Creates an adaptive card builder from the configuration.
    pub fn adaptive(config: &Config) -> Self {
        Self {
            inner: Arc::new(AdaptiveCardBuilder {
                image_url: config.card_image_url.clone(),
            }),
        }
    }
}

/// Builds adaptive cards: a header, a fact set with an image, and the description.
pub struct AdaptiveCardBuilder {
    pub image_url: String,
}

impl GenericCardBuilder for AdaptiveCardBuilder {
    fn build(&self, ticket_id: TicketId, category: &str, severity: Severity, description: &str) -> Card {
        let title = prompts::card_title(ticket_id);

        let content = json!({
            "type": "AdaptiveCard",
            "version": "1.0",
            "body": [
                {
                    "type": "TextBlock",
                    "text": title,
                    "weight": "bolder",
                    "size": "large",
                    "speak": prompts::card_speak(ticket_id),
                },
                {
                    "type": "ColumnSet",
                    "separation": "strong",
                    "columns": [
                        {
                            "type": "Column",
                            "size": "1",
                            "items": [
                                {
                                    "type": "FactSet",
                                    "facts": [
                                        { "title": "Severity:", "value": severity.as_str() },
                                        { "title": "Category:", "value": category },
                                    ],
                                },
                            ],
                        },
                        {
                            "type": "Column",
                            "size": "auto",
                            "items": [
                                {
                                    "type": "Image",
                                    "url": self.image_url,
                                    "size": "small",
                                    "horizontalAlignment": "right",
                                },
                            ],
                        },
                    ],
                },
                {
                    "type": "TextBlock",
                    "text": description,
                    "wrap": true,
                },
            ],
        });

        let text = format!("*{title}*\nSeverity: {severity}\nCategory: {category}\n\n{description}");

        Card { ticket_id, text, content }
    }
}

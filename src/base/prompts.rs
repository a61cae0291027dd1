//! User-facing text for the ticket intake conversation.

use crate::base::types::{TicketId, TicketRequest};

/// Sent once, when a user first talks to the bot.
pub const GREETING: &str = "Hi! I'm the help desk bot and I can help you create a ticket.";

/// Asks for the free-text problem description.
pub const DESCRIPTION_PROMPT: &str = "First, please briefly describe your problem to me.";

/// Asks for the severity; offered as a closed choice.
pub const SEVERITY_PROMPT: &str = "Which is the severity of this problem?";

/// Asks for the free-text category.
pub const CATEGORY_PROMPT: &str = "Which would be the category for this ticket (software, hardware, networking, security or other)?";

/// Sent ahead of a re-issued choice prompt.
pub const INVALID_CHOICE: &str = "I didn't understand. Please choose an option from the list.";

/// Sent ahead of a re-issued confirmation prompt.
pub const INVALID_CONFIRMATION: &str = "I didn't understand. Please answer yes or no.";

/// Sent ahead of a re-issued free-text prompt when the reply was blank.
pub const EMPTY_REPLY: &str = "I didn't catch that.";

/// Final message when the submission fails.
pub const SUBMIT_FAILED: &str = "Ooops! Something went wrong while I was saving your ticket. Please try again later.";

/// Final message when the user declines the summary.
pub const NOT_CREATED: &str = "Ok. The ticket was not created. You can start again if you want.";

/// Builds the summary the user is asked to confirm.
pub fn confirmation_summary(request: &TicketRequest) -> String {
    format!(
        "Great! I'm going to create a \"{}\" severity ticket in the \"{}\" category. The description I will use is \"{}\". Can you please confirm that this information is correct?",
        request.severity, request.category, request.description
    )
}

/// Builds the header line of the confirmation card.
pub fn card_title(ticket_id: TicketId) -> String {
    format!("Ticket #{ticket_id}")
}

/// Builds the spoken text of the confirmation card.
pub fn card_speak(ticket_id: TicketId) -> String {
    format!("<s>You've created a new Ticket #{ticket_id}</s><s>We will contact you soon.</s>")
}

/// Renders a severity choice list for transports without native buttons.
pub fn render_options(options: &[String]) -> String {
    let options = options.iter().map(|o| format!("`{o}`")).collect::<Vec<_>>().join(", ");

    format!("Options: {options}")
}

/// Renders the accepted confirmation answers for transports without native buttons.
pub const CONFIRMATION_HINT: &str = "Please reply `yes` or `no`.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::types::Severity;

    #[test]
    fn summary_mentions_all_fields() {
        let request = TicketRequest {
            category: "hardware".to_string(),
            severity: Severity::High,
            description: "printer is broken".to_string(),
        };

        let summary = confirmation_summary(&request);

        assert!(summary.contains("\"high\" severity"));
        assert!(summary.contains("\"hardware\" category"));
        assert!(summary.contains("\"printer is broken\""));
    }

    #[test]
    fn options_render_as_code_spans() {
        assert_eq!(render_options(&Severity::options()), "Options: `high`, `normal`, `low`");
    }
}

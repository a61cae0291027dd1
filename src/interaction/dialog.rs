//! The intake dialog as a dispatch table over [`Step`].
//!
//! [`advance`] consumes one reply, mutates the session, and returns the single
//! [`Action`] the conversation must carry out. It performs no I/O, so every
//! step's entry and exit conditions can be exercised directly.

use crate::base::{
    prompts,
    types::{Res, Severity, TicketRequest},
};

use super::session::{Session, Step};

/// An outbound question, paired with the rule for reading the next reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// Any non-empty text is accepted.
    Text(String),
    /// One of a closed set of options.
    Choice { text: String, options: Vec<String> },
    /// Yes or no.
    Confirm(String),
}

/// What the conversation must do after a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send `notice` (if any) then `prompt`, and wait for the next reply.
    Ask { notice: Option<&'static str>, prompt: Prompt },
    /// Submit the ticket; the session is finished.
    Submit(TicketRequest),
    /// The user declined; the session is finished.
    Decline,
}

/// Consumes one reply for `session`.
pub fn advance(session: &mut Session, reply: &str) -> Res<Action> {
    match session.step {
        Step::AwaitGreeting => Ok(on_greeting(session)),
        Step::AwaitDescription => Ok(on_description(session, reply)),
        Step::AwaitSeverity => Ok(on_severity(session, reply)),
        Step::AwaitCategory => on_category(session, reply),
        Step::AwaitConfirmation => on_confirmation(session, reply),
        Step::Done => Err(anyhow::anyhow!("Session `{}` is already finished.", session.id)),
    }
}

// Step handlers.

fn on_greeting(session: &mut Session) -> Action {
    session.step = Step::AwaitDescription;

    Action::Ask {
        notice: Some(prompts::GREETING),
        prompt: description_prompt(),
    }
}

fn on_description(session: &mut Session, reply: &str) -> Action {
    let Some(description) = free_text(reply) else {
        return reprompt(prompts::EMPTY_REPLY, description_prompt());
    };

    session.description = Some(description);
    session.step = Step::AwaitSeverity;

    Action::Ask { notice: None, prompt: severity_prompt() }
}

fn on_severity(session: &mut Session, reply: &str) -> Action {
    let Ok(severity) = reply.parse::<Severity>() else {
        return reprompt(prompts::INVALID_CHOICE, severity_prompt());
    };

    session.severity = Some(severity);
    session.step = Step::AwaitCategory;

    Action::Ask { notice: None, prompt: category_prompt() }
}

fn on_category(session: &mut Session, reply: &str) -> Res<Action> {
    let Some(category) = free_text(reply) else {
        return Ok(reprompt(prompts::EMPTY_REPLY, category_prompt()));
    };

    session.category = Some(category);
    let request = session.ticket_request()?;
    session.step = Step::AwaitConfirmation;

    Ok(Action::Ask {
        notice: None,
        prompt: Prompt::Confirm(prompts::confirmation_summary(&request)),
    })
}

fn on_confirmation(session: &mut Session, reply: &str) -> Res<Action> {
    let Some(confirmed) = parse_confirmation(reply) else {
        let request = session.ticket_request()?;
        return Ok(reprompt(prompts::INVALID_CONFIRMATION, Prompt::Confirm(prompts::confirmation_summary(&request))));
    };

    let request = session.ticket_request()?;
    session.step = Step::Done;

    if confirmed { Ok(Action::Submit(request)) } else { Ok(Action::Decline) }
}

// Helpers.

fn description_prompt() -> Prompt {
    Prompt::Text(prompts::DESCRIPTION_PROMPT.to_string())
}

fn severity_prompt() -> Prompt {
    Prompt::Choice {
        text: prompts::SEVERITY_PROMPT.to_string(),
        options: Severity::options(),
    }
}

fn category_prompt() -> Prompt {
    Prompt::Text(prompts::CATEGORY_PROMPT.to_string())
}

fn reprompt(notice: &'static str, prompt: Prompt) -> Action {
    Action::Ask { notice: Some(notice), prompt }
}

/// Accepts any reply that is not blank, trimmed of surrounding whitespace.
fn free_text(reply: &str) -> Option<String> {
    let reply = reply.trim();

    (!reply.is_empty()).then(|| reply.to_string())
}

/// Reads a yes / no answer.
pub fn parse_confirmation(reply: &str) -> Option<bool> {
    match reply.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "yeah" | "yep" | "sure" | "ok" | "okay" | "true" | "confirm" => Some(true),
        "no" | "n" | "nope" | "false" | "cancel" => Some(false),
        _ => None,
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    /// Feeds `replies` into a fresh session, recording the step after each one.
    fn run(replies: &[&str]) -> (Session, Vec<Step>, Vec<Action>) {
        let mut session = Session::new("test");
        let mut steps = vec![session.step];
        let mut actions = Vec::new();

        for reply in replies {
            actions.push(advance(&mut session, reply).unwrap());
            steps.push(session.step);
        }

        (session, steps, actions)
    }

    fn is_ordered_subsequence(steps: &[Step]) -> bool {
        steps.windows(2).all(|w| w[0] <= w[1])
    }

    #[test]
    fn happy_path_visits_every_step_in_order() {
        let (session, steps, actions) = run(&["hi", "printer is broken", "high", "hardware", "yes"]);

        assert_eq!(
            steps,
            vec![
                Step::AwaitGreeting,
                Step::AwaitDescription,
                Step::AwaitSeverity,
                Step::AwaitCategory,
                Step::AwaitConfirmation,
                Step::Done
            ]
        );

        assert_eq!(
            actions[0],
            Action::Ask {
                notice: Some(prompts::GREETING),
                prompt: Prompt::Text(prompts::DESCRIPTION_PROMPT.to_string())
            }
        );
        assert!(matches!(&actions[1], Action::Ask { prompt: Prompt::Choice { options, .. }, .. } if options == &["high", "normal", "low"]));
        assert!(matches!(&actions[3], Action::Ask { prompt: Prompt::Confirm(text), .. } if text.contains("printer is broken")));
        assert_eq!(
            actions[4],
            Action::Submit(TicketRequest {
                category: "hardware".to_string(),
                severity: Severity::High,
                description: "printer is broken".to_string(),
            })
        );
        assert_eq!(session.severity, Some(Severity::High));
    }

    #[test]
    fn unknown_severity_reprompts_and_stays_unset() {
        let (session, steps, actions) = run(&["hi", "printer is broken", "urgent"]);

        assert_eq!(session.step, Step::AwaitSeverity);
        assert_eq!(session.severity, None);
        let Action::Ask { prompt: severity_prompt, .. } = &actions[1] else {
            panic!("expected the severity prompt");
        };
        assert_eq!(
            actions[2],
            Action::Ask {
                notice: Some(prompts::INVALID_CHOICE),
                prompt: severity_prompt.clone()
            }
        );
        assert_eq!(steps.last(), Some(&Step::AwaitSeverity));
    }

    #[test]
    fn severity_recovers_after_reprompt() {
        let (session, steps, _) = run(&["hi", "printer is broken", "urgent", "meh", " Normal ", "software"]);

        assert_eq!(session.severity, Some(Severity::Normal));
        assert_eq!(session.step, Step::AwaitConfirmation);
        assert!(is_ordered_subsequence(&steps));
    }

    #[test]
    fn decline_finishes_without_submitting() {
        let (session, _, actions) = run(&["hi", "printer is broken", "low", "hardware", "No"]);

        assert_eq!(session.step, Step::Done);
        assert_eq!(actions.last(), Some(&Action::Decline));
    }

    #[test]
    fn unclear_confirmation_reprompts_at_the_same_step() {
        let (session, steps, actions) = run(&["hi", "printer is broken", "low", "hardware", "maybe"]);

        assert_eq!(session.step, Step::AwaitConfirmation);
        assert!(matches!(actions.last(), Some(Action::Ask { notice: Some(prompts::INVALID_CONFIRMATION), prompt: Prompt::Confirm(_) })));
        assert!(is_ordered_subsequence(&steps));
    }

    #[test]
    fn blank_free_text_reprompts() {
        let (session, _, actions) = run(&["hi", "   "]);

        assert_eq!(session.step, Step::AwaitDescription);
        assert_eq!(session.description, None);
        assert!(matches!(actions.last(), Some(Action::Ask { notice: Some(prompts::EMPTY_REPLY), prompt: Prompt::Text(_) })));
    }

    #[test]
    fn free_text_keeps_control_characters() {
        let (session, _, _) = run(&["hi", "  beep\u{7}\tboop  ", "high", "hard\nware"]);

        assert_eq!(session.description.as_deref(), Some("beep\u{7}\tboop"));
        assert_eq!(session.category.as_deref(), Some("hard\nware"));
    }

    #[test]
    fn any_greeting_starts_the_flow() {
        let (session, _, _) = run(&[""]);

        assert_eq!(session.step, Step::AwaitDescription);
    }

    #[test]
    fn finished_sessions_refuse_replies() {
        let (mut session, _, _) = run(&["hi", "printer is broken", "high", "hardware", "yes"]);

        assert!(advance(&mut session, "hello again").is_err());
    }

    #[test]
    fn random_replies_never_skip_steps() {
        let replies = ["hi", "", "urgent", "high", "maybe", "yes", "no", "hardware", " ", "LOW", "nope"];

        // Deterministic pseudo-random walk over the reply alphabet.
        let mut state = 0x2545_f491_u32;
        for _ in 0..200 {
            let mut session = Session::new("walk");
            let mut steps = vec![session.step];

            while session.step != Step::Done && steps.len() < 64 {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;

                let reply = replies[state as usize % replies.len()];
                advance(&mut session, reply).unwrap();
                steps.push(session.step);
            }

            assert!(is_ordered_subsequence(&steps));
            assert!(steps.windows(2).all(|w| w[1] as u8 <= w[0] as u8 + 1));
        }
    }

    #[test]
    fn confirmation_vocabulary() {
        for yes in ["yes", "Y", " ok ", "Sure", "TRUE"] {
            assert_eq!(parse_confirmation(yes), Some(true), "{yes}");
        }

        for no in ["no", "N", "nope", "False", "cancel"] {
            assert_eq!(parse_confirmation(no), Some(false), "{no}");
        }

        assert_eq!(parse_confirmation("maybe"), None);
        assert_eq!(parse_confirmation(""), None);
    }
}

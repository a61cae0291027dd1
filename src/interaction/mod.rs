//! Conversation handling for helpdesk-bot.
//!
//! This module turns incoming user replies into the intake flow:
//! - Tracking each conversation's collected fields and current step
//! - Deciding the next prompt for a reply
//! - Coordinating the chat, intake, and card services once a ticket is confirmed

pub mod conversation;
pub mod dialog;
pub mod session;

//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services the helpdesk-bot talks to:
//! - Chat services (e.g., Slack, the console)
//! - Ticket intake clients (HTTP, in-process)
//! - The in-memory ticket intake service and its HTTP endpoint
//! - Confirmation card builders
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod card;
pub mod chat;
pub mod intake;
pub mod tickets;

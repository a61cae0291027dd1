//! Core components, types, and utilities for the helpdesk-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - User-facing prompt text for the intake conversation.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;

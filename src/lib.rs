//! Library root for `helpdesk-bot`.
//!
//! Helpdesk-bot walks a user through filing a help-desk ticket:
//! - Greets the user and asks for a problem description
//! - Asks for a severity (high, normal, or low) and a category
//! - Confirms the summary, then submits the ticket to the intake service
//! - Replies with a confirmation card carrying the assigned ticket id
//!
//! The bot talks to users over Slack or the console, and submits tickets to an
//! in-memory intake service, either in process or over HTTP. The architecture
//! is built around extensible traits that allow for different implementations
//! of each service.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use base::{
    config::{Config, Transport},
    types::Void,
};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the helpdesk-bot runtime:
/// - Initializes the crypto provider (for the Slack transport)
/// - Creates the runtime context with the ticket service, intake, and chat clients
/// - Starts the submission endpoint and the conversation transport
pub async fn start(config: Config) -> Void {
    info!("Starting helpdesk-bot ...");

    // Start the crypto provider; it may already be installed.
    if config.transport == Transport::Slack {
        let _ = crypto::ring::default_provider().install_default();
    }

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}

//! HTTP intake client for a remote ticket submission endpoint.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::base::{
    config::Config,
    types::{Res, Severity, TicketId, TicketRequest},
};

use super::{GenericIntakeClient, IntakeClient};

// Extra methods on `IntakeClient` applied by the http implementation.

impl IntakeClient {
    /// Creates an intake client that posts to `endpoint`.
    pub fn http(config: &Config, endpoint: &str) -> Res<Self> {
        let client = HttpIntakeClient::new(endpoint, Duration::from_secs(config.intake_timeout_secs))?;
        Ok(Self { inner: Arc::new(client) })
    }
}

/// Reqwest-backed intake client.
#[derive(Clone)]
pub struct HttpIntakeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpIntakeClient {
    #[instrument(name = "HttpIntakeClient::new", skip_all)]
    pub fn new(endpoint: &str, timeout: Duration) -> Res<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl GenericIntakeClient for HttpIntakeClient {
    #[instrument(skip(self, description))]
    async fn submit(&self, category: &str, severity: Severity, description: &str) -> Res<TicketId> {
        let request = TicketRequest {
            category: category.to_string(),
            severity,
            description: description.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to submit ticket: {}", e))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("Intake service rejected ticket: {}", e))?;

        let body = response.text().await?;
        debug!("Intake service responded with `{}`.", body);

        parse_ticket_id(&body)
    }
}

/// Parses the id returned by the submission endpoint.
///
/// The body is the id as text; a JSON string (`"7"`) is accepted as well.
pub fn parse_ticket_id(body: &str) -> Res<TicketId> {
    let raw = body.trim().trim_matches('"');

    raw.parse::<TicketId>().map_err(|e| anyhow::anyhow!("Invalid ticket id `{}`: {}", raw, e))
}

// Tests.

//! In-process intake client that talks to a [`TicketIntakeService`] directly.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    base::types::{Res, Severity, TicketId},
    service::tickets::TicketIntakeService,
};

use super::{GenericIntakeClient, IntakeClient};

impl IntakeClient {
    /// Creates an intake client bound to an in-process service.
    pub fn local(service: TicketIntakeService) -> Self {
        Self {
            inner: Arc::new(LocalIntakeClient { service }),
        }
    }
}

struct LocalIntakeClient {
    service: TicketIntakeService,
}

#[async_trait]
impl GenericIntakeClient for LocalIntakeClient {
    async fn submit(&self, category: &str, severity: Severity, description: &str) -> Res<TicketId> {
        Ok(self.service.create(category, severity, description).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submits_into_the_shared_service() {
        let service = TicketIntakeService::new();
        let client = IntakeClient::local(service.clone());

        assert_eq!(client.submit("hardware", Severity::High, "printer is broken").await.unwrap(), 1);
        assert_eq!(service.get(1).await.unwrap().category, "hardware");
    }
}

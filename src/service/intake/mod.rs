//! Ticket submission clients.
//!
//! The conversation submits a completed ticket through an [`IntakeClient`].
//! Any error returned here is treated as a failed submission; nothing is retried.

pub mod http;
pub mod local;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Res, Severity, TicketId};

// Traits.

/// Generic ticket intake client trait that clients must implement.
#[async_trait]
pub trait GenericIntakeClient: Send + Sync + 'static {
    /// Submit a ticket and return the id the intake service assigned to it.
    ///
    /// Transport and service failures are surfaced as errors.
    async fn submit(&self, category: &str, severity: Severity, description: &str) -> Res<TicketId>;
}

// Structs.

/// Intake client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct IntakeClient {
    inner: Arc<dyn GenericIntakeClient>,
}

impl Deref for IntakeClient {
    type Target = dyn GenericIntakeClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl IntakeClient {
    pub fn new(inner: Arc<dyn GenericIntakeClient>) -> Self {
        Self { inner }
    }
}

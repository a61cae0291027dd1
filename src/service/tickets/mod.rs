//! In-memory ticket intake service.
//!
//! The registry (next-id counter plus the id → ticket map) is one structure
//! behind one lock: assigning an id and storing the ticket happen in the same
//! critical section, so concurrent submissions can never share an id or lose a
//! ticket.

pub mod http;

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::base::types::{Severity, Ticket, TicketId};

/// The shared state guarded by the service lock.
#[derive(Debug)]
struct TicketRegistry {
    next_id: TicketId,
    tickets: BTreeMap<TicketId, Ticket>,
}

impl Default for TicketRegistry {
    fn default() -> Self {
        Self { next_id: 1, tickets: BTreeMap::new() }
    }
}

/// Ticket intake service.
///
/// This is trivially cloneable; every clone shares the same registry.
#[derive(Clone, Default)]
pub struct TicketIntakeService {
    registry: Arc<Mutex<TicketRegistry>>,
}

impl TicketIntakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next id to a new ticket and stores it.
    #[instrument(name = "TicketIntakeService::create", skip(self, description))]
    pub async fn create(&self, category: &str, severity: Severity, description: &str) -> TicketId {
        let id = {
            let mut registry = self.registry.lock().await;

            let id = registry.next_id;
            registry.next_id += 1;

            registry.tickets.insert(
                id,
                Ticket {
                    id,
                    category: category.to_string(),
                    severity,
                    description: description.to_string(),
                    created_at: Utc::now(),
                },
            );

            id
        };

        info!("Ticket accepted: id:{id} category:{category} severity:{severity} description:{description}");

        id
    }

    /// Gets a stored ticket by id.
    pub async fn get(&self, id: TicketId) -> Option<Ticket> {
        self.registry.lock().await.tickets.get(&id).cloned()
    }

    /// Number of stored tickets.
    pub async fn len(&self) -> usize {
        self.registry.lock().await.tickets.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All stored tickets, ordered by id.
    pub async fn tickets(&self) -> Vec<Ticket> {
        self.registry.lock().await.tickets.values().cloned().collect()
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    #[tokio::test]
    async fn ids_start_at_one_and_increase() {
        let service = TicketIntakeService::new();

        assert_eq!(service.create("hardware", Severity::High, "printer is broken").await, 1);
        assert_eq!(service.create("software", Severity::Low, "typo in menu").await, 2);

        let ticket = service.get(1).await.unwrap();
        assert_eq!(ticket.category, "hardware");
        assert_eq!(ticket.severity, Severity::High);
        assert_eq!(ticket.description, "printer is broken");
        assert_eq!(service.len().await, 2);
        assert!(service.get(3).await.is_none());
    }

    #[tokio::test]
    async fn fields_are_stored_verbatim() {
        let service = TicketIntakeService::new();

        let id = service.create("net\u{7}work", Severity::Normal, "line one\nline two\t").await;
        let ticket = service.get(id).await.unwrap();

        assert_eq!(ticket.category, "net\u{7}work");
        assert_eq!(ticket.description, "line one\nline two\t");
    }

    #[tokio::test]
    async fn clones_share_the_registry() {
        let service = TicketIntakeService::new();
        let clone = service.clone();

        clone.create("other", Severity::Low, "x").await;

        assert_eq!(service.len().await, 1);
        assert_eq!(service.create("other", Severity::Low, "y").await, 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn concurrent_creates_assign_exactly_one_through_n(count in 1usize..200, workers in 1usize..8) {
            let runtime = tokio::runtime::Builder::new_multi_thread().worker_threads(workers).enable_all().build().unwrap();

            let (ids, stored) = runtime.block_on(async move {
                let service = TicketIntakeService::new();

                let handles = (0..count)
                    .map(|i| {
                        let service = service.clone();
                        let severity = Severity::ALL[i % 3];
                        tokio::spawn(async move { service.create(&format!("category-{i}"), severity, &format!("description-{i}")).await })
                    })
                    .collect::<Vec<_>>();

                let mut ids = Vec::with_capacity(count);
                for handle in handles {
                    ids.push(handle.await.unwrap());
                }

                (ids, service.tickets().await)
            });

            let unique = ids.iter().copied().collect::<BTreeSet<_>>();
            let expected = (1..=count as TicketId).collect::<BTreeSet<_>>();

            prop_assert_eq!(ids.len(), unique.len());
            prop_assert_eq!(&unique, &expected);
            prop_assert_eq!(stored.len(), count);
            prop_assert!(stored.iter().all(|t| ids.contains(&t.id)));
        }
    }
}

//! HTTP surface of the ticket intake service.
//!
//! - `POST /api/tickets` accepts `{category, severity, description}` and
//!   answers with the assigned id as plain text.
//! - `GET /api/tickets/:id` returns a stored ticket as JSON.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::base::types::{TicketId, TicketRequest, Void};

use super::TicketIntakeService;

/// Path the submission endpoint is mounted on.
pub const TICKETS_PATH: &str = "/api/tickets";

/// Creates the ticket router.
pub fn ticket_routes(service: TicketIntakeService) -> Router {
    Router::new()
        .route(TICKETS_PATH, post(create_ticket))
        .route(&format!("{TICKETS_PATH}/:id"), get(get_ticket))
        .with_state(service)
}

/// Serves the ticket router on an already-bound listener until the process exits.
pub async fn serve(service: TicketIntakeService, listener: TcpListener) -> Void {
    info!("Ticket intake endpoint listening on {}.", listener.local_addr()?);

    axum::serve(listener, ticket_routes(service)).await?;

    Ok(())
}

/// POST /api/tickets
#[instrument(skip_all)]
async fn create_ticket(State(service): State<TicketIntakeService>, Json(request): Json<TicketRequest>) -> Response {
    let id = service.create(&request.category, request.severity, &request.description).await;

    (StatusCode::OK, id.to_string()).into_response()
}

/// GET /api/tickets/:id
async fn get_ticket(State(service): State<TicketIntakeService>, Path(id): Path<TicketId>) -> Response {
    match service.get(id).await {
        Some(ticket) => Json(ticket).into_response(),
        None => (StatusCode::NOT_FOUND, format!("Ticket {id} not found.")).into_response(),
    }
}

// Tests.

pub use crate::base::{
    config::Config,
    types::{Err, Res, Severity, SessionId, Ticket, TicketId, TicketRequest, Void},
};
pub use anyhow::anyhow;
pub use tracing::{debug, error, info, instrument, warn};

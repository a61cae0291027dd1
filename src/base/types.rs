//! Common types and result handling.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The error type used throughout the crate.
pub type Err = anyhow::Error;
/// A result with the crate error type.
pub type Res<T> = Result<T, Err>;
/// A result with no value.
pub type Void = Res<()>;

/// Identifier assigned to a ticket by the intake service (starts at 1).
pub type TicketId = u64;

/// Identifier of a single conversation with a user.
pub type SessionId = String;

/// The closed set of severities a ticket can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Work is blocked.
    High,
    /// Work is impaired.
    Normal,
    /// A nuisance.
    Low,
}

impl Severity {
    /// All severities, in the order they are offered to the user.
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Normal, Severity::Low];

    /// The lowercase label of the severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Normal => "normal",
            Severity::Low => "low",
        }
    }

    /// The choice labels presented in the severity prompt.
    pub fn options() -> Vec<String> {
        Self::ALL.iter().map(|s| s.as_str().to_string()).collect()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Err;

    fn from_str(s: &str) -> Res<Self> {
        let s = s.trim();

        Self::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("`{s}` is not a valid severity."))
    }
}

/// The payload submitted to the intake service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRequest {
    /// Free-text category.
    pub category: String,
    /// Severity.
    pub severity: Severity,
    /// Free-text problem description.
    pub description: String,
}

/// A ticket stored by the intake service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Id assigned by the intake service.
    pub id: TicketId,
    /// Free-text category.
    pub category: String,
    /// Severity.
    pub severity: Severity,
    /// Free-text problem description.
    pub description: String,
    /// When the ticket was stored.
    pub created_at: DateTime<Utc>,
}

// Tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle tag carried by a ticket block.
///
/// The set is open: unknown tags round-trip through [`TicketStatus::Other`]
/// unchanged. No transition rules are enforced; any block may declare any
/// status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    Created,
    Purchased,
    Resold,
    Used,
    Invalidated,
    Other(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Created => "created",
            TicketStatus::Purchased => "purchased",
            TicketStatus::Resold => "resold",
            TicketStatus::Used => "used",
            TicketStatus::Invalidated => "invalidated",
            TicketStatus::Other(tag) => tag,
        }
    }
}

impl From<String> for TicketStatus {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "created" => TicketStatus::Created,
            "purchased" => TicketStatus::Purchased,
            "resold" => TicketStatus::Resold,
            "used" => TicketStatus::Used,
            "invalidated" => TicketStatus::Invalidated,
            _ => TicketStatus::Other(tag),
        }
    }
}

impl From<&str> for TicketStatus {
    fn from(tag: &str) -> Self {
        TicketStatus::from(tag.to_string())
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        match status {
            TicketStatus::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TicketStatus::from(s))
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business fields of a ticket operation. Either all four are present on a
/// block or none are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketMetadata {
    pub event_id: String,
    pub artist: String,
    pub status: TicketStatus,
    pub owner: String,
}

impl TicketMetadata {
    pub fn new(
        event_id: impl Into<String>,
        artist: impl Into<String>,
        status: impl Into<TicketStatus>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            artist: artist.into(),
            status: status.into(),
            owner: owner.into(),
        }
    }
}

use serde::{Deserialize, Serialize};
use tixchain_core::TicketMetadata;

pub const DEFAULT_BLOCK_DATA: &str = "Block without data";
pub const DEFAULT_TICKET_DATA: &str = "Ticket operation";

fn non_blank(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

/// Body of `POST /api/blockchain/block`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockRequest {
    #[serde(default)]
    pub data: Option<String>,
}

impl BlockRequest {
    /// Payload to append; blank or missing data gets a placeholder.
    pub fn into_data(self) -> String {
        non_blank(self.data, DEFAULT_BLOCK_DATA)
    }
}

/// Body of `POST /api/blockchain/ticket`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

impl TicketRequest {
    /// Split into payload and metadata. Missing ticket fields become `""`.
    pub fn into_parts(self) -> (String, TicketMetadata) {
        let ticket = TicketMetadata::new(
            self.event_id.unwrap_or_default(),
            self.artist.unwrap_or_default(),
            self.status.unwrap_or_default(),
            self.owner.unwrap_or_default(),
        );
        (non_blank(self.data, DEFAULT_TICKET_DATA), ticket)
    }
}

/// Wire view of a block. Absent ticket fields are rendered as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
    pub index: u64,
    pub timestamp: String,
    pub data: String,
    pub previous_hash: String,
    pub hash: String,
    pub event_id: String,
    pub artist: String,
    pub status: String,
    pub owner: String,
    pub nonce: u64,
}

/// Body of `GET /api/blockchain/validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub size: usize,
    pub message: String,
    /// First failing invariant, when the chain is corrupted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation: Option<String>,
}

/// JSON body of every error reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tixchain_core::TicketStatus;

    #[test]
    fn test_blank_block_data_gets_placeholder() {
        assert_eq!(BlockRequest { data: None }.into_data(), DEFAULT_BLOCK_DATA);
        assert_eq!(BlockRequest { data: Some("   ".into()) }.into_data(), DEFAULT_BLOCK_DATA);
        assert_eq!(BlockRequest { data: Some("Parcel".into()) }.into_data(), "Parcel");
    }

    #[test]
    fn test_ticket_request_defaults() {
        let req: TicketRequest = serde_json::from_str(r#"{"eventId":"EVT-1","status":"used"}"#).unwrap();
        let (data, ticket) = req.into_parts();
        assert_eq!(data, DEFAULT_TICKET_DATA);
        assert_eq!(ticket.event_id, "EVT-1");
        assert_eq!(ticket.artist, "");
        assert_eq!(ticket.status, TicketStatus::Used);
        assert_eq!(ticket.owner, "");
    }

    #[test]
    fn test_validation_response_omits_missing_violation() {
        let ok = ValidationResponse {
            valid: true,
            size: 1,
            message: "ok".into(),
            violation: None,
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("violation").is_none());
    }
}

use tixchain_core::{Block, IntegrityViolation};

use crate::dto::{BlockResponse, ValidationResponse};

/// Converts core blocks into their wire representation.
pub struct BlockMapper;

impl BlockMapper {
    pub fn to_response(block: &Block) -> BlockResponse {
        let (event_id, artist, status, owner) = match &block.ticket {
            Some(t) => (
                t.event_id.clone(),
                t.artist.clone(),
                t.status.to_string(),
                t.owner.clone(),
            ),
            None => Default::default(),
        };
        BlockResponse {
            index: block.index,
            timestamp: block.timestamp.clone(),
            data: block.data.clone(),
            previous_hash: block.previous_hash.clone(),
            hash: block.hash.clone(),
            event_id,
            artist,
            status,
            owner,
            nonce: block.nonce,
        }
    }

    pub fn to_response_list(blocks: &[Block]) -> Vec<BlockResponse> {
        blocks.iter().map(Self::to_response).collect()
    }

    pub fn to_validation_response(
        result: &Result<(), IntegrityViolation>,
        size: usize,
    ) -> ValidationResponse {
        match result {
            Ok(()) => ValidationResponse {
                valid: true,
                size,
                message: "The chain is valid".to_string(),
                violation: None,
            },
            Err(violation) => ValidationResponse {
                valid: false,
                size,
                message: "WARNING: the chain is corrupted!".to_string(),
                violation: Some(violation.to_string()),
            },
        }
    }
}

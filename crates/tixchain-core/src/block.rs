use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::digest::{compute_digest, DigestInput};
use crate::ticket::TicketMetadata;

/// Previous-hash sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Payload of the genesis block.
pub const GENESIS_DATA: &str = "Genesis block - Show ticketing";

/// One entry of the ticketing chain.
///
/// INVARIANTS:
/// 1. `hash == compute_hash()` as long as the block is untampered
/// 2. `index` and `timestamp` never change after construction
/// 3. only a consensus engine touches `nonce` and `hash`, and only while the
///    block is being appended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (0 for genesis)
    pub index: u64,

    /// Creation time, RFC 3339 UTC
    pub timestamp: String,

    /// Free-form business content
    pub data: String,

    /// Hash of the preceding block, by value
    pub previous_hash: String,

    /// SHA-256 over every other field
    pub hash: String,

    /// Proof-of-work counter
    pub nonce: u64,

    /// Ticket fields, all present or all absent
    pub ticket: Option<TicketMetadata>,
}

impl Block {
    /// Create a plain data block. The hash is computed immediately.
    pub fn new(index: u64, data: impl Into<String>, previous_hash: impl Into<String>) -> Self {
        Self::build(index, data.into(), previous_hash.into(), None)
    }

    /// Create a block carrying ticket metadata.
    pub fn with_ticket(
        index: u64,
        data: impl Into<String>,
        previous_hash: impl Into<String>,
        ticket: TicketMetadata,
    ) -> Self {
        Self::build(index, data.into(), previous_hash.into(), Some(ticket))
    }

    /// The fixed first block of every chain.
    pub fn genesis() -> Self {
        Self::new(0, GENESIS_DATA, GENESIS_PREVIOUS_HASH)
    }

    fn build(
        index: u64,
        data: String,
        previous_hash: String,
        ticket: Option<TicketMetadata>,
    ) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true);
        let mut block = Self {
            index,
            timestamp,
            data,
            previous_hash,
            hash: String::new(),
            nonce: 0,
            ticket,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Recompute the hash from the current field values.
    pub fn compute_hash(&self) -> String {
        let ticket = self.ticket.as_ref();
        compute_digest(&DigestInput {
            index: self.index,
            timestamp: &self.timestamp,
            data: &self.data,
            previous_hash: &self.previous_hash,
            event_id: ticket.map(|t| t.event_id.as_str()),
            artist: ticket.map(|t| t.artist.as_str()),
            status: ticket.map(|t| t.status.as_str()),
            owner: ticket.map(|t| t.owner.as_str()),
            nonce: self.nonce,
        })
    }

    /// Recompute and store the hash. Used by proof-of-work after bumping the nonce.
    pub fn rehash(&mut self) {
        self.hash = self.compute_hash();
    }

    /// Whether the stored hash matches the field values.
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Index        : {}", self.index)?;
        writeln!(f, "Timestamp    : {}", self.timestamp)?;
        writeln!(f, "Data         : {}", self.data)?;
        if let Some(ticket) = &self.ticket {
            writeln!(f, "Event        : {}", ticket.event_id)?;
            writeln!(f, "Artist       : {}", ticket.artist)?;
            writeln!(f, "Status       : {}", ticket.status)?;
            writeln!(f, "Owner        : {}", ticket.owner)?;
        }
        writeln!(f, "Nonce        : {}", self.nonce)?;
        writeln!(f, "Previous hash: {}", self.previous_hash)?;
        writeln!(f, "Hash         : {}", self.hash)?;
        write!(f, "----------------------------------------")
    }
}

// PROOF-OF-AUTHORITY CONSENSUS ENGINE
// Round-robin over a fixed list of trusted authorities
//
// CONSTRAINTS:
// 1. Call k selects authorities[k mod n], starting with the first added
// 2. The cursor only advances when an authority was selected
// 3. An empty authority list yields a warning and no selection

use tixchain_core::{Block, ConsensusEngine};
use tracing::{info, warn};

/// Proof-of-Authority engine.
#[derive(Debug, Clone, Default)]
pub struct ProofOfAuthority {
    /// Trusted authorities, in rotation order
    authorities: Vec<String>,

    /// Number of selections made so far
    round: u64,
}

impl ProofOfAuthority {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_authority(&mut self, authority: impl Into<String>) {
        self.authorities.push(authority.into());
    }

    pub fn authorities(&self) -> &[String] {
        &self.authorities
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Select the authority for this round and advance the cursor.
    pub fn next_authority(&mut self) -> Option<&str> {
        if self.authorities.is_empty() {
            return None;
        }
        let slot = (self.round % self.authorities.len() as u64) as usize;
        self.round += 1;
        Some(&self.authorities[slot])
    }
}

impl ConsensusEngine for ProofOfAuthority {
    fn validate(&mut self, block: &mut Block) {
        let index = block.index;
        match self.next_authority() {
            Some(authority) => info!("[PoA] Block #{} validated by authority: {}", index, authority),
            None => warn!("[PoA] No authority configured; block #{} not validated", index),
        }
    }

    fn name(&self) -> String {
        "Proof of Authority".to_string()
    }
}

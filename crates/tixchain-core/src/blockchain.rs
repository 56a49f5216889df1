use crate::block::Block;
use crate::block_validation::{BlockValidator, IntegrityViolation};
use crate::engine::ConsensusEngine;
use crate::error::CoreError;
use crate::ticket::TicketMetadata;

/// Append-only chain of blocks with an optional consensus hook.
///
/// INVARIANTS:
/// 1. Never empty: index 0 is always the genesis block
/// 2. `chain[i].index == i`
/// 3. `chain[i].previous_hash == chain[i - 1].hash` for every block built by `add_block*`
///
/// Appends are not synchronized. Callers sharing a chain across threads must
/// serialize writers themselves.
pub struct Blockchain {
    chain: Vec<Block>,
    consensus: Option<Box<dyn ConsensusEngine>>,
}

impl Blockchain {
    /// Create a chain holding only the genesis block.
    pub fn new() -> Self {
        Self {
            chain: vec![Block::genesis()],
            consensus: None,
        }
    }

    /// Replace the consensus engine. Takes effect on the next append.
    /// `None` commits blocks without any consensus step.
    pub fn set_consensus(&mut self, engine: Option<Box<dyn ConsensusEngine>>) {
        match &engine {
            Some(e) => log::info!("Consensus engine set to {}", e.name()),
            None => log::info!("Consensus engine cleared"),
        }
        self.consensus = engine;
    }

    pub fn consensus_name(&self) -> Option<String> {
        self.consensus.as_ref().map(|e| e.name())
    }

    /// Append a plain data block and return the committed block.
    pub fn add_block(&mut self, data: impl Into<String>) -> &Block {
        let block = Block::new(self.next_index(), data, self.last_block().hash.clone());
        self.commit(block)
    }

    /// Append a block carrying ticket metadata and return the committed block.
    pub fn add_ticket_block(&mut self, data: impl Into<String>, ticket: TicketMetadata) -> &Block {
        let block = Block::with_ticket(
            self.next_index(),
            data,
            self.last_block().hash.clone(),
            ticket,
        );
        self.commit(block)
    }

    fn next_index(&self) -> u64 {
        self.chain.len() as u64
    }

    fn commit(&mut self, mut block: Block) -> &Block {
        if let Some(engine) = self.consensus.as_mut() {
            engine.validate(&mut block);
        }
        log::debug!("Block {} committed with hash {}", block.index, block.hash);
        self.chain.push(block);
        self.last_block()
    }

    /// Scan the chain and return the first integrity violation, if any.
    pub fn verify(&self) -> Result<(), IntegrityViolation> {
        BlockValidator::validate_chain(&self.chain)
    }

    /// `true` when every block is untampered and correctly linked.
    pub fn is_chain_valid(&self) -> bool {
        match self.verify() {
            Ok(()) => true,
            Err(violation) => {
                log::warn!("Chain integrity check failed: {}", violation);
                false
            }
        }
    }

    /// Look up a block by position. Negative or out-of-range positions are
    /// `BlockNotFound`.
    pub fn get_block(&self, index: i64) -> Result<&Block, CoreError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.chain.get(i))
            .ok_or(CoreError::not_found(index))
    }

    /// Read-only snapshot of every block, genesis first.
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn last_block(&self) -> &Block {
        // The chain is constructed with a genesis block and never shrinks.
        &self.chain[self.chain.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Log every block, genesis first.
    pub fn display_chain(&self) {
        for block in &self.chain {
            log::info!("\n{}", block);
        }
    }

    #[cfg(test)]
    pub(crate) fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.chain[index]
    }
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Blockchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blockchain")
            .field("len", &self.chain.len())
            .field("consensus", &self.consensus_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{GENESIS_DATA, GENESIS_PREVIOUS_HASH};
    use crate::ticket::TicketStatus;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    /// Records every index it sees and leaves the block alone.
    struct Recorder(Arc<Mutex<Vec<u64>>>);

    impl ConsensusEngine for Recorder {
        fn validate(&mut self, block: &mut Block) {
            self.0.lock().unwrap().push(block.index);
        }

        fn name(&self) -> String {
            "recorder".to_string()
        }
    }

    /// Bumps the nonce once and rehashes, like a one-step miner.
    struct Bumper;

    impl ConsensusEngine for Bumper {
        fn validate(&mut self, block: &mut Block) {
            block.nonce += 1;
            block.rehash();
        }

        fn name(&self) -> String {
            "bumper".to_string()
        }
    }

    #[test_log::test]
    fn test_new_chain_has_genesis() {
        let chain = Blockchain::new();
        assert_eq!(chain.len(), 1);
        assert!(!chain.is_empty());
        let genesis = chain.get_block(0).unwrap();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.previous_hash, GENESIS_PREVIOUS_HASH);
        assert_eq!(genesis.data, GENESIS_DATA);
        assert!(chain.is_chain_valid());
    }

    #[test]
    fn test_add_block_links_to_previous() {
        let mut chain = Blockchain::new();
        chain.add_block("First");
        chain.add_block("Second");
        chain.add_block("Third");

        assert_eq!(chain.len(), 4);
        let blocks = chain.chain();
        assert_eq!(blocks[1].data, "First");
        assert_eq!(blocks[3].data, "Third");
        for i in 1..blocks.len() {
            assert_eq!(blocks[i].index, i as u64);
            assert_eq!(blocks[i].previous_hash, blocks[i - 1].hash);
            assert_eq!(blocks[i].hash, blocks[i].compute_hash());
        }
    }

    #[test]
    fn test_add_block_returns_committed_block() {
        let mut chain = Blockchain::new();
        let hash = chain.add_block("Old").hash.clone();
        assert_eq!(chain.last_block().hash, hash);
        let recent = chain.add_block("Recent").clone();
        assert_eq!(chain.last_block(), &recent);
    }

    #[test]
    fn test_ticket_block_stores_metadata() {
        let mut chain = Blockchain::new();
        let ticket = TicketMetadata::new("EVT-001", "Stromae", TicketStatus::Purchased, "Alice");
        chain.add_ticket_block("Ticket purchased", ticket.clone());

        assert_eq!(chain.last_block().ticket.as_ref(), Some(&ticket));
        assert!(chain.is_chain_valid());
    }

    #[test]
    fn test_any_status_is_accepted() {
        let mut chain = Blockchain::new();
        // Used before created: transitions are not policed.
        for status in ["used", "created", "invalidated", "purchased", "whatever"] {
            chain.add_ticket_block("op", TicketMetadata::new("EVT-9", "Band", status, "Zoe"));
        }
        assert_eq!(chain.len(), 6);
        assert!(chain.is_chain_valid());
    }

    #[test]
    fn test_get_block_out_of_range() {
        let mut chain = Blockchain::new();
        chain.add_block("A");
        assert_eq!(chain.get_block(2), Err(CoreError::BlockNotFound { index: 2 }));
        assert_eq!(chain.get_block(-1), Err(CoreError::BlockNotFound { index: -1 }));
        assert_eq!(chain.get_block(1).unwrap().data, "A");
    }

    #[test]
    fn test_end_to_end_tamper_detection() {
        let mut chain = Blockchain::new();
        chain.add_block("A");
        chain.add_block("B");
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.chain()[2].previous_hash, chain.chain()[1].hash);
        assert!(chain.is_chain_valid());

        chain.block_mut(1).data = "X".to_string();
        assert!(!chain.is_chain_valid());
        assert_eq!(chain.verify(), Err(IntegrityViolation::HashMismatch { index: 1 }));
    }

    #[test]
    fn test_tampered_hash_is_detected() {
        let mut chain = Blockchain::new();
        chain.add_block("A");
        chain.add_block("B");
        chain.block_mut(2).hash = "deadbeef".to_string();
        assert_eq!(chain.verify(), Err(IntegrityViolation::HashMismatch { index: 2 }));
    }

    #[test]
    fn test_tampered_previous_hash_is_detected() {
        let mut chain = Blockchain::new();
        chain.add_block("A");
        chain.add_block("B");
        let block = chain.block_mut(2);
        block.previous_hash = "0".repeat(64);
        block.rehash();
        assert_eq!(chain.verify(), Err(IntegrityViolation::LinkMismatch { index: 2 }));
    }

    #[test]
    fn test_consensus_runs_on_each_append_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut chain = Blockchain::new();
        chain.add_block("before");
        chain.set_consensus(Some(Box::new(Recorder(seen.clone()))));
        assert_eq!(chain.consensus_name().as_deref(), Some("recorder"));
        chain.add_block("one");
        chain.add_block("two");
        chain.set_consensus(None);
        chain.add_block("after");

        assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
        assert!(chain.consensus_name().is_none());
        assert!(chain.is_chain_valid());
    }

    #[test]
    fn test_engine_mutation_is_committed() {
        let mut chain = Blockchain::new();
        chain.set_consensus(Some(Box::new(Bumper)));
        let block = chain.add_block("mined").clone();
        assert_eq!(block.nonce, 1);
        assert_eq!(chain.last_block().nonce, 1);
        assert!(chain.is_chain_valid());
    }

    proptest! {
        #[test]
        fn prop_appended_chains_are_valid(payloads in proptest::collection::vec(".*", 0..12)) {
            let mut chain = Blockchain::new();
            for p in &payloads {
                chain.add_block(p.clone());
            }
            prop_assert_eq!(chain.len(), payloads.len() + 1);
            prop_assert!(chain.is_chain_valid());
        }

        #[test]
        fn prop_payload_tamper_is_detected(
            payloads in proptest::collection::vec("[a-z]{1,8}", 1..8),
            pick in any::<proptest::sample::Index>(),
        ) {
            let mut chain = Blockchain::new();
            for p in &payloads {
                chain.add_block(p.clone());
            }
            let target = 1 + pick.index(payloads.len());
            chain.block_mut(target).data.push('!');
            prop_assert!(!chain.is_chain_valid());
        }
    }
}

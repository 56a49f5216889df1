// PROOF-OF-WORK CONSENSUS ENGINE
// Nonce search over the block digest
//
// CONSTRAINTS:
// 1. Only `nonce` and `hash` are touched
// 2. The search blocks the appending thread until the target is met
// 3. Difficulty 0 performs no iterations at all
// 4. An optional iteration cap stops the search early; the block is then
//    committed as-is and a warning is logged
// 5. Difficulty never exceeds the digest length, or the search could not end

use tixchain_core::digest::{meets_difficulty, DIGEST_HEX_LEN};
use tixchain_core::{Block, ConsensusEngine};
use tracing::{info, warn};

/// Highest reachable difficulty: every hex character of the digest is `'0'`.
pub const MAX_DIFFICULTY: u32 = DIGEST_HEX_LEN as u32;

/// Proof-of-Work engine: find a nonce whose digest starts with
/// `difficulty` hex zeros.
#[derive(Debug, Clone)]
pub struct ProofOfWork {
    /// Required number of leading `'0'` characters in the hex hash
    difficulty: u32,

    /// Upper bound on nonce increments per block, unbounded when `None`
    max_iterations: Option<u64>,
}

impl ProofOfWork {
    /// Create an unbounded PoW engine. Difficulty above [`MAX_DIFFICULTY`]
    /// is clamped with a warning.
    pub fn new(difficulty: u32) -> Self {
        if difficulty > MAX_DIFFICULTY {
            warn!(
                "[PoW] Difficulty {} exceeds digest length; clamped to {}",
                difficulty, MAX_DIFFICULTY
            );
        }
        ProofOfWork {
            difficulty: difficulty.min(MAX_DIFFICULTY),
            max_iterations: None,
        }
    }

    /// Bound the nonce search.
    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Mine `block` in place.
    ///
    /// Returns the number of nonce increments performed and whether the
    /// target was met.
    pub fn mine(&self, block: &mut Block) -> (u64, bool) {
        let target = self.difficulty as usize;
        let mut iterations = 0u64;

        while !meets_difficulty(&block.hash, target) {
            if self.max_iterations.is_some_and(|cap| iterations >= cap) {
                return (iterations, false);
            }
            block.nonce += 1;
            block.rehash();
            iterations += 1;
        }

        (iterations, true)
    }
}

impl ConsensusEngine for ProofOfWork {
    fn validate(&mut self, block: &mut Block) {
        let (iterations, found) = self.mine(block);
        if found {
            info!(
                "[PoW] Block #{} mined with nonce={} (difficulty={}, iterations={})",
                block.index, block.nonce, self.difficulty, iterations
            );
        } else {
            warn!(
                "[PoW] Block #{} gave up after {} iterations at difficulty {}; committing unmined",
                block.index, iterations, self.difficulty
            );
        }
    }

    fn name(&self) -> String {
        format!("Proof of Work (difficulty={})", self.difficulty)
    }
}

// CONSENSUS ENGINE CONTRACT
// Hook run by the chain on every freshly built block, before it is committed.
//
// CONSTRAINTS:
// 1. The engine gets exclusive access to the block for one append only
// 2. Only `nonce` and `hash` may be mutated, and only by proof-of-work
// 3. No return value: outcomes are reported through logs, never as errors
// 4. An engine with an empty registry warns and does nothing

use crate::block::Block;

/// Consensus engine trait: one pluggable policy per chain.
pub trait ConsensusEngine: Send {
    /// Apply the consensus rule to a block about to be appended.
    ///
    /// The chain commits the block afterwards whatever the engine reports.
    fn validate(&mut self, block: &mut Block);

    /// Human readable identifier, e.g. `"Proof of Work (difficulty=3)"`.
    fn name(&self) -> String;
}

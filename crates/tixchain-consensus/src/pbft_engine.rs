// PBFT VOTE SIMULATION ENGINE
// Local simulation of a Byzantine quorum vote
//
// CONSTRAINTS:
// 1. No messages are exchanged; each node's vote is a biased coin flip
// 2. Quorum is floor(2n/3) + 1 yes-votes out of n nodes
// 3. The outcome is reported only. A rejected block is still committed by
//    the chain: the vote does not gate the append
// 4. An empty node list yields a warning and no vote

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tixchain_core::{Block, ConsensusEngine};
use tracing::{info, warn};

/// Probability that a simulated node votes in favour of a block.
pub const YES_PROBABILITY: f64 = 0.85;

/// Minimum yes-votes for `total_nodes` participants (2/3 + 1).
pub fn required_votes(total_nodes: usize) -> usize {
    (2 * total_nodes) / 3 + 1
}

/// Result of one simulated vote round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbftOutcome {
    /// Number of yes-votes
    pub votes: usize,

    /// Number of nodes that voted
    pub total: usize,

    /// Quorum threshold
    pub required: usize,

    /// Whether the quorum was reached
    pub accepted: bool,

    /// Names of the nodes that voted yes, in node order
    pub voters: Vec<String>,
}

/// PBFT simulation engine.
pub struct Pbft<R = StdRng> {
    /// Participating nodes, in registration order
    nodes: Vec<String>,

    rng: R,
}

impl Pbft<StdRng> {
    /// Create a PBFT engine backed by an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for Pbft<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Pbft<R> {
    /// Create a PBFT engine drawing votes from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Pbft {
            nodes: Vec::new(),
            rng,
        }
    }

    pub fn add_node(&mut self, node: impl Into<String>) {
        self.nodes.push(node.into());
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Run one vote round. `None` when no node is registered.
    pub fn tally(&mut self) -> Option<PbftOutcome> {
        if self.nodes.is_empty() {
            return None;
        }

        let required = required_votes(self.nodes.len());
        let mut voters = Vec::new();
        for node in &self.nodes {
            if self.rng.gen_bool(YES_PROBABILITY) {
                voters.push(node.clone());
            }
        }

        Some(PbftOutcome {
            votes: voters.len(),
            total: self.nodes.len(),
            required,
            accepted: voters.len() >= required,
            voters,
        })
    }
}

impl<R: RngCore + Send> ConsensusEngine for Pbft<R> {
    fn validate(&mut self, block: &mut Block) {
        let Some(outcome) = self.tally() else {
            warn!("[PBFT] No node configured; block #{} not voted", block.index);
            return;
        };

        info!(
            "[PBFT] Block #{} | votes: {}/{} (required: {}) | {} | voters: {:?}",
            block.index,
            outcome.votes,
            outcome.total,
            outcome.required,
            if outcome.accepted { "ACCEPTED" } else { "REJECTED" },
            outcome.voters
        );

        if !outcome.accepted {
            warn!("[PBFT] Block #{} did not reach consensus", block.index);
        }
    }

    fn name(&self) -> String {
        "PBFT (Practical Byzantine Fault Tolerance)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn with_nodes<R: RngCore>(mut engine: Pbft<R>, n: usize) -> Pbft<R> {
        for i in 1..=n {
            engine.add_node(format!("Node-{}", i));
        }
        engine
    }

    #[test]
    fn test_required_votes() {
        assert_eq!(required_votes(1), 1);
        assert_eq!(required_votes(2), 2);
        assert_eq!(required_votes(3), 3);
        assert_eq!(required_votes(4), 3);
        assert_eq!(required_votes(7), 5);
        assert_eq!(required_votes(10), 7);
    }

    #[test]
    fn test_tally_empty_nodes() {
        let mut engine = Pbft::new();
        assert!(engine.tally().is_none());
    }

    #[test]
    fn test_all_yes_is_accepted() {
        // Zero draws fall under any positive probability.
        let mut engine = with_nodes(Pbft::with_rng(StepRng::new(0, 0)), 4);
        let outcome = engine.tally().unwrap();
        assert_eq!(outcome.votes, 4);
        assert_eq!(outcome.required, 3);
        assert!(outcome.accepted);
        assert_eq!(outcome.voters, vec!["Node-1", "Node-2", "Node-3", "Node-4"]);
    }

    #[test]
    fn test_all_no_is_rejected() {
        let mut engine = with_nodes(Pbft::with_rng(StepRng::new(u64::MAX, 0)), 4);
        let outcome = engine.tally().unwrap();
        assert_eq!(outcome.votes, 0);
        assert!(!outcome.accepted);
        assert!(outcome.voters.is_empty());
    }

    #[test_log::test]
    fn test_rejected_vote_leaves_block_untouched() {
        let mut engine = with_nodes(Pbft::with_rng(StepRng::new(u64::MAX, 0)), 3);
        let mut block = Block::new(1, "data", "prev");
        let before = block.clone();
        engine.validate(&mut block);
        assert_eq!(block, before);
    }

    #[test]
    fn test_validate_without_nodes_is_noop() {
        let mut engine = Pbft::new();
        let mut block = Block::new(1, "data", "prev");
        let before = block.clone();
        engine.validate(&mut block);
        assert_eq!(block, before);
    }

    #[test]
    fn test_repeated_rounds_are_consistent() {
        let mut engine = with_nodes(Pbft::with_rng(StdRng::seed_from_u64(9)), 5);
        for _ in 0..20 {
            let outcome = engine.tally().unwrap();
            assert_eq!(outcome.total, 5);
            assert_eq!(outcome.votes, outcome.voters.len());
            assert_eq!(outcome.accepted, outcome.votes >= 4);
        }
    }

    #[test]
    fn test_pbft_name() {
        let name = Pbft::new().name();
        assert!(name.contains("PBFT"));
        assert!(name.contains("Byzantine"));
    }
}

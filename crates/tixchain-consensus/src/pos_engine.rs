// PROOF-OF-STAKE CONSENSUS ENGINE
// Stake-weighted validator selection
//
// CONSTRAINTS:
// 1. One uniform draw in [0, total_stake) per block
// 2. Validators are walked in insertion order, accumulating stake
// 3. Selection is observational only: the block is never altered
// 4. An empty registry yields no validator and a warning

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tixchain_core::{Block, ConsensusEngine};
use tracing::{info, warn};

/// Validator stake entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorStake {
    /// Validator name
    pub id: String,

    /// Stake weight, always > 0
    pub stake: u64,
}

/// Proof-of-Stake engine.
///
/// Generic over the random source so tests can inject a seeded or stub RNG.
pub struct ProofOfStake<R = StdRng> {
    /// Registered validators, insertion ordered
    validators: Vec<ValidatorStake>,

    rng: R,
}

impl ProofOfStake<StdRng> {
    /// Create a PoS engine backed by an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for ProofOfStake<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> ProofOfStake<R> {
    /// Create a PoS engine drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        ProofOfStake {
            validators: Vec::new(),
            rng,
        }
    }

    /// Register a validator, or replace the stake of an existing one in place.
    ///
    /// A zero stake can never be selected, so it is ignored with a warning.
    pub fn add_validator(&mut self, id: impl Into<String>, stake: u64) {
        let id = id.into();
        if stake == 0 {
            warn!("[PoS] Ignoring validator {} with zero stake", id);
            return;
        }
        match self.validators.iter_mut().find(|v| v.id == id) {
            Some(existing) => existing.stake = stake,
            None => self.validators.push(ValidatorStake { id, stake }),
        }
    }

    pub fn validators(&self) -> &[ValidatorStake] {
        &self.validators
    }

    pub fn total_stake(&self) -> u64 {
        self.validators.iter().map(|v| v.stake).sum()
    }

    /// Stake of a registered validator, 0 when unknown.
    pub fn stake_of(&self, id: &str) -> u64 {
        self.validators
            .iter()
            .find(|v| v.id == id)
            .map_or(0, |v| v.stake)
    }

    /// Pick a validator with probability proportional to its stake.
    ///
    /// Returns `None` when no stake is registered.
    pub fn select_validator(&mut self) -> Option<&ValidatorStake> {
        let total_stake = self.total_stake();
        if total_stake == 0 {
            return None;
        }

        let pick = self.rng.gen_range(0..total_stake);
        let mut accumulated = 0;
        for validator in &self.validators {
            accumulated += validator.stake;
            if pick < accumulated {
                return Some(validator);
            }
        }

        // Unreachable while pick < total_stake.
        self.validators.first()
    }
}

impl<R: RngCore + Send> ConsensusEngine for ProofOfStake<R> {
    fn validate(&mut self, block: &mut Block) {
        let index = block.index;
        match self.select_validator() {
            Some(validator) => info!(
                "[PoS] Block #{} validated by {} (stake={})",
                index, validator.id, validator.stake
            ),
            None => warn!("[PoS] No validator configured; block #{} not validated", index),
        }
    }

    fn name(&self) -> String {
        "Proof of Stake".to_string()
    }
}

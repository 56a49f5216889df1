// === Consensus Engines ===
pub mod pbft_engine;
pub mod poa_engine;
pub mod pos_engine;
pub mod pow_engine;

// === Selection & Configuration ===
pub mod kind;

// Re-export critical types for convenience
pub use kind::{
    build_engine, ConsensusKind, ConsensusSettings, EngineConfigError, ParseKindError, StakeConfig,
};
pub use pbft_engine::{required_votes, Pbft, PbftOutcome, YES_PROBABILITY};
pub use poa_engine::ProofOfAuthority;
pub use pos_engine::{ProofOfStake, ValidatorStake};
pub use pow_engine::{ProofOfWork, MAX_DIFFICULTY};

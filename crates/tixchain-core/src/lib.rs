// === Core Chain Logic ===
pub mod block;
pub mod block_validation;
pub mod blockchain;
pub mod digest;
pub mod ticket;

// === Consensus Contract ===
pub mod engine;

// === Errors ===
pub mod error;

// === Re-exports for broader ecosystem access ===
pub use block::{Block, GENESIS_DATA, GENESIS_PREVIOUS_HASH};
pub use block_validation::{BlockValidator, IntegrityViolation};
pub use blockchain::Blockchain;
pub use engine::ConsensusEngine;
pub use error::CoreError;
pub use ticket::{TicketMetadata, TicketStatus};

use thiserror::Error;

use crate::block::Block;

/// First integrity failure found while scanning a chain.
///
/// This is an expected outcome, not an exception: callers get it back as a
/// value from [`BlockValidator::validate_chain`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    /// Stored hash differs from the hash recomputed from the fields.
    #[error("Invalid hash at block #{index}")]
    HashMismatch { index: u64 },

    /// `previous_hash` does not match the hash of the preceding block.
    #[error("Broken link at block #{index}")]
    LinkMismatch { index: u64 },
}

impl IntegrityViolation {
    pub fn index(&self) -> u64 {
        match self {
            IntegrityViolation::HashMismatch { index } | IntegrityViolation::LinkMismatch { index } => {
                *index
            }
        }
    }
}

pub struct BlockValidator;

impl BlockValidator {
    /// **Check that a block's stored hash matches its fields**
    pub fn validate_block(block: &Block) -> Result<(), IntegrityViolation> {
        if !block.has_valid_hash() {
            log::error!(
                "Block {} hash mismatch! Stored {}, computed {}",
                block.index,
                block.hash,
                block.compute_hash()
            );
            return Err(IntegrityViolation::HashMismatch { index: block.index });
        }
        Ok(())
    }

    /// **Ensure a block links correctly to the previous block**
    ///
    /// Compares against the stored hash of `prev_block`, not a recomputed one:
    /// a tampered predecessor is caught by its own hash check.
    pub fn validate_block_link(prev_block: &Block, current_block: &Block) -> Result<(), IntegrityViolation> {
        if current_block.previous_hash != prev_block.hash {
            log::error!(
                "Block {} link mismatch! Expected {}, got {}",
                current_block.index,
                prev_block.hash,
                current_block.previous_hash
            );
            return Err(IntegrityViolation::LinkMismatch {
                index: current_block.index,
            });
        }
        Ok(())
    }

    /// **Full chain scan**
    ///
    /// Visits positions 1..len in order, hash check first, then link check.
    /// Stops at the first failure. The genesis block itself is not rehashed.
    pub fn validate_chain(blocks: &[Block]) -> Result<(), IntegrityViolation> {
        for pair in blocks.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            Self::validate_block(current)?;
            Self::validate_block_link(previous, current)?;
        }
        log::debug!("Chain of {} blocks passed validation", blocks.len());
        Ok(())
    }
}

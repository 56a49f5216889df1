use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tixchain_core::ConsensusEngine;

use crate::pbft_engine::Pbft;
use crate::poa_engine::ProofOfAuthority;
use crate::pos_engine::ProofOfStake;
use crate::pow_engine::{ProofOfWork, MAX_DIFFICULTY};

/// Selectable consensus policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusKind {
    Pow,
    Pos,
    Pbft,
    Poa,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown consensus kind: {0} (expected pow, pos, pbft or poa)")]
pub struct ParseKindError(String);

impl FromStr for ConsensusKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pow" => Ok(ConsensusKind::Pow),
            "pos" => Ok(ConsensusKind::Pos),
            "pbft" => Ok(ConsensusKind::Pbft),
            "poa" => Ok(ConsensusKind::Poa),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}

impl fmt::Display for ConsensusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ConsensusKind::Pow => "pow",
            ConsensusKind::Pos => "pos",
            ConsensusKind::Pbft => "pbft",
            ConsensusKind::Poa => "poa",
        };
        f.write_str(tag)
    }
}

/// Settings that cannot produce a working engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineConfigError {
    #[error("Difficulty {difficulty} can never be met by a {max}-character digest")]
    DifficultyTooHigh { difficulty: u32, max: u32 },
}

/// Stake entry as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeConfig {
    pub name: String,
    pub stake: u64,
}

/// Registries and parameters used to build any of the engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSettings {
    /// Engine attached at startup, none when absent
    #[serde(default)]
    pub kind: Option<ConsensusKind>,

    #[serde(default = "default_difficulty")]
    pub difficulty: u32,

    /// Optional cap on proof-of-work nonce increments
    #[serde(default)]
    pub max_iterations: Option<u64>,

    #[serde(default = "default_validators")]
    pub validators: Vec<StakeConfig>,

    #[serde(default = "default_nodes")]
    pub nodes: Vec<String>,

    #[serde(default = "default_authorities")]
    pub authorities: Vec<String>,
}

fn default_difficulty() -> u32 {
    3
}

fn default_validators() -> Vec<StakeConfig> {
    [("Alice", 50), ("Bob", 30), ("Charlie", 20)]
        .into_iter()
        .map(|(name, stake)| StakeConfig {
            name: name.to_string(),
            stake,
        })
        .collect()
}

fn default_nodes() -> Vec<String> {
    ["Node-Paris", "Node-Lyon", "Node-Marseille", "Node-Bordeaux"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_authorities() -> Vec<String> {
    ["Authority-Ministry", "Authority-Customs"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ConsensusSettings {
    fn default() -> Self {
        ConsensusSettings {
            kind: None,
            difficulty: default_difficulty(),
            max_iterations: None,
            validators: default_validators(),
            nodes: default_nodes(),
            authorities: default_authorities(),
        }
    }
}

/// Build a configured engine of the requested kind.
pub fn build_engine(
    kind: ConsensusKind,
    settings: &ConsensusSettings,
) -> Result<Box<dyn ConsensusEngine>, EngineConfigError> {
    let engine: Box<dyn ConsensusEngine> = match kind {
        ConsensusKind::Pow => {
            if settings.difficulty > MAX_DIFFICULTY {
                return Err(EngineConfigError::DifficultyTooHigh {
                    difficulty: settings.difficulty,
                    max: MAX_DIFFICULTY,
                });
            }
            let engine = ProofOfWork::new(settings.difficulty);
            match settings.max_iterations {
                Some(cap) => Box::new(engine.with_max_iterations(cap)),
                None => Box::new(engine),
            }
        }
        ConsensusKind::Pos => {
            let mut engine = ProofOfStake::new();
            for v in &settings.validators {
                engine.add_validator(v.name.as_str(), v.stake);
            }
            Box::new(engine)
        }
        ConsensusKind::Pbft => {
            let mut engine = Pbft::new();
            for node in &settings.nodes {
                engine.add_node(node.as_str());
            }
            Box::new(engine)
        }
        ConsensusKind::Poa => {
            let mut engine = ProofOfAuthority::new();
            for authority in &settings.authorities {
                engine.add_authority(authority.as_str());
            }
            Box::new(engine)
        }
    };
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_roundtrip() {
        for kind in [ConsensusKind::Pow, ConsensusKind::Pos, ConsensusKind::Pbft, ConsensusKind::Poa] {
            assert_eq!(kind.to_string().parse::<ConsensusKind>(), Ok(kind));
        }
        assert_eq!("PoW".parse::<ConsensusKind>(), Ok(ConsensusKind::Pow));
        assert!("raft".parse::<ConsensusKind>().is_err());
    }

    #[test]
    fn test_build_engine_names() {
        let settings = ConsensusSettings::default();
        let name = |kind| build_engine(kind, &settings).unwrap().name();
        assert_eq!(name(ConsensusKind::Pow), "Proof of Work (difficulty=3)");
        assert_eq!(name(ConsensusKind::Pos), "Proof of Stake");
        assert!(name(ConsensusKind::Pbft).starts_with("PBFT"));
        assert_eq!(name(ConsensusKind::Poa), "Proof of Authority");
    }

    #[test]
    fn test_build_engine_rejects_unreachable_difficulty() {
        let settings = ConsensusSettings {
            difficulty: 65,
            ..ConsensusSettings::default()
        };
        assert_eq!(
            build_engine(ConsensusKind::Pow, &settings).err(),
            Some(EngineConfigError::DifficultyTooHigh { difficulty: 65, max: 64 })
        );

        // Only proof-of-work reads the difficulty.
        assert!(build_engine(ConsensusKind::Poa, &settings).is_ok());

        let edge = ConsensusSettings {
            difficulty: 64,
            ..ConsensusSettings::default()
        };
        assert!(build_engine(ConsensusKind::Pow, &edge).is_ok());
    }

    #[test]
    fn test_settings_defaults_from_empty_json() {
        let settings: ConsensusSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ConsensusSettings::default());
    }
}

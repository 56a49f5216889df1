use std::path::Path;

use thiserror::Error;
use tixchain_core::Block;
use tracing::info;

use crate::mapper::BlockMapper;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize chain: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// Render a chain snapshot as indented JSON, genesis first.
pub fn to_json_pretty(blocks: &[Block]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&BlockMapper::to_response_list(blocks))?)
}

/// Write a chain snapshot to `path` as indented JSON.
pub fn save_to_file(blocks: &[Block], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    std::fs::write(path, to_json_pretty(blocks)?)?;
    info!("Blockchain exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::BlockResponse;
    use tixchain_core::Blockchain;

    #[test]
    fn test_export_lists_every_block() {
        let mut chain = Blockchain::new();
        chain.add_block("Parcel picked up");
        chain.add_block("Customs cleared");

        let json = to_json_pretty(chain.chain()).unwrap();
        let parsed: Vec<BlockResponse> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[2].data, "Customs cleared");
        assert_eq!(parsed[2].previous_hash, parsed[1].hash);
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blockchain.json");
        let chain = Blockchain::new();

        save_to_file(chain.chain(), &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_json_pretty(chain.chain()).unwrap());
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("blockchain.json");
        let err = save_to_file(Blockchain::new().chain(), &path).unwrap_err();
        assert!(matches!(err, ExportError::Io(_)));
    }
}

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tixchain_consensus::ConsensusSettings;

/// Default config file looked up in the working directory (any extension
/// understood by the `config` crate, e.g. `tixchain.toml`).
pub const DEFAULT_CONFIG_NAME: &str = "tixchain";

/// Environment prefix. Nested keys use `__`, e.g. `TIXCHAIN__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "TIXCHAIN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub consensus: ConsensusSettings,
}

impl Settings {
    /// Layer defaults, then the config file, then `TIXCHAIN__*` variables.
    ///
    /// An explicit `path` must exist; the default `tixchain.*` file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tixchain_consensus::ConsensusKind;

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[consensus]
kind = "poa"
difficulty = 2
authorities = ["Ministry", "Customs", "Police"]
"#,
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.consensus.kind, Some(ConsensusKind::Poa));
        assert_eq!(settings.consensus.difficulty, 2);
        assert_eq!(settings.consensus.authorities.len(), 3);
        assert_eq!(settings.consensus.nodes, ConsensusSettings::default().nodes);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}

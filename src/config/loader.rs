//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override file settings.
pub const ENV_RPC_URL: &str = "BESU_NODE_URL";
pub const ENV_ABI_PATH: &str = "CONTRACT_ABI_PATH";
pub const ENV_ADDRESSES_PATH: &str = "CONTRACT_ADDRESSES_PATH";
pub const ENV_CONTRACT_NAME: &str = "CONTRACT_NAME";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("failed to load env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Default dotenv file, relative to the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Export variables from a dotenv file into the process environment.
///
/// Variables already set in the environment are left untouched. Returns
/// `false` when the file does not exist.
pub fn load_dotenv(path: &Path) -> Result<bool, ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(e) => Err(ConfigError::EnvFile(e)),
    }
}

/// Load configuration: optional TOML file, then process environment, then validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an injectable environment lookup.
pub fn load_config_with<F>(path: Option<&Path>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env_overrides<F>(config: &mut AppConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = env(ENV_RPC_URL) {
        config.blockchain.rpc_url = v;
    }
    if let Some(v) = env(ENV_ABI_PATH) {
        config.contract.abi_path = v;
    }
    if let Some(v) = env(ENV_ADDRESSES_PATH) {
        config.contract.addresses_path = v;
    }
    if let Some(v) = env(ENV_CONTRACT_NAME) {
        config.contract.contract_name = v;
    }
    if let Some(port) = env(ENV_SERVER_PORT) {
        config.server.bind_address = format!("0.0.0.0:{}", port);
    }
    if let Some(v) = env(ENV_DATABASE_URL) {
        config.database.url = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_env_file(tag: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "contract_sync_{}_{}.env",
            tag,
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_dotenv_is_harmless() {
        let path = std::env::temp_dir().join("contract_sync_no_such_dir/.env");
        assert!(!load_dotenv(&path).unwrap());
    }

    #[test]
    fn test_dotenv_exports_without_overriding() {
        std::env::set_var("CONTRACT_SYNC_TEST_DOTENV_PRESET", "from-process");
        let path = temp_env_file(
            "dotenv",
            "CONTRACT_SYNC_TEST_DOTENV_NEW=from-file\nCONTRACT_SYNC_TEST_DOTENV_PRESET=from-file\n",
        );

        assert!(load_dotenv(&path).unwrap());
        assert_eq!(std::env::var("CONTRACT_SYNC_TEST_DOTENV_NEW").unwrap(), "from-file");
        assert_eq!(
            std::env::var("CONTRACT_SYNC_TEST_DOTENV_PRESET").unwrap(),
            "from-process"
        );
        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_malformed_dotenv_fails() {
        let path = temp_env_file("dotenv_bad", "NOT A VALID LINE\n");
        let result = load_dotenv(&path);
        fs::remove_file(&path).unwrap_or_default();
        assert!(matches!(result, Err(ConfigError::EnvFile(_))));
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = load_config_with(None, env_from(&[])).unwrap();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_env_overrides() {
        let config = load_config_with(
            None,
            env_from(&[
                (ENV_RPC_URL, "http://besu:8545"),
                (ENV_SERVER_PORT, "9000"),
                (ENV_DATABASE_URL, "sqlite::memory:"),
                (ENV_CONTRACT_NAME, "Other#Storage"),
            ]),
        )
        .unwrap();
        assert_eq!(config.blockchain.rpc_url, "http://besu:8545");
        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.contract.contract_name, "Other#Storage");
    }

    #[test]
    fn test_empty_rpc_url_from_env_fails() {
        let err = load_config_with(None, env_from(&[(ENV_RPC_URL, "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("blockchain.rpc_url"));
    }

    #[test]
    fn test_file_then_env() {
        let path = std::env::temp_dir()
            .join(format!("contract_sync_cfg_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[blockchain]\nrpc_url = \"http://file:8545\"\n[database]\nurl = \"sqlite::memory:\"\n",
        )
        .unwrap();

        let config = load_config_with(Some(&path), env_from(&[])).unwrap();
        assert_eq!(config.blockchain.rpc_url, "http://file:8545");

        let config =
            load_config_with(Some(&path), env_from(&[(ENV_RPC_URL, "http://env:8545")])).unwrap();
        assert_eq!(config.blockchain.rpc_url, "http://env:8545");

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/contract-sync.toml");
        let err = load_config_with(Some(path), env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

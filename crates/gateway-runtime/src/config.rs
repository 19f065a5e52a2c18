//! Runtime configuration loading.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults
//! 2. JSON file named by `TG_CONFIG`
//! 3. `TG_HOST`, `TG_PORT`, `TG_CHAIN_ID`, `TG_CONTRACT_ADDRESS`,
//!    `TG_RECEIVER_ADDRESS`, `TG_CLAIM_NONCE`
//!
//! Without `TG_CLAIM_NONCE` a random nonce is drawn, so proofs minted for a
//! previous run are worthless after a restart.

use anyhow::{Context, Result};
use shared_types::H256;
use tg_16_rpc_gateway::domain::config::{parse_address, parse_word};
use tg_16_rpc_gateway::GatewayConfig;
use tracing::info;

/// Everything the runtime needs to start a gateway.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub gateway: GatewayConfig,
    /// Identifies this instance's proof domain
    pub claim_nonce: H256,
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<RuntimeConfig> {
    load_from(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary variable lookup.
pub fn load_from(var: impl Fn(&str) -> Option<String>) -> Result<RuntimeConfig> {
    let mut config = match var("TG_CONFIG") {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path))?;
            let config: GatewayConfig = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config file {}", path))?;
            info!(path = %path, "Loaded configuration file");
            config
        }
        None => GatewayConfig::default(),
    };

    if let Some(host) = var("TG_HOST") {
        config.http.host = host.parse().context("TG_HOST must be an IP address")?;
    }
    if let Some(port) = var("TG_PORT") {
        config.http.port = port.parse().context("TG_PORT must be a port number")?;
    }
    if let Some(chain_id) = var("TG_CHAIN_ID") {
        config.chain.chain_id = chain_id.parse().context("TG_CHAIN_ID must be an integer")?;
    }
    if let Some(address) = var("TG_CONTRACT_ADDRESS") {
        config.chain.contract_address = parse_address(&address).context("TG_CONTRACT_ADDRESS")?;
    }
    if let Some(address) = var("TG_RECEIVER_ADDRESS") {
        config.chain.receiver_address = parse_address(&address).context("TG_RECEIVER_ADDRESS")?;
    }

    let claim_nonce = match var("TG_CLAIM_NONCE") {
        Some(nonce) => parse_word(&nonce).context("TG_CLAIM_NONCE")?,
        None => H256::from(rand::random::<[u8; 32]>()),
    };

    config.validate().context("Invalid gateway configuration")?;

    Ok(RuntimeConfig {
        gateway: config,
        claim_nonce,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_draw_random_nonce() {
        let a = load_from(lookup(&[])).unwrap();
        let b = load_from(lookup(&[])).unwrap();
        assert_eq!(a.gateway.http.port, 8080);
        assert_ne!(a.claim_nonce, b.claim_nonce);
    }

    #[test]
    fn test_env_overrides() {
        let nonce = format!("0x{}", "ab".repeat(32));
        let config = load_from(lookup(&[
            ("TG_PORT", "9090"),
            ("TG_HOST", "127.0.0.1"),
            ("TG_CHAIN_ID", "1"),
            ("TG_RECEIVER_ADDRESS", "0x00000000000000000000000000000000000000aa"),
            ("TG_CLAIM_NONCE", nonce.as_str()),
        ]))
        .unwrap();

        assert_eq!(config.gateway.http.port, 9090);
        assert_eq!(config.gateway.http_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(config.gateway.chain.chain_id, 1);
        assert_eq!(config.gateway.chain.receiver_address.as_bytes()[19], 0xaa);
        assert_eq!(config.claim_nonce, H256::repeat_byte(0xab));
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(load_from(lookup(&[("TG_PORT", "http")])).is_err());
        assert!(load_from(lookup(&[("TG_CLAIM_NONCE", "0x12")])).is_err());
        assert!(load_from(lookup(&[("TG_CONFIG", "/nonexistent/tollgate.json")])).is_err());
    }
}

//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use shared_types::{pow2, Address, NetworkParams, H256};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tg_02_session_ledger::{Costs, SEARCH_COST_BITS, SIGNAL_COST_BITS};
use tg_03_admission_control::{AdmissionConfig, BASELINE_MINIMUM_BITS};
use tg_04_claim_batcher::{
    BatcherConfig, FailedBatchPolicy, DEFAULT_SUBMISSION_TIMEOUT, DEFAULT_THRESHOLD,
};

/// Default claim contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x0a4d5EFEa910Ea5E39be428A3d57B80BFAbA52f4";

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP and WebSocket listener
    pub http: HttpConfig,
    /// Request shape limits
    pub limits: LimitsConfig,
    /// Per-method charges
    pub pricing: PricingConfig,
    /// Chain the proofs are minted for
    pub chain: ChainConfig,
    /// Minimum proof price
    pub admission: AdmissionSection,
    /// Claim batching and submission
    pub settlement: SettlementConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_entries == 0 {
            return Err(ConfigError::InvalidLimit("max_entries cannot be 0".into()));
        }

        if self.limits.max_message_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_message_size cannot be 0".into(),
            ));
        }

        if self.settlement.threshold == 0 {
            return Err(ConfigError::InvalidLimit("threshold cannot be 0".into()));
        }

        if self.settlement.submission_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "submission_timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Listener bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }

    pub fn costs(&self) -> Costs {
        Costs {
            signal: pow2(self.pricing.signal_cost_bits),
            search: pow2(self.pricing.search_cost_bits),
        }
    }

    pub fn admission_config(&self) -> AdmissionConfig {
        AdmissionConfig {
            baseline_minimum_bits: self.admission.baseline_minimum_bits,
        }
    }

    pub fn batcher_config(&self) -> BatcherConfig {
        BatcherConfig {
            threshold: self.settlement.threshold,
            submission_timeout: self.settlement.submission_timeout,
            failed_batch_policy: self.settlement.failed_batch_policy,
        }
    }

    /// Public parameters for this gateway instance.
    pub fn network_params(&self, claim_nonce: H256) -> NetworkParams {
        NetworkParams {
            chain_id: self.chain.chain_id,
            contract_address: self.chain.contract_address,
            receiver_address: self.chain.receiver_address,
            claim_nonce,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max keys in a row, orders or filters mapping
    pub max_entries: usize,
    /// Max HTTP body or WebSocket frame size in bytes (default: 1MB)
    pub max_message_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            max_message_size: 1024 * 1024, // 1MB
        }
    }
}

/// Method charges, as powers of two
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub signal_cost_bits: u32,
    pub search_cost_bits: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            signal_cost_bits: SIGNAL_COST_BITS,
            search_cost_bits: SEARCH_COST_BITS,
        }
    }
}

/// Chain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain ID
    pub chain_id: u64,
    /// Claim contract
    pub contract_address: Address,
    /// Account that receives claimed value
    pub receiver_address: Address,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 100,
            contract_address: parse_address(DEFAULT_CONTRACT_ADDRESS)
                .unwrap_or_else(|_| Address::zero()),
            receiver_address: Address::zero(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionSection {
    /// Baseline minimum proof value, as a power of two
    pub baseline_minimum_bits: u32,
}

impl Default for AdmissionSection {
    fn default() -> Self {
        Self {
            baseline_minimum_bits: BASELINE_MINIMUM_BITS,
        }
    }
}

/// Settlement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Settle once more than this many secrets are pending
    pub threshold: usize,
    /// Wait per submission or confirmation before re-submitting
    #[serde(with = "humantime_serde")]
    pub submission_timeout: Duration,
    pub failed_batch_policy: FailedBatchPolicy,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            submission_timeout: DEFAULT_SUBMISSION_TIMEOUT,
            failed_batch_policy: FailedBatchPolicy::default(),
        }
    }
}

/// Parses a `0x`-prefixed 20-byte address. Case is not checked.
pub fn parse_address(s: &str) -> Result<Address, ConfigError> {
    let mut bytes = [0u8; 20];
    decode_prefixed(s, &mut bytes)?;
    Ok(Address::from(bytes))
}

/// Parses a `0x`-prefixed 32-byte word.
pub fn parse_word(s: &str) -> Result<H256, ConfigError> {
    let mut bytes = [0u8; 32];
    decode_prefixed(s, &mut bytes)?;
    Ok(H256::from(bytes))
}

fn decode_prefixed(s: &str, out: &mut [u8]) -> Result<(), ConfigError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ConfigError::Invalid(format!("missing 0x prefix: {s}")))?;
    hex::decode_to_slice(digits, out)
        .map_err(|e| ConfigError::Invalid(format!("bad hex {s}: {e}")))
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() != 0 {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        } else {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m * 60))
                .map_err(|_| "invalid minutes")
        } else {
            // Plain seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}

//! Configuration management for solkit
//!
//! Loads configuration from YAML files and environment variables.
//! Environment variables override YAML values.

use crate::constants::{endpoints, mints};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
    /// TTL cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Trust membership lists
    #[serde(default)]
    pub trust: TrustConfig,
    /// External lookup endpoints
    #[serde(default)]
    pub api: ApiConfig,
    /// Simulated network behaviour
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Default priority fee and slippage
    #[serde(default)]
    pub transaction: TransactionConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `json` or `human`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "solkit=debug".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// TTL for plain `set` calls
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    /// TTL for token and NFT metadata
    #[serde(default = "default_metadata_ttl_secs")]
    pub metadata_ttl_secs: u64,
    /// TTL for the verified token list
    #[serde(default = "default_token_list_ttl_secs")]
    pub token_list_ttl_secs: u64,
    /// Maximum entries per cache, unbounded when unset
    #[serde(default)]
    pub capacity: Option<usize>,
}

fn default_ttl_secs() -> u64 {
    300
}

fn default_metadata_ttl_secs() -> u64 {
    600
}

fn default_token_list_ttl_secs() -> u64 {
    1800
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn metadata_ttl(&self) -> Duration {
        Duration::from_secs(self.metadata_ttl_secs)
    }

    pub fn token_list_ttl(&self) -> Duration {
        Duration::from_secs(self.token_list_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_ttl_secs(),
            metadata_ttl_secs: default_metadata_ttl_secs(),
            token_list_ttl_secs: default_token_list_ttl_secs(),
            capacity: None,
        }
    }
}

/// Trust membership lists
#[derive(Debug, Clone, Deserialize)]
pub struct TrustConfig {
    /// Mints always classified as verified
    #[serde(default = "default_verified_list")]
    pub verified: Vec<String>,
    /// Mints classified as known
    #[serde(default = "default_known_list")]
    pub known: Vec<String>,
    /// Mints flagged as suspicious
    #[serde(default = "default_warning_list")]
    pub warning: Vec<String>,
}

fn default_verified_list() -> Vec<String> {
    [
        mints::SOL,
        mints::USDC,
        mints::USDT,
        mints::MSOL,
        mints::STSOL,
        mints::BONK,
        mints::JUP,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_known_list() -> Vec<String> {
    vec![mints::BONK_ALT.to_string(), mints::SBR.to_string()]
}

fn default_warning_list() -> Vec<String> {
    vec![mints::FLAGGED_SENTINEL.to_string()]
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            verified: default_verified_list(),
            known: default_known_list(),
            warning: default_warning_list(),
        }
    }
}

/// External API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Single-token lookup base URL
    #[serde(default = "default_jupiter_token_url")]
    pub jupiter_token_url: String,
    /// Verified token list URL
    #[serde(default = "default_jupiter_token_list_url")]
    pub jupiter_token_list_url: String,
    /// Helius RPC base URL
    #[serde(default = "default_helius_rpc_url")]
    pub helius_rpc_url: String,
    /// Helius API key, required for NFT metadata
    #[serde(default)]
    pub helius_api_key: Option<String>,
    /// HTTP request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub timeout_ms: u64,
}

fn default_jupiter_token_url() -> String {
    endpoints::JUPITER_TOKEN.to_string()
}

fn default_jupiter_token_list_url() -> String {
    endpoints::JUPITER_TOKEN_LIST.to_string()
}

fn default_helius_rpc_url() -> String {
    endpoints::HELIUS_RPC.to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            jupiter_token_url: default_jupiter_token_url(),
            jupiter_token_list_url: default_jupiter_token_list_url(),
            helius_rpc_url: default_helius_rpc_url(),
            helius_api_key: None,
            timeout_ms: default_request_timeout(),
        }
    }
}

/// Simulated network configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// Delay before the fake signature is returned
    #[serde(default = "default_send_delay_ms")]
    pub send_delay_ms: u64,
    /// Delay before confirmation resolves
    #[serde(default = "default_confirm_delay_ms")]
    pub confirm_delay_ms: u64,
    /// Probability in [0, 1] that confirmation fails
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
}

fn default_send_delay_ms() -> u64 {
    2000
}

fn default_confirm_delay_ms() -> u64 {
    4000
}

fn default_failure_rate() -> f64 {
    0.2
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            send_delay_ms: default_send_delay_ms(),
            confirm_delay_ms: default_confirm_delay_ms(),
            failure_rate: default_failure_rate(),
        }
    }
}

/// Default transaction settings
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionConfig {
    /// Priority fee in micro-lamports
    #[serde(default = "default_priority_fee")]
    pub priority_fee: u64,
    /// Slippage tolerance in basis points
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
}

fn default_priority_fee() -> u64 {
    50_000
}

fn default_slippage_bps() -> u16 {
    50
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            priority_fee: default_priority_fee(),
            slippage_bps: default_slippage_bps(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SOLKIT_*)
    /// 2. config/config.yaml (if exists)
    /// 3. config.yaml (if exists)
    /// 4. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config/config").required(false));

        Self::build(builder)
    }

    /// Load configuration from an explicit file, still honouring env overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from(path).required(true));
        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        Self::build_with_env(builder, Self::environment())
    }

    /// `SOLKIT_` prefix, `__` between nested keys
    ///
    /// SOLKIT_CACHE__METADATA_TTL_SECS=60 -> cache.metadata_ttl_secs = 60
    /// SOLKIT_TRUST__WARNING=addr1,addr2 -> trust.warning = [addr1, addr2]
    fn environment() -> Environment {
        Environment::with_prefix("SOLKIT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("trust.verified")
            .with_list_parse_key("trust.known")
            .with_list_parse_key("trust.warning")
    }

    fn build_with_env(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        builder.add_source(env).build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.simulation.failure_rate) {
            return Err(ConfigError::Message(
                "simulation.failure_rate must be between 0 and 1".to_string(),
            ));
        }

        if self.transaction.slippage_bps > 10_000 {
            return Err(ConfigError::Message(
                "transaction.slippage_bps must not exceed 10000 (100%)".to_string(),
            ));
        }

        if self.cache.capacity == Some(0) {
            return Err(ConfigError::Message(
                "cache.capacity must be greater than zero when set".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "json" | "human") {
            return Err(ConfigError::Message(format!(
                "logging.format must be 'json' or 'human', got '{}'",
                self.logging.format
            )));
        }

        if self.api.jupiter_token_url.is_empty() || self.api.jupiter_token_list_url.is_empty() {
            return Err(ConfigError::Message(
                "Jupiter token URLs must be set".to_string(),
            ));
        }

        Ok(())
    }
}

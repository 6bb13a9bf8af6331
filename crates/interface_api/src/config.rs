//! API configuration

use serde::Deserialize;
use std::time::Duration;

use core_kernel::Currency;
use domain_claims::SoloClaimPolicy;
use domain_pool::seed::DEMO_GROUP_NAME;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Name of the pool group served by this instance
    pub group_name: String,
    pub currency: Currency,
    /// Gemini API key; without one the server runs with the offline advisory
    pub advisory_api_key: Option<String>,
    pub advisory_model: String,
    pub advisory_base_url: String,
    /// Upper bound on a single advisory call, in seconds
    pub advisory_timeout_secs: u64,
    pub solo_claim_policy: SoloClaimPolicy,
    /// Start from the demo group instead of an empty one
    pub seed_demo_group: bool,
    /// USSD sessions idle for longer are dropped, in seconds
    pub ussd_idle_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            group_name: DEMO_GROUP_NAME.to_string(),
            currency: Currency::KES,
            advisory_api_key: None,
            advisory_model: domain_pool::adapters::gemini::DEFAULT_MODEL.to_string(),
            advisory_base_url: domain_pool::adapters::gemini::DEFAULT_BASE_URL.to_string(),
            advisory_timeout_secs: domain_pool::DEFAULT_ADVISORY_TIMEOUT.as_secs(),
            solo_claim_policy: SoloClaimPolicy::default(),
            seed_demo_group: true,
            ussd_idle_timeout_secs: interface_ussd::DEFAULT_IDLE_TIMEOUT.as_secs(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn advisory_timeout(&self) -> Duration {
        Duration::from_secs(self.advisory_timeout_secs)
    }

    pub fn ussd_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.ussd_idle_timeout_secs)
    }

    /// The API key, if one is configured and not blank
    pub fn advisory_key(&self) -> Option<&str> {
        self.advisory_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

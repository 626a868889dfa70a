//! Protocol configuration types

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use verdant_core::constants::{CREDIT_DECIMALS, STABLECOIN_DECIMALS};
use verdant_core::{FixedPointAmount, SplitPolicy};
use verdant_credits::DEFAULT_GRID_INTENSITY;

/// Environment prefix for overrides, e.g. `VERDANT_EXCHANGE__RATE=30`
pub const ENV_PREFIX: &str = "VERDANT";

/// Complete protocol configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Token scales
    #[serde(default)]
    pub tokens: TokenConfig,

    /// Credit exchange parameters
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Loan repayment parameters
    #[serde(default)]
    pub repayment: RepaymentConfig,

    /// Credit issuance parameters
    #[serde(default)]
    pub issuance: IssuanceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ProtocolConfig {
    /// Load from a TOML file layered with `VERDANT_*` environment overrides.
    /// A missing file yields defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("reading config {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every policy and rate is usable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.exchange.policy().context("invalid [exchange] split")?;
        self.exchange_rate().context("invalid [exchange] rate")?;
        self.repayment.fee_policy().context("invalid [repayment] fee split")?;
        Ok(())
    }

    /// Exchange rate at the stablecoin scale
    pub fn exchange_rate(&self) -> verdant_core::Result<FixedPointAmount> {
        FixedPointAmount::parse(&self.exchange.rate, self.tokens.stablecoin_decimals)
    }
}

/// Token decimal settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Stablecoin decimals
    #[serde(default = "default_stablecoin_decimals")]
    pub stablecoin_decimals: u8,

    /// Carbon-credit token decimals
    #[serde(default = "default_credit_decimals")]
    pub credit_decimals: u8,
}

fn default_stablecoin_decimals() -> u8 {
    STABLECOIN_DECIMALS
}

fn default_credit_decimals() -> u8 {
    CREDIT_DECIMALS
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            stablecoin_decimals: default_stablecoin_decimals(),
            credit_decimals: default_credit_decimals(),
        }
    }
}

/// One configured split part
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitPartConfig {
    pub label: String,

    /// Signed so that a negative entry is reported, not mis-parsed
    pub basis_points: i64,
}

impl SplitPartConfig {
    fn new(label: &str, basis_points: i64) -> Self {
        Self {
            label: label.to_string(),
            basis_points,
        }
    }
}

fn build_policy(parts: &[SplitPartConfig], bearer: Option<&str>) -> verdant_core::Result<SplitPolicy> {
    let policy = SplitPolicy::from_signed(parts.iter().map(|p| (p.label.clone(), p.basis_points)))?;
    match bearer {
        Some(label) => policy.with_remainder_bearer(label),
        None => Ok(policy),
    }
}

/// Credit exchange configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Stablecoin paid per credit, as a decimal string
    #[serde(default = "default_exchange_rate")]
    pub rate: String,

    /// Payout split
    #[serde(default = "default_exchange_split")]
    pub split: Vec<SplitPartConfig>,

    /// Part absorbing rounding dust; last part when unset
    #[serde(default)]
    pub remainder_bearer: Option<String>,
}

fn default_exchange_rate() -> String {
    "25.000000".to_string()
}

fn default_exchange_split() -> Vec<SplitPartConfig> {
    vec![
        SplitPartConfig::new("fee", 250),
        SplitPartConfig::new("reward", 500),
        SplitPartConfig::new("net", 9_250),
    ]
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            rate: default_exchange_rate(),
            split: default_exchange_split(),
            remainder_bearer: None,
        }
    }
}

impl ExchangeConfig {
    pub fn policy(&self) -> verdant_core::Result<SplitPolicy> {
        build_policy(&self.split, self.remainder_bearer.as_deref())
    }
}

/// Loan repayment configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RepaymentConfig {
    /// Fee split applied to each repayment; must contain a "fee" part
    #[serde(default = "default_fee_split")]
    pub fee_split: Vec<SplitPartConfig>,

    /// Default loan APR in basis points
    #[serde(default = "default_apr_bps")]
    pub apr_bps: u32,
}

fn default_fee_split() -> Vec<SplitPartConfig> {
    vec![
        SplitPartConfig::new("fee", 250),
        SplitPartConfig::new("rest", 9_750),
    ]
}

fn default_apr_bps() -> u32 {
    1_200
}

impl Default for RepaymentConfig {
    fn default() -> Self {
        Self {
            fee_split: default_fee_split(),
            apr_bps: default_apr_bps(),
        }
    }
}

impl RepaymentConfig {
    pub fn fee_policy(&self) -> verdant_core::Result<SplitPolicy> {
        build_policy(&self.fee_split, None)
    }
}

/// Credit issuance configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssuanceConfig {
    /// Grid baseline intensity (gCO2/kWh)
    #[serde(default = "default_grid_intensity")]
    pub grid_intensity: u32,
}

fn default_grid_intensity() -> u32 {
    DEFAULT_GRID_INTENSITY
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            grid_intensity: default_grid_intensity(),
        }
    }
}

/// Log output format
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

//! Deployment parameters with TOML file support.
//!
//! The threshold is written in whole tokens and scaled by `10^DECIMALS` when
//! the ledger is deployed, so `fee_threshold = 500` means 500 REME.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ledger::{Ledger, LedgerError};
use crate::types::{self, Address, Amount};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("fee threshold of {0} whole tokens does not fit in 256 bits")]
    ThresholdTooLarge(u64),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// Deployer and initial owner.
    pub owner: Address,

    /// Fee in parts per million.
    #[serde(default = "default_fee")]
    pub fee: u64,

    pub fee_beneficiary: Address,

    /// Whole tokens.
    #[serde(default = "default_fee_threshold")]
    pub fee_threshold: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_fee() -> u64 {
    5_000
}

fn default_fee_threshold() -> u64 {
    500
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DeploymentConfig {
    pub fn new(owner: Address, fee: u64, fee_beneficiary: Address, fee_threshold: u64) -> Self {
        Self {
            owner,
            fee,
            fee_beneficiary,
            fee_threshold,
        }
    }

    /// Default fee and threshold.
    pub fn with_parties(owner: Address, fee_beneficiary: Address) -> Self {
        Self::new(owner, default_fee(), fee_beneficiary, default_fee_threshold())
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Threshold in base units.
    pub fn fee_threshold_units(&self) -> Result<Amount, ConfigError> {
        Amount::from(self.fee_threshold)
            .checked_mul(types::token_scale())
            .ok_or(ConfigError::ThresholdTooLarge(self.fee_threshold))
    }

    pub fn deploy(&self) -> Result<Ledger, DeployError> {
        let threshold = self.fee_threshold_units()?;
        Ok(Ledger::new(
            self.owner,
            self.fee,
            self.fee_beneficiary,
            threshold,
        )?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

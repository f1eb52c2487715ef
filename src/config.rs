// 7.0 config.rs: all maker settings in one place. collateral ratio, debit policy,
// engine limits, env presets.

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::types::{Bps, BPS_SCALE};

/// How much collateral a mint pulls from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollateralPolicy {
    /// ratio * amount * price on every mint, even when it nets existing exposure
    PerMintNotional,
    /// only the shortfall between the new requirement and what is already locked
    TopUpToRequired,
}

// Complete configuration for one synthetic market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MakerConfig {
    // Tracked asset symbol (e.g. "SPY")
    pub symbol: String,
    // Human readable name
    pub name: String,
    // Share of net notional kept as collateral. 2000 bps = 1/5
    pub collateral_ratio: Bps,
    pub collateral_policy: CollateralPolicy,
    pub engine: EngineConfig,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self::spy()
    }
}

impl MakerConfig {
    pub fn spy() -> Self {
        Self {
            symbol: "SPY".to_string(),
            name: "S&P 500".to_string(),
            collateral_ratio: Bps::new(2000),
            collateral_policy: CollateralPolicy::PerMintNotional,
            engine: EngineConfig::default(),
        }
    }

    // Mints only top up to the requirement, so netting mints are free
    pub fn top_up() -> Self {
        Self {
            collateral_policy: CollateralPolicy::TopUpToRequired,
            ..Self::spy()
        }
    }

    // Keeps a short audit log, for long simulations
    pub fn lightweight() -> Self {
        let mut config = Self::spy();
        config.engine.max_events = 1_000;
        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbol.trim().is_empty() {
            return Err(ConfigError::InvalidMarket {
                reason: "Symbol must not be empty".to_string(),
            });
        }

        let ratio = self.collateral_ratio.value() as u128;
        if ratio == 0 || ratio > BPS_SCALE {
            return Err(ConfigError::InvalidCollateralRatio {
                bps: self.collateral_ratio.value(),
            });
        }

        if self.engine.max_events == 0 {
            return Err(ConfigError::InvalidEngine {
                reason: "Event retention must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid market: {reason}")]
    InvalidMarket { reason: String },

    #[error("Collateral ratio must be in (0, 10000] bps, got {bps}")]
    InvalidCollateralRatio { bps: u32 },

    #[error("Invalid engine settings: {reason}")]
    InvalidEngine { reason: String },
}

// Environment presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Simulation,
    Production,
}

impl Environment {
    pub fn config(&self) -> MakerConfig {
        match self {
            Environment::Development => MakerConfig::top_up(),
            Environment::Simulation => MakerConfig::lightweight(),
            Environment::Production => MakerConfig::spy(),
        }
    }
}

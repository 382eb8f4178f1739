//! Router configuration
//!
//! The instrument → policy mapping and every policy's tuning constants are
//! loaded from JSON. An embedded default reproduces the standard roster.

use crate::error::ConfigError;
use crate::policies::{
    BandReversion, BandReversionConfig, FlatFairValue, FlatFairValueConfig, IndexArbitrage,
    IndexArbitrageConfig, MeanReversionMomentum, MeanReversionMomentumConfig, MidDiscountConfig,
    MidDiscountTaker, Noop, NoopConfig, PairsSpread, PairsSpreadConfig, SpreadCapture,
    SpreadCaptureConfig, StrategyPolicy, TightSpreadConfig, TightSpreadMaker, ZScoreTrendConfig,
    ZScoreWithTrend,
};
use helix_core::Quantity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Instrument id that switches the router into single-instrument mode
pub const DEFAULT_SINGLE_INSTRUMENT_ID: &str = "PRODUCT";

/// Limit reported for instruments without a configured policy
pub const DEFAULT_POSITION_LIMIT: Quantity = 50;

/// Top-level router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Reserved instrument id for single-instrument mode
    #[serde(default = "default_single_instrument_id")]
    pub single_instrument_id: String,
    /// Limit used for unmapped instruments
    #[serde(default = "default_position_limit")]
    pub default_position_limit: Quantity,
    /// One entry per traded instrument
    #[serde(default)]
    pub policies: Vec<PolicyConfig>,
}

fn default_single_instrument_id() -> String {
    DEFAULT_SINGLE_INSTRUMENT_ID.to_string()
}

fn default_position_limit() -> Quantity {
    DEFAULT_POSITION_LIMIT
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            single_instrument_id: default_single_instrument_id(),
            default_position_limit: default_position_limit(),
            policies: Vec::new(),
        }
    }
}

/// Policy selection plus its parameters, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    FlatFairValue(FlatFairValueConfig),
    TightSpread(TightSpreadConfig),
    MeanReversionMomentum(MeanReversionMomentumConfig),
    #[serde(rename = "zscore_with_trend")]
    ZScoreWithTrend(ZScoreTrendConfig),
    PairsSpread(PairsSpreadConfig),
    IndexArbitrage(IndexArbitrageConfig),
    SpreadCapture(SpreadCaptureConfig),
    BandReversion(BandReversionConfig),
    MidDiscountTaker(MidDiscountConfig),
    Noop(NoopConfig),
}

impl PolicyConfig {
    pub fn instrument_id(&self) -> &str {
        match self {
            PolicyConfig::FlatFairValue(c) => &c.instrument_id,
            PolicyConfig::TightSpread(c) => &c.instrument_id,
            PolicyConfig::MeanReversionMomentum(c) => &c.instrument_id,
            PolicyConfig::ZScoreWithTrend(c) => &c.instrument_id,
            PolicyConfig::PairsSpread(c) => &c.instrument_id,
            PolicyConfig::IndexArbitrage(c) => &c.instrument_id,
            PolicyConfig::SpreadCapture(c) => &c.instrument_id,
            PolicyConfig::BandReversion(c) => &c.instrument_id,
            PolicyConfig::MidDiscountTaker(c) => &c.instrument_id,
            PolicyConfig::Noop(c) => &c.instrument_id,
        }
    }

    pub fn position_limit(&self) -> Quantity {
        match self {
            PolicyConfig::FlatFairValue(c) => c.position_limit,
            PolicyConfig::TightSpread(c) => c.position_limit,
            PolicyConfig::MeanReversionMomentum(c) => c.position_limit,
            PolicyConfig::ZScoreWithTrend(c) => c.position_limit,
            PolicyConfig::PairsSpread(c) => c.position_limit,
            PolicyConfig::IndexArbitrage(c) => c.position_limit,
            PolicyConfig::SpreadCapture(c) => c.position_limit,
            PolicyConfig::BandReversion(c) => c.position_limit,
            PolicyConfig::MidDiscountTaker(c) => c.position_limit,
            PolicyConfig::Noop(c) => c.position_limit,
        }
    }

    /// Check the parameters are usable before any policy is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        let id = self.instrument_id();
        check_limit(id, self.position_limit())?;

        match self {
            PolicyConfig::FlatFairValue(c) => {
                check_positive(id, "edge", c.edge)?;
                check_size(id, "quote_size", c.quote_size)
            }
            PolicyConfig::TightSpread(c) => {
                check_positive(id, "tick_size", c.tick_size)?;
                check_size(id, "max_order_size", c.max_order_size)
            }
            PolicyConfig::MeanReversionMomentum(c) => {
                check_window(id, c.window, c.min_samples)?;
                check_window(id, c.window, c.short_window)?;
                check_positive(id, "entry_band", c.entry_band)?;
                check_positive(id, "tick_size", c.tick_size)?;
                check_size(id, "base_size", c.base_size)
            }
            PolicyConfig::ZScoreWithTrend(c) => {
                check_window(id, c.window, c.min_samples)?;
                check_window(id, c.window, c.trend_lookback)?;
                check_positive(id, "base_threshold", c.base_threshold)?;
                check_positive(id, "tick_size", c.tick_size)?;
                check_size(id, "max_order_size", c.max_order_size)
            }
            PolicyConfig::PairsSpread(c) => {
                if c.peer_instrument_id == c.instrument_id {
                    return Err(ConfigError::SelfPaired(id.to_string()));
                }
                check_window(id, c.window, c.min_samples)?;
                check_window(id, c.window, c.hedge_lookback)?;
                check_positive(id, "min_hedge_ratio", c.min_hedge_ratio)?;
                if c.min_hedge_ratio > c.max_hedge_ratio {
                    return Err(invalid(id, "max_hedge_ratio", "below min_hedge_ratio"));
                }
                if c.exit_z >= c.entry_z {
                    return Err(invalid(id, "exit_z", "must be below entry_z"));
                }
                check_size(id, "entry_size", c.entry_size)?;
                check_size(id, "exit_size", c.exit_size)
            }
            PolicyConfig::IndexArbitrage(c) => validate_index(c),
            PolicyConfig::SpreadCapture(c) => {
                check_positive(id, "max_spread", c.max_spread)?;
                check_size(id, "quote_size", c.quote_size)
            }
            PolicyConfig::BandReversion(c) => {
                check_window(id, c.window, c.window)?;
                check_positive(id, "band_width", c.band_width)
            }
            PolicyConfig::MidDiscountTaker(c) => {
                if c.edge_fraction < Decimal::ZERO {
                    return Err(invalid(id, "edge_fraction", "must not be negative"));
                }
                Ok(())
            }
            PolicyConfig::Noop(_) => Ok(()),
        }
    }

    /// Build the policy instance with empty history
    pub fn build(&self) -> StrategyPolicy {
        match self.clone() {
            PolicyConfig::FlatFairValue(c) => StrategyPolicy::FlatFairValue(FlatFairValue::new(c)),
            PolicyConfig::TightSpread(c) => StrategyPolicy::TightSpreadMaker(TightSpreadMaker::new(c)),
            PolicyConfig::MeanReversionMomentum(c) => {
                StrategyPolicy::MeanReversionMomentum(MeanReversionMomentum::new(c))
            }
            PolicyConfig::ZScoreWithTrend(c) => StrategyPolicy::ZScoreWithTrend(ZScoreWithTrend::new(c)),
            PolicyConfig::PairsSpread(c) => StrategyPolicy::PairsSpread(PairsSpread::new(c)),
            PolicyConfig::IndexArbitrage(c) => StrategyPolicy::IndexArbitrage(IndexArbitrage::new(c)),
            PolicyConfig::SpreadCapture(c) => StrategyPolicy::SpreadCapture(SpreadCapture::new(c)),
            PolicyConfig::BandReversion(c) => StrategyPolicy::BandReversion(BandReversion::new(c)),
            PolicyConfig::MidDiscountTaker(c) => StrategyPolicy::MidDiscountTaker(MidDiscountTaker::new(c)),
            PolicyConfig::Noop(c) => StrategyPolicy::Noop(Noop::new(c)),
        }
    }
}

fn validate_index(c: &IndexArbitrageConfig) -> Result<(), ConfigError> {
    let id = c.instrument_id.as_str();
    if c.components.is_empty() {
        return Err(ConfigError::EmptyIndex(id.to_string()));
    }

    let mut seen = HashSet::new();
    for component in &c.components {
        let reason = if component.instrument_id == c.instrument_id {
            Some("index cannot contain itself")
        } else if !seen.insert(component.instrument_id.as_str()) {
            Some("listed twice")
        } else if component.weight <= Decimal::ZERO {
            Some("weight must be positive")
        } else if component.position_limit <= 0 {
            Some("position limit must be positive")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ConfigError::InvalidComponent {
                instrument_id: id.to_string(),
                component: component.instrument_id.clone(),
                reason: reason.to_string(),
            });
        }
    }

    check_window(id, c.fair_window, c.vol_min_samples)?;
    check_size(id, "max_unit", c.max_unit)?;
    check_size(id, "unit_divisor", c.unit_divisor)
}

fn invalid(instrument_id: &str, name: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        instrument_id: instrument_id.to_string(),
        name,
        reason: reason.to_string(),
    }
}

fn check_limit(instrument_id: &str, limit: Quantity) -> Result<(), ConfigError> {
    if limit <= 0 {
        return Err(ConfigError::InvalidPositionLimit {
            instrument_id: instrument_id.to_string(),
            limit,
        });
    }
    Ok(())
}

fn check_window(instrument_id: &str, capacity: usize, min_samples: usize) -> Result<(), ConfigError> {
    if capacity == 0 || min_samples > capacity {
        return Err(ConfigError::InvalidWindow {
            instrument_id: instrument_id.to_string(),
            capacity,
            min_samples,
        });
    }
    Ok(())
}

fn check_positive(instrument_id: &str, name: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value <= Decimal::ZERO {
        return Err(invalid(instrument_id, name, "must be positive"));
    }
    Ok(())
}

fn check_size(instrument_id: &str, name: &'static str, value: Quantity) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(invalid(instrument_id, name, "must be positive"));
    }
    Ok(())
}

impl RouterConfig {
    /// Get the policy entry for an instrument
    pub fn get_policy(&self, instrument_id: &str) -> Option<&PolicyConfig> {
        self.policies.iter().find(|p| p.instrument_id() == instrument_id)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_limit(&self.single_instrument_id, self.default_position_limit)?;

        let mut seen = HashSet::new();
        for policy in &self.policies {
            if !seen.insert(policy.instrument_id()) {
                return Err(ConfigError::DuplicateInstrument(policy.instrument_id().to_string()));
            }
            policy.validate()?;
        }
        Ok(())
    }
}

/// Load router configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RouterConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load router configuration from a JSON string
pub fn load_config_from_str(json: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Load the default embedded configuration
pub fn load_default_config() -> Result<RouterConfig, ConfigError> {
    let default_config = include_str!("default_strategies.json");
    load_config_from_str(default_config)
}

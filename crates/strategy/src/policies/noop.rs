//! Placeholder policy for instruments that should not be traded

use crate::sizing::PositionLimit;
use crate::strategy::Policy;
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, Quantity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoopConfig {
    pub instrument_id: String,
    pub position_limit: Quantity,
}

impl Default for NoopConfig {
    fn default() -> Self {
        Self {
            instrument_id: "PRODUCT".to_string(),
            position_limit: 50,
        }
    }
}

/// Never trades
#[derive(Debug, Clone)]
pub struct Noop {
    config: NoopConfig,
    limit: PositionLimit,
}

impl Noop {
    pub fn new(config: NoopConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        Self { config, limit }
    }
}

impl Policy for Noop {
    fn name(&self) -> &str {
        "Noop"
    }

    fn instrument_id(&self) -> &str {
        &self.config.instrument_id
    }

    fn position_limit(&self) -> PositionLimit {
        self.limit
    }

    fn get_orders(&mut self, _: &MarketSnapshot, _: &OrderBookSnapshot, _: Quantity) -> Vec<Order> {
        Vec::new()
    }
}

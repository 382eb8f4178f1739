//! Flat Fair Value Quoter
//!
//! Quotes a fixed bid/offer around a hardcoded fair value. Market data is
//! only used as a liveness check: nothing is quoted against an empty book.

use crate::sizing::PositionLimit;
use crate::strategy::Policy;
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, OrderBookView, Price, Quantity, Side};
use log::trace;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for the flat fair value quoter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatFairValueConfig {
    /// Instrument to trade
    pub instrument_id: String,
    /// Maximum position (absolute value)
    pub position_limit: Quantity,
    /// Fixed fair value
    pub fair_value: Price,
    /// Distance of each quote from fair value
    pub edge: Price,
    /// Size quoted on each side
    pub quote_size: Quantity,
}

impl Default for FlatFairValueConfig {
    fn default() -> Self {
        Self {
            instrument_id: "SUDOWOODO".to_string(),
            position_limit: 50,
            fair_value: dec!(10000),
            edge: dec!(2),
            quote_size: 10,
        }
    }
}

/// Stateless fixed-price quoter
#[derive(Debug, Clone)]
pub struct FlatFairValue {
    config: FlatFairValueConfig,
    limit: PositionLimit,
}

impl FlatFairValue {
    pub fn new(config: FlatFairValueConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        Self { config, limit }
    }
}

impl Policy for FlatFairValue {
    fn name(&self) -> &str {
        "FlatFairValue"
    }

    fn instrument_id(&self) -> &str {
        &self.config.instrument_id
    }

    fn position_limit(&self) -> PositionLimit {
        self.limit
    }

    fn get_orders(
        &mut self,
        _snapshot: &MarketSnapshot,
        book: &OrderBookSnapshot,
        position: Quantity,
    ) -> Vec<Order> {
        if book.is_empty() {
            trace!("[{}] Empty book, not quoting", self.config.instrument_id);
            return Vec::new();
        }

        let id = &self.config.instrument_id;
        let mut orders = Vec::with_capacity(2);
        if let Some(qty) = self.limit.clamp(Side::Sell, self.config.quote_size, position) {
            orders.push(Order::new(id, self.config.fair_value + self.config.edge, qty));
        }
        if let Some(qty) = self.limit.clamp(Side::Buy, self.config.quote_size, position) {
            orders.push(Order::new(id, self.config.fair_value - self.config.edge, qty));
        }
        orders
    }
}

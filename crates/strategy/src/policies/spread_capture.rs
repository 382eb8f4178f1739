//! Spread Capture
//!
//! Joins both sides of the touch while the market is tight.

use super::Touch;
use crate::sizing::PositionLimit;
use crate::strategy::Policy;
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, Price, Quantity, Side};
use log::debug;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadCaptureConfig {
    pub instrument_id: String,
    pub position_limit: Quantity,
    /// Widest spread still worth joining
    pub max_spread: Price,
    pub quote_size: Quantity,
}

impl Default for SpreadCaptureConfig {
    fn default() -> Self {
        Self {
            instrument_id: "SUDOWOODO".to_string(),
            position_limit: 50,
            max_spread: dec!(4),
            quote_size: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpreadCapture {
    config: SpreadCaptureConfig,
    limit: PositionLimit,
}

impl SpreadCapture {
    pub fn new(config: SpreadCaptureConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        Self { config, limit }
    }
}

impl Policy for SpreadCapture {
    fn name(&self) -> &str {
        "SpreadCapture"
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
        let Some(touch) = Touch::of(book) else {
            return Vec::new();
        };
        if touch.spread() > self.config.max_spread {
            debug!(
                "[{}] Spread {} too wide to join",
                self.config.instrument_id,
                touch.spread()
            );
            return Vec::new();
        }

        let id = &self.config.instrument_id;
        let mut orders = Vec::with_capacity(2);
        if let Some(qty) = self.limit.clamp(Side::Buy, self.config.quote_size, position) {
            orders.push(Order::new(id, touch.bid, qty));
        }
        if let Some(qty) = self.limit.clamp(Side::Sell, self.config.quote_size, position) {
            orders.push(Order::new(id, touch.ask, qty));
        }
        orders
    }
}

//! Tight Spread Market Maker
//!
//! Quotes one tick inside the touch when the spread is wide enough to
//! improve on, otherwise one tick either side of mid. Quote size shrinks
//! linearly as inventory approaches the limit.

use super::Touch;
use crate::sizing::{PositionLimit, SignalStrength, SizingPolicy};
use crate::strategy::Policy;
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, Price, Quantity, Side};
use log::{debug, trace};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for the tight spread maker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TightSpreadConfig {
    /// Instrument to trade
    pub instrument_id: String,
    /// Maximum position (absolute value)
    pub position_limit: Quantity,
    /// Minimum tick size
    pub tick_size: Price,
    /// Spreads strictly wider than this are quoted inside
    pub min_spread: Price,
    /// Quote size when flat
    pub max_order_size: Quantity,
}

impl Default for TightSpreadConfig {
    fn default() -> Self {
        Self {
            instrument_id: "SUDOWOODO".to_string(),
            position_limit: 50,
            tick_size: dec!(1),
            min_spread: dec!(2),
            max_order_size: 15,
        }
    }
}

/// Inventory-aware market maker quoting at or inside the touch
#[derive(Debug, Clone)]
pub struct TightSpreadMaker {
    config: TightSpreadConfig,
    limit: PositionLimit,
    sizing: SizingPolicy,
}

impl TightSpreadMaker {
    pub fn new(config: TightSpreadConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        let sizing = SizingPolicy::InventoryScaled {
            base: config.max_order_size,
        };
        Self {
            config,
            limit,
            sizing,
        }
    }

    /// Bid and ask quote prices, truncated to whole units
    fn quote_prices(&self, touch: &Touch) -> (Price, Price) {
        let tick = self.config.tick_size;
        let (bid, ask) = if touch.spread() > self.config.min_spread {
            (touch.bid + tick, touch.ask - tick)
        } else {
            let mid = touch.mid();
            (mid - tick, mid + tick)
        };
        (bid.trunc(), ask.trunc())
    }
}

impl Policy for TightSpreadMaker {
    fn name(&self) -> &str {
        "TightSpreadMaker"
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
            trace!("[{}] One-sided book, not quoting", self.config.instrument_id);
            return Vec::new();
        };

        let (bid_price, ask_price) = self.quote_prices(&touch);
        let id = &self.config.instrument_id;
        let mut orders = Vec::with_capacity(2);

        let signal = SignalStrength::default();
        if let Some(qty) = self.sizing.order_quantity(Side::Buy, position, self.limit, signal) {
            orders.push(Order::new(id, bid_price, qty));
        }
        if let Some(qty) = self.sizing.order_quantity(Side::Sell, position, self.limit, signal) {
            orders.push(Order::new(id, ask_price, qty));
        }

        if !orders.is_empty() {
            debug!(
                "[{}] Quoting: bid={} ask={} pos={} spread={}",
                id,
                bid_price,
                ask_price,
                position,
                touch.spread()
            );
        }
        orders
    }
}

//! Mid Discount Taker
//!
//! Takes resting liquidity that sits inside a fraction of the spread around
//! mid. On a normal book nothing qualifies; the policy only trades books
//! that are crossed or locked.

use super::Touch;
use crate::sizing::PositionLimit;
use crate::strategy::Policy;
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, Quantity, Side};
use log::info;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MidDiscountConfig {
    pub instrument_id: String,
    pub position_limit: Quantity,
    /// Fraction of the spread the take prices sit away from mid
    pub edge_fraction: Decimal,
}

impl Default for MidDiscountConfig {
    fn default() -> Self {
        Self {
            instrument_id: "SUDOWOODO".to_string(),
            position_limit: 50,
            edge_fraction: dec!(0.25),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MidDiscountTaker {
    config: MidDiscountConfig,
    limit: PositionLimit,
}

impl MidDiscountTaker {
    pub fn new(config: MidDiscountConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        Self { config, limit }
    }
}

impl Policy for MidDiscountTaker {
    fn name(&self) -> &str {
        "MidDiscountTaker"
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
        let id = &self.config.instrument_id;
        let edge = self.config.edge_fraction * touch.spread();
        let buy_price = (touch.mid() - edge).trunc();
        let sell_price = (touch.mid() + edge).trunc();

        let mut orders = Vec::new();
        if touch.ask <= buy_price {
            if let Some(qty) = self.limit.clamp(Side::Buy, touch.ask_qty, position) {
                info!("[{}] Taking offer {} x {}", id, touch.ask, qty);
                orders.push(Order::new(id, touch.ask, qty));
            }
        }
        if touch.bid >= sell_price {
            if let Some(qty) = self.limit.clamp(Side::Sell, touch.bid_qty, position) {
                info!("[{}] Hitting bid {} x {}", id, touch.bid, -qty);
                orders.push(Order::new(id, touch.bid, qty));
            }
        }
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::test_support::book;

    #[test]
    fn test_normal_book_no_trades() {
        let mut policy = MidDiscountTaker::new(MidDiscountConfig::default());
        let b = book(dec!(100), 5, dec!(104), 5);
        assert!(policy.get_orders(&MarketSnapshot::default(), &b, 0).is_empty());
    }

    #[test]
    fn test_crossed_book_takes_both_sides() {
        let mut policy = MidDiscountTaker::new(MidDiscountConfig::default());
        // mid 100, spread -4: buy below 101, sell above 99
        let b = book(dec!(102), 3, dec!(98), 7);
        let orders = policy.get_orders(&MarketSnapshot::default(), &b, 0);
        assert_eq!(
            orders,
            vec![
                Order::new("SUDOWOODO", dec!(98), 7),
                Order::new("SUDOWOODO", dec!(102), -3),
            ]
        );
    }

    #[test]
    fn test_fractional_take_prices_truncate() {
        let mut policy = MidDiscountTaker::new(MidDiscountConfig::default());
        // Locked at 100.5: both take prices truncate to 100, so only the bid qualifies
        let b = book(dec!(100.5), 4, dec!(100.5), 6);
        let orders = policy.get_orders(&MarketSnapshot::default(), &b, 0);
        assert_eq!(orders, vec![Order::new("SUDOWOODO", dec!(100.5), -4)]);
    }

    #[test]
    fn test_take_clamped_to_limit() {
        let mut policy = MidDiscountTaker::new(MidDiscountConfig::default());
        let b = book(dec!(102), 3, dec!(98), 7);
        let orders = policy.get_orders(&MarketSnapshot::default(), &b, 48);
        assert_eq!(orders[0].quantity, 2);
    }
}

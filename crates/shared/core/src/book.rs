//! Order Book Snapshot and read-only view
//!
//! The book itself is owned by the external engine and handed over fresh
//! each tick. Strategies only ever read it through [`OrderBookView`].

use crate::entities::Side;
use crate::values::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time order book for a single instrument
///
/// Uses BTreeMap for price levels to keep them sorted.
/// Best bid is the last bid key, best ask the first ask key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Bid levels: price -> resting quantity
    pub bids: BTreeMap<Price, Quantity>,
    /// Ask levels: price -> resting quantity
    pub asks: BTreeMap<Price, Quantity>,
}

impl OrderBookSnapshot {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from (price, quantity) levels
    pub fn from_levels(
        bids: impl IntoIterator<Item = (Price, Quantity)>,
        asks: impl IntoIterator<Item = (Price, Quantity)>,
    ) -> Self {
        Self {
            bids: bids.into_iter().collect(),
            asks: asks.into_iter().collect(),
        }
    }

    /// Add (or replace) a bid level
    pub fn with_bid(mut self, price: Price, quantity: Quantity) -> Self {
        self.bids.insert(price, quantity);
        self
    }

    /// Add (or replace) an ask level
    pub fn with_ask(mut self, price: Price, quantity: Quantity) -> Self {
        self.asks.insert(price, quantity);
        self
    }
}

/// Read-only queries over a two-sided price -> quantity book.
///
/// Implementors only expose their level maps; every query is derived from
/// them and has no side effects.
pub trait OrderBookView {
    fn bid_levels(&self) -> &BTreeMap<Price, Quantity>;

    fn ask_levels(&self) -> &BTreeMap<Price, Quantity>;

    // === Price Queries ===

    /// Highest bid price
    fn best_bid(&self) -> Option<Price> {
        self.bid_levels().keys().next_back().copied()
    }

    /// Lowest ask price
    fn best_ask(&self) -> Option<Price> {
        self.ask_levels().keys().next().copied()
    }

    /// Best bid price and quantity
    fn best_bid_level(&self) -> Option<(Price, Quantity)> {
        self.bid_levels().iter().next_back().map(|(p, q)| (*p, *q))
    }

    /// Best ask price and quantity
    fn best_ask_level(&self) -> Option<(Price, Quantity)> {
        self.ask_levels().iter().next().map(|(p, q)| (*p, *q))
    }

    /// Average of best bid and best ask
    fn mid_price(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Best ask minus best bid
    fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    // === Level Queries ===

    /// Resting quantity at `price` on `side`, 0 if the level is absent
    fn volume_at(&self, price: Price, side: Side) -> Quantity {
        let levels = match side {
            Side::Buy => self.bid_levels(),
            Side::Sell => self.ask_levels(),
        };
        levels.get(&price).copied().unwrap_or(0)
    }

    /// Bid volume at best bid minus ask volume at best ask
    fn touch_imbalance(&self) -> Quantity {
        let bid_qty = self.best_bid_level().map(|(_, q)| q).unwrap_or(0);
        let ask_qty = self.best_ask_level().map(|(_, q)| q).unwrap_or(0);
        bid_qty - ask_qty
    }

    /// Check if book is empty
    fn is_empty(&self) -> bool {
        self.bid_levels().is_empty() && self.ask_levels().is_empty()
    }

    /// Check if book has both sides
    fn is_two_sided(&self) -> bool {
        !self.bid_levels().is_empty() && !self.ask_levels().is_empty()
    }
}

impl OrderBookView for OrderBookSnapshot {
    fn bid_levels(&self) -> &BTreeMap<Price, Quantity> {
        &self.bids
    }

    fn ask_levels(&self) -> &BTreeMap<Price, Quantity> {
        &self.asks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_book() -> OrderBookSnapshot {
        OrderBookSnapshot::from_levels(
            [(dec!(100), 5), (dec!(99), 8), (dec!(98), 3)],
            [(dec!(102), 4), (dec!(103), 9)],
        )
    }

    #[test]
    fn test_best_prices() {
        let book = sample_book();
        assert_eq!(book.best_bid(), Some(dec!(100)));
        assert_eq!(book.best_ask(), Some(dec!(102)));
        assert_eq!(book.best_bid_level(), Some((dec!(100), 5)));
        assert_eq!(book.best_ask_level(), Some((dec!(102), 4)));
    }

    #[test]
    fn test_mid_price_and_spread() {
        let book = sample_book();
        assert_eq!(book.mid_price(), Some(dec!(101)));
        assert_eq!(book.spread(), Some(dec!(2)));

        let odd = OrderBookSnapshot::new().with_bid(dec!(100), 1).with_ask(dec!(101), 1);
        assert_eq!(odd.mid_price(), Some(dec!(100.5)));
    }

    #[test]
    fn test_one_sided_book_has_no_mid() {
        let book = OrderBookSnapshot::new().with_bid(dec!(100), 5);
        assert_eq!(book.best_ask(), None);
        assert_eq!(book.mid_price(), None);
        assert_eq!(book.spread(), None);
        assert!(!book.is_two_sided());
        assert!(!book.is_empty());
    }

    #[test]
    fn test_volume_at() {
        let book = sample_book();
        assert_eq!(book.volume_at(dec!(99), Side::Buy), 8);
        assert_eq!(book.volume_at(dec!(103), Side::Sell), 9);
        assert_eq!(book.volume_at(dec!(101), Side::Sell), 0);
        assert_eq!(book.volume_at(dec!(102), Side::Buy), 0);
    }

    #[test]
    fn test_touch_imbalance() {
        assert_eq!(sample_book().touch_imbalance(), 1);
        assert_eq!(OrderBookSnapshot::new().touch_imbalance(), 0);
    }

    #[test]
    fn test_empty_book() {
        let book = OrderBookSnapshot::new();
        assert!(book.is_empty());
        assert_eq!(book.best_bid(), None);
    }
}

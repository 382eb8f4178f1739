//! Market Snapshot - everything the engine hands over for one tick

use crate::book::OrderBookSnapshot;
use crate::values::{InstrumentId, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Point-in-time view of all books and positions.
///
/// Immutable for the duration of one tick's processing. Books are kept in a
/// BTreeMap so that per-instrument dispatch happens in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Engine timestamp of the tick
    #[serde(default)]
    pub timestamp: i64,
    /// Order books for every instrument in this tick
    pub books: BTreeMap<InstrumentId, OrderBookSnapshot>,
    /// Current signed position per instrument
    #[serde(default)]
    pub positions: HashMap<InstrumentId, Quantity>,
}

impl MarketSnapshot {
    pub fn new(timestamp: i64) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }

    /// Add an instrument's book
    pub fn with_book(mut self, instrument_id: impl Into<InstrumentId>, book: OrderBookSnapshot) -> Self {
        self.books.insert(instrument_id.into(), book);
        self
    }

    /// Set an instrument's position
    pub fn with_position(mut self, instrument_id: impl Into<InstrumentId>, position: Quantity) -> Self {
        self.positions.insert(instrument_id.into(), position);
        self
    }

    /// Get order book for an instrument
    pub fn book(&self, instrument_id: &str) -> Option<&OrderBookSnapshot> {
        self.books.get(instrument_id)
    }

    /// Get position for an instrument (0 if none)
    pub fn position(&self, instrument_id: &str) -> Quantity {
        self.positions.get(instrument_id).copied().unwrap_or(0)
    }

    /// Whether a book for the instrument is present at all
    pub fn has_book(&self, instrument_id: &str) -> bool {
        self.books.contains_key(instrument_id)
    }

    /// Number of instruments with a book
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::OrderBookView;
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_defaults_to_flat() {
        let snapshot = MarketSnapshot::new(0)
            .with_book("ABRA", OrderBookSnapshot::new())
            .with_position("ABRA", -7);
        assert_eq!(snapshot.position("ABRA"), -7);
        assert_eq!(snapshot.position("DROWZEE"), 0);
    }

    #[test]
    fn test_book_lookup() {
        let snapshot = MarketSnapshot::new(100).with_book(
            "SHINX",
            OrderBookSnapshot::new().with_bid(dec!(10), 1).with_ask(dec!(12), 1),
        );
        assert!(snapshot.has_book("SHINX"));
        assert!(!snapshot.has_book("JOLTEON"));
        assert_eq!(snapshot.book("SHINX").and_then(|b| b.mid_price()), Some(dec!(11)));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_deserialize_from_engine_json() {
        let json = r#"{
            "timestamp": 300,
            "books": {
                "ABRA": { "bids": { "100": 5 }, "asks": { "102": 4 } }
            },
            "positions": { "ABRA": 3 }
        }"#;
        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.timestamp, 300);
        assert_eq!(snapshot.position("ABRA"), 3);
        let book = snapshot.book("ABRA").unwrap();
        assert_eq!(book.best_bid_level(), Some((dec!(100), 5)));
        assert_eq!(book.best_ask(), Some(dec!(102)));
    }
}

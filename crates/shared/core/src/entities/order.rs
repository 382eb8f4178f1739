use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::{InstrumentId, Price, Quantity};

/// An order intent handed back to the execution engine.
///
/// The side is encoded in the sign of `quantity`: positive buys, negative
/// sells. Orders are produced once and never mutated; whether and how they
/// fill is the engine's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// The instrument being traded
    pub instrument_id: InstrumentId,
    /// Limit price
    pub price: Price,
    /// Signed quantity (positive = buy, negative = sell)
    pub quantity: Quantity,
}

impl Order {
    /// Create an order from a signed quantity
    pub fn new(instrument_id: impl Into<InstrumentId>, price: Price, quantity: Quantity) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            price,
            quantity,
        }
    }

    /// Create a buy order for `quantity` lots (quantity is made positive)
    pub fn buy(instrument_id: impl Into<InstrumentId>, price: Price, quantity: Quantity) -> Self {
        Self::new(instrument_id, price, quantity.abs())
    }

    /// Create a sell order for `quantity` lots (quantity is made negative)
    pub fn sell(instrument_id: impl Into<InstrumentId>, price: Price, quantity: Quantity) -> Self {
        Self::new(instrument_id, price, -quantity.abs())
    }

    /// Side implied by the quantity sign
    pub fn side(&self) -> Option<Side> {
        Side::from_signed(self.quantity)
    }

    pub fn is_buy(&self) -> bool {
        self.quantity > 0
    }

    pub fn is_sell(&self) -> bool {
        self.quantity < 0
    }

    /// Unsigned lot count
    pub fn size(&self) -> Quantity {
        self.quantity.abs()
    }

    /// Position after this order fills completely, starting from `position`
    pub fn position_after_fill(&self, position: Quantity) -> Quantity {
        position + self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_constructors_normalize_sign() {
        let buy = Order::buy("ABRA", dec!(100), -5);
        assert_eq!(buy.quantity, 5);
        assert_eq!(buy.side(), Some(Side::Buy));

        let sell = Order::sell("ABRA", dec!(101), 5);
        assert_eq!(sell.quantity, -5);
        assert!(sell.is_sell());
        assert_eq!(sell.size(), 5);
    }

    #[test]
    fn test_position_after_fill() {
        let sell = Order::sell("ABRA", dec!(101), 7);
        assert_eq!(sell.position_after_fill(3), -4);
    }

    #[test]
    fn test_serde_round_trip_shape() {
        let order = Order::buy("SHINX", dec!(99.5), 12);
        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"instrument_id\":\"SHINX\""));
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, order);
    }
}

//! Index Arbitrage
//!
//! Trades a basket instrument against the weighted average of its
//! components. When the basket trades at a premium to fair value it is sold
//! and the components bought; at a discount the reverse.
//!
//! Nothing is traded unless the index leg itself fits under the limit. Hedge
//! legs are sized from the index quantity actually sent, taken at the
//! component's far touch and clamped to the component's own position limit,
//! using the positions in the snapshot.

use super::Touch;
use crate::sizing::{PositionLimit, to_lots};
use crate::strategy::{Phase, Policy};
use helix_core::{InstrumentId, MarketSnapshot, Order, OrderBookSnapshot, Price, Quantity, Side};
use helix_stats::RollingStats;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One basket constituent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexComponent {
    pub instrument_id: InstrumentId,
    pub weight: Decimal,
    /// Limit applied to hedge orders on this component
    pub position_limit: Quantity,
}

impl IndexComponent {
    pub fn new(instrument_id: impl Into<InstrumentId>, weight: Decimal, position_limit: Quantity) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            weight,
            position_limit,
        }
    }
}

/// Configuration for the index arbitrage policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexArbitrageConfig {
    /// Basket instrument
    pub instrument_id: String,
    /// Maximum basket position (absolute value)
    pub position_limit: Quantity,
    pub components: Vec<IndexComponent>,
    /// Capacity of the fair value history
    pub fair_window: usize,
    /// Fair value samples needed before the volatility threshold is used
    pub vol_min_samples: usize,
    /// Threshold = max(min_threshold, vol_multiplier * std(fair values))
    pub vol_multiplier: Decimal,
    pub min_threshold: Decimal,
    /// Threshold while the fair value history is short
    pub fallback_threshold: Decimal,
    /// Upper bound on the trade unit
    pub max_unit: Quantity,
    /// Trade unit = min(max_unit, position_limit / unit_divisor)
    pub unit_divisor: Quantity,
}

impl Default for IndexArbitrageConfig {
    fn default() -> Self {
        Self {
            instrument_id: "ASH".to_string(),
            position_limit: 60,
            components: vec![
                IndexComponent::new("LUXRAY", dec!(0.6), 250),
                IndexComponent::new("JOLTEON", dec!(0.3), 350),
                IndexComponent::new("SHINX", dec!(0.1), 60),
            ],
            fair_window: 50,
            vol_min_samples: 20,
            vol_multiplier: dec!(2.0),
            min_threshold: dec!(1.0),
            fallback_threshold: dec!(2.0),
            max_unit: 15,
            unit_divisor: 3,
        }
    }
}

/// Basket-versus-components arbitrage
#[derive(Debug, Clone)]
pub struct IndexArbitrage {
    config: IndexArbitrageConfig,
    limit: PositionLimit,
    fair_values: RollingStats,
}

impl IndexArbitrage {
    pub fn new(config: IndexArbitrageConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        let fair_values = RollingStats::new(config.fair_window);
        Self {
            config,
            limit,
            fair_values,
        }
    }

    pub fn components(&self) -> &[IndexComponent] {
        &self.config.components
    }

    /// History of computed fair values
    pub fn fair_values(&self) -> &RollingStats {
        &self.fair_values
    }

    /// Weighted average of component mids.
    ///
    /// `None` if any component book is missing or one-sided, or the weights
    /// sum to zero.
    pub fn fair_value(&self, snapshot: &MarketSnapshot) -> Option<Price> {
        let mut weighted = Decimal::ZERO;
        let mut total_weight = Decimal::ZERO;
        for component in &self.config.components {
            let touch = snapshot.book(&component.instrument_id).and_then(Touch::of)?;
            weighted += component.weight * touch.mid();
            total_weight += component.weight;
        }
        if total_weight.is_zero() {
            return None;
        }
        Some(weighted / total_weight)
    }

    /// Premium needed before trading
    fn threshold(&self) -> Decimal {
        if self.fair_values.len() < self.config.vol_min_samples {
            return self.config.fallback_threshold;
        }
        let std = self.fair_values.std_dev().unwrap_or(Decimal::ZERO);
        (self.config.vol_multiplier * std).max(self.config.min_threshold)
    }

    fn trade_unit(&self) -> Quantity {
        let divisor = self.config.unit_divisor.max(1);
        self.config.max_unit.min(self.limit.value() / divisor)
    }

    /// Hedge orders on every component for `index_qty` lots of basket on `index_side`
    fn hedge_orders(&self, snapshot: &MarketSnapshot, index_side: Side, index_qty: Quantity) -> Vec<Order> {
        let hedge_side = index_side.opposite();
        self.config
            .components
            .iter()
            .filter_map(|component| {
                let touch = snapshot.book(&component.instrument_id).and_then(Touch::of)?;
                let price = match hedge_side {
                    Side::Buy => touch.ask,
                    Side::Sell => touch.bid,
                };
                let desired = to_lots(component.weight * Decimal::from(index_qty)).max(1);
                let position = snapshot.position(&component.instrument_id);
                let qty = PositionLimit::new(component.position_limit).clamp(hedge_side, desired, position)?;
                Some(Order::new(component.instrument_id.clone(), price, qty))
            })
            .collect()
    }
}

impl Policy for IndexArbitrage {
    fn name(&self) -> &str {
        "IndexArbitrage"
    }

    fn instrument_id(&self) -> &str {
        &self.config.instrument_id
    }

    fn position_limit(&self) -> PositionLimit {
        self.limit
    }

    fn phase(&self) -> Phase {
        if self.fair_values.is_empty() {
            Phase::Warmup
        } else {
            Phase::Active
        }
    }

    fn get_orders(
        &mut self,
        snapshot: &MarketSnapshot,
        book: &OrderBookSnapshot,
        position: Quantity,
    ) -> Vec<Order> {
        let id = &self.config.instrument_id;
        let Some(index) = Touch::of(book) else {
            return Vec::new();
        };
        let Some(fair) = self.fair_value(snapshot) else {
            debug!("[{}] Component books incomplete, no fair value", id);
            return Vec::new();
        };
        if fair.is_zero() {
            return Vec::new();
        }

        let mid = index.mid();
        self.fair_values.push(fair);

        let premium = mid - fair;
        let threshold = self.threshold();
        let unit = self.trade_unit();
        debug!(
            "[{}] mid={} fair={:.4} premium={:.4} threshold={:.4}",
            id, mid, fair, premium, threshold
        );

        let (index_side, price) = if premium > threshold {
            (Side::Sell, index.ask)
        } else if premium < -threshold {
            (Side::Buy, index.bid)
        } else {
            return Vec::new();
        };

        // No hedge without the index leg
        let Some(index_qty) = self.limit.clamp(index_side, unit, position) else {
            debug!("[{}] At limit ({}), skipping {:?} signal", id, position, index_side);
            return Vec::new();
        };

        let mut orders = Vec::with_capacity(self.config.components.len() + 1);
        orders.push(Order::new(id.clone(), price, index_qty));
        orders.extend(self.hedge_orders(snapshot, index_side, index_qty.abs()));

        info!(
            "[{}] Index {:?} premium={:.4} qty={} orders={}",
            id,
            index_side,
            premium,
            index_qty,
            orders.len()
        );
        orders
    }
}

//! Mean Reversion with Momentum Confirmation
//!
//! Tracks mid-prices over a rolling window and trades against the deviation
//! of the current mid from the window mean:
//! - Buys when momentum (mid - mean) drops below -band * stddev
//! - Sells when it rises above +band * stddev
//! - Sizes by confidence (|momentum| / stddev, capped)
//! - Steps one tick inside when touch volume imbalance backs the trade

use super::Touch;
use crate::sizing::{PositionLimit, SignalStrength, SizingPolicy};
use crate::strategy::{Phase, Policy};
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, Price, Quantity, Side};
use helix_stats::RollingStats;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for mean reversion with momentum
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeanReversionMomentumConfig {
    /// Instrument to trade
    pub instrument_id: String,
    /// Maximum position (absolute value)
    pub position_limit: Quantity,
    /// Long window capacity (mid-prices)
    pub window: usize,
    /// Samples required before signalling
    pub min_samples: usize,
    /// Short window length, reported alongside each signal
    pub short_window: usize,
    /// Entry band in standard deviations
    pub entry_band: Decimal,
    /// Base order size
    pub base_size: Quantity,
    /// Cap on the confidence multiplier
    pub max_multiplier: Decimal,
    /// Minimum tick size
    pub tick_size: Price,
}

impl Default for MeanReversionMomentumConfig {
    fn default() -> Self {
        Self {
            instrument_id: "DROWZEE".to_string(),
            position_limit: 50,
            window: 50,
            min_samples: 10,
            short_window: 10,
            entry_band: dec!(0.8),
            base_size: 12,
            max_multiplier: dec!(2.0),
            tick_size: dec!(1),
        }
    }
}

/// Mean reversion taker over a rolling mid-price window
#[derive(Debug, Clone)]
pub struct MeanReversionMomentum {
    config: MeanReversionMomentumConfig,
    limit: PositionLimit,
    sizing: SizingPolicy,
    history: RollingStats,
}

impl MeanReversionMomentum {
    pub fn new(config: MeanReversionMomentumConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        let sizing = SizingPolicy::ConfidenceScaled {
            base: config.base_size,
            max_multiplier: config.max_multiplier,
        };
        let history = RollingStats::new(config.window);
        Self {
            config,
            limit,
            sizing,
            history,
        }
    }

    /// Mid-price history
    pub fn history(&self) -> &RollingStats {
        &self.history
    }
}

impl Policy for MeanReversionMomentum {
    fn name(&self) -> &str {
        "MeanReversionMomentum"
    }

    fn instrument_id(&self) -> &str {
        &self.config.instrument_id
    }

    fn position_limit(&self) -> PositionLimit {
        self.limit
    }

    fn phase(&self) -> Phase {
        if self.history.len() < self.config.min_samples {
            Phase::Warmup
        } else {
            Phase::Active
        }
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

        let mid = touch.mid();
        self.history.push(mid);

        if self.phase() == Phase::Warmup {
            debug!(
                "[{}] Warming up: {}/{} samples",
                self.config.instrument_id,
                self.history.len(),
                self.config.min_samples
            );
            return Vec::new();
        }

        let (Some(long_avg), Some(std_dev)) = (self.history.mean(), self.history.std_dev()) else {
            return Vec::new();
        };
        let momentum = mid - long_avg;
        let band = self.config.entry_band * std_dev;
        let signal = SignalStrength::new(momentum, std_dev);
        let imbalance = touch.imbalance();
        let tick = self.config.tick_size;
        let id = &self.config.instrument_id;

        if momentum < -band && self.limit.allows(Side::Buy, position) {
            let price = if imbalance > 0 { touch.bid + tick } else { touch.bid };
            if let Some(qty) = self.sizing.order_quantity(Side::Buy, position, self.limit, signal) {
                info!(
                    "[{}] BUY signal: momentum={:.4} std={:.4} short_avg={:?} qty={}",
                    id,
                    momentum,
                    std_dev,
                    self.history.mean_of_last(self.config.short_window),
                    qty
                );
                return vec![Order::new(id, price, qty)];
            }
        } else if momentum > band && self.limit.allows(Side::Sell, position) {
            let price = if imbalance < 0 { touch.ask - tick } else { touch.ask };
            if let Some(qty) = self.sizing.order_quantity(Side::Sell, position, self.limit, signal) {
                info!(
                    "[{}] SELL signal: momentum={:.4} std={:.4} short_avg={:?} qty={}",
                    id,
                    momentum,
                    std_dev,
                    self.history.mean_of_last(self.config.short_window),
                    qty
                );
                return vec![Order::new(id, price, qty)];
            }
        }

        Vec::new()
    }
}

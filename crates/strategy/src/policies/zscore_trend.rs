//! Z-Score Reversion with Trend-Adjusted Thresholds
//!
//! Fades large z-scores of the current mid against a long window, but
//! widens the entry thresholds when a short-term trend is running so that
//! it does not stand in front of it. When the trend agrees with the trade,
//! the order steps one tick inside the touch.

use super::Touch;
use crate::sizing::{PositionLimit, SignalStrength, SizingPolicy};
use crate::strategy::{Phase, Policy};
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, Price, Quantity, Side};
use helix_stats::RollingStats;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for z-score with trend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZScoreTrendConfig {
    /// Instrument to trade
    pub instrument_id: String,
    /// Maximum position (absolute value)
    pub position_limit: Quantity,
    /// Window capacity (mid-prices)
    pub window: usize,
    /// Samples required before signalling
    pub min_samples: usize,
    /// Number of most recent mids the trend slope is measured over
    pub trend_lookback: usize,
    /// Entry z-score with no trend
    pub base_threshold: Decimal,
    /// Threshold widening per unit of trend strength
    pub trend_weight: Decimal,
    /// Order size when flat
    pub max_order_size: Quantity,
    /// Minimum tick size
    pub tick_size: Price,
}

impl Default for ZScoreTrendConfig {
    fn default() -> Self {
        Self {
            instrument_id: "ABRA".to_string(),
            position_limit: 50,
            window: 80,
            min_samples: 20,
            trend_lookback: 10,
            base_threshold: dec!(1.2),
            trend_weight: dec!(0.3),
            max_order_size: 15,
            tick_size: dec!(1),
        }
    }
}

/// Z-score reversion policy with trend-aware thresholds
#[derive(Debug, Clone)]
pub struct ZScoreWithTrend {
    config: ZScoreTrendConfig,
    limit: PositionLimit,
    sizing: SizingPolicy,
    history: RollingStats,
}

impl ZScoreWithTrend {
    pub fn new(config: ZScoreTrendConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        let sizing = SizingPolicy::InventoryScaled {
            base: config.max_order_size,
        };
        let history = RollingStats::new(config.window);
        Self {
            config,
            limit,
            sizing,
            history,
        }
    }

    /// Per-sample slope over the last `trend_lookback` mids:
    /// (newest - oldest of those) / count
    fn trend(&self) -> Decimal {
        let count = self.config.trend_lookback.min(self.history.len());
        if count == 0 {
            return Decimal::ZERO;
        }
        match (self.history.last(), self.history.nth_back(count - 1)) {
            (Some(newest), Some(oldest)) => (newest - oldest) / Decimal::from(count),
            _ => Decimal::ZERO,
        }
    }

    /// Mid-price history
    pub fn history(&self) -> &RollingStats {
        &self.history
    }
}

impl Policy for ZScoreWithTrend {
    fn name(&self) -> &str {
        "ZScoreWithTrend"
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
            return Vec::new();
        }

        let std_dev = self.history.std_dev().unwrap_or(Decimal::ZERO);
        let z_score = self.history.z_score(mid);
        let trend = self.trend();
        let trend_strength = if std_dev > Decimal::ZERO {
            trend.abs() / std_dev
        } else {
            Decimal::ZERO
        };
        let threshold = self.config.base_threshold + self.config.trend_weight * trend_strength;

        debug!(
            "[{}] z={:.3} trend={:.4} threshold={:.3}",
            self.config.instrument_id, z_score, trend, threshold
        );

        let signal = SignalStrength::new(z_score, Decimal::ONE);
        let tick = self.config.tick_size;
        let id = &self.config.instrument_id;

        if z_score < -threshold && self.limit.allows(Side::Buy, position) {
            let price = if trend > Decimal::ZERO { touch.bid + tick } else { touch.bid };
            if let Some(qty) = self.sizing.order_quantity(Side::Buy, position, self.limit, signal) {
                info!("[{}] BUY signal: z={:.3} trend={:.4} qty={}", id, z_score, trend, qty);
                return vec![Order::new(id, price, qty)];
            }
        } else if z_score > threshold && self.limit.allows(Side::Sell, position) {
            let price = if trend < Decimal::ZERO { touch.ask - tick } else { touch.ask };
            if let Some(qty) = self.sizing.order_quantity(Side::Sell, position, self.limit, signal) {
                info!("[{}] SELL signal: z={:.3} trend={:.4} qty={}", id, z_score, trend, qty);
                return vec![Order::new(id, price, qty)];
            }
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::test_support::book_around;

    fn feed(policy: &mut ZScoreWithTrend, mids: &[Decimal], position: Quantity) -> Vec<Order> {
        let mut last = Vec::new();
        for &mid in mids {
            last = policy.get_orders(&MarketSnapshot::default(), &book_around(mid), position);
        }
        last
    }

    /// Alternating 99/101 so the window has some spread but no trend
    fn choppy(n: usize) -> Vec<Decimal> {
        (0..n)
            .map(|i| if i % 2 == 0 { dec!(99) } else { dec!(101) })
            .collect()
    }

    #[test]
    fn test_warmup_emits_nothing() {
        let mut policy = ZScoreWithTrend::new(ZScoreTrendConfig::default());
        let mut mids = choppy(18);
        mids.push(dec!(10));
        assert!(feed(&mut policy, &mids, 0).is_empty());
        assert_eq!(policy.phase(), Phase::Warmup);
    }

    #[test]
    fn test_trend_slope() {
        let mut policy = ZScoreWithTrend::new(ZScoreTrendConfig::default());
        let mids: Vec<Decimal> = (0..20).map(Decimal::from).collect();
        feed(&mut policy, &mids, 0);
        // last ten are 10..=19 -> (19 - 10) / 10
        assert_eq!(policy.trend(), dec!(0.9));
    }

    #[test]
    fn test_sharp_drop_buys_passively_against_down_trend() {
        let mut policy = ZScoreWithTrend::new(ZScoreTrendConfig::default());
        let mut mids = choppy(30);
        mids.push(dec!(90));

        let orders = feed(&mut policy, &mids, 0);
        assert_eq!(orders.len(), 1);
        assert!(orders[0].is_buy());
        assert_eq!(orders[0].quantity, 15);
        // Trend points down -> stay at best bid
        assert_eq!(orders[0].price, dec!(89));
    }

    #[test]
    fn test_sharp_rise_sells_passively_against_up_trend() {
        let mut policy = ZScoreWithTrend::new(ZScoreTrendConfig::default());
        let mut mids = choppy(30);
        mids.push(dec!(110));

        let orders = feed(&mut policy, &mids, 20);
        assert_eq!(orders.len(), 1);
        assert!(orders[0].is_sell());
        // 15 * (1 - 20/50) = 9
        assert_eq!(orders[0].quantity, -9);
        assert_eq!(orders[0].price, dec!(111));
    }

    #[test]
    fn test_no_signal_inside_threshold() {
        let mut policy = ZScoreWithTrend::new(ZScoreTrendConfig::default());
        let mut mids = choppy(30);
        mids.push(dec!(101));
        assert!(feed(&mut policy, &mids, 0).is_empty());
    }
}

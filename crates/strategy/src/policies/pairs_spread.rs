//! Pairs Spread Trader
//!
//! Trades its own instrument on the z-score of the spread against a peer:
//! `spread = own_mid - hedge_ratio * peer_mid`.
//!
//! Only the own leg is ever traded. The peer leg is expected to be handled
//! by the peer's own pairs policy; the two legs are not coordinated, so one
//! side can fill while the other does not.

use super::Touch;
use crate::sizing::{PositionLimit, reduce_toward_flat};
use crate::strategy::{Phase, Policy};
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, Quantity, Side};
use helix_stats::RollingStats;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Configuration for the pairs spread trader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PairsSpreadConfig {
    /// Instrument to trade
    pub instrument_id: String,
    /// Instrument whose book the spread is measured against
    pub peer_instrument_id: String,
    /// Maximum position (absolute value)
    pub position_limit: Quantity,
    /// Spread window capacity
    pub window: usize,
    /// Samples required before signalling
    pub min_samples: usize,
    /// Newest spreads used to re-estimate the hedge ratio
    pub hedge_lookback: usize,
    /// Hedge ratio before enough history exists
    pub initial_hedge_ratio: Decimal,
    pub min_hedge_ratio: Decimal,
    pub max_hedge_ratio: Decimal,
    /// |z| above which a position is opened
    pub entry_z: Decimal,
    /// |z| below which an open position is reduced
    pub exit_z: Decimal,
    /// Lots per entry
    pub entry_size: Quantity,
    /// Lots per exit step
    pub exit_size: Quantity,
    /// Exits only run when |position| is above this
    pub exit_min_position: Quantity,
}

impl Default for PairsSpreadConfig {
    fn default() -> Self {
        Self {
            instrument_id: "SHINX".to_string(),
            peer_instrument_id: "JOLTEON".to_string(),
            position_limit: 60,
            window: 100,
            min_samples: 30,
            hedge_lookback: 30,
            initial_hedge_ratio: dec!(1.0),
            min_hedge_ratio: dec!(0.5),
            max_hedge_ratio: dec!(2.0),
            entry_z: dec!(1.5),
            exit_z: dec!(0.3),
            entry_size: 12,
            exit_size: 8,
            exit_min_position: 5,
        }
    }
}

/// Single-leg pairs trader
#[derive(Debug, Clone)]
pub struct PairsSpread {
    config: PairsSpreadConfig,
    limit: PositionLimit,
    spreads: RollingStats,
    hedge_ratio: Decimal,
}

impl PairsSpread {
    pub fn new(config: PairsSpreadConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        let spreads = RollingStats::new(config.window);
        let hedge_ratio = config.initial_hedge_ratio;
        Self {
            config,
            limit,
            spreads,
            hedge_ratio,
        }
    }

    /// Hedge ratio the next spread will be computed with
    pub fn hedge_ratio(&self) -> Decimal {
        self.hedge_ratio
    }

    /// Spread history
    pub fn spreads(&self) -> &RollingStats {
        &self.spreads
    }

    pub fn peer_instrument_id(&self) -> &str {
        &self.config.peer_instrument_id
    }

    /// clamp(1 / (1 + variance of the newest spreads), min, max)
    fn estimate_hedge_ratio(&self) -> Decimal {
        if self.spreads.len() < self.config.hedge_lookback {
            return self.config.initial_hedge_ratio;
        }
        let variance = self
            .spreads
            .variance_of_last(self.config.hedge_lookback)
            .unwrap_or(Decimal::ZERO);
        (Decimal::ONE / (Decimal::ONE + variance))
            .clamp(self.config.min_hedge_ratio, self.config.max_hedge_ratio)
    }
}

impl Policy for PairsSpread {
    fn name(&self) -> &str {
        "PairsSpread"
    }

    fn instrument_id(&self) -> &str {
        &self.config.instrument_id
    }

    fn position_limit(&self) -> PositionLimit {
        self.limit
    }

    fn phase(&self) -> Phase {
        if self.spreads.len() < self.config.min_samples {
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
        let Some(peer_book) = snapshot.book(&self.config.peer_instrument_id) else {
            debug!(
                "[{}] Peer {} missing from snapshot",
                self.config.instrument_id, self.config.peer_instrument_id
            );
            return Vec::new();
        };
        let (Some(own), Some(peer)) = (Touch::of(book), Touch::of(peer_book)) else {
            return Vec::new();
        };

        let spread = own.mid() - self.hedge_ratio * peer.mid();
        self.spreads.push(spread);

        if self.phase() == Phase::Warmup {
            return Vec::new();
        }

        self.hedge_ratio = self.estimate_hedge_ratio();
        let z_score = self.spreads.z_score(spread);
        let id = &self.config.instrument_id;

        debug!(
            "[{}] spread={:.4} z={:.3} hedge_ratio={:.4}",
            id, spread, z_score, self.hedge_ratio
        );

        let order = if z_score > self.config.entry_z && self.limit.allows(Side::Sell, position) {
            // Spread rich: sell own leg
            self.limit
                .clamp(Side::Sell, self.config.entry_size, position)
                .map(|qty| Order::new(id, own.ask, qty))
        } else if z_score < -self.config.entry_z && self.limit.allows(Side::Buy, position) {
            // Spread cheap: buy own leg
            self.limit
                .clamp(Side::Buy, self.config.entry_size, position)
                .map(|qty| Order::new(id, own.bid, qty))
        } else if z_score.abs() < self.config.exit_z && position.abs() > self.config.exit_min_position {
            reduce_toward_flat(position, self.config.exit_size).map(|qty| {
                let price = if qty < 0 { own.ask } else { own.bid };
                Order::new(id, price, qty)
            })
        } else {
            None
        };

        if let Some(order) = &order {
            info!(
                "[{}] Pairs order vs {}: qty={} @ {} z={:.3}",
                id, self.config.peer_instrument_id, order.quantity, order.price, z_score
            );
        }
        order.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::test_support::{book_around, snapshot_with};

    /// Feed one tick with the given own/peer mids
    fn tick(policy: &mut PairsSpread, own_mid: Decimal, peer_mid: Decimal, position: Quantity) -> Vec<Order> {
        let own = book_around(own_mid);
        let snapshot = snapshot_with(&[("SHINX", own.clone()), ("JOLTEON", book_around(peer_mid))]);
        policy.get_orders(&snapshot, &own, position)
    }

    #[test]
    fn test_missing_peer_emits_nothing_and_keeps_window_clean() {
        let mut policy = PairsSpread::new(PairsSpreadConfig::default());
        let own = book_around(dec!(110));
        let snapshot = snapshot_with(&[("SHINX", own.clone())]);
        assert!(policy.get_orders(&snapshot, &own, 0).is_empty());
        assert!(policy.spreads().is_empty());
    }

    #[test]
    fn test_warmup_emits_nothing() {
        let mut policy = PairsSpread::new(PairsSpreadConfig::default());
        for i in 0..29 {
            let own = if i % 2 == 0 { dec!(150) } else { dec!(50) };
            assert!(tick(&mut policy, own, dec!(100), 0).is_empty());
        }
        assert_eq!(policy.phase(), Phase::Warmup);
    }

    #[test]
    fn test_spread_spike_sells_own_leg_only() {
        let mut policy = PairsSpread::new(PairsSpreadConfig::default());
        for _ in 0..30 {
            assert!(tick(&mut policy, dec!(110), dec!(100), 0).is_empty());
        }
        assert_eq!(policy.hedge_ratio(), dec!(1));

        // spread jumps from 10 to 25
        let orders = tick(&mut policy, dec!(125), dec!(100), 0);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].instrument_id, "SHINX");
        assert_eq!(orders[0].quantity, -12);
        assert_eq!(orders[0].price, dec!(126));
    }

    #[test]
    fn test_spread_collapse_buys_own_leg() {
        let mut policy = PairsSpread::new(PairsSpreadConfig::default());
        for _ in 0..30 {
            tick(&mut policy, dec!(110), dec!(100), 0);
        }
        let orders = tick(&mut policy, dec!(95), dec!(100), 55);
        // Entry size 12 clamped to the 5 lots left under the limit
        assert_eq!(orders, vec![Order::new("SHINX", dec!(94), 5)]);
    }

    #[test]
    fn test_exit_when_spread_normal() {
        let mut policy = PairsSpread::new(PairsSpreadConfig::default());
        for _ in 0..30 {
            tick(&mut policy, dec!(110), dec!(100), 20);
        }
        // z == 0 on a flat window -> reduce the long by up to 8
        let orders = tick(&mut policy, dec!(110), dec!(100), 20);
        assert_eq!(orders, vec![Order::new("SHINX", dec!(111), -8)]);

        let orders = tick(&mut policy, dec!(110), dec!(100), -3);
        assert!(orders.is_empty(), "small positions are left alone");

        let orders = tick(&mut policy, dec!(110), dec!(100), -7);
        assert_eq!(orders, vec![Order::new("SHINX", dec!(109), 7)]);
    }

    #[test]
    fn test_hedge_ratio_bounded() {
        let mut policy = PairsSpread::new(PairsSpreadConfig::default());
        for i in 0..40 {
            let own = if i % 2 == 0 { dec!(130) } else { dec!(90) };
            tick(&mut policy, own, dec!(100), 0);
        }
        assert_eq!(policy.hedge_ratio(), dec!(0.5));
    }
}

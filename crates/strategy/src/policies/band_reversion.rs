//! Band Reversion
//!
//! Bollinger-style taker: keeps a full window of mids and takes the touch
//! when it breaks out of `mean ± k * std`.

use super::Touch;
use crate::sizing::PositionLimit;
use crate::strategy::{Phase, Policy};
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, Quantity, Side};
use helix_stats::RollingStats;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BandReversionConfig {
    pub instrument_id: String,
    pub position_limit: Quantity,
    /// Number of mids in the band; trading starts once it is full
    pub window: usize,
    /// Band half-width in standard deviations
    pub band_width: Decimal,
}

impl Default for BandReversionConfig {
    fn default() -> Self {
        Self {
            instrument_id: "DROWZEE".to_string(),
            position_limit: 50,
            window: 20,
            band_width: dec!(1.5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BandReversion {
    config: BandReversionConfig,
    limit: PositionLimit,
    mids: RollingStats,
}

impl BandReversion {
    pub fn new(config: BandReversionConfig) -> Self {
        let limit = PositionLimit::new(config.position_limit);
        let mids = RollingStats::new(config.window);
        Self { config, limit, mids }
    }

    /// (lower, upper) band, `None` until the window is full
    pub fn bands(&self) -> Option<(Decimal, Decimal)> {
        if !self.mids.is_full() {
            return None;
        }
        let mean = self.mids.mean()?;
        let width = self.config.band_width * self.mids.std_dev()?;
        Some((mean - width, mean + width))
    }
}

impl Policy for BandReversion {
    fn name(&self) -> &str {
        "BandReversion"
    }

    fn instrument_id(&self) -> &str {
        &self.config.instrument_id
    }

    fn position_limit(&self) -> PositionLimit {
        self.limit
    }

    fn phase(&self) -> Phase {
        if self.mids.is_full() {
            Phase::Active
        } else {
            Phase::Warmup
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
        self.mids.push(touch.mid());

        let Some((lower, upper)) = self.bands() else {
            return Vec::new();
        };
        let id = &self.config.instrument_id;
        debug!("[{}] band=[{:.4}, {:.4}]", id, lower, upper);

        let mut orders = Vec::new();
        if touch.ask < lower {
            if let Some(qty) = self.limit.clamp(Side::Buy, touch.ask_qty, position) {
                info!("[{}] Ask {} below band, buying {}", id, touch.ask, qty);
                orders.push(Order::new(id, touch.ask, qty));
            }
        }
        if touch.bid > upper {
            if let Some(qty) = self.limit.clamp(Side::Sell, touch.bid_qty, position) {
                info!("[{}] Bid {} above band, selling {}", id, touch.bid, -qty);
                orders.push(Order::new(id, touch.bid, qty));
            }
        }
        orders
    }
}

//! Per-instrument policies
//!
//! The set of policies is closed: [`StrategyPolicy`] is the tagged union the
//! router stores, one instance per instrument, selected from configuration
//! at construction time.

mod band_reversion;
mod flat_fair_value;
mod index_arbitrage;
mod mean_reversion;
mod mid_discount;
mod noop;
mod pairs_spread;
mod spread_capture;
mod tight_spread;
mod zscore_trend;

pub use band_reversion::{BandReversion, BandReversionConfig};
pub use flat_fair_value::{FlatFairValue, FlatFairValueConfig};
pub use index_arbitrage::{IndexArbitrage, IndexArbitrageConfig, IndexComponent};
pub use mean_reversion::{MeanReversionMomentum, MeanReversionMomentumConfig};
pub use mid_discount::{MidDiscountConfig, MidDiscountTaker};
pub use noop::{Noop, NoopConfig};
pub use pairs_spread::{PairsSpread, PairsSpreadConfig};
pub use spread_capture::{SpreadCapture, SpreadCaptureConfig};
pub use tight_spread::{TightSpreadConfig, TightSpreadMaker};
pub use zscore_trend::{ZScoreTrendConfig, ZScoreWithTrend};

use crate::sizing::PositionLimit;
use crate::strategy::{Phase, Policy};
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, OrderBookView, Price, Quantity};
use rust_decimal::Decimal;

/// One policy instance, whichever variant it is
#[derive(Debug, Clone)]
pub enum StrategyPolicy {
    FlatFairValue(FlatFairValue),
    TightSpreadMaker(TightSpreadMaker),
    MeanReversionMomentum(MeanReversionMomentum),
    ZScoreWithTrend(ZScoreWithTrend),
    PairsSpread(PairsSpread),
    IndexArbitrage(IndexArbitrage),
    SpreadCapture(SpreadCapture),
    BandReversion(BandReversion),
    MidDiscountTaker(MidDiscountTaker),
    Noop(Noop),
}

macro_rules! dispatch {
    ($self:expr, $p:ident => $body:expr) => {
        match $self {
            StrategyPolicy::FlatFairValue($p) => $body,
            StrategyPolicy::TightSpreadMaker($p) => $body,
            StrategyPolicy::MeanReversionMomentum($p) => $body,
            StrategyPolicy::ZScoreWithTrend($p) => $body,
            StrategyPolicy::PairsSpread($p) => $body,
            StrategyPolicy::IndexArbitrage($p) => $body,
            StrategyPolicy::SpreadCapture($p) => $body,
            StrategyPolicy::BandReversion($p) => $body,
            StrategyPolicy::MidDiscountTaker($p) => $body,
            StrategyPolicy::Noop($p) => $body,
        }
    };
}

impl Policy for StrategyPolicy {
    fn name(&self) -> &str {
        dispatch!(self, p => p.name())
    }

    fn instrument_id(&self) -> &str {
        dispatch!(self, p => p.instrument_id())
    }

    fn position_limit(&self) -> PositionLimit {
        dispatch!(self, p => p.position_limit())
    }

    fn get_orders(
        &mut self,
        snapshot: &MarketSnapshot,
        book: &OrderBookSnapshot,
        position: Quantity,
    ) -> Vec<Order> {
        dispatch!(self, p => p.get_orders(snapshot, book, position))
    }

    fn phase(&self) -> Phase {
        dispatch!(self, p => p.phase())
    }
}

/// Top of book for a two-sided book
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Touch {
    pub bid: Price,
    pub bid_qty: Quantity,
    pub ask: Price,
    pub ask_qty: Quantity,
}

impl Touch {
    /// `None` unless both sides have at least one level
    pub fn of(book: &impl OrderBookView) -> Option<Self> {
        let (bid, bid_qty) = book.best_bid_level()?;
        let (ask, ask_qty) = book.best_ask_level()?;
        Some(Self {
            bid,
            bid_qty,
            ask,
            ask_qty,
        })
    }

    pub fn mid(&self) -> Price {
        (self.bid + self.ask) / Decimal::TWO
    }

    pub fn spread(&self) -> Price {
        self.ask - self.bid
    }

    /// Bid volume minus ask volume at the touch
    pub fn imbalance(&self) -> Quantity {
        self.bid_qty - self.ask_qty
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use helix_core::{MarketSnapshot, OrderBookSnapshot};
    use rust_decimal::Decimal;

    /// Book with a single level on each side
    pub fn book(bid: Decimal, bid_qty: i64, ask: Decimal, ask_qty: i64) -> OrderBookSnapshot {
        OrderBookSnapshot::new()
            .with_bid(bid, bid_qty)
            .with_ask(ask, ask_qty)
    }

    /// Book whose mid is exactly `mid`, one tick either side
    pub fn book_around(mid: Decimal) -> OrderBookSnapshot {
        book(mid - Decimal::ONE, 10, mid + Decimal::ONE, 10)
    }

    pub fn snapshot_with(books: &[(&str, OrderBookSnapshot)]) -> MarketSnapshot {
        books
            .iter()
            .fold(MarketSnapshot::new(0), |s, (id, b)| s.with_book(*id, b.clone()))
    }
}

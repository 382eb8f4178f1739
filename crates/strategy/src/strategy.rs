//! Policy Trait
//!
//! Defines the interface every per-instrument policy implements. A policy
//! is handed the whole snapshot (so multi-instrument policies can read
//! sibling books), its own instrument's book and its current position, and
//! answers with zero or more orders.

use crate::sizing::PositionLimit;
use helix_core::{MarketSnapshot, Order, OrderBookSnapshot, Quantity};

/// Lifecycle of a rolling-window policy.
///
/// There is no terminal state: once active, a policy stays active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not enough samples yet; the policy emits nothing
    Warmup,
    /// Window is deep enough to evaluate a signal every tick
    Active,
}

/// Policy trait - implement this for a per-instrument trading policy
pub trait Policy: Send {
    /// Policy kind for logging
    fn name(&self) -> &str;

    /// Instrument this policy trades
    fn instrument_id(&self) -> &str;

    /// Hard limit on the absolute position of `instrument_id`
    fn position_limit(&self) -> PositionLimit;

    /// Called once per tick with this instrument's book and position.
    ///
    /// Missing or one-sided books, absent peers and insufficient history
    /// all resolve to an empty vec.
    fn get_orders(
        &mut self,
        snapshot: &MarketSnapshot,
        book: &OrderBookSnapshot,
        position: Quantity,
    ) -> Vec<Order>;

    /// Current lifecycle phase (stateless policies are always active)
    fn phase(&self) -> Phase {
        Phase::Active
    }
}

//! Strategy Router
//!
//! Owns one policy instance per instrument and dispatches every book in a
//! snapshot to its policy, in instrument order.
//!
//! Several policies can trade the same instrument in one tick (an index
//! hedging into a component that also has its own policy). Orders are
//! admitted against a per-tick exposure ledger, so that the limit holds for
//! any combination of fills, not just for each order on its own.

use crate::config::{DEFAULT_POSITION_LIMIT, DEFAULT_SINGLE_INSTRUMENT_ID, RouterConfig};
use crate::error::ConfigError;
use crate::policies::{Noop, NoopConfig, StrategyPolicy};
use crate::sizing::PositionLimit;
use crate::strategy::Policy;
use helix_core::{InstrumentId, MarketSnapshot, Order, OrderBookSnapshot, Quantity, Side};
use log::{debug, info, trace};
use std::collections::{BTreeMap, HashMap};

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub enum RouterOutput {
    /// Orders keyed by the instrument whose book was dispatched
    PerInstrument(BTreeMap<InstrumentId, Vec<Order>>),
    /// Flat order list for the reserved single-instrument id
    SingleInstrument {
        orders: Vec<Order>,
        position_limit: Quantity,
    },
}

impl RouterOutput {
    /// Orders produced for `instrument_id`'s book.
    ///
    /// In single-instrument mode every order belongs to the one instrument.
    pub fn orders_for(&self, instrument_id: &str) -> &[Order] {
        match self {
            RouterOutput::PerInstrument(map) => map.get(instrument_id).map(Vec::as_slice).unwrap_or(&[]),
            RouterOutput::SingleInstrument { orders, .. } => orders,
        }
    }

    /// All orders, flattened in dispatch order
    pub fn into_orders(self) -> Vec<Order> {
        match self {
            RouterOutput::PerInstrument(map) => map.into_values().flatten().collect(),
            RouterOutput::SingleInstrument { orders, .. } => orders,
        }
    }

    pub fn order_count(&self) -> usize {
        match self {
            RouterOutput::PerInstrument(map) => map.values().map(Vec::len).sum(),
            RouterOutput::SingleInstrument { orders, .. } => orders.len(),
        }
    }

    pub fn is_single_instrument(&self) -> bool {
        matches!(self, RouterOutput::SingleInstrument { .. })
    }
}

/// Lots already committed this tick, per instrument and side
#[derive(Debug, Default)]
struct TickExposure {
    buys: HashMap<InstrumentId, Quantity>,
    sells: HashMap<InstrumentId, Quantity>,
}

impl TickExposure {
    /// Trim `order` to the headroom left after earlier orders on the same side.
    ///
    /// `None` when nothing is left.
    fn admit(&mut self, mut order: Order, position: Quantity, limit: PositionLimit) -> Option<Order> {
        let side = order.side()?;
        let committed = match side {
            Side::Buy => self.buys.entry(order.instrument_id.clone()).or_insert(0),
            Side::Sell => self.sells.entry(order.instrument_id.clone()).or_insert(0),
        };
        let room = limit.headroom(side, position) - *committed;
        let size = order.size().min(room);
        if size <= 0 {
            debug!("Dropping {:?}: {} already committed this tick", order, committed);
            return None;
        }
        if size < order.size() {
            debug!("Trimming {:?} to {} lots", order, size);
        }
        *committed += size;
        order.quantity = size * side.sign();
        Some(order)
    }
}

/// Per-instrument policy dispatcher
#[derive(Debug)]
pub struct StrategyRouter {
    policies: HashMap<InstrumentId, StrategyPolicy>,
    single_instrument_id: InstrumentId,
    default_position_limit: Quantity,
}

impl Default for StrategyRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyRouter {
    /// Empty router: every instrument falls through to the no-op policy
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
            single_instrument_id: DEFAULT_SINGLE_INSTRUMENT_ID.to_string(),
            default_position_limit: DEFAULT_POSITION_LIMIT,
        }
    }

    /// Build a router with a fresh policy instance per configured instrument
    pub fn from_config(config: &RouterConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut router = Self {
            policies: HashMap::with_capacity(config.policies.len()),
            single_instrument_id: config.single_instrument_id.clone(),
            default_position_limit: config.default_position_limit,
        };
        for entry in &config.policies {
            router.register(entry.build())?;
        }
        info!(
            "Strategy router ready: {} policies, single-instrument id {}",
            router.policies.len(),
            router.single_instrument_id
        );
        Ok(router)
    }

    /// Add a policy for its instrument. An instrument holds at most one policy.
    pub fn register(&mut self, policy: StrategyPolicy) -> Result<(), ConfigError> {
        let instrument_id = policy.instrument_id().to_string();
        if self.policies.contains_key(&instrument_id) {
            return Err(ConfigError::DuplicateInstrument(instrument_id));
        }
        info!("Registered {} for {}", policy.name(), instrument_id);
        self.policies.insert(instrument_id, policy);
        Ok(())
    }

    pub fn policy(&self, instrument_id: &str) -> Option<&StrategyPolicy> {
        self.policies.get(instrument_id)
    }

    /// Configured limit, or the default for unmapped instruments
    pub fn position_limit(&self, instrument_id: &str) -> Quantity {
        self.policies
            .get(instrument_id)
            .map(|p| p.position_limit().value())
            .unwrap_or(self.default_position_limit)
    }

    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    fn limit_for(&self, instrument_id: &str) -> PositionLimit {
        PositionLimit::new(self.position_limit(instrument_id))
    }

    /// Process one tick
    pub fn run(&mut self, snapshot: &MarketSnapshot) -> RouterOutput {
        let mut exposure = TickExposure::default();

        if snapshot.len() == 1 && snapshot.has_book(&self.single_instrument_id) {
            let id = self.single_instrument_id.clone();
            let orders = snapshot
                .book(&id)
                .map(|book| self.dispatch(snapshot, &id, book))
                .unwrap_or_default();
            let orders = self.admit(&mut exposure, snapshot, orders);
            return RouterOutput::SingleInstrument {
                orders,
                position_limit: self.position_limit(&id),
            };
        }

        let mut result = BTreeMap::new();
        for (instrument_id, book) in &snapshot.books {
            let orders = self.dispatch(snapshot, instrument_id, book);
            let orders = self.admit(&mut exposure, snapshot, orders);
            result.insert(instrument_id.clone(), orders);
        }
        trace!(
            "Tick {}: {} orders across {} books",
            snapshot.timestamp,
            result.values().map(Vec::len).sum::<usize>(),
            result.len()
        );
        RouterOutput::PerInstrument(result)
    }

    fn admit(&self, exposure: &mut TickExposure, snapshot: &MarketSnapshot, orders: Vec<Order>) -> Vec<Order> {
        orders
            .into_iter()
            .filter_map(|order| {
                let position = snapshot.position(&order.instrument_id);
                let limit = self.limit_for(&order.instrument_id);
                exposure.admit(order, position, limit)
            })
            .collect()
    }

    fn dispatch(&mut self, snapshot: &MarketSnapshot, instrument_id: &str, book: &OrderBookSnapshot) -> Vec<Order> {
        let position = snapshot.position(instrument_id);
        match self.policies.get_mut(instrument_id) {
            Some(policy) => policy.get_orders(snapshot, book, position),
            None => {
                debug!("No policy for {}, skipping", instrument_id);
                Noop::new(NoopConfig {
                    instrument_id: instrument_id.to_string(),
                    position_limit: self.default_position_limit,
                })
                .get_orders(snapshot, book, position)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_default_config;
    use crate::policies::{TightSpreadConfig, TightSpreadMaker};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tight_book() -> OrderBookSnapshot {
        OrderBookSnapshot::new().with_bid(dec!(100), 5).with_ask(dec!(102), 5)
    }

    #[test]
    fn test_unmapped_instrument_gets_empty_orders() {
        let mut router = StrategyRouter::new();
        let snapshot = MarketSnapshot::new(1).with_book("UNKNOWN", tight_book());

        let output = router.run(&snapshot);
        assert!(!output.is_single_instrument());
        assert!(output.orders_for("UNKNOWN").is_empty());
        assert_eq!(router.position_limit("UNKNOWN"), 50);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut router = StrategyRouter::new();
        let policy = || StrategyPolicy::TightSpreadMaker(TightSpreadMaker::new(TightSpreadConfig::default()));
        router.register(policy()).unwrap();
        assert!(matches!(
            router.register(policy()),
            Err(ConfigError::DuplicateInstrument(_))
        ));
    }

    #[test]
    fn test_dispatches_each_book() {
        let mut router = StrategyRouter::from_config(&load_default_config().unwrap()).unwrap();
        let snapshot = MarketSnapshot::new(1)
            .with_book("SUDOWOODO", tight_book())
            .with_book("DROWZEE", tight_book())
            .with_position("SUDOWOODO", 10);

        let output = router.run(&snapshot);
        let RouterOutput::PerInstrument(map) = &output else {
            panic!("expected per-instrument output");
        };
        assert_eq!(map.len(), 2);
        // 15 * (1 - 10/50) = 12
        assert_eq!(output.orders_for("SUDOWOODO")[0].quantity, 12);
        assert!(output.orders_for("DROWZEE").is_empty(), "DROWZEE is still warming up");
    }

    #[test]
    fn test_single_instrument_mode() {
        let config = RouterConfig {
            policies: vec![crate::config::PolicyConfig::TightSpread(TightSpreadConfig {
                instrument_id: "PRODUCT".to_string(),
                position_limit: 20,
                ..Default::default()
            })],
            ..Default::default()
        };
        let mut router = StrategyRouter::from_config(&config).unwrap();
        let snapshot = MarketSnapshot::new(1).with_book("PRODUCT", tight_book());

        let RouterOutput::SingleInstrument { orders, position_limit } = router.run(&snapshot) else {
            panic!("expected single-instrument output");
        };
        assert_eq!(position_limit, 20);
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn test_reserved_id_with_other_books_is_multi_mode() {
        let mut router = StrategyRouter::new();
        let snapshot = MarketSnapshot::new(1)
            .with_book("PRODUCT", tight_book())
            .with_book("ABRA", tight_book());
        assert!(!router.run(&snapshot).is_single_instrument());
    }

    #[test]
    fn test_shared_component_exposure_is_deducted() {
        let mut router = StrategyRouter::from_config(&load_default_config().unwrap()).unwrap();
        // ASH and MISTY both trade at a premium and both buy LUXRAY / JOLTEON
        let around = |mid: Decimal| {
            OrderBookSnapshot::new()
                .with_bid(mid - Decimal::ONE, 5)
                .with_ask(mid + Decimal::ONE, 5)
        };
        let snapshot = MarketSnapshot::new(1)
            .with_book("ASH", around(dec!(540)))
            .with_book("MISTY", around(dec!(540)))
            .with_book("LUXRAY", around(dec!(500)))
            .with_book("JOLTEON", around(dec!(500)))
            .with_book("SHINX", around(dec!(500)))
            .with_position("LUXRAY", 240);

        let luxray = |orders: &[Order]| -> Quantity {
            orders
                .iter()
                .filter(|o| o.instrument_id == "LUXRAY")
                .map(|o| o.quantity)
                .sum()
        };

        let output = router.run(&snapshot);
        // ASH takes 9 of the 10 LUXRAY lots left, MISTY gets the last one
        assert_eq!(luxray(output.orders_for("ASH")), 9);
        assert_eq!(luxray(output.orders_for("MISTY")), 1);
        assert!(240 + luxray(output.into_orders().as_slice()) <= 250);
    }

    #[test]
    fn test_exposure_ledger_sides_are_independent() {
        let mut exposure = TickExposure::default();
        let limit = PositionLimit::new(50);

        let buy = exposure.admit(Order::new("A", dec!(10), 30), 10, limit);
        assert_eq!(buy.map(|o| o.quantity), Some(30));
        let buy = exposure.admit(Order::new("A", dec!(10), 30), 10, limit);
        assert_eq!(buy.map(|o| o.quantity), Some(10));
        assert!(exposure.admit(Order::new("A", dec!(10), 1), 10, limit).is_none());

        // Sells are not offset by the pending buys
        let sell = exposure.admit(Order::new("A", dec!(11), -70), 10, limit);
        assert_eq!(sell.map(|o| o.quantity), Some(-60));
    }

    #[test]
    fn test_output_helpers() {
        let mut map = BTreeMap::new();
        map.insert("A".to_string(), vec![Order::new("A", dec!(1), 1)]);
        map.insert("B".to_string(), vec![Order::new("B", dec!(2), -2), Order::new("B", dec!(3), 3)]);
        let output = RouterOutput::PerInstrument(map);

        assert_eq!(output.order_count(), 3);
        assert!(output.orders_for("C").is_empty());
        let flat = output.into_orders();
        assert_eq!(flat[0].instrument_id, "A");
        assert_eq!(flat.len(), 3);
    }
}

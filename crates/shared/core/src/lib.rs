//! Helix Core Domain
//!
//! Pure domain types shared by the statistics kernel and the strategy crate.
//! This crate contains no async, no I/O, and is 100% unit testable.
//!
//! The order book is treated as data handed over by an external engine:
//! [`OrderBookSnapshot`] is a plain pair of price -> quantity maps, and
//! [`OrderBookView`] is the read-only query surface strategies use on it.

pub mod book;
pub mod entities;
pub mod snapshot;
pub mod values;

pub use book::{OrderBookSnapshot, OrderBookView};
pub use entities::{Order, Side};
pub use snapshot::MarketSnapshot;
pub use values::{InstrumentId, Price, Quantity};

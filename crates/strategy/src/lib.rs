//! Helix Strategy Framework
//!
//! Decision logic that turns a market snapshot and a position into order
//! intents:
//! - Rolling statistics per policy instance (the only cross-tick state)
//! - Position-aware sizing with hard exposure limits
//! - A closed set of per-instrument policies, including multi-instrument
//!   pairs and index-arbitrage policies that read sibling books
//! - A router that dispatches every instrument's book to its policy
//!
//! ## Architecture
//!
//! ```text
//!   External engine
//!         │ MarketSnapshot (books + positions)
//!         ▼
//!   ┌──────────────────┐
//!   │  StrategyRouter  │── unmapped instrument ──► Noop
//!   └────────┬─────────┘
//!            │ (snapshot, own book, position)
//!            ▼
//!   ┌──────────────────┐      peer / component books
//!   │  StrategyPolicy  │◄──── read from the same snapshot
//!   └────────┬─────────┘
//!            │ Vec<Order>, clamped by PositionLimit
//!            ▼
//!   External engine
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use helix_strategy::{load_default_config, StrategyRouter};
//!
//! let mut router = StrategyRouter::from_config(&load_default_config()?)?;
//! let output = router.run(&snapshot);
//! ```

pub mod config;
pub mod error;
pub mod policies;
pub mod router;
pub mod sizing;
pub mod strategy;

// Re-export main types
pub use config::{
    PolicyConfig, RouterConfig, load_config, load_config_from_str, load_default_config,
};
pub use error::ConfigError;
pub use policies::{
    BandReversion, FlatFairValue, IndexArbitrage, MeanReversionMomentum, MidDiscountTaker, Noop,
    PairsSpread, SpreadCapture, StrategyPolicy, TightSpreadMaker, ZScoreWithTrend,
};
pub use router::{RouterOutput, StrategyRouter};
pub use sizing::{PositionLimit, SignalStrength, SizingPolicy};
pub use strategy::{Phase, Policy};
